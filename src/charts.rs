//! Chart ownership slots.
//!
//! Each slot owns at most one live chart instance. [`ChartSlots::replace`]
//! is the only way to install a chart and always disposes the previous
//! occupant first.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    SpendingBreakdown,
    GoalDistribution,
}

impl ChartSlot {
    pub fn canvas_id(self) -> &'static str {
        match self {
            ChartSlot::SpendingBreakdown => "chart-spending",
            ChartSlot::GoalDistribution => "chart-goals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Doughnut,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInstance {
    pub slot: ChartSlot,
    pub canvas: &'static str,
    /// Changes on every replacement; the page rebuilds the widget when it does.
    pub instance_id: u64,
    pub spec: ChartSpec,
}

#[derive(Debug, Default)]
struct SlotState {
    live: Option<ChartInstance>,
    created: u64,
    disposed: u64,
}

impl SlotState {
    fn live_count(&self) -> u64 {
        self.created - self.disposed
    }
}

#[derive(Debug, Default)]
pub struct ChartSlots {
    spending: SlotState,
    goals: SlotState,
    next_instance: u64,
}

impl ChartSlots {
    fn state(&self, slot: ChartSlot) -> &SlotState {
        match slot {
            ChartSlot::SpendingBreakdown => &self.spending,
            ChartSlot::GoalDistribution => &self.goals,
        }
    }

    fn state_mut(&mut self, slot: ChartSlot) -> &mut SlotState {
        match slot {
            ChartSlot::SpendingBreakdown => &mut self.spending,
            ChartSlot::GoalDistribution => &mut self.goals,
        }
    }

    /// Disposes the current occupant of `slot`, then installs a new instance.
    pub fn replace(&mut self, slot: ChartSlot, spec: ChartSpec) -> u64 {
        self.next_instance += 1;
        let instance_id = self.next_instance;

        let state = self.state_mut(slot);
        if let Some(previous) = state.live.take() {
            state.disposed += 1;
            tracing::debug!(?slot, disposed = previous.instance_id, "chart disposed");
        }
        state.live = Some(ChartInstance {
            slot,
            canvas: slot.canvas_id(),
            instance_id,
            spec,
        });
        state.created += 1;
        debug_assert!(state.live_count() <= 1);
        instance_id
    }

    pub fn live(&self, slot: ChartSlot) -> Option<&ChartInstance> {
        self.state(slot).live.as_ref()
    }

    pub fn live_count(&self, slot: ChartSlot) -> u64 {
        self.state(slot).live_count()
    }

    pub fn disposed_count(&self, slot: ChartSlot) -> u64 {
        self.state(slot).disposed
    }

    pub fn instances(&self) -> Vec<ChartInstance> {
        [ChartSlot::SpendingBreakdown, ChartSlot::GoalDistribution]
            .into_iter()
            .filter_map(|slot| self.live(slot).cloned())
            .collect()
    }
}
