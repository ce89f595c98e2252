//! View refresh registry: view name → refresh procedure.

use crate::bridge::Backend;
use crate::charts::ChartSlots;
use crate::clock::Clock;
use crate::errors::{RefreshError, RemoteError};
use crate::surface::Surface;
use crate::views::{CardsView, DashboardView, GoalsView, InvestmentsView, TransactionsView};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    Dashboard,
    Transactions,
    Cards,
    Investments,
    Goals,
}

impl ViewName {
    pub const ALL: [ViewName; 5] = [
        ViewName::Dashboard,
        ViewName::Transactions,
        ViewName::Cards,
        ViewName::Investments,
        ViewName::Goals,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Dashboard => "dashboard",
            ViewName::Transactions => "transactions",
            ViewName::Cards => "cards",
            ViewName::Investments => "investments",
            ViewName::Goals => "goals",
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ViewName::ALL
            .into_iter()
            .find(|view| view.as_str() == raw)
            .ok_or_else(|| format!("unknown view `{raw}`"))
    }
}

/// Everything a refresh procedure may touch.
#[derive(Clone)]
pub struct ViewContext {
    pub backend: Arc<dyn Backend>,
    pub surface: Arc<Mutex<Surface>>,
    pub charts: Arc<Mutex<ChartSlots>>,
    clock: Clock,
}

impl ViewContext {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            surface: Arc::new(Mutex::new(Surface::default())),
            charts: Arc::new(Mutex::new(ChartSlots::default())),
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[async_trait]
pub trait Refresh: Send + Sync {
    /// Fetches authoritative state and re-renders the view.
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError>;
}

pub struct RefreshRegistry {
    procedures: BTreeMap<ViewName, Arc<dyn Refresh>>,
}

impl RefreshRegistry {
    pub fn empty() -> Self {
        Self {
            procedures: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with(ViewName::Dashboard, Arc::new(DashboardView))
            .with(ViewName::Transactions, Arc::new(TransactionsView))
            .with(ViewName::Cards, Arc::new(CardsView))
            .with(ViewName::Investments, Arc::new(InvestmentsView))
            .with(ViewName::Goals, Arc::new(GoalsView))
    }

    pub fn with(mut self, view: ViewName, procedure: Arc<dyn Refresh>) -> Self {
        self.procedures.insert(view, procedure);
        self
    }

    pub fn contains(&self, view: ViewName) -> bool {
        self.procedures.contains_key(&view)
    }

    pub async fn refresh(&self, view: ViewName, ctx: &ViewContext) -> Result<(), RefreshError> {
        let procedure = self
            .procedures
            .get(&view)
            .ok_or(RefreshError::Unregistered(view))?;
        tracing::debug!(%view, "refreshing view");
        procedure
            .refresh(ctx)
            .await
            .map_err(|source| RefreshError::Remote { view, source })
    }

    /// Refreshes `views` one after another, in order. A failed view does not
    /// stop the rest; the failures are returned.
    pub async fn refresh_in_order(
        &self,
        views: &[ViewName],
        ctx: &ViewContext,
    ) -> Vec<RefreshError> {
        let mut failures = Vec::new();
        for view in views {
            if let Err(err) = self.refresh(*view, ctx).await {
                tracing::warn!(view = %view, error = %err, "view refresh failed");
                failures.push(err);
            }
        }
        failures
    }
}
