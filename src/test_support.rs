//! Scripted collaborators for unit tests.

use crate::bridge::Backend;
use crate::errors::RemoteError;
use crate::models::{
    BudgetGoals, CardSummary, DashboardSummary, Fields, LiveHolding, RecordKind,
    TransactionHistory, TransactionKind,
};
use crate::registry::{Refresh, RefreshRegistry, ViewContext, ViewName};
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Notify;

#[derive(Default)]
struct Script {
    calls: Mutex<Vec<String>>,
    fail_mutations: AtomicBool,
    fail_reads: AtomicBool,
    hold_mutations: AtomicBool,
    entered: Notify,
    resume: Notify,
    dashboard: Mutex<DashboardSummary>,
    history: Mutex<TransactionHistory>,
    goals: Mutex<BudgetGoals>,
    cards: Mutex<Vec<CardSummary>>,
    holdings: Mutex<Vec<LiveHolding>>,
}

/// Backend double that records every call and answers from canned data.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Script>,
}

impl ScriptedBackend {
    pub fn calls(&self) -> Vec<String> {
        self.script.calls.lock().unwrap().clone()
    }

    pub fn fail_mutations(&self) {
        self.script.fail_mutations.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.script.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Mutations park until [`ScriptedBackend::resume`] is called.
    pub fn hold_mutations(&self) {
        self.script.hold_mutations.store(true, Ordering::SeqCst);
    }

    /// Resolves once a held mutation has started.
    pub async fn mutation_entered(&self) {
        self.script.entered.notified().await;
    }

    pub fn resume(&self) {
        self.script.resume.notify_one();
    }

    pub fn set_dashboard(&self, dashboard: DashboardSummary) {
        *self.script.dashboard.lock().unwrap() = dashboard;
    }

    pub fn set_history(&self, history: TransactionHistory) {
        *self.script.history.lock().unwrap() = history;
    }

    pub fn set_goals(&self, goals: BudgetGoals) {
        *self.script.goals.lock().unwrap() = goals;
    }

    pub fn set_cards(&self, cards: Vec<CardSummary>) {
        *self.script.cards.lock().unwrap() = cards;
    }

    pub fn set_holdings(&self, holdings: Vec<LiveHolding>) {
        *self.script.holdings.lock().unwrap() = holdings;
    }

    fn record(&self, call: String) {
        self.script.calls.lock().unwrap().push(call);
    }

    async fn mutate(&self, op: &'static str, call: String) -> Result<(), RemoteError> {
        self.record(call);
        if self.script.hold_mutations.load(Ordering::SeqCst) {
            self.script.entered.notify_one();
            self.script.resume.notified().await;
        }
        if self.script.fail_mutations.load(Ordering::SeqCst) {
            return Err(RemoteError::rejected(op, "scripted failure"));
        }
        Ok(())
    }

    fn read<T: Clone>(&self, op: &'static str, data: &Mutex<T>) -> Result<T, RemoteError> {
        self.record(op.to_string());
        if self.script.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::rejected(op, "scripted failure"));
        }
        Ok(data.lock().unwrap().clone())
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn remove_record(&self, kind: RecordKind, id: i64) -> Result<(), RemoteError> {
        self.mutate("remove_record", format!("remove_record:{kind}:{id}"))
            .await
    }

    async fn save_transaction(
        &self,
        kind: TransactionKind,
        _fields: &Fields,
    ) -> Result<(), RemoteError> {
        self.mutate("save_transaction", format!("save_transaction:{kind}"))
            .await
    }

    async fn get_dashboard_summary(
        &self,
        _month: u32,
        _year: i32,
    ) -> Result<DashboardSummary, RemoteError> {
        self.read("get_dashboard_summary", &self.script.dashboard)
    }

    async fn get_transaction_history(&self) -> Result<TransactionHistory, RemoteError> {
        self.read("get_transaction_history", &self.script.history)
    }

    async fn get_budget_goals(&self, _month: u32, _year: i32) -> Result<BudgetGoals, RemoteError> {
        self.read("get_budget_goals", &self.script.goals)
    }

    async fn update_goal_allocation(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        self.mutate(
            "update_goal_allocation",
            format!("update_goal_allocation:{category}:{pct}"),
        )
        .await
    }

    async fn create_goal(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        self.mutate("create_goal", format!("create_goal:{category}:{pct}"))
            .await
    }

    async fn get_card_summaries(&self) -> Result<Vec<CardSummary>, RemoteError> {
        self.read("get_card_summaries", &self.script.cards)
    }

    async fn get_live_investments(&self) -> Result<Vec<LiveHolding>, RemoteError> {
        self.read("get_live_investments", &self.script.holdings)
    }

    async fn list_budget_categories(&self) -> Result<Vec<String>, RemoteError> {
        self.record("list_budget_categories".to_string());
        Ok(vec!["Fixed Expenses".to_string(), "Comfort".to_string()])
    }
}

pub type RefreshLog = Arc<Mutex<Vec<ViewName>>>;

/// Refresh procedure that only notes which view it was asked to refresh.
pub struct RecordingRefresh {
    view: ViewName,
    log: RefreshLog,
}

impl RecordingRefresh {
    pub fn log() -> RefreshLog {
        Arc::new(Mutex::new(Vec::new()))
    }
}

#[async_trait]
impl Refresh for RecordingRefresh {
    async fn refresh(&self, _ctx: &ViewContext) -> Result<(), RemoteError> {
        self.log.lock().unwrap().push(self.view);
        Ok(())
    }
}

pub fn recording_registry(log: &RefreshLog) -> RefreshRegistry {
    ViewName::ALL
        .into_iter()
        .fold(RefreshRegistry::empty(), |registry, view| {
            registry.with(
                view,
                Arc::new(RecordingRefresh {
                    view,
                    log: Arc::clone(log),
                }),
            )
        })
}
