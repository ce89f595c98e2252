//! Backend contract consumed by the view layer.
//!
//! Every mutation returns an explicit `Result`; the orchestrator only
//! refreshes views after a successful call.

use crate::errors::RemoteError;
use crate::models::{
    BudgetGoals, CardSummary, DashboardSummary, Fields, LiveHolding, RecordKind,
    TransactionHistory, TransactionKind,
};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn remove_record(&self, kind: RecordKind, id: i64) -> Result<(), RemoteError>;

    async fn save_transaction(
        &self,
        kind: TransactionKind,
        fields: &Fields,
    ) -> Result<(), RemoteError>;

    async fn get_dashboard_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<DashboardSummary, RemoteError>;

    async fn get_transaction_history(&self) -> Result<TransactionHistory, RemoteError>;

    async fn get_budget_goals(&self, month: u32, year: i32) -> Result<BudgetGoals, RemoteError>;

    async fn update_goal_allocation(&self, category: &str, pct: f64) -> Result<(), RemoteError>;

    /// Fails with [`RemoteError::Rejected`] when the category already exists.
    async fn create_goal(&self, category: &str, pct: f64) -> Result<(), RemoteError>;

    async fn get_card_summaries(&self) -> Result<Vec<CardSummary>, RemoteError>;

    async fn get_live_investments(&self) -> Result<Vec<LiveHolding>, RemoteError>;

    async fn list_budget_categories(&self) -> Result<Vec<String>, RemoteError>;
}

/// Bounds every call of the wrapped backend.
pub struct TimedBackend<B> {
    inner: B,
    limit: Duration,
}

impl<B: Backend> TimedBackend<B> {
    pub fn new(inner: B, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T: Send>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, RemoteError>> + Send,
    ) -> Result<T, RemoteError> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(op, limit_ms = self.limit.as_millis() as u64, "bridge call timed out");
                Err(RemoteError::Timeout {
                    op,
                    after: self.limit,
                })
            }
        }
    }
}

#[async_trait]
impl<B: Backend> Backend for TimedBackend<B> {
    async fn remove_record(&self, kind: RecordKind, id: i64) -> Result<(), RemoteError> {
        self.bounded("remove_record", self.inner.remove_record(kind, id))
            .await
    }

    async fn save_transaction(
        &self,
        kind: TransactionKind,
        fields: &Fields,
    ) -> Result<(), RemoteError> {
        self.bounded("save_transaction", self.inner.save_transaction(kind, fields))
            .await
    }

    async fn get_dashboard_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<DashboardSummary, RemoteError> {
        self.bounded(
            "get_dashboard_summary",
            self.inner.get_dashboard_summary(month, year),
        )
        .await
    }

    async fn get_transaction_history(&self) -> Result<TransactionHistory, RemoteError> {
        self.bounded(
            "get_transaction_history",
            self.inner.get_transaction_history(),
        )
        .await
    }

    async fn get_budget_goals(&self, month: u32, year: i32) -> Result<BudgetGoals, RemoteError> {
        self.bounded("get_budget_goals", self.inner.get_budget_goals(month, year))
            .await
    }

    async fn update_goal_allocation(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        self.bounded(
            "update_goal_allocation",
            self.inner.update_goal_allocation(category, pct),
        )
        .await
    }

    async fn create_goal(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        self.bounded("create_goal", self.inner.create_goal(category, pct))
            .await
    }

    async fn get_card_summaries(&self) -> Result<Vec<CardSummary>, RemoteError> {
        self.bounded("get_card_summaries", self.inner.get_card_summaries())
            .await
    }

    async fn get_live_investments(&self) -> Result<Vec<LiveHolding>, RemoteError> {
        self.bounded("get_live_investments", self.inner.get_live_investments())
            .await
    }

    async fn list_budget_categories(&self) -> Result<Vec<String>, RemoteError> {
        self.bounded(
            "list_budget_categories",
            self.inner.list_budget_categories(),
        )
        .await
    }
}
