//! Runs user actions under the busy lock: validate, engage, call the backend
//! once, refresh the affected views, release.

use crate::bridge::Backend;
use crate::busy::BusyLock;
use crate::errors::{ActionError, RefreshError, RemoteError, ValidationError};
use crate::models::{Fields, RecordKind, TransactionKind};
use crate::registry::{RefreshRegistry, ViewContext, ViewName};
use crate::surface::{SurfaceSnapshot, region};
use crate::text::parse_decimal;
use crate::views::sync_category_selectors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

const LEDGER_VIEWS: &[ViewName] = &[ViewName::Transactions, ViewName::Dashboard];
const CARD_PURCHASE_VIEWS: &[ViewName] =
    &[ViewName::Transactions, ViewName::Cards, ViewName::Dashboard];
const PORTFOLIO_VIEWS: &[ViewName] = &[ViewName::Investments, ViewName::Dashboard];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    AddIncome {
        #[serde(default)]
        fields: Fields,
    },
    AddExpense {
        #[serde(default)]
        fields: Fields,
    },
    RegisterCard {
        #[serde(default)]
        fields: Fields,
    },
    PostCardPurchase {
        #[serde(default)]
        fields: Fields,
    },
    AddInvestment {
        #[serde(default)]
        fields: Fields,
    },
    CreateGoal {
        #[serde(default)]
        fields: Fields,
    },
    UpdateGoal {
        #[serde(default)]
        category: String,
        #[serde(default)]
        pct: String,
    },
    RemoveRecord {
        kind: RecordKind,
        id: i64,
        #[serde(default)]
        confirmed: bool,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddIncome { .. } => "add_income",
            Action::AddExpense { .. } => "add_expense",
            Action::RegisterCard { .. } => "register_card",
            Action::PostCardPurchase { .. } => "post_card_purchase",
            Action::AddInvestment { .. } => "add_investment",
            Action::CreateGoal { .. } => "create_goal",
            Action::UpdateGoal { .. } => "update_goal",
            Action::RemoveRecord { .. } => "remove_record",
        }
    }

    /// Views to reload after the mutation succeeds, in refresh order.
    pub fn affected_views(&self) -> &'static [ViewName] {
        match self {
            Action::AddIncome { .. } | Action::AddExpense { .. } => LEDGER_VIEWS,
            Action::RegisterCard { .. } | Action::PostCardPurchase { .. } => &[ViewName::Cards],
            Action::AddInvestment { .. } => &[ViewName::Investments],
            Action::CreateGoal { .. } | Action::UpdateGoal { .. } => &[ViewName::Goals],
            Action::RemoveRecord { kind, .. } => match kind {
                RecordKind::Income | RecordKind::Expense => LEDGER_VIEWS,
                RecordKind::CardPurchase => CARD_PURCHASE_VIEWS,
                RecordKind::Investment => PORTFOLIO_VIEWS,
            },
        }
    }

    pub fn success_ack(&self) -> Option<&'static str> {
        match self {
            Action::RegisterCard { .. } => Some("Card registered!"),
            Action::PostCardPurchase { .. } => Some("Purchase posted!"),
            Action::AddInvestment { .. } => Some("Investment saved!"),
            _ => None,
        }
    }

    pub fn failure_ack(&self) -> &'static str {
        match self {
            Action::AddIncome { .. } => "Could not save the income.",
            Action::AddExpense { .. } => "Could not save the expense.",
            Action::RegisterCard { .. } => "Could not register the card.",
            Action::PostCardPurchase { .. } => "Could not post the purchase.",
            Action::AddInvestment { .. } => "Could not save the investment.",
            Action::CreateGoal { .. } => {
                "Could not create the goal. Does one with this name already exist?"
            }
            Action::UpdateGoal { .. } => "Could not update the allocation.",
            Action::RemoveRecord { .. } => "Could not remove the record.",
        }
    }

    fn resets_form(&self) -> bool {
        matches!(self, Action::CreateGoal { .. })
    }

    fn declined(&self) -> bool {
        matches!(self, Action::RemoveRecord { confirmed: false, .. })
    }

    /// Checks required input and turns the action into the backend call it
    /// stands for.
    pub fn validate(&self) -> Result<Mutation, ValidationError> {
        let action = self.name();
        match self {
            Action::AddIncome { fields } => {
                require(action, fields, &["description", "amount"], "Fill in description and amount.")?;
                Ok(Mutation::save(TransactionKind::Income, fields))
            }
            Action::AddExpense { fields } => {
                require(action, fields, &["description", "amount"], "Fill in description and amount.")?;
                Ok(Mutation::save(TransactionKind::Expense, fields))
            }
            Action::RegisterCard { fields } => {
                require(action, fields, &["name"], "Fill in the card name.")?;
                Ok(Mutation::save(TransactionKind::Card, fields))
            }
            Action::PostCardPurchase { fields } => {
                require(action, fields, &["description", "amount"], "Fill in description and amount.")?;
                Ok(Mutation::save(TransactionKind::CardPurchase, fields))
            }
            Action::AddInvestment { fields } => {
                require(
                    action,
                    fields,
                    &["ticker", "quantity", "avg_price"],
                    "Fill in the fields correctly.",
                )?;
                Ok(Mutation::save(TransactionKind::Investment, fields))
            }
            Action::CreateGoal { fields } => {
                require(action, fields, &["name", "pct"], "Fill in the name and the percentage!")?;
                let pct = percentage(action, fields.get("pct").map_or("", String::as_str))?;
                Ok(Mutation::CreateGoal {
                    category: fields.get("name").map_or("", String::as_str).trim().to_string(),
                    pct,
                })
            }
            Action::UpdateGoal { category, pct } => {
                let mut missing = Vec::new();
                if category.trim().is_empty() {
                    missing.push("category");
                }
                if pct.trim().is_empty() {
                    missing.push("pct");
                }
                if !missing.is_empty() {
                    return Err(ValidationError {
                        action,
                        missing,
                        message: "Choose a category and a percentage.".to_string(),
                    });
                }
                Ok(Mutation::UpdateGoal {
                    category: category.trim().to_string(),
                    pct: percentage(action, pct)?,
                })
            }
            Action::RemoveRecord { kind, id, .. } => Ok(Mutation::Remove {
                kind: *kind,
                id: *id,
            }),
        }
    }
}

fn require(
    action: &'static str,
    fields: &Fields,
    names: &[&'static str],
    message: &str,
) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = names
        .iter()
        .copied()
        .filter(|name| fields.get(*name).is_none_or(|value| value.trim().is_empty()))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ValidationError {
        action,
        missing,
        message: message.to_string(),
    })
}

fn percentage(action: &'static str, raw: &str) -> Result<f64, ValidationError> {
    parse_decimal(raw).ok_or_else(|| ValidationError {
        action,
        missing: Vec::new(),
        message: format!("`{}` is not a valid percentage.", raw.trim()),
    })
}

/// One remote mutation, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Save {
        kind: TransactionKind,
        fields: Fields,
    },
    CreateGoal {
        category: String,
        pct: f64,
    },
    UpdateGoal {
        category: String,
        pct: f64,
    },
    Remove {
        kind: RecordKind,
        id: i64,
    },
}

impl Mutation {
    fn save(kind: TransactionKind, fields: &Fields) -> Self {
        Mutation::Save {
            kind,
            fields: fields.clone(),
        }
    }

    pub async fn apply(&self, backend: &dyn Backend) -> Result<(), RemoteError> {
        match self {
            Mutation::Save { kind, fields } => backend.save_transaction(*kind, fields).await,
            Mutation::CreateGoal { category, pct } => backend.create_goal(category, *pct).await,
            Mutation::UpdateGoal { category, pct } => {
                backend.update_goal_allocation(category, *pct).await
            }
            Mutation::Remove { kind, id } => backend.remove_record(*kind, *id).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub refreshed: Vec<ViewName>,
    pub stale: Vec<ViewName>,
    pub acknowledgment: Option<&'static str>,
    pub reset_form: bool,
}

pub struct Orchestrator {
    ctx: ViewContext,
    registry: Arc<RefreshRegistry>,
    busy: BusyLock,
}

impl Orchestrator {
    pub fn new(ctx: ViewContext, registry: RefreshRegistry) -> Self {
        Self {
            ctx,
            registry: Arc::new(registry),
            busy: BusyLock::default(),
        }
    }

    pub fn busy(&self) -> &BusyLock {
        &self.busy
    }

    pub async fn perform(&self, action: Action) -> Result<ActionOutcome, ActionError> {
        let name = action.name();
        if action.declined() {
            info!(action = name, "confirmation declined");
            return Err(ActionError::ConfirmationDeclined { action: name });
        }

        let mutation = action.validate().inspect_err(|err| {
            warn!(action = name, missing = ?err.missing, "validation failed");
        })?;

        let guard = self.busy.try_engage(name)?;

        if let Err(source) = mutation.apply(self.ctx.backend.as_ref()).await {
            error!(action = name, error = %source, "remote call failed");
            let acknowledgment = action.failure_ack();
            self.ctx
                .surface
                .lock()
                .await
                .set_text(region::STATUS, acknowledgment);
            return Err(ActionError::Remote {
                action: name,
                acknowledgment: acknowledgment.to_string(),
                source,
            });
        }

        let views = action.affected_views();
        let failures = self.registry.refresh_in_order(views, &self.ctx).await;
        let stale: Vec<ViewName> = failures.iter().map(RefreshError::view).collect();
        self.report_stale(&stale).await;
        drop(guard);

        info!(action = name, refreshed = views.len(), stale = stale.len(), "action completed");
        Ok(ActionOutcome {
            refreshed: views
                .iter()
                .copied()
                .filter(|view| !stale.contains(view))
                .collect(),
            stale,
            acknowledgment: action.success_ack(),
            reset_form: action.resets_form(),
        })
    }

    /// Tab selection. Read-only, so the busy lock is not consulted.
    pub async fn open_tab(&self, view: ViewName) -> Result<(), RefreshError> {
        self.ctx.surface.lock().await.set_active_tab(view);
        self.registry.refresh(view, &self.ctx).await
    }

    /// Fills the category selectors, then opens the dashboard.
    pub async fn bootstrap(&self) {
        if let Err(err) = sync_category_selectors(&self.ctx, None).await {
            warn!(error = %err, "could not load budget categories");
        }
        if let Err(err) = self.open_tab(ViewName::Dashboard).await {
            warn!(error = %err, "initial dashboard refresh failed");
            self.report_stale(&[err.view()]).await;
        }
    }

    pub async fn categories(&self) -> Result<Vec<String>, RemoteError> {
        self.ctx.backend.list_budget_categories().await
    }

    pub async fn snapshot(&self) -> SurfaceSnapshot {
        let charts = self.ctx.charts.lock().await.instances();
        self.ctx
            .surface
            .lock()
            .await
            .snapshot(self.busy.is_engaged(), charts)
    }

    async fn report_stale(&self, stale: &[ViewName]) {
        let status = if stale.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = stale.iter().map(|view| view.as_str()).collect();
            format!("Could not refresh: {}", names.join(", "))
        };
        self.ctx.surface.lock().await.set_text(region::STATUS, &status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingRefresh, RefreshLog, ScriptedBackend, recording_registry};

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn recording(backend: &ScriptedBackend) -> (Orchestrator, RefreshLog) {
        let log = RecordingRefresh::log();
        let orchestrator = Orchestrator::new(
            ViewContext::new(Arc::new(backend.clone())),
            recording_registry(&log),
        );
        (orchestrator, log)
    }

    fn income() -> Action {
        Action::AddIncome {
            fields: fields(&[("description", "Salary"), ("amount", "5000")]),
        }
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "action": "remove_record",
            "kind": "card-purchase",
            "id": 7,
            "confirmed": true
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::RemoveRecord {
                kind: RecordKind::CardPurchase,
                id: 7,
                confirmed: true
            }
        );

        let action: Action =
            serde_json::from_value(serde_json::json!({ "action": "update_goal", "category": "Comfort" }))
                .unwrap();
        assert!(matches!(action.validate(), Err(err) if err.missing == vec!["pct"]));
    }

    #[tokio::test]
    async fn successful_action_refreshes_and_releases_once() {
        let backend = ScriptedBackend::default();
        let (orchestrator, log) = recording(&backend);

        let outcome = orchestrator.perform(income()).await.unwrap();

        assert_eq!(backend.calls(), vec!["save_transaction:income"]);
        assert_eq!(*log.lock().unwrap(), vec![ViewName::Transactions, ViewName::Dashboard]);
        assert_eq!(outcome.refreshed, vec![ViewName::Transactions, ViewName::Dashboard]);
        assert!(outcome.stale.is_empty());
        assert_eq!(outcome.acknowledgment, None);
        assert_eq!(orchestrator.busy().engagements(), 1);
        assert_eq!(orchestrator.busy().releases(), 1);
        assert!(!orchestrator.busy().is_engaged());
    }

    #[tokio::test]
    async fn remote_failure_skips_refresh_and_still_releases() {
        let backend = ScriptedBackend::default();
        backend.fail_mutations();
        let (orchestrator, log) = recording(&backend);

        let err = orchestrator
            .perform(Action::RegisterCard {
                fields: fields(&[("name", "Gold")]),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            ActionError::Remote { action: "register_card", .. }
        ));
        assert_eq!(err.to_string(), "Could not register the card.");
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(orchestrator.busy().engagements(), 1);
        assert_eq!(orchestrator.busy().releases(), 1);
        assert!(!orchestrator.busy().is_engaged());
    }

    #[tokio::test]
    async fn declined_removal_touches_nothing() {
        let backend = ScriptedBackend::default();
        let (orchestrator, log) = recording(&backend);

        let err = orchestrator
            .perform(Action::RemoveRecord {
                kind: RecordKind::Income,
                id: 3,
                confirmed: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::ConfirmationDeclined { .. }));
        assert!(backend.calls().is_empty());
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(orchestrator.busy().engagements(), 0);
    }

    #[tokio::test]
    async fn removal_refreshes_list_then_dashboard_once_each() {
        let backend = ScriptedBackend::default();
        let (orchestrator, log) = recording(&backend);

        orchestrator
            .perform(Action::RemoveRecord {
                kind: RecordKind::Expense,
                id: 9,
                confirmed: true,
            })
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec!["remove_record:expense:9"]);
        assert_eq!(*log.lock().unwrap(), vec![ViewName::Transactions, ViewName::Dashboard]);
    }

    #[tokio::test]
    async fn card_purchase_removal_also_refreshes_cards() {
        let backend = ScriptedBackend::default();
        let (orchestrator, log) = recording(&backend);

        orchestrator
            .perform(Action::RemoveRecord {
                kind: RecordKind::CardPurchase,
                id: 4,
                confirmed: true,
            })
            .await
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![ViewName::Transactions, ViewName::Cards, ViewName::Dashboard]
        );
    }

    #[tokio::test]
    async fn missing_fields_block_before_any_call() {
        let backend = ScriptedBackend::default();
        let (orchestrator, _log) = recording(&backend);

        let err = orchestrator
            .perform(Action::AddExpense {
                fields: fields(&[("description", "  "), ("amount", "12")]),
            })
            .await
            .unwrap_err();

        match err {
            ActionError::Validation(err) => {
                assert_eq!(err.missing, vec!["description"]);
                assert_eq!(err.message, "Fill in description and amount.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(backend.calls().is_empty());
        assert_eq!(orchestrator.busy().engagements(), 0);
    }

    #[test]
    fn non_numeric_percentage_is_a_validation_error() {
        let action = Action::CreateGoal {
            fields: fields(&[("name", "Travel"), ("pct", "lots")]),
        };
        let err = action.validate().unwrap_err();
        assert!(err.missing.is_empty());
        assert!(err.message.contains("lots"));
    }

    #[tokio::test]
    async fn create_goal_resets_form_or_reports_duplicate() {
        let backend = ScriptedBackend::default();
        let (orchestrator, _log) = recording(&backend);
        let action = Action::CreateGoal {
            fields: fields(&[("name", " Travel "), ("pct", "7,5")]),
        };

        let outcome = orchestrator.perform(action.clone()).await.unwrap();
        assert!(outcome.reset_form);
        assert_eq!(outcome.acknowledgment, None);
        assert_eq!(backend.calls(), vec!["create_goal:Travel:7.5"]);

        backend.fail_mutations();
        let err = orchestrator.perform(action).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not create the goal. Does one with this name already exist?"
        );
    }

    #[tokio::test]
    async fn second_action_in_flight_is_rejected() {
        let backend = ScriptedBackend::default();
        backend.hold_mutations();
        let (orchestrator, _log) = recording(&backend);
        let orchestrator = Arc::new(orchestrator);

        let first = tokio::spawn({
            let orchestrator = Arc::clone(&orchestrator);
            async move { orchestrator.perform(income()).await }
        });
        backend.mutation_entered().await;

        let err = orchestrator
            .perform(Action::AddInvestment {
                fields: fields(&[("ticker", "PETR4"), ("quantity", "10"), ("avg_price", "30")]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Busy { holder: "add_income" }));
        assert_eq!(backend.calls(), vec!["save_transaction:income"]);

        backend.resume();
        first.await.unwrap().unwrap();
        assert_eq!(orchestrator.busy().engagements(), 1);
        assert_eq!(orchestrator.busy().releases(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_is_reported_as_stale() {
        let backend = ScriptedBackend::default();
        backend.fail_reads();
        let orchestrator = Orchestrator::new(
            ViewContext::new(Arc::new(backend.clone())),
            RefreshRegistry::standard(),
        );

        let outcome = orchestrator.perform(income()).await.unwrap();

        assert_eq!(outcome.stale, vec![ViewName::Transactions, ViewName::Dashboard]);
        assert!(outcome.refreshed.is_empty());
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(
            snapshot.regions[region::STATUS].html,
            "Could not refresh: transactions, dashboard"
        );
        assert!(!snapshot.busy);
    }

    #[tokio::test]
    async fn bootstrap_fills_selectors_then_opens_dashboard() {
        let backend = ScriptedBackend::default();
        let orchestrator = Orchestrator::new(
            ViewContext::new(Arc::new(backend.clone())),
            RefreshRegistry::standard(),
        );

        orchestrator.bootstrap().await;

        assert_eq!(
            backend.calls(),
            vec!["list_budget_categories", "get_dashboard_summary"]
        );
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.active_tab, Some(ViewName::Dashboard));
        assert!(snapshot.regions[region::EXPENSE_GOAL_OPTIONS].html.contains("Comfort"));
    }
}
