//! JSON-file ledger that serves the backend contract in-process.

use crate::billing::{MAX_INSTALLMENTS, bills_for_month};
use crate::bridge::Backend;
use crate::clock::Clock;
use crate::errors::RemoteError;
use crate::models::{
    BudgetGoal, BudgetGoals, CardRecord, CardSummary, CashFlow, DashboardSummary, ExpenseRecord,
    Fields, GoalRecord, HistoryRecord, HoldingRecord, IncomeRecord, LedgerData, LiveHolding,
    PaymentOrigin, PortfolioSummary, RecordKind, TransactionHistory, TransactionKind,
};
use crate::quotes::QuoteSource;
use crate::storage::persist_data;
use crate::text::{classify_group, clean_merchant_name, parse_amount, split_installments};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Clone)]
pub struct LedgerBackend {
    data_path: PathBuf,
    data: Arc<Mutex<LedgerData>>,
    quotes: Arc<dyn QuoteSource>,
    clock: Clock,
}

impl LedgerBackend {
    pub fn new(data_path: PathBuf, data: LedgerData, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            quotes,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Writes `next` to disk and only then makes it the live ledger, so a
    /// failed write leaves memory untouched.
    async fn commit(&self, live: &mut LedgerData, next: LedgerData) -> Result<(), RemoteError> {
        persist_data(&self.data_path, &next).await?;
        *live = next;
        Ok(())
    }

    async fn price_for(&self, holding: &HoldingRecord) -> f64 {
        match self.quotes.quote(&holding.ticker).await {
            Some(quote) => quote.price,
            None => holding.avg_price,
        }
    }

    async fn portfolio_summary(&self, holdings: &[HoldingRecord], month: u32) -> PortfolioSummary {
        let mut summary = PortfolioSummary::default();
        for holding in holdings {
            let quote = self.quotes.quote(&holding.ticker).await;
            let price = quote.as_ref().map_or(holding.avg_price, |quote| quote.price);
            let position = price * f64::from(holding.quantity);
            summary.net_worth += position;
            summary.gain += position - holding.total_paid;

            if let Some(quote) = quote.filter(|quote| quote.dividend_expected(&holding.asset_type, month)) {
                if let (Some(amount), Some(paid_on)) = (quote.last_dividend, quote.dividend_date) {
                    summary.dividends += amount * f64::from(holding.quantity);
                    summary.payment_days.insert(paid_on.day());
                }
            }
        }
        summary
    }
}

fn field<'a>(fields: &'a Fields, name: &str) -> &'a str {
    fields.get(name).map(|value| value.trim()).unwrap_or_default()
}

fn required<'a>(fields: &'a Fields, name: &'static str) -> Result<&'a str, RemoteError> {
    let value = field(fields, name);
    if value.is_empty() {
        return Err(RemoteError::rejected(
            "save_transaction",
            format!("missing field `{name}`"),
        ));
    }
    Ok(value)
}

fn parse_day(fields: &Fields, name: &'static str) -> Result<u32, RemoteError> {
    let raw = required(fields, name)?;
    raw.parse::<u32>()
        .ok()
        .filter(|day| (1..=31).contains(day))
        .ok_or_else(|| {
            RemoteError::rejected("save_transaction", format!("`{name}` must be a day of month"))
        })
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "on" | "1" | "yes")
}

fn build_income(id: i64, fields: &Fields) -> Result<IncomeRecord, RemoteError> {
    Ok(IncomeRecord {
        id,
        description: required(fields, "description")?.to_string(),
        amount: parse_amount(field(fields, "amount")),
        kind: field(fields, "kind").to_string(),
        category: field(fields, "category").to_string(),
    })
}

fn build_expense(
    id: i64,
    kind: TransactionKind,
    fields: &Fields,
    cards: &[CardRecord],
    today: NaiveDate,
) -> Result<ExpenseRecord, RemoteError> {
    let raw_description = required(fields, "description")?;
    let (without_installments, _, parsed_installments) = split_installments(raw_description);
    let mut description = clean_merchant_name(&without_installments);
    if description.is_empty() {
        description = raw_description.to_string();
    }
    let group = classify_group(&description);

    let date = match field(fields, "date") {
        "" => today,
        raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            RemoteError::rejected("save_transaction", format!("invalid date `{raw}`"))
        })?,
    };

    let (origin, card_id, installments) = if kind == TransactionKind::CardPurchase {
        let card_id = required(fields, "card_id")?
            .parse::<i64>()
            .ok()
            .filter(|card_id| cards.iter().any(|card| card.id == *card_id))
            .ok_or_else(|| RemoteError::rejected("save_transaction", "unknown card"))?;
        let explicit = field(fields, "installments").parse::<u32>().unwrap_or(1);
        let installments = if explicit > 1 { explicit } else { parsed_installments };
        (PaymentOrigin::CreditCard, Some(card_id), installments)
    } else {
        (PaymentOrigin::CheckingAccount, None, parsed_installments)
    };
    if !(1..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(RemoteError::rejected(
            "save_transaction",
            format!("installments must be between 1 and {MAX_INSTALLMENTS}"),
        ));
    }

    let goal_category = Some(field(fields, "goal_category"))
        .filter(|category| !category.is_empty())
        .map(str::to_string);

    Ok(ExpenseRecord {
        id,
        date,
        description,
        amount: parse_amount(field(fields, "amount")),
        recurring: is_checked(field(fields, "recurring")),
        origin,
        group,
        goal_category,
        card_id,
        installments,
    })
}

fn build_card(id: i64, fields: &Fields) -> Result<CardRecord, RemoteError> {
    Ok(CardRecord {
        id,
        name: required(fields, "name")?.to_string(),
        credit_limit: parse_amount(field(fields, "limit")),
        closing_day: parse_day(fields, "closing_day")?,
        due_day: parse_day(fields, "due_day")?,
    })
}

fn build_holding(id: i64, fields: &Fields) -> Result<HoldingRecord, RemoteError> {
    let quantity = required(fields, "quantity")?
        .parse::<u32>()
        .map_err(|_| RemoteError::rejected("save_transaction", "quantity must be a whole number"))?;
    let avg_price = parse_amount(field(fields, "avg_price"));
    let total_paid = match parse_amount(field(fields, "total_paid")) {
        total if total > 0.0 => total,
        _ => avg_price * f64::from(quantity),
    };

    Ok(HoldingRecord {
        id,
        ticker: required(fields, "ticker")?.to_uppercase(),
        quantity,
        avg_price,
        total_paid,
        asset_type: field(fields, "asset_type").to_string(),
    })
}

fn remove_by_id<T>(records: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = records.len();
    records.retain(|record| !matches(record));
    records.len() != before
}

#[async_trait]
impl Backend for LedgerBackend {
    async fn remove_record(&self, kind: RecordKind, id: i64) -> Result<(), RemoteError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let removed = match kind {
            RecordKind::Income => remove_by_id(&mut next.incomes, |income| income.id == id),
            RecordKind::Expense => remove_by_id(&mut next.expenses, |expense| expense.id == id),
            RecordKind::CardPurchase => remove_by_id(&mut next.expenses, |expense| {
                expense.id == id && expense.card_id.is_some()
            }),
            RecordKind::Investment => remove_by_id(&mut next.holdings, |holding| holding.id == id),
        };
        if !removed {
            return Err(RemoteError::rejected(
                "remove_record",
                format!("no {kind} with id {id}"),
            ));
        }

        self.commit(&mut data, next).await?;
        info!(%kind, id, "record removed");
        Ok(())
    }

    async fn save_transaction(
        &self,
        kind: TransactionKind,
        fields: &Fields,
    ) -> Result<(), RemoteError> {
        let today = self.clock.today();
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let id = next.allocate_id();

        match kind {
            TransactionKind::Income => {
                let income = build_income(id, fields)?;
                next.incomes.push(income);
            }
            TransactionKind::Expense | TransactionKind::CardPurchase => {
                let expense = build_expense(id, kind, fields, &next.cards, today)?;
                next.expenses.push(expense);
            }
            TransactionKind::Card => {
                let card = build_card(id, fields)?;
                next.cards.push(card);
            }
            TransactionKind::Investment => {
                let holding = build_holding(id, fields)?;
                next.holdings.push(holding);
            }
        }

        self.commit(&mut data, next).await?;
        info!(%kind, id, "transaction saved");
        Ok(())
    }

    async fn get_dashboard_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<DashboardSummary, RemoteError> {
        let (flow, holdings, upcoming_bills) = {
            let data = self.data.lock().await;
            let income: f64 = data.incomes.iter().map(|income| income.amount).sum();
            let fixed: f64 = data
                .expenses
                .iter()
                .filter(|expense| expense.recurring)
                .map(|expense| expense.amount)
                .sum();
            let one_off: f64 = data
                .expenses
                .iter()
                .filter(|expense| !expense.recurring)
                .map(|expense| expense.amount)
                .sum();
            let flow = CashFlow {
                income,
                fixed_expenses: fixed,
                balance: income - fixed,
                chart_breakdown: [fixed, one_off],
            };
            let bills = bills_for_month(&data.cards, &data.expenses, month, year);
            (flow, data.holdings.clone(), bills)
        };

        let investments = self.portfolio_summary(&holdings, month).await;
        debug!(month, year, bills = upcoming_bills.len(), "dashboard summary built");

        Ok(DashboardSummary {
            flow,
            investments,
            upcoming_bills,
        })
    }

    async fn get_transaction_history(&self) -> Result<TransactionHistory, RemoteError> {
        let data = self.data.lock().await;
        let mut incomes: Vec<HistoryRecord> = data
            .incomes
            .iter()
            .map(|income| HistoryRecord {
                id: income.id,
                kind: RecordKind::Income,
                description: income.description.clone(),
                amount: income.amount,
            })
            .collect();
        let mut expenses: Vec<HistoryRecord> = data
            .expenses
            .iter()
            .map(|expense| HistoryRecord {
                id: expense.id,
                kind: if expense.card_id.is_some() {
                    RecordKind::CardPurchase
                } else {
                    RecordKind::Expense
                },
                description: expense.description.clone(),
                amount: expense.amount,
            })
            .collect();

        incomes.sort_by(|a, b| b.id.cmp(&a.id));
        expenses.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(TransactionHistory { incomes, expenses })
    }

    async fn get_budget_goals(&self, month: u32, year: i32) -> Result<BudgetGoals, RemoteError> {
        let data = self.data.lock().await;
        let total_income: f64 = data.incomes.iter().map(|income| income.amount).sum();

        let goals = data
            .goals
            .iter()
            .map(|goal| {
                let limit_amount = total_income * (goal.pct / 100.0);
                let spent: f64 = data
                    .expenses
                    .iter()
                    .filter(|expense| {
                        expense.goal_category.as_deref() == Some(goal.category.as_str())
                            && expense.date.month() == month
                            && expense.date.year() == year
                    })
                    .map(|expense| expense.amount)
                    .sum();
                BudgetGoal {
                    category: goal.category.clone(),
                    allocated_pct: goal.pct,
                    spent,
                    limit_amount,
                    headroom: limit_amount - spent,
                }
            })
            .collect();

        Ok(BudgetGoals {
            total_income,
            goals,
        })
    }

    async fn update_goal_allocation(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let goal = next
            .goals
            .iter_mut()
            .find(|goal| goal.category == category)
            .ok_or_else(|| {
                RemoteError::rejected("update_goal_allocation", format!("no goal `{category}`"))
            })?;
        goal.pct = pct;

        self.commit(&mut data, next).await?;
        info!(category, pct, "goal allocation updated");
        Ok(())
    }

    async fn create_goal(&self, category: &str, pct: f64) -> Result<(), RemoteError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(RemoteError::rejected("create_goal", "empty category"));
        }

        let mut data = self.data.lock().await;
        if data.goals.iter().any(|goal| goal.category == category) {
            return Err(RemoteError::rejected(
                "create_goal",
                format!("goal `{category}` already exists"),
            ));
        }
        let mut next = data.clone();
        next.goals.push(GoalRecord {
            category: category.to_string(),
            pct,
        });

        self.commit(&mut data, next).await?;
        info!(category, pct, "goal created");
        Ok(())
    }

    async fn get_card_summaries(&self) -> Result<Vec<CardSummary>, RemoteError> {
        let data = self.data.lock().await;
        Ok(data
            .cards
            .iter()
            .map(|card| {
                let used: f64 = data
                    .expenses
                    .iter()
                    .filter(|expense| expense.card_id == Some(card.id))
                    .map(|expense| expense.amount)
                    .sum();
                CardSummary {
                    id: card.id,
                    name: card.name.clone(),
                    credit_limit: card.credit_limit,
                    used,
                    available: card.credit_limit - used,
                }
            })
            .collect())
    }

    async fn get_live_investments(&self) -> Result<Vec<LiveHolding>, RemoteError> {
        let holdings = self.data.lock().await.holdings.clone();
        let mut live = Vec::with_capacity(holdings.len());
        for holding in &holdings {
            let price = self.price_for(holding).await;
            let current_value = price * f64::from(holding.quantity);
            live.push(LiveHolding {
                id: holding.id,
                ticker: holding.ticker.clone(),
                quantity: holding.quantity,
                avg_price: holding.avg_price,
                cost_basis: holding.total_paid,
                current_value,
                gain: current_value - holding.total_paid,
            });
        }
        Ok(live)
    }

    async fn list_budget_categories(&self) -> Result<Vec<String>, RemoteError> {
        let data = self.data.lock().await;
        Ok(data.goals.iter().map(|goal| goal.category.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{ConfiguredQuotes, Quote};
    use std::collections::BTreeMap;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn ledger_with_quotes(tag: &str, quotes: BTreeMap<String, Quote>) -> (LedgerBackend, PathBuf) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "fin_dash_ledger_{tag}_{}_{nanos}.json",
            std::process::id()
        ));
        let backend = LedgerBackend::new(
            path.clone(),
            LedgerData::default(),
            Arc::new(ConfiguredQuotes::new(quotes)),
        )
        .with_clock(Clock::Fixed(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        (backend, path)
    }

    fn ledger(tag: &str) -> (LedgerBackend, PathBuf) {
        ledger_with_quotes(tag, BTreeMap::new())
    }

    #[tokio::test]
    async fn dashboard_splits_fixed_and_one_off_spending() {
        let (ledger, path) = ledger("dashboard");
        ledger
            .save_transaction(
                TransactionKind::Income,
                &fields(&[("description", "Salary"), ("amount", "5000,00")]),
            )
            .await
            .unwrap();
        ledger
            .save_transaction(
                TransactionKind::Expense,
                &fields(&[("description", "Rent"), ("amount", "1500"), ("recurring", "true")]),
            )
            .await
            .unwrap();
        ledger
            .save_transaction(
                TransactionKind::Expense,
                &fields(&[("description", "PAG*PADARIA"), ("amount", "20,5")]),
            )
            .await
            .unwrap();

        let summary = ledger.get_dashboard_summary(3, 2026).await.unwrap();
        assert_eq!(summary.flow.income, 5000.0);
        assert_eq!(summary.flow.fixed_expenses, 1500.0);
        assert_eq!(summary.flow.balance, 3500.0);
        assert_eq!(summary.flow.chart_breakdown, [1500.0, 20.5]);

        let history = ledger.get_transaction_history().await.unwrap();
        assert_eq!(history.incomes.len(), 1);
        assert_eq!(history.expenses[0].description, "Padaria");
        assert_eq!(history.expenses[1].description, "Rent");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn card_purchases_feed_usage_and_bills() {
        let (ledger, path) = ledger("cards");
        ledger
            .save_transaction(
                TransactionKind::Card,
                &fields(&[
                    ("name", "Gold"),
                    ("limit", "1000"),
                    ("closing_day", "20"),
                    ("due_day", "28"),
                ]),
            )
            .await
            .unwrap();
        let card_id = ledger.get_card_summaries().await.unwrap()[0].id;

        ledger
            .save_transaction(
                TransactionKind::CardPurchase,
                &fields(&[
                    ("card_id", &card_id.to_string()),
                    ("description", "MAGALU 1/3"),
                    ("amount", "300"),
                    ("date", "2026-03-05"),
                ]),
            )
            .await
            .unwrap();

        let cards = ledger.get_card_summaries().await.unwrap();
        assert_eq!(cards[0].used, 300.0);
        assert_eq!(cards[0].available, 700.0);

        let summary = ledger.get_dashboard_summary(4, 2026).await.unwrap();
        assert_eq!(summary.upcoming_bills.len(), 1);
        assert_eq!(summary.upcoming_bills[0].amount, 100.0);
        assert_eq!(summary.upcoming_bills[0].due_day, 28);

        let history = ledger.get_transaction_history().await.unwrap();
        assert_eq!(history.expenses[0].kind, RecordKind::CardPurchase);
        ledger
            .remove_record(RecordKind::CardPurchase, history.expenses[0].id)
            .await
            .unwrap();
        assert_eq!(ledger.get_card_summaries().await.unwrap()[0].used, 0.0);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn purchase_on_unknown_card_is_rejected() {
        let (ledger, _) = ledger("unknown_card");
        let err = ledger
            .save_transaction(
                TransactionKind::CardPurchase,
                &fields(&[("card_id", "42"), ("description", "Shoes"), ("amount", "10")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { .. }));
    }

    #[tokio::test]
    async fn goals_track_month_spending_against_income_share() {
        let (ledger, path) = ledger("goals");
        ledger
            .save_transaction(
                TransactionKind::Income,
                &fields(&[("description", "Salary"), ("amount", "1000")]),
            )
            .await
            .unwrap();
        ledger
            .save_transaction(
                TransactionKind::Expense,
                &fields(&[
                    ("description", "Cinema"),
                    ("amount", "150"),
                    ("date", "2026-03-02"),
                    ("goal_category", "Comfort"),
                ]),
            )
            .await
            .unwrap();
        ledger
            .save_transaction(
                TransactionKind::Expense,
                &fields(&[
                    ("description", "Concert"),
                    ("amount", "90"),
                    ("date", "2026-02-20"),
                    ("goal_category", "Comfort"),
                ]),
            )
            .await
            .unwrap();

        let goals = ledger.get_budget_goals(3, 2026).await.unwrap();
        let comfort = goals
            .goals
            .iter()
            .find(|goal| goal.category == "Comfort")
            .unwrap();
        assert_eq!(comfort.limit_amount, 200.0);
        assert_eq!(comfort.spent, 150.0);
        assert_eq!(comfort.headroom, 50.0);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn duplicate_goal_is_rejected() {
        let (ledger, path) = ledger("duplicate_goal");
        ledger.create_goal("Travel", 5.0).await.unwrap();
        let err = ledger.create_goal("  Travel ", 5.0).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { op: "create_goal", .. }));
        assert_eq!(ledger.list_budget_categories().await.unwrap().len(), 6);

        ledger.update_goal_allocation("Travel", 7.5).await.unwrap();
        let goals = ledger.get_budget_goals(3, 2026).await.unwrap();
        assert_eq!(goals.goals.last().unwrap().allocated_pct, 7.5);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn removing_missing_record_fails() {
        let (ledger, _) = ledger("missing_record");
        let err = ledger.remove_record(RecordKind::Income, 99).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { op: "remove_record", .. }));
    }

    #[tokio::test]
    async fn live_holdings_use_quotes_and_fall_back_to_average_price() {
        let mut quotes = BTreeMap::new();
        quotes.insert(
            "MXRF11".to_string(),
            Quote {
                price: 11.0,
                last_dividend: Some(0.1),
                dividend_date: NaiveDate::from_ymd_opt(2026, 2, 14),
            },
        );
        let (ledger, path) = ledger_with_quotes("live", quotes);
        ledger
            .save_transaction(
                TransactionKind::Investment,
                &fields(&[
                    ("ticker", "mxrf11"),
                    ("quantity", "100"),
                    ("avg_price", "10"),
                    ("asset_type", "FII"),
                ]),
            )
            .await
            .unwrap();
        ledger
            .save_transaction(
                TransactionKind::Investment,
                &fields(&[
                    ("ticker", "PETR4"),
                    ("quantity", "10"),
                    ("avg_price", "30"),
                    ("total_paid", "310"),
                ]),
            )
            .await
            .unwrap();

        let live = ledger.get_live_investments().await.unwrap();
        assert_eq!(live[0].ticker, "MXRF11");
        assert_eq!(live[0].cost_basis, 1000.0);
        assert_eq!(live[0].current_value, 1100.0);
        assert_eq!(live[0].gain, 100.0);
        assert_eq!(live[1].current_value, 300.0);
        assert_eq!(live[1].gain, -10.0);

        let summary = ledger.get_dashboard_summary(3, 2026).await.unwrap();
        assert_eq!(summary.investments.net_worth, 1400.0);
        assert_eq!(summary.investments.gain, 90.0);
        assert_eq!(summary.investments.payment_days.iter().copied().collect::<Vec<_>>(), vec![14]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn failed_write_leaves_ledger_unchanged() {
        let (_, blocker) = ledger("blocker");
        std::fs::write(&blocker, b"{}").unwrap();

        let mut seeded = LedgerData::default();
        let id = seeded.allocate_id();
        seeded.incomes.push(IncomeRecord {
            id,
            description: "Salary".to_string(),
            amount: 1000.0,
            kind: String::new(),
            category: String::new(),
        });
        let ledger = LedgerBackend::new(
            blocker.join("ledger.json"),
            seeded,
            Arc::new(ConfiguredQuotes::default()),
        );

        let saved = ledger
            .save_transaction(
                TransactionKind::Income,
                &fields(&[("description", "Bonus"), ("amount", "500")]),
            )
            .await;
        assert!(matches!(saved, Err(RemoteError::Storage(_))));
        assert!(ledger.remove_record(RecordKind::Income, id).await.is_err());
        assert!(ledger.create_goal("Travel", 5.0).await.is_err());
        assert!(ledger.update_goal_allocation("Comfort", 35.0).await.is_err());

        let history = ledger.get_transaction_history().await.unwrap();
        assert_eq!(history.incomes.len(), 1);
        assert_eq!(history.incomes[0].description, "Salary");
        assert_eq!(ledger.list_budget_categories().await.unwrap().len(), 5);
        let goals = ledger.get_budget_goals(3, 2026).await.unwrap();
        let comfort = goals.goals.iter().find(|goal| goal.category == "Comfort").unwrap();
        assert_eq!(comfort.allocated_pct, 20.0);
        assert_eq!(ledger.data.lock().await.next_id, 2);

        let _ = std::fs::remove_file(blocker);
    }

    #[tokio::test]
    async fn oversized_installment_plans_are_rejected() {
        let (ledger, path) = ledger("installments");
        ledger
            .save_transaction(
                TransactionKind::Card,
                &fields(&[("name", "Gold"), ("closing_day", "20"), ("due_day", "28")]),
            )
            .await
            .unwrap();
        let card_id = ledger.get_card_summaries().await.unwrap()[0].id.to_string();

        for purchase in [
            fields(&[
                ("card_id", &card_id),
                ("description", "TV"),
                ("amount", "100"),
                ("installments", "200000000"),
            ]),
            fields(&[("card_id", &card_id), ("description", "TV 1/500"), ("amount", "100")]),
        ] {
            let err = ledger
                .save_transaction(TransactionKind::CardPurchase, &purchase)
                .await
                .unwrap_err();
            assert!(matches!(err, RemoteError::Rejected { op: "save_transaction", .. }));
        }
        assert_eq!(ledger.get_card_summaries().await.unwrap()[0].used, 0.0);

        let _ = std::fs::remove_file(path);
    }
}
