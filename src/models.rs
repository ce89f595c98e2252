use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Raw form input, keyed by field name.
pub type Fields = BTreeMap<String, String>;

/// Record kinds that can be removed from a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Income,
    Expense,
    CardPurchase,
    Investment,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
            RecordKind::CardPurchase => "card-purchase",
            RecordKind::Investment => "investment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record kinds accepted by `save_transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Income,
    Expense,
    Card,
    CardPurchase,
    Investment,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Card => "card",
            TransactionKind::CardPurchase => "card-purchase",
            TransactionKind::Investment => "investment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CashFlow {
    pub income: f64,
    pub fixed_expenses: f64,
    pub balance: f64,
    /// `[fixed, one-off]`
    pub chart_breakdown: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioSummary {
    pub net_worth: f64,
    pub gain: f64,
    pub dividends: f64,
    pub payment_days: BTreeSet<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBill {
    pub card_name: String,
    pub due_day: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    pub flow: CashFlow,
    pub investments: PortfolioSummary,
    pub upcoming_bills: Vec<UpcomingBill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub kind: RecordKind,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionHistory {
    pub incomes: Vec<HistoryRecord>,
    pub expenses: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetGoal {
    pub category: String,
    pub allocated_pct: f64,
    pub spent: f64,
    pub limit_amount: f64,
    pub headroom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BudgetGoals {
    pub total_income: f64,
    pub goals: Vec<BudgetGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSummary {
    pub id: i64,
    pub name: String,
    pub credit_limit: f64,
    pub used: f64,
    pub available: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveHolding {
    pub id: i64,
    pub ticker: String,
    pub quantity: u32,
    pub avg_price: f64,
    pub cost_basis: f64,
    pub current_value: f64,
    pub gain: f64,
}

// Persisted ledger records.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOrigin {
    CheckingAccount,
    CreditCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseGroup {
    Transport,
    Food,
    Services,
    Shopping,
    Health,
    Home,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub recurring: bool,
    pub origin: PaymentOrigin,
    pub group: ExpenseGroup,
    #[serde(default)]
    pub goal_category: Option<String>,
    #[serde(default)]
    pub card_id: Option<i64>,
    pub installments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: i64,
    pub name: String,
    pub credit_limit: f64,
    pub closing_day: u32,
    pub due_day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub id: i64,
    pub ticker: String,
    pub quantity: u32,
    pub avg_price: f64,
    pub total_paid: f64,
    #[serde(default)]
    pub asset_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRecord {
    pub category: String,
    pub pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerData {
    pub next_id: i64,
    #[serde(default)]
    pub incomes: Vec<IncomeRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub cards: Vec<CardRecord>,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
}

impl Default for LedgerData {
    fn default() -> Self {
        let goals = [
            ("Fixed Expenses", 50.0),
            ("Comfort", 20.0),
            ("Goals", 10.0),
            ("Investments", 10.0),
            ("Education", 10.0),
        ]
        .into_iter()
        .map(|(category, pct)| GoalRecord {
            category: category.to_string(),
            pct,
        })
        .collect();

        Self {
            next_id: 1,
            incomes: Vec::new(),
            expenses: Vec::new(),
            cards: Vec::new(),
            holdings: Vec::new(),
            goals,
        }
    }
}

impl LedgerData {
    pub fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
