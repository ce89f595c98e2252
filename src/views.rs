//! Refresh procedures for the five tabs.
//!
//! Each procedure fetches from the backend without holding the surface lock,
//! then replaces its regions in one pass.

use crate::charts::{ChartKind, ChartSlot, ChartSpec};
use crate::errors::RemoteError;
use crate::format::{
    bar_width, display_pct, escape_html, format_brl, sign_class, usage_pct, UsageTier,
};
use crate::models::{
    BudgetGoal, CardSummary, DashboardSummary, HistoryRecord, LiveHolding, UpcomingBill,
};
use crate::registry::{Refresh, ViewContext};
use crate::surface::region;
use async_trait::async_trait;
use chrono::Datelike;
use std::fmt::Write as _;

const SPENDING_COLORS: [&str; 2] = ["#006FEE", "#F31260"];
const GOAL_COLORS: [&str; 7] = [
    "#006FEE", "#17C964", "#F31260", "#F5A524", "#7828C8", "#06B6D4", "#A1A1AA",
];

pub const QUOTES_PENDING: &str = "Consulting quotes...";
pub const HOLDINGS_PENDING: &str = "Fetching live quotes...";

fn progress_bar(pct: f64) -> String {
    let tier = UsageTier::for_pct(pct);
    format!(
        r#"<div class="progress-bar-bg"><div class="progress-bar-fill" data-tier="{tier}" style="width: {width}%; background-color: {color}"></div></div>"#,
        tier = tier.as_str(),
        width = bar_width(pct),
        color = tier.css_var(),
    )
}

fn options(values: &[(String, String)]) -> String {
    values
        .iter()
        .map(|(value, label)| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(value),
                escape_html(label)
            )
        })
        .collect()
}

// Dashboard

pub struct DashboardView;

pub fn payment_days_text(summary: &DashboardSummary, month: u32) -> String {
    let days = &summary.investments.payment_days;
    if days.is_empty() {
        return "No forecast at the moment.".to_string();
    }
    let listed: Vec<String> = days.iter().map(u32::to_string).collect();
    format!("Expected days: {}/{month}", listed.join(", "))
}

fn render_bills(bills: &[UpcomingBill]) -> String {
    if bills.is_empty() {
        return r#"<p class="muted">No bills for this month.</p>"#.to_string();
    }
    bills.iter().fold(String::new(), |mut html, bill| {
        let _ = write!(
            html,
            r#"<div class="bill"><div><strong>{}</strong><span class="muted">Due on day {}</span></div><strong class="text-danger">{}</strong></div>"#,
            escape_html(&bill.card_name),
            bill.due_day,
            format_brl(bill.amount),
        );
        html
    })
}

#[async_trait]
impl Refresh for DashboardView {
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError> {
        let today = ctx.today();
        ctx.surface
            .lock()
            .await
            .set_text(region::DASH_PAYMENT_DAYS, QUOTES_PENDING);

        let summary = ctx
            .backend
            .get_dashboard_summary(today.month(), today.year())
            .await?;

        {
            let mut surface = ctx.surface.lock().await;
            let flow = &summary.flow;
            let portfolio = &summary.investments;
            surface.set_text(region::DASH_INCOME, &format_brl(flow.income));
            surface.set_text(region::DASH_FIXED, &format_brl(flow.fixed_expenses));
            surface.set_styled_text(
                region::DASH_BALANCE,
                &format_brl(flow.balance),
                &format!("big-number {}", sign_class(flow.balance)),
            );
            surface.set_text(region::DASH_NET_WORTH, &format_brl(portfolio.net_worth));
            surface.set_styled_text(
                region::DASH_GAIN,
                &format_brl(portfolio.gain),
                &format!("big-number {}", sign_class(portfolio.gain)),
            );
            surface.set_text(region::DASH_DIVIDENDS, &format_brl(portfolio.dividends));
            surface.set_text(
                region::DASH_PAYMENT_DAYS,
                &payment_days_text(&summary, today.month()),
            );
            surface.set_html(region::DASH_BILLS, render_bills(&summary.upcoming_bills));
        }

        ctx.charts.lock().await.replace(
            ChartSlot::SpendingBreakdown,
            ChartSpec {
                kind: ChartKind::Doughnut,
                labels: vec!["Fixed".to_string(), "One-off".to_string()],
                values: summary.flow.chart_breakdown.to_vec(),
                colors: SPENDING_COLORS.to_vec(),
            },
        );
        Ok(())
    }
}

// Transactions

pub struct TransactionsView;

fn render_history_rows(records: &[HistoryRecord], amount_class: &str) -> String {
    records.iter().fold(String::new(), |mut html, record| {
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td class="{amount_class} amount">{}</td><td class="row-actions"><button class="btn-danger-flat" data-remove-kind="{}" data-remove-id="{}">Remove</button></td></tr>"#,
            escape_html(&record.description),
            format_brl(record.amount),
            record.kind,
            record.id,
        );
        html
    })
}

#[async_trait]
impl Refresh for TransactionsView {
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError> {
        let history = ctx.backend.get_transaction_history().await?;
        let mut surface = ctx.surface.lock().await;
        surface.set_html(
            region::INCOME_ROWS,
            render_history_rows(&history.incomes, "text-success"),
        );
        surface.set_html(
            region::EXPENSE_ROWS,
            render_history_rows(&history.expenses, "text-danger"),
        );
        Ok(())
    }
}

// Cards

pub struct CardsView;

pub fn card_usage(card: &CardSummary) -> (f64, UsageTier) {
    let pct = usage_pct(card.used, card.credit_limit);
    (bar_width(pct), UsageTier::for_pct(pct))
}

fn render_card_limits(cards: &[CardSummary]) -> String {
    cards.iter().fold(String::new(), |mut html, card| {
        let (_, tier) = card_usage(card);
        let _ = write!(
            html,
            r#"<div class="card-limit" data-tier="{}"><div class="row"><strong>{}</strong><span class="muted">Available: <strong>{}</strong></span></div><div class="muted small">Limit: {} | Used: {}</div>{}</div>"#,
            tier.as_str(),
            escape_html(&card.name),
            format_brl(card.available),
            format_brl(card.credit_limit),
            format_brl(card.used),
            progress_bar(usage_pct(card.used, card.credit_limit)),
        );
        html
    })
}

#[async_trait]
impl Refresh for CardsView {
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError> {
        let cards = ctx.backend.get_card_summaries().await?;
        let mut surface = ctx.surface.lock().await;
        if cards.is_empty() {
            surface.set_html(region::CARD_OPTIONS, "<option>No cards</option>");
            surface.set_html(
                region::CARD_LIMITS,
                r#"<p class="muted">No cards registered.</p>"#,
            );
            return Ok(());
        }

        let choices: Vec<(String, String)> = cards
            .iter()
            .map(|card| (card.id.to_string(), card.name.clone()))
            .collect();
        surface.set_html(region::CARD_OPTIONS, options(&choices));
        surface.set_html(region::CARD_LIMITS, render_card_limits(&cards));
        Ok(())
    }
}

// Investments

pub struct InvestmentsView;

fn render_holdings(holdings: &[LiveHolding]) -> String {
    holdings.iter().fold(String::new(), |mut html, holding| {
        let _ = write!(
            html,
            r#"<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td><td><strong>{}</strong></td><td class="{} gain">{}</td><td class="row-actions"><button class="btn-danger-flat" data-remove-kind="investment" data-remove-id="{}">Remove</button></td></tr>"#,
            escape_html(&holding.ticker),
            holding.quantity,
            format_brl(holding.avg_price),
            format_brl(holding.cost_basis),
            format_brl(holding.current_value),
            sign_class(holding.gain),
            format_brl(holding.gain),
            holding.id,
        );
        html
    })
}

fn placeholder_row(text: &str) -> String {
    format!(
        r#"<tr><td colspan="7" class="placeholder">{}</td></tr>"#,
        escape_html(text)
    )
}

#[async_trait]
impl Refresh for InvestmentsView {
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError> {
        ctx.surface
            .lock()
            .await
            .set_html(region::HOLDING_ROWS, placeholder_row(HOLDINGS_PENDING));

        let holdings = ctx.backend.get_live_investments().await?;
        let rows = if holdings.is_empty() {
            placeholder_row("Your portfolio is empty.")
        } else {
            render_holdings(&holdings)
        };
        ctx.surface.lock().await.set_html(region::HOLDING_ROWS, rows);
        Ok(())
    }
}

// Goals

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationHealth {
    Healthy,
    Unhealthy,
}

impl AllocationHealth {
    pub fn for_total(total_pct: f64) -> Self {
        if total_pct == 100.0 {
            AllocationHealth::Healthy
        } else {
            AllocationHealth::Unhealthy
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            AllocationHealth::Healthy => "goal-total text-success",
            AllocationHealth::Unhealthy => "goal-total text-danger",
        }
    }
}

pub fn allocation_total(goals: &[BudgetGoal]) -> f64 {
    goals.iter().map(|goal| goal.allocated_pct).sum()
}

fn render_goals(goals: &[BudgetGoal]) -> String {
    goals.iter().fold(String::new(), |mut html, goal| {
        let spent_pct = usage_pct(goal.spent, goal.limit_amount);
        let headroom_class = if goal.headroom < 0.0 {
            "text-danger"
        } else {
            "text-success"
        };
        let category = escape_html(&goal.category);
        let _ = write!(
            html,
            r#"<div class="goal"><div class="row"><strong>{category}</strong><div class="goal-controls"><span class="muted">Limit: {} | </span><input type="number" class="goal-pct" data-goal-category="{category}" value="{}"><span class="muted">%</span></div></div><div class="row small"><span class="muted">Spent: {}</span><strong class="{headroom_class}">Left: {}</strong></div>{}</div>"#,
            format_brl(goal.limit_amount),
            goal.allocated_pct,
            format_brl(goal.spent),
            format_brl(goal.headroom),
            progress_bar(spent_pct),
        );
        html
    })
}

pub struct GoalsView;

#[async_trait]
impl Refresh for GoalsView {
    async fn refresh(&self, ctx: &ViewContext) -> Result<(), RemoteError> {
        let today = ctx.today();
        let budget = ctx
            .backend
            .get_budget_goals(today.month(), today.year())
            .await?;

        let total = allocation_total(&budget.goals);
        let categories: Vec<String> = budget
            .goals
            .iter()
            .map(|goal| goal.category.clone())
            .collect();

        {
            let mut surface = ctx.surface.lock().await;
            surface.set_html(region::GOAL_LIST, render_goals(&budget.goals));
            surface.set_styled_text(
                region::GOAL_TOTAL,
                &format!("Total allocated: {}%", display_pct(total)),
                AllocationHealth::for_total(total).class(),
            );
        }

        ctx.charts.lock().await.replace(
            ChartSlot::GoalDistribution,
            ChartSpec {
                kind: ChartKind::Pie,
                labels: categories.clone(),
                values: budget.goals.iter().map(|goal| goal.allocated_pct).collect(),
                colors: GOAL_COLORS.iter().copied().cycle().take(categories.len()).collect(),
            },
        );

        sync_category_selectors(ctx, Some(categories)).await
    }
}

/// Mirrors the budget categories into every category selector. Fetches the
/// list when none is given.
pub async fn sync_category_selectors(
    ctx: &ViewContext,
    categories: Option<Vec<String>>,
) -> Result<(), RemoteError> {
    let categories = match categories {
        Some(categories) => categories,
        None => ctx.backend.list_budget_categories().await?,
    };
    let choices: Vec<(String, String)> = categories
        .into_iter()
        .map(|category| (category.clone(), category))
        .collect();
    let html = options(&choices);

    let mut surface = ctx.surface.lock().await;
    for selector in region::CATEGORY_SELECTORS {
        surface.set_html(selector, html.clone());
    }
    Ok(())
}
