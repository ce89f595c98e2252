//! Rendered page regions. Every write replaces the region wholesale.

use crate::charts::ChartInstance;
use crate::format::escape_html;
use crate::registry::ViewName;
use serde::Serialize;
use std::collections::BTreeMap;

/// Element ids of the regions the views paint into.
pub mod region {
    pub const DASH_INCOME: &str = "dash-income";
    pub const DASH_FIXED: &str = "dash-fixed";
    pub const DASH_BALANCE: &str = "dash-balance";
    pub const DASH_NET_WORTH: &str = "dash-net-worth";
    pub const DASH_GAIN: &str = "dash-gain";
    pub const DASH_DIVIDENDS: &str = "dash-dividends";
    pub const DASH_PAYMENT_DAYS: &str = "dash-payment-days";
    pub const DASH_BILLS: &str = "dash-bills";

    pub const INCOME_ROWS: &str = "income-rows";
    pub const EXPENSE_ROWS: &str = "expense-rows";

    pub const CARD_OPTIONS: &str = "card-options";
    pub const CARD_LIMITS: &str = "card-limits";

    pub const HOLDING_ROWS: &str = "holding-rows";

    pub const GOAL_LIST: &str = "goal-list";
    pub const GOAL_TOTAL: &str = "goal-total";

    pub const EXPENSE_GOAL_OPTIONS: &str = "expense-goal-options";
    pub const PURCHASE_GOAL_OPTIONS: &str = "purchase-goal-options";

    pub const STATUS: &str = "status";

    /// Selectors that mirror the budget category set.
    pub const CATEGORY_SELECTORS: [&str; 2] = [EXPENSE_GOAL_OPTIONS, PURCHASE_GOAL_OPTIONS];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionContent {
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Default)]
pub struct Surface {
    active_tab: Option<ViewName>,
    regions: BTreeMap<&'static str, RegionContent>,
}

impl Surface {
    pub fn set_html(&mut self, id: &'static str, html: impl Into<String>) {
        self.regions.insert(
            id,
            RegionContent {
                html: html.into(),
                class: None,
            },
        );
    }

    pub fn set_text(&mut self, id: &'static str, text: &str) {
        self.set_html(id, escape_html(text));
    }

    pub fn set_styled_text(&mut self, id: &'static str, text: &str, class: &str) {
        self.regions.insert(
            id,
            RegionContent {
                html: escape_html(text),
                class: Some(class.to_string()),
            },
        );
    }

    pub fn region(&self, id: &str) -> Option<&RegionContent> {
        self.regions.get(id)
    }

    pub fn html(&self, id: &str) -> &str {
        self.region(id).map_or("", |content| content.html.as_str())
    }

    pub fn set_active_tab(&mut self, view: ViewName) {
        self.active_tab = Some(view);
    }

    pub fn snapshot(&self, busy: bool, charts: Vec<ChartInstance>) -> SurfaceSnapshot {
        SurfaceSnapshot {
            active_tab: self.active_tab,
            busy,
            regions: self
                .regions
                .iter()
                .map(|(id, content)| (id.to_string(), content.clone()))
                .collect(),
            charts,
        }
    }
}

/// What the page needs to repaint itself.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub active_tab: Option<ViewName>,
    pub busy: bool,
    pub regions: BTreeMap<String, RegionContent>,
    pub charts: Vec<ChartInstance>,
}
