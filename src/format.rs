//! Shared formatting policy for every view: money, percentages, tiers.

use serde::Serialize;

/// Canonical currency formatter (pt-BR, BRL): `R$ 1.234,50`.
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return format!("R$ {value}");
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!("{sign}R$ {},{fraction:02}", group_thousands(units))
}

fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Progress-bar color tier. Boundaries are inclusive: exactly 90% is
/// danger and exactly 75% is warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageTier {
    Normal,
    Warning,
    Danger,
}

impl UsageTier {
    pub const WARNING_AT: f64 = 75.0;
    pub const DANGER_AT: f64 = 90.0;

    pub fn for_pct(pct: f64) -> Self {
        if pct >= Self::DANGER_AT {
            UsageTier::Danger
        } else if pct >= Self::WARNING_AT {
            UsageTier::Warning
        } else {
            UsageTier::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UsageTier::Normal => "normal",
            UsageTier::Warning => "warning",
            UsageTier::Danger => "danger",
        }
    }

    pub fn css_var(self) -> &'static str {
        match self {
            UsageTier::Normal => "var(--primary)",
            UsageTier::Warning => "var(--warning)",
            UsageTier::Danger => "var(--danger)",
        }
    }
}

/// `part / whole` as a percentage; zero when `whole` is not positive.
pub fn usage_pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { (part / whole) * 100.0 } else { 0.0 }
}

/// Clamps a percentage into the `[0, 100]` display range.
/// Rounds a percentage to two decimals for display, so float sums such as
/// `10.1 + 19.9` print as `30`.
pub fn display_pct(pct: f64) -> f64 {
    (pct * 100.0).round() / 100.0
}

pub fn bar_width(pct: f64) -> f64 {
    if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) }
}

pub fn sign_class(value: f64) -> &'static str {
    if value >= 0.0 { "text-success" } else { "text-danger" }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
