use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quote {
    pub price: f64,
    #[serde(default)]
    pub last_dividend: Option<f64>,
    #[serde(default)]
    pub dividend_date: Option<NaiveDate>,
}

impl Quote {
    /// Whether the last dividend counts toward the given month's forecast.
    ///
    /// Real-estate funds (`FII`) pay monthly, so their last dividend always
    /// counts; other assets only when it was paid this month or last month.
    pub fn dividend_expected(&self, asset_type: &str, month: u32) -> bool {
        let Some(paid_on) = self.dividend_date else {
            return false;
        };
        if asset_type.eq_ignore_ascii_case("FII") {
            return true;
        }
        let previous = if month == 1 { 12 } else { month - 1 };
        paid_on.month() == month || paid_on.month() == previous
    }
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn quote(&self, ticker: &str) -> Option<Quote>;
}

/// Quotes pinned in the configuration file, keyed by upper-case ticker.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredQuotes {
    quotes: BTreeMap<String, Quote>,
}

impl ConfiguredQuotes {
    pub fn new(quotes: BTreeMap<String, Quote>) -> Self {
        let quotes = quotes
            .into_iter()
            .map(|(ticker, quote)| (ticker.to_uppercase(), quote))
            .collect();
        Self { quotes }
    }
}

#[async_trait]
impl QuoteSource for ConfiguredQuotes {
    async fn quote(&self, ticker: &str) -> Option<Quote> {
        self.quotes
            .get(&ticker.to_uppercase())
            .filter(|quote| quote.price > 0.0)
            .cloned()
    }
}
