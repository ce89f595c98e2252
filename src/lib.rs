pub mod app;
pub mod billing;
pub mod bridge;
pub mod busy;
pub mod charts;
pub mod clock;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod quotes;
pub mod registry;
pub mod state;
pub mod storage;
pub mod surface;
pub mod text;
pub mod ui;
pub mod views;

#[cfg(test)]
mod test_support;

pub use app::router;
pub use config::{load_settings, Settings};
pub use state::AppState;
pub use storage::load_data;
