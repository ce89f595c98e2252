use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/surface", get(handlers::get_surface))
        .route("/api/tabs/:view", post(handlers::open_tab))
        .route("/api/actions", post(handlers::perform_action))
        .route("/api/categories", get(handlers::get_categories))
        .with_state(state)
}
