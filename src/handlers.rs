use crate::errors::{ActionError, AppError};
use crate::orchestrator::{Action, ActionOutcome};
use crate::registry::ViewName;
use crate::state::AppState;
use crate::surface::SurfaceSnapshot;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgment: Option<&'static str>,
    pub reset_form: bool,
    pub refreshed: Vec<ViewName>,
    pub stale: Vec<ViewName>,
}

impl ActionResponse {
    fn completed(outcome: ActionOutcome) -> Self {
        Self {
            status: "ok",
            acknowledgment: outcome.acknowledgment,
            reset_form: outcome.reset_form,
            refreshed: outcome.refreshed,
            stale: outcome.stale,
        }
    }

    fn declined() -> Self {
        Self {
            status: "declined",
            acknowledgment: None,
            reset_form: false,
            refreshed: Vec::new(),
            stale: Vec::new(),
        }
    }
}

pub async fn index() -> Html<String> {
    Html(render_index())
}

pub async fn get_surface(State(state): State<AppState>) -> Json<SurfaceSnapshot> {
    Json(state.orchestrator.snapshot().await)
}

pub async fn open_tab(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<SurfaceSnapshot>, AppError> {
    let view: ViewName = view.parse().map_err(AppError::not_found)?;
    state.orchestrator.open_tab(view).await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

pub async fn perform_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<ActionResponse>, AppError> {
    match state.orchestrator.perform(action).await {
        Ok(outcome) => Ok(Json(ActionResponse::completed(outcome))),
        Err(ActionError::ConfirmationDeclined { .. }) => Ok(Json(ActionResponse::declined())),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.orchestrator.categories().await?))
}
