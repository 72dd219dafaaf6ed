use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub player_id: Option<String>,
}

/// `GET /api/dashboard?player_id=...`. No id means no run: 204.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Response, ApiError> {
    run_dashboard(&state, params.player_id.as_deref().unwrap_or_default()).await
}

/// `GET /api/players/:player_id/dashboard`.
pub async fn player_dashboard(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Response, ApiError> {
    run_dashboard(&state, &player_id).await
}

async fn run_dashboard(state: &AppState, player_id: &str) -> Result<Response, ApiError> {
    match state.pipeline.run(player_id).await? {
        Some(result) => Ok(Json(result).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
