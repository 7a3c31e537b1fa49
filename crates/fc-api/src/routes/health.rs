//! Health check endpoint

use axum::{Json, extract::State};

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Answers 503 when the record store does not respond.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.service.ping().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    }))
}
