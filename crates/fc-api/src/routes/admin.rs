//! Maintenance endpoints

use axum::{Json, extract::State};

use fc_core::responses::BackfillResponse;

use crate::error::ApiResult;
use crate::state::AppState;

/// Rewrite legacy category tags and completion timestamps in place.
pub async fn normalize_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<BackfillResponse>> {
    let report = state.service.normalize_categories().await?;
    tracing::info!(
        categories = report.categories_rewritten,
        timestamps = report.timestamps_rewritten,
        "backfill finished"
    );
    Ok(Json(report))
}
