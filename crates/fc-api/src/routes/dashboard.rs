//! Dashboard endpoints

use axum::{
    Json,
    extract::{Query, State},
};

use fc_core::responses::StatsSnapshot;

use crate::dto::{InvalidateResponse, TenantQuery};
use crate::error::ApiResult;
use crate::state::AppState;

/// Cached snapshot for the tenant, recomputed when stale.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Json<StatsSnapshot>> {
    let snapshot = state.cache.get(query.tenant()).await?;
    Ok(Json(StatsSnapshot::clone(&snapshot)))
}

pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> Json<InvalidateResponse> {
    let tenant = query.tenant();
    state.cache.invalidate(tenant);
    Json(InvalidateResponse {
        company_id: tenant.map(String::from),
        invalidated: true,
    })
}
