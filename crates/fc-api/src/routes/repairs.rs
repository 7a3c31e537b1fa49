//! Repair board and repair-status actions
//!
//! Actions are keyed by derived repair identity. An identity is accepted only
//! if some stored checklist actually derives it, so typos cannot create
//! orphan ledger rows.

use axum::{
    Json,
    extract::{Query, State},
};

use fc_core::entities::RepairStatusEntry;
use fc_core::repair::{classify, derive_repair_ids};
use fc_core::responses::{RepairActionResponse, RepairView};

use crate::dto::{AddNoteRequest, RepairActionRequest, TenantQuery};
use crate::error::{ApiError, ApiResult, require};
use crate::state::AppState;

pub async fn list_repairs(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Json<Vec<RepairView>>> {
    Ok(Json(state.aggregator.repairs(query.tenant()).await?))
}

/// Validate the identity and return it trimmed.
async fn known_repair(state: &AppState, repair_id: &str) -> ApiResult<String> {
    require("repair_id", repair_id)?;
    let repair_id = repair_id.trim();

    let derived = state
        .service
        .checklists_for_repair(repair_id)
        .await?
        .iter()
        .any(|record| derive_repair_ids(record).contains(repair_id));
    if !derived {
        return Err(ApiError::NotFound(format!("Unknown repair {repair_id}")));
    }
    Ok(repair_id.to_string())
}

fn action_response(entry: &RepairStatusEntry) -> Json<RepairActionResponse> {
    Json(RepairActionResponse {
        repair_id: entry.repair_id.clone(),
        state: classify(Some(entry)),
    })
}

pub async fn acknowledge(
    State(state): State<AppState>,
    Json(req): Json<RepairActionRequest>,
) -> ApiResult<Json<RepairActionResponse>> {
    let repair_id = known_repair(&state, &req.repair_id).await?;
    let entry = state.service.acknowledge_repair(&repair_id).await?;
    Ok(action_response(&entry))
}

pub async fn complete(
    State(state): State<AppState>,
    Json(req): Json<RepairActionRequest>,
) -> ApiResult<Json<RepairActionResponse>> {
    let repair_id = known_repair(&state, &req.repair_id).await?;
    let entry = state.service.complete_repair(&repair_id).await?;
    Ok(action_response(&entry))
}

pub async fn add_note(
    State(state): State<AppState>,
    Json(req): Json<AddNoteRequest>,
) -> ApiResult<Json<RepairStatusEntry>> {
    require("text", &req.text)?;
    let repair_id = known_repair(&state, &req.repair_id).await?;
    let author = req
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("Unknown");

    let entry = state
        .service
        .add_repair_note(&repair_id, req.text.trim(), author)
        .await?;
    Ok(Json(entry))
}
