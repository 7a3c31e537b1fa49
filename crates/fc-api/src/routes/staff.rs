//! Staff endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use fc_core::entities::{NewStaff, Staff};

use crate::dto::TenantQuery;
use crate::error::{ApiResult, require};
use crate::state::AppState;

pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Json<Vec<Staff>>> {
    Ok(Json(state.service.list_staff(query.tenant()).await?))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Json(req): Json<NewStaff>,
) -> ApiResult<(StatusCode, Json<Staff>)> {
    require("name", &req.name)?;
    let staff = state.service.create_staff(req).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.delete_staff(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
