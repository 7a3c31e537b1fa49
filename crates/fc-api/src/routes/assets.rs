//! Asset endpoints: the fleet register and the make/model pickers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use fc_core::entities::{Asset, NewAsset};
use fc_db::error::DatabaseError;

use crate::dto::CheckTypeResponse;
use crate::error::{ApiError, ApiResult, require};
use crate::state::AppState;

pub async fn list_assets(State(state): State<AppState>) -> ApiResult<Json<Vec<Asset>>> {
    Ok(Json(state.service.list_assets().await?))
}

pub async fn create_asset(
    State(state): State<AppState>,
    Json(req): Json<NewAsset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    require("make", &req.make)?;
    require("model", &req.model)?;
    let asset = state.service.create_asset(req).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn list_makes(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.list_makes().await?))
}

pub async fn list_models(
    State(state): State<AppState>,
    Path(make): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.list_models(&make).await?))
}

pub async fn get_check_type(
    State(state): State<AppState>,
    Path((make, model)): Path<(String, String)>,
) -> ApiResult<Json<CheckTypeResponse>> {
    let check_type = state
        .service
        .get_check_type(&make, &model)
        .await
        .map_err(|e| match e {
            DatabaseError::NoResult => {
                ApiError::NotFound(format!("No checklist template for {make} {model}"))
            }
            other => other.into(),
        })?;

    Ok(Json(CheckTypeResponse {
        make,
        model,
        check_type,
    }))
}
