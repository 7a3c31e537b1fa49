//! Checklist endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use fc_core::entities::{ChecklistRecord, NewChecklist};
use fc_core::enums::ItemOutcome;
use fc_db::error::DatabaseError;
use fc_db::repos::ChecklistFilter;

use crate::dto::{ListQuery, TenantQuery};
use crate::error::{ApiError, ApiResult, require};
use crate::state::AppState;

const CSV_HEADER: [&str; 10] = [
    "ID",
    "Staff Name",
    "Machine Make",
    "Machine Model",
    "Category",
    "Completed At",
    "Status",
    "Items Satisfactory",
    "Items Total",
    "Notes",
];

pub async fn create_checklist(
    State(state): State<AppState>,
    Json(req): Json<NewChecklist>,
) -> ApiResult<(StatusCode, Json<ChecklistRecord>)> {
    require("staff_name", &req.staff_name)?;
    require("machine_make", &req.machine_make)?;
    require("machine_model", &req.machine_model)?;
    require("category", req.category.as_str())?;

    let record = state.service.create_checklist(req).await?;
    tracing::info!(id = %record.id, category = %record.category, "checklist submitted");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_checklists(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ChecklistRecord>>> {
    let tenant = TenantQuery {
        company_id: query.company_id,
    };
    let filter = ChecklistFilter::for_tenant(tenant.tenant());
    let limit = state.general.clamp_limit(query.limit);
    Ok(Json(
        state
            .service
            .list_checklists(&filter, limit, query.skip)
            .await?,
    ))
}

pub async fn get_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChecklistRecord>> {
    let record = state.service.get_checklist(&id).await.map_err(|e| match e {
        DatabaseError::NoResult => ApiError::NotFound(format!("Checklist {id} not found")),
        other => other.into(),
    })?;
    Ok(Json(record))
}

/// Every checklist, newest first, as a CSV attachment.
///
/// Read page by page so no single query is unbounded.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ChecklistFilter::for_tenant(query.tenant());
    let page = state.general.max_limit.max(1);

    let mut out = csv_row(CSV_HEADER.iter().map(|h| (*h).to_string()));
    // Pages can come back short when unreadable rows are skipped, so the
    // loop is bounded by the raw row count rather than the page length.
    let total = state.service.count_checklists(&filter).await?;
    let mut offset = 0_u32;
    while u64::from(offset) < total {
        let records = state.service.list_checklists(&filter, page, offset).await?;
        for record in &records {
            out.push_str(&csv_row(record_fields(record)));
        }
        offset = offset.saturating_add(page);
        if offset == u32::MAX {
            break;
        }
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=machine_checklists.csv",
            ),
        ],
        out,
    ))
}

fn record_fields(record: &ChecklistRecord) -> impl Iterator<Item = String> {
    let satisfactory = record
        .items
        .iter()
        .filter(|i| i.outcome == ItemOutcome::Satisfactory)
        .count();
    let notes = record
        .items
        .iter()
        .filter_map(|i| i.note.as_deref())
        .chain(record.notes.as_deref())
        .filter(|n| !n.trim().is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    [
        record.id.clone(),
        record.staff_name.clone(),
        record.machine_make.clone(),
        record.machine_model.clone(),
        record.category.to_string(),
        fc_db::helpers::format_timestamp(record.completed_at),
        record.status.clone(),
        satisfactory.to_string(),
        record.items.len().to_string(),
        notes,
    ]
    .into_iter()
}

/// One CSV line. Fields holding a comma, quote or line break are quoted.
fn csv_row(fields: impl Iterator<Item = String>) -> String {
    let mut line = fields
        .map(|f| {
            if f.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}
