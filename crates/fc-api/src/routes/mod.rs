//! API route handlers

pub mod admin;
pub mod assets;
pub mod checklists;
pub mod dashboard;
pub mod health;
pub mod repairs;
pub mod staff;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::invalidate_after_mutation;
use crate::state::AppState;

/// Create the full router, with every route nested under `/api`.
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        // Staff
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route("/staff/:id", delete(staff::delete_staff))
        // Assets
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route("/assets/makes", get(assets::list_makes))
        .route("/assets/models/:make", get(assets::list_models))
        .route("/assets/checktype/:make/:model", get(assets::get_check_type))
        // Checklists
        .route(
            "/checklists",
            get(checklists::list_checklists).post(checklists::create_checklist),
        )
        .route("/checklists/export/csv", get(checklists::export_csv))
        .route("/checklists/:id", get(checklists::get_checklist))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::get_stats))
        .route("/dashboard/invalidate-cache", post(dashboard::invalidate_cache))
        // Repairs
        .route("/repairs", get(repairs::list_repairs))
        .route("/repair-status/acknowledge", post(repairs::acknowledge))
        .route("/repair-status/complete", post(repairs::complete))
        .route("/repair-status/add-note", post(repairs::add_note))
        // Maintenance
        .route("/admin/normalize-categories", post(admin::normalize_categories))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            invalidate_after_mutation,
        ))
        .with_state(state);

    let mut router = Router::new().nest("/api", api);

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.layer(TraceLayer::new_for_http())
}
