//! fleetcheck HTTP API
//!
//! All routes live under `/api` and speak JSON.
//!
//! ## Endpoints
//!
//! ### Reference data
//! - GET /health
//! - GET /staff, POST /staff, DELETE /staff/:id
//! - GET /assets, POST /assets
//! - GET /assets/makes, GET /assets/models/:make, GET /assets/checktype/:make/:model
//!
//! ### Checklists
//! - POST /checklists
//! - GET /checklists?limit&skip&company_id
//! - GET /checklists/:id
//! - GET /checklists/export/csv
//!
//! ### Dashboard and repairs
//! - GET /dashboard/stats?company_id
//! - POST /dashboard/invalidate-cache?company_id
//! - GET /repairs?company_id
//! - POST /repair-status/acknowledge, /repair-status/complete, /repair-status/add-note
//!
//! ### Maintenance
//! - POST /admin/normalize-categories
//!
//! Every successful non-GET request drops the cached dashboard snapshots
//! (see [`middleware::invalidate_after_mutation`]).

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server};
pub use state::AppState;
