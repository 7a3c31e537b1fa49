//! Cache invalidation tied to mutation.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Drop every cached dashboard snapshot after a successful mutating request.
///
/// Reads and failed writes leave the cache alone. The whole cache goes
/// because a write does not say which tenants it touched.
pub async fn invalidate_after_mutation(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mutating = !matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if mutating && response.status().is_success() {
        tracing::debug!(path = %path, "mutation succeeded, invalidating stats cache");
        state.cache.invalidate(None);
    }
    response
}
