//! Route definitions for the user-facing `/requests` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// User-facing request routes.
///
/// ```text
/// GET    /        list_my_requests
/// POST   /        submit_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(requests::list_my_requests).post(requests::submit_request),
    )
}
