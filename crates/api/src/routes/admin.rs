//! Route definitions for the admin triage surface.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_requests, settings};
use crate::state::AppState;

/// Admin request-management routes, mounted at `/admin/requests`.
///
/// ```text
/// GET    /                    list_requests (cached)
/// DELETE /                    purge_requests
/// PUT    /{id}                update_request
/// PUT    /update-batch        update_group
/// GET    /requesters          group_requesters
/// POST   /check-low-demand    sweep_low_demand
/// POST   /clear-cache         clear_cache
/// ```
pub fn requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(admin_requests::list_requests).delete(admin_requests::purge_requests),
        )
        .route("/{id}", put(admin_requests::update_request))
        .route("/update-batch", put(admin_requests::update_group))
        .route("/requesters", get(admin_requests::group_requesters))
        .route(
            "/check-low-demand",
            post(admin_requests::sweep_low_demand),
        )
        .route("/clear-cache", post(admin_requests::clear_cache))
}

/// Admin settings routes, mounted at `/admin/settings`.
///
/// ```text
/// GET    /        get_settings
/// PUT    /        update_settings
/// ```
pub fn settings_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(settings::get_settings).put(settings::update_settings),
    )
}
