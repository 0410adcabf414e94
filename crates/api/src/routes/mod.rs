pub mod admin;
pub mod health;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /requests                            list own, submit (auth required)
///
/// /admin/requests                      list (cached), purge (admin only)
/// /admin/requests/{id}                 update status (cascades for groups)
/// /admin/requests/update-batch         group status update (PUT)
/// /admin/requests/requesters           users behind one group (GET)
/// /admin/requests/check-low-demand     run sweep on demand (POST)
/// /admin/requests/clear-cache          drop cached listings (POST)
///
/// /admin/settings                      get, update sweep/limit settings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // User-facing submissions.
        .nest("/requests", requests::router())
        // Admin triage dashboard.
        .nest("/admin/requests", admin::requests_router())
        // Sweep thresholds and submission limits.
        .nest("/admin/settings", admin::settings_router())
}
