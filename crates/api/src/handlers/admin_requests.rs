//! Handlers for the `/admin/requests` resource (triage dashboard).
//!
//! All handlers require the `admin` role via [`RequireAdmin`]. The listing
//! is memoized in the TTL cache; every mutation path invalidates it.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use reqcine_cache::{listing_key, TAG_LISTING};
use reqcine_core::pagination::{
    clamp_page, clamp_page_size, page_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use reqcine_core::requests::{validate_media_type, validate_request_type, DuplicateKey};
use reqcine_core::types::DbId;
use reqcine_db::models::request::{
    GroupStatusUpdate, Request, RequestWithRequester, UpdateRequestStatus,
};
use reqcine_db::models::user::Requester;
use reqcine_db::repositories::{RequestRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::updates;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/requests`.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
    /// Filter by media type; `all` or absent means no filter.
    pub media_type: Option<String>,
    /// Filter by request type; `all` or absent means no filter.
    pub request_type: Option<String>,
    /// `counter` sorts by demand; anything else sorts newest first.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

/// Query parameters identifying one duplicate-key group.
#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    pub media_id: i64,
    pub media_type: String,
    pub request_type: String,
}

/// One page of the admin listing.
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub items: Vec<RequestWithRequester>,
    pub total: i64,
    pub has_more: bool,
}

/// Treat absent, empty, and `all` filters identically.
fn normalize_filter(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "all")
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/requests
///
/// Paginated, filtered, sorted listing with joined requester info.
/// Pages are cached per filter/sort/page combination.
pub async fn list_requests(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListRequestsQuery>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    let media_type = normalize_filter(params.media_type.as_deref());
    if let Some(mt) = media_type {
        validate_media_type(mt)?;
    }
    let request_type = normalize_filter(params.request_type.as_deref());
    if let Some(rt) = request_type {
        validate_request_type(rt)?;
    }

    let sort_by = params.sort_by.as_deref().filter(|s| *s == "counter");
    let sort_order = match params.sort_order.as_deref() {
        Some("asc") => "asc",
        _ => "desc",
    };

    let key = listing_key(page, page_size, media_type, request_type, sort_by, sort_order);
    if let Some(cached) = state.cache.get(&key) {
        return Ok(Json(DataResponse { data: cached }));
    }

    let offset = page_offset(page, page_size);
    let items = RequestRepo::list_admin(
        &state.pool,
        media_type,
        request_type,
        sort_by,
        sort_order,
        page_size,
        offset,
    )
    .await?;
    let total = RequestRepo::count_admin(&state.pool, media_type, request_type).await?;

    let listing = ListingPage {
        has_more: offset + page_size < total,
        items,
        total,
    };
    let payload = serde_json::to_value(&listing)
        .map_err(|e| AppError::InternalError(format!("Listing serialization error: {e}")))?;

    state.cache.set_tagged(
        &key,
        payload.clone(),
        Duration::from_secs(state.config.listing_cache_ttl_secs),
        &[TAG_LISTING],
    );

    Ok(Json(DataResponse { data: payload }))
}

// ---------------------------------------------------------------------------
// Status updates
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/requests/{id}
///
/// Update one request's status. Rows that belong to a multi-request group
/// cascade the change to every sibling.
pub async fn update_request(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRequestStatus>,
) -> AppResult<Json<DataResponse<Request>>> {
    let updated = updates::apply_single_status(
        &state,
        id,
        &input.status,
        input.rejection_reason.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/admin/requests/update-batch
///
/// Apply a status change to every request in a duplicate-key group.
/// Returns how many rows were updated.
pub async fn update_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<GroupStatusUpdate>,
) -> AppResult<Json<serde_json::Value>> {
    let key = DuplicateKey::new(input.media_id, &input.media_type, &input.request_type)?;
    let updated = updates::apply_group_status(
        &state,
        key.media_id,
        &key.media_type,
        &key.request_type,
        &input.status,
        input.rejection_reason.as_deref(),
    )
    .await?;
    Ok(Json(json!({ "data": { "updated": updated } })))
}

// ---------------------------------------------------------------------------
// Group requesters
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/requests/requesters
///
/// Everyone who submitted into one duplicate-key group.
pub async fn group_requesters(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<GroupQuery>,
) -> AppResult<Json<DataResponse<Vec<Requester>>>> {
    let key = DuplicateKey::new(params.media_id, &params.media_type, &params.request_type)?;
    let requesters = UserRepo::list_requesters_for_group(
        &state.pool,
        key.media_id,
        &key.media_type,
        &key.request_type,
    )
    .await?;
    Ok(Json(DataResponse { data: requesters }))
}

// ---------------------------------------------------------------------------
// Sweep, purge, cache
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/requests/check-low-demand
///
/// Run the low-demand sweep on demand. Returns how many requests were
/// auto-rejected.
pub async fn sweep_low_demand(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let swept = updates::run_low_demand_sweep(&state).await?;
    Ok(Json(json!({ "data": { "updated": swept } })))
}

/// DELETE /api/v1/admin/requests
///
/// Bulk administrative purge of every request. Returns 204 No Content.
pub async fn purge_requests(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let deleted = RequestRepo::purge_all(&state.pool).await?;
    state.cache.invalidate_tag(TAG_LISTING);
    tracing::info!(deleted, "Purged all requests");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/requests/clear-cache
///
/// Drop every cached listing page.
pub async fn clear_cache(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    state.cache.invalidate_tag(TAG_LISTING);
    Ok(Json(json!({ "data": { "message": "Cache cleared" } })))
}
