//! Handlers for the user-facing `/requests` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use reqcine_cache::TAG_LISTING;
use reqcine_core::error::CoreError;
use reqcine_core::requests::DuplicateKey;
use reqcine_db::models::request::{CreateRequest, Request};
use reqcine_db::repositories::{RequestRepo, SettingsRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/requests
///
/// List the authenticated user's own requests, newest first.
pub async fn list_my_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Request>>>> {
    let requests = RequestRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/requests
///
/// Submit a content request. A request for a catalog item someone already
/// asked for joins that group: the shared demand counter is bumped and the
/// new row carries the same value. Returns 201 Created with the stored row.
pub async fn submit_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Request>>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    DuplicateKey::new(input.media_id, &input.media_type, &input.request_type)?;

    // Per-user cap on open requests, from the settings row.
    let settings = SettingsRepo::get(&state.pool).await?;
    let pending = RequestRepo::count_pending_for_user(&state.pool, auth.user_id).await?;
    if pending >= settings.max_pending_per_user as i64 {
        return Err(
            CoreError::LimitExceeded("Limite de solicitações excedido".into()).into(),
        );
    }

    let request = RequestRepo::create(&state.pool, auth.user_id, &input).await?;

    // Counters in the listing just moved.
    state.cache.invalidate_tag(TAG_LISTING);

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}
