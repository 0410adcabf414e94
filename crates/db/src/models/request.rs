//! Content request models and DTOs.

use reqcine_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `requests` table.
///
/// Display fields (`media_title`, `media_poster`) are denormalized copies
/// taken at submission time and never re-synced from the catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Request {
    pub id: DbId,
    pub user_id: DbId,
    pub request_type: String,
    pub media_id: i64,
    pub media_type: String,
    pub media_title: String,
    pub media_poster: Option<String>,
    pub description: Option<String>,
    pub status: String,
    /// Demand counter shared by every request with the same
    /// (`media_id`, `media_type`, `request_type`).
    pub counter: i32,
    pub rejection_reason: String,
    pub notify_whatsapp: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Submission body for `POST /requests`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequest {
    pub request_type: String,
    pub media_id: i64,
    pub media_type: String,
    #[validate(length(min = 1, message = "media_title is required"))]
    pub media_title: String,
    pub media_poster: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub notify_whatsapp: bool,
}

/// Request body for `PUT /admin/requests/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequestStatus {
    pub status: String,
    pub rejection_reason: Option<String>,
}

/// Request body for `PUT /admin/requests/update-batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupStatusUpdate {
    pub media_id: i64,
    pub media_type: String,
    pub request_type: String,
    pub status: String,
    pub rejection_reason: Option<String>,
}

/// One admin listing row: a request joined with its requester.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestWithRequester {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub request_type: String,
    pub media_id: i64,
    pub media_type: String,
    pub media_title: String,
    pub media_poster: Option<String>,
    pub status: String,
    pub counter: i32,
    pub rejection_reason: String,
    pub notify_whatsapp: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
