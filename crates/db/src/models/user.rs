//! User directory models.
//!
//! The request pipeline only reads users: ownership on submissions,
//! notification address resolution, and the per-group requester listing.

use reqcine_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// WhatsApp address, present only for users who registered one.
    pub whatsapp: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user (seeding and tests; user CRUD screens live
/// outside this service).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub role: String,
}

/// One requester behind a duplicate-key group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Requester {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub request_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}
