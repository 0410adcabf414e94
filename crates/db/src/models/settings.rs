//! Platform settings model (singleton row).

use reqcine_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single row of the `settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Settings {
    pub id: i16,
    /// Pending requests older than this many hours are sweep candidates.
    pub low_demand_rejection_hours: i32,
    /// Sweep spares requests whose counter reaches this threshold.
    pub high_demand_threshold: i32,
    /// Rejection reason written by the sweep.
    pub low_demand_rejection_message: String,
    /// Per-user cap on open (pending) requests at submission time.
    pub max_pending_per_user: i32,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /admin/settings`. Absent fields keep their value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettings {
    pub low_demand_rejection_hours: Option<i32>,
    pub high_demand_threshold: Option<i32>,
    pub low_demand_rejection_message: Option<String>,
    pub max_pending_per_user: Option<i32>,
}
