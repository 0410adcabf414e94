//! Repository for the singleton `settings` row.

use sqlx::PgPool;

use crate::models::settings::{Settings, UpdateSettings};

const SETTINGS_COLUMNS: &str = "\
    id, low_demand_rejection_hours, high_demand_threshold, \
    low_demand_rejection_message, max_pending_per_user, updated_at";

/// Access to sweep thresholds and submission limits.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the settings row (seeded by migration, always present).
    pub async fn get(pool: &PgPool) -> Result<Settings, sqlx::Error> {
        let query = format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = 1");
        sqlx::query_as::<_, Settings>(&query).fetch_one(pool).await
    }

    /// Partially update settings; absent fields keep their value.
    pub async fn update(pool: &PgPool, input: &UpdateSettings) -> Result<Settings, sqlx::Error> {
        let query = format!(
            "UPDATE settings SET \
                 low_demand_rejection_hours = COALESCE($1, low_demand_rejection_hours), \
                 high_demand_threshold = COALESCE($2, high_demand_threshold), \
                 low_demand_rejection_message = COALESCE($3, low_demand_rejection_message), \
                 max_pending_per_user = COALESCE($4, max_pending_per_user), \
                 updated_at = NOW() \
             WHERE id = 1 \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(input.low_demand_rejection_hours)
            .bind(input.high_demand_threshold)
            .bind(&input.low_demand_rejection_message)
            .bind(input.max_pending_per_user)
            .fetch_one(pool)
            .await
    }
}
