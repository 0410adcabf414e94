//! Handlers for the `/admin/settings` resource.

use axum::extract::State;
use axum::Json;

use reqcine_core::error::CoreError;
use reqcine_db::models::settings::{Settings, UpdateSettings};
use reqcine_db::repositories::SettingsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/settings
pub async fn get_settings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Settings>>> {
    let settings = SettingsRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Partially update sweep thresholds and submission limits. Absent fields
/// keep their value.
pub async fn update_settings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateSettings>,
) -> AppResult<Json<DataResponse<Settings>>> {
    validate_settings(&input)?;
    let settings = SettingsRepo::update(&state.pool, &input).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// Reject values the sweep and limit checks cannot work with.
fn validate_settings(input: &UpdateSettings) -> Result<(), CoreError> {
    if matches!(input.low_demand_rejection_hours, Some(h) if h < 1) {
        return Err(CoreError::Validation(
            "low_demand_rejection_hours must be at least 1".into(),
        ));
    }
    if matches!(input.high_demand_threshold, Some(t) if t < 1) {
        return Err(CoreError::Validation(
            "high_demand_threshold must be at least 1".into(),
        ));
    }
    if matches!(input.max_pending_per_user, Some(m) if m < 1) {
        return Err(CoreError::Validation(
            "max_pending_per_user must be at least 1".into(),
        ));
    }
    if matches!(&input.low_demand_rejection_message, Some(msg) if msg.trim().is_empty()) {
        return Err(CoreError::Validation(
            "low_demand_rejection_message must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> UpdateSettings {
        UpdateSettings {
            low_demand_rejection_hours: None,
            high_demand_threshold: None,
            low_demand_rejection_message: None,
            max_pending_per_user: None,
        }
    }

    #[test]
    fn absent_fields_are_valid() {
        assert!(validate_settings(&empty()).is_ok());
    }

    #[test]
    fn zero_hours_rejected() {
        let input = UpdateSettings {
            low_demand_rejection_hours: Some(0),
            ..empty()
        };
        assert!(validate_settings(&input).is_err());
    }

    #[test]
    fn blank_message_rejected() {
        let input = UpdateSettings {
            low_demand_rejection_message: Some("   ".into()),
            ..empty()
        };
        assert!(validate_settings(&input).is_err());
    }
}
