//! Status-change orchestration.
//!
//! The write paths that move requests between statuses: the group cascade,
//! the single-row fast path, and the low-demand sweep. Each one finishes
//! by routing affected requesters through notification fan-out and
//! invalidating the listing cache, so callers (HTTP handlers and the
//! scheduled sweeper) get identical semantics.

use chrono::{Duration, Utc};

use reqcine_cache::TAG_LISTING;
use reqcine_core::error::CoreError;
use reqcine_core::requests::validate_status;
use reqcine_core::types::DbId;
use reqcine_db::models::request::Request;
use reqcine_db::repositories::{RequestRepo, SettingsRepo};

use crate::error::{AppError, AppResult};
use crate::notifications;
use crate::state::AppState;

/// Cascade a status change across every row in a duplicate-key group.
///
/// Returns the number of rows updated. Fails with NotFound when the group
/// is empty. Notification failures never surface here; the bulk write is
/// the only fallible step after validation.
pub async fn apply_group_status(
    state: &AppState,
    media_id: i64,
    media_type: &str,
    request_type: &str,
    status: &str,
    rejection_reason: Option<&str>,
) -> AppResult<u64> {
    validate_status(status)?;

    // Read before the write: the prior rows decide who gets notified.
    let group = RequestRepo::find_group(&state.pool, media_id, media_type, request_type).await?;
    if group.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Request group",
            id: media_id,
        }));
    }

    let updated = RequestRepo::update_group_status(
        &state.pool,
        media_id,
        media_type,
        request_type,
        status,
        rejection_reason,
    )
    .await?;

    let candidates = notifications::notification_candidates(&group, status);
    notifications::dispatch(
        &state.pool,
        &state.notifier,
        candidates,
        status,
        rejection_reason,
    )
    .await;

    state.cache.invalidate_tag(TAG_LISTING);

    tracing::info!(
        media_id,
        media_type,
        request_type,
        status,
        updated,
        "Group status updated"
    );
    Ok(updated)
}

/// Update one request's status, preserving the group invariant.
///
/// Rows with `counter == 1` take the single-row fast path. A row whose
/// counter is greater than one belongs to a group, so the change cascades
/// through [`apply_group_status`]; the invariant cannot be bypassed by
/// addressing one sibling.
pub async fn apply_single_status(
    state: &AppState,
    id: DbId,
    status: &str,
    rejection_reason: Option<&str>,
) -> AppResult<Request> {
    validate_status(status)?;

    let existing = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;

    if existing.counter > 1 {
        apply_group_status(
            state,
            existing.media_id,
            &existing.media_type,
            &existing.request_type,
            status,
            rejection_reason,
        )
        .await?;
        return RequestRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Request",
                id,
            }));
    }

    let updated = RequestRepo::update_status(&state.pool, id, status, rejection_reason)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;

    let candidates =
        notifications::notification_candidates(std::slice::from_ref(&existing), status);
    notifications::dispatch(
        &state.pool,
        &state.notifier,
        candidates,
        status,
        rejection_reason,
    )
    .await;

    state.cache.invalidate_tag(TAG_LISTING);
    Ok(updated)
}

/// Reject stale pending requests whose demand stayed below the threshold.
///
/// Thresholds come from the settings row. Swept requesters go through the
/// same notification fan-out as manual updates: every swept row was
/// `pending`, so each one is a genuine transition. Returns how many rows
/// were rejected.
pub async fn run_low_demand_sweep(state: &AppState) -> AppResult<u64> {
    let settings = SettingsRepo::get(&state.pool).await?;

    let cutoff = Utc::now() - Duration::hours(settings.low_demand_rejection_hours as i64);
    let swept = RequestRepo::sweep_low_demand(
        &state.pool,
        cutoff,
        settings.high_demand_threshold,
        &settings.low_demand_rejection_message,
    )
    .await?;

    if swept.is_empty() {
        return Ok(0);
    }

    // The returned rows carry post-update state; their prior status was
    // `pending` by the sweep predicate, so only the opt-in flag matters.
    let candidates: Vec<&Request> = swept.iter().filter(|r| r.notify_whatsapp).collect();
    notifications::dispatch(
        &state.pool,
        &state.notifier,
        candidates,
        reqcine_core::requests::STATUS_REJECTED,
        Some(&settings.low_demand_rejection_message),
    )
    .await;

    state.cache.invalidate_tag(TAG_LISTING);

    tracing::info!(swept = swept.len(), "Low-demand sweep rejected requests");
    Ok(swept.len() as u64)
}
