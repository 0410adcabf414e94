//! Status-change notification fan-out.
//!
//! Every status transition may notify the requesters behind the affected
//! rows over WhatsApp. Dispatch is best-effort: a failed lookup or send is
//! logged and never propagates to the triggering operation. Jobs run as a
//! bounded-concurrency stream so large groups neither serialize nor
//! stampede the gateway.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use reqcine_core::requests::status_update_message;
use reqcine_db::models::request::Request;
use reqcine_db::repositories::UserRepo;
use reqcine_db::DbPool;
use reqcine_notify::Notifier;

/// Upper bound on in-flight deliveries per status change.
const MAX_CONCURRENT_DISPATCHES: usize = 4;

/// The rows that warrant a notification for a transition to `new_status`:
/// opted-in requests whose stored status actually differs.
///
/// The status guard is what makes re-applying the same status idempotent
/// from the requester's point of view: unchanged rows are never re-notified.
pub fn notification_candidates<'a>(requests: &'a [Request], new_status: &str) -> Vec<&'a Request> {
    requests
        .iter()
        .filter(|r| r.notify_whatsapp && r.status != new_status)
        .collect()
}

/// Resolve each candidate's user and deliver the localized status message.
///
/// `candidates` must hold the rows' pre-update state (the caller reads the
/// group before the bulk write, or uses sweep rows whose prior status is
/// known).
pub async fn dispatch(
    pool: &DbPool,
    notifier: &Arc<dyn Notifier>,
    candidates: Vec<&Request>,
    new_status: &str,
    rejection_reason: Option<&str>,
) {
    stream::iter(candidates)
        .for_each_concurrent(MAX_CONCURRENT_DISPATCHES, |request| async move {
            let user = match UserRepo::find_by_id(pool, request.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::debug!(
                        request_id = request.id,
                        user_id = request.user_id,
                        "Requester no longer exists, skipping notification"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        request_id = request.id,
                        error = %e,
                        "Failed to resolve requester, skipping notification"
                    );
                    return;
                }
            };

            let Some(address) = user.whatsapp.as_deref() else {
                tracing::debug!(
                    user_id = user.id,
                    "User has no registered WhatsApp address, skipping notification"
                );
                return;
            };

            let message = status_update_message(
                &user.name,
                &request.media_title,
                new_status,
                rejection_reason,
            );

            if let Err(e) = notifier.send(address, &message).await {
                tracing::warn!(
                    request_id = request.id,
                    user_id = user.id,
                    error = %e,
                    "Status notification failed"
                );
            }
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reqcine_core::requests::{STATUS_PENDING, STATUS_REJECTED};

    fn request(id: i64, status: &str, notify: bool) -> Request {
        Request {
            id,
            user_id: 1,
            request_type: "add".into(),
            media_id: 100,
            media_type: "movie".into(),
            media_title: "Title".into(),
            media_poster: None,
            description: None,
            status: status.into(),
            counter: 1,
            rejection_reason: String::new(),
            notify_whatsapp: notify,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn candidates_require_opt_in_and_a_real_transition() {
        let rows = vec![
            request(1, STATUS_PENDING, true),      // transitions, opted in
            request(2, STATUS_PENDING, false),     // transitions, not opted in
            request(3, STATUS_REJECTED, true),     // no transition
        ];

        let candidates = notification_candidates(&rows, STATUS_REJECTED);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, 1);
    }

    #[test]
    fn reapplying_the_same_status_notifies_nobody() {
        let rows = vec![
            request(1, STATUS_REJECTED, true),
            request(2, STATUS_REJECTED, true),
        ];
        assert!(notification_candidates(&rows, STATUS_REJECTED).is_empty());
    }
}
