//! Scheduled low-demand sweep.
//!
//! Spawns a background loop that periodically rejects stale pending
//! requests whose demand counter never reached the configured threshold.
//! Runs on a fixed interval using `tokio::time::interval`; the same sweep
//! is also exposed to admins as an on-demand endpoint.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use crate::updates;

/// Run the sweep loop until `cancel` is triggered.
///
/// The interval comes from `SWEEP_INTERVAL_SECS` (default one day). A
/// zero interval means the scheduled sweep is disabled and the function
/// returns immediately.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let interval_secs = state.config.sweep_interval_secs;
    if interval_secs == 0 {
        tracing::info!("Scheduled low-demand sweep disabled");
        return;
    }

    tracing::info!(interval_secs, "Low-demand sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Low-demand sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match updates::run_low_demand_sweep(&state).await {
                    Ok(swept) => {
                        if swept > 0 {
                            tracing::info!(swept, "Low-demand sweep: rejected stale requests");
                        } else {
                            tracing::debug!("Low-demand sweep: nothing to reject");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Low-demand sweep failed");
                    }
                }
            }
        }
    }
}
