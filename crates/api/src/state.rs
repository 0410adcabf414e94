use std::sync::Arc;

use reqcine_cache::TtlCache;
use reqcine_notify::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reqcine_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Listing cache, constructed at startup and torn down with the server.
    pub cache: Arc<TtlCache>,
    /// Status-change notification channel.
    pub notifier: Arc<dyn Notifier>,
}
