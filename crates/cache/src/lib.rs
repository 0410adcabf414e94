//! In-process TTL cache for listing responses.
//!
//! A deliberately small key/value store used to memoize the admin request
//! listing. It is a performance optimization, not a source of truth: the
//! only guarantee is that entries disappear on TTL expiry, explicit
//! deletion, or tag invalidation.
//!
//! The cache is constructed once at startup and injected through
//! application state; the background reaper is torn down with the rest of
//! the server via a [`CancellationToken`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Tag carried by every cached listing page. Mutation paths invalidate
/// this tag instead of pattern-matching key strings.
pub const TAG_LISTING: &str = "listing";

/// Key namespace for admin request listing pages.
pub const LISTING_KEY_PREFIX: &str = "admin:requests:";

/// How often the background reaper scans for expired entries.
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(300);

/// Wildcard marker understood by [`TtlCache::delete`].
const WILDCARD: char = '*';

/// Cache key for one admin listing page.
///
/// Encodes every dimension the listing query depends on, so distinct
/// filter/sort/page combinations never collide:
/// `admin:requests:{page}:{size}:{mediaType|all}:{requestType|all}:{sortBy|none}:{sortOrder}`.
pub fn listing_key(
    page: i64,
    page_size: i64,
    media_type: Option<&str>,
    request_type: Option<&str>,
    sort_by: Option<&str>,
    sort_order: &str,
) -> String {
    format!(
        "{LISTING_KEY_PREFIX}{page}:{page_size}:{}:{}:{}:{sort_order}",
        media_type.unwrap_or("all"),
        request_type.unwrap_or("all"),
        sort_by.unwrap_or("none"),
    )
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
    tags: Vec<String>,
}

/// Short-lived key/value store with TTL expiry, wildcard deletion, and
/// tag-based invalidation.
///
/// Coarse whole-map locking: entries are few and hold times are short, so
/// contention stays negligible.
pub struct TtlCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key` if present and unexpired.
    ///
    /// A stale hit is evicted and reported as absent.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key` for `ttl`, overwriting any existing entry.
    pub fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        self.set_tagged(key, value, ttl, &[]);
    }

    /// Store `value` with a set of invalidation tags.
    pub fn set_tagged(&self, key: &str, value: serde_json::Value, ttl: Duration, tags: &[&str]) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    /// Delete by exact key, or by prefix when `pattern` contains `*`.
    ///
    /// A wildcard pattern removes every key containing the literal text
    /// before the marker. Deleting a missing key is a no-op.
    pub fn delete(&self, pattern: &str) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        if pattern.contains(WILDCARD) {
            let literal: String = pattern.chars().filter(|c| *c != WILDCARD).collect();
            entries.retain(|key, _| !key.contains(&literal));
        } else {
            entries.remove(pattern);
        }
    }

    /// Drop every entry tagged with `tag`.
    pub fn invalidate_tag(&self, tag: &str) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
    }

    /// Clear all entries.
    pub fn flush(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every expired entry; returns how many were evicted.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Run the eviction loop until `cancel` is triggered.
    ///
    /// Bounds memory growth from abandoned keys that are never read again
    /// (a stale `get` already evicts, but only for keys something asks for).
    pub fn spawn_reaper(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh cache
            // is not scanned at startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Cache reaper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = self.evict_expired();
                        if evicted > 0 {
                            tracing::debug!(evicted, "Cache reaper: evicted expired entries");
                        }
                    }
                }
            }
        })
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
