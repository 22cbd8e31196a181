//! Per-user window of recent feedback events.
//!
//! Each cached user holds at most `max_events` events from the last
//! `window_days` days, newest first. An entry is reloaded from the store once
//! it is older than the TTL. The cache is an LRU keyed by user id; with
//! `max_users = 1` (the default) it holds exactly one user at a time and
//! switching users always triggers a reload.

use crate::config::CacheConfig;
use crate::error::{HearthloopError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, SortOrder};
use chrono::{DateTime, Utc};
use lru::LruCache;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

struct CacheEntry {
    events: VecDeque<FeedbackEvent>,
    last_refreshed: Instant,
}

/// TTL-bounded feedback window cache
pub struct FeedbackCache {
    store: Arc<dyn FeedbackStore>,
    config: CacheConfig,
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl FeedbackCache {
    pub fn new(store: Arc<dyn FeedbackStore>, config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_users).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            config,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the user's window, reloading it first when missing or stale.
    ///
    /// On store failure the cache is reset so it never serves stale data
    /// belonging to another user, and the error is returned.
    pub async fn ensure_fresh(&self, user_id: &str) -> Result<Vec<FeedbackEvent>> {
        {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.get(user_id) {
                if entry.last_refreshed.elapsed() < self.config.ttl {
                    debug!("Feedback cache hit for user {}", user_id);
                    return Ok(entry.events.iter().cloned().collect());
                }
            }
        }

        let loaded = match self.window_start() {
            Ok(since) => {
                self.store
                    .query_by_user(user_id, since, self.config.max_events, SortOrder::Descending)
                    .await
            }
            Err(e) => Err(e),
        };

        let mut entries = self.entries.lock().await;
        match loaded {
            Ok(events) => {
                info!("Loaded {} feedback entries for user {}", events.len(), user_id);
                let snapshot = events.clone();
                entries.put(
                    user_id.to_string(),
                    CacheEntry {
                        events: events.into(),
                        last_refreshed: Instant::now(),
                    },
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Failed to load feedback cache for user {}: {}", user_id, e);
                if entries.cap().get() == 1 {
                    entries.clear();
                } else {
                    entries.pop(user_id);
                }
                Err(e)
            }
        }
    }

    /// Add a freshly recorded event to its owner's window, if cached.
    /// Leaves the refresh time untouched so the TTL reload still happens.
    pub async fn append(&self, event: &FeedbackEvent) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.peek_mut(&event.user_id) {
            entry.events.push_front(event.clone());
            entry.events.truncate(self.config.max_events);
            debug!("Appended feedback {} to cache for user {}", event.id, event.user_id);
        }
    }

    /// Drop one user's window
    pub async fn invalidate(&self, user_id: &str) {
        self.entries.lock().await.pop(user_id);
    }

    /// Drop every cached window
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Users currently cached, most recently used first
    pub async fn cached_users(&self) -> Vec<String> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(user, _)| user.clone())
            .collect()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Oldest timestamp inside the window
    fn window_start(&self) -> Result<DateTime<Utc>> {
        chrono::Duration::try_days(self.config.window_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                HearthloopError::Validation(format!(
                    "cache.window_days out of range: {}",
                    self.config.window_days
                ))
            })
    }
}
