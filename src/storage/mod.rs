//! Storage layer for feedback events
//!
//! Provides the append-only `FeedbackStore` contract and two implementations:
//! an in-process store for tests and embedding, and a libSQL-backed store
//! for durable use.

pub mod libsql;
pub mod memory;
#[cfg(test)]
pub mod test_utils;

use crate::error::Result;
use crate::types::{FeedbackEvent, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only store of feedback events
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Append an event, returning its id
    async fn append(&self, event: &FeedbackEvent) -> Result<String>;

    /// Events for one user with timestamp >= `since`, ordered by timestamp
    async fn query_by_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<FeedbackEvent>>;

    /// All events for one conversation, any user
    async fn query_by_conversation(&self, conversation_id: &str) -> Result<Vec<FeedbackEvent>>;

    /// Events with `since <= timestamp <= until`, newest first
    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<FeedbackEvent>>;
}

pub use self::libsql::{ConnectionMode, LibsqlFeedbackStore};
pub use self::memory::InMemoryFeedbackStore;
