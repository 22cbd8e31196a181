//! Test doubles and event builders for unit tests

use crate::error::{HearthloopError, Result};
use crate::storage::{FeedbackStore, InMemoryFeedbackStore};
use crate::types::{
    ExplicitKind, ExplicitPayload, FeedbackEvent, FeedbackKind, ImplicitKind, ImplicitPayload,
    SortOrder,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Wraps an in-memory store, counting per-user reloads and optionally failing
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryFeedbackStore,
    user_queries: AtomicUsize,
    appends: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn with_events(events: Vec<FeedbackEvent>) -> Self {
        Self {
            inner: InMemoryFeedbackStore::with_events(events),
            ..Default::default()
        }
    }

    pub fn user_queries(&self) -> usize {
        self.user_queries.load(Ordering::SeqCst)
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HearthloopError::Storage("store unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedbackStore for CountingStore {
    async fn append(&self, event: &FeedbackEvent) -> Result<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HearthloopError::Storage("write rejected".to_string()));
        }
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.append(event).await
    }

    async fn query_by_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<FeedbackEvent>> {
        self.user_queries.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        self.inner.query_by_user(user_id, since, limit, order).await
    }

    async fn query_by_conversation(&self, conversation_id: &str) -> Result<Vec<FeedbackEvent>> {
        self.check_reads()?;
        self.inner.query_by_conversation(conversation_id).await
    }

    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<FeedbackEvent>> {
        self.check_reads()?;
        self.inner.query_range(since, until, limit, user_id).await
    }
}

/// Explicit event for `user` in conversation `conv`
pub fn explicit(user: &str, conv: &str, kind: ExplicitKind, payload: ExplicitPayload) -> FeedbackEvent {
    FeedbackEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.to_string(),
        conversation_id: conv.to_string(),
        message_id: "msg".to_string(),
        timestamp: Utc::now(),
        kind: FeedbackKind::Explicit { kind, payload },
    }
}

/// Implicit event for `user` in conversation `conv`
pub fn implicit(user: &str, conv: &str, kind: ImplicitKind) -> FeedbackEvent {
    FeedbackEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.to_string(),
        conversation_id: conv.to_string(),
        message_id: "msg".to_string(),
        timestamp: Utc::now(),
        kind: FeedbackKind::Implicit {
            kind,
            payload: ImplicitPayload::default(),
        },
    }
}

/// Explicit rating with the given flag set on its payload
pub fn flagged(user: &str, kind: ExplicitKind, set: impl FnOnce(&mut ExplicitPayload)) -> FeedbackEvent {
    let mut payload = ExplicitPayload::default();
    set(&mut payload);
    explicit(user, "conv", kind, payload)
}
