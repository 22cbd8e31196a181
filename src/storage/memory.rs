//! In-process feedback store

use crate::error::Result;
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Vector-backed store. Suitable for tests and single-process embedding.
#[derive(Default)]
pub struct InMemoryFeedbackStore {
    events: RwLock<Vec<FeedbackEvent>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing events
    pub fn with_events(events: Vec<FeedbackEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

fn sort_by_timestamp(events: &mut [FeedbackEvent], order: SortOrder) {
    match order {
        SortOrder::Ascending => events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Descending => events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn append(&self, event: &FeedbackEvent) -> Result<String> {
        let mut events = self.events.write().await;
        events.push(event.clone());
        Ok(event.id.clone())
    }

    async fn query_by_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<FeedbackEvent>> {
        let events = self.events.read().await;
        let mut matching: Vec<FeedbackEvent> = events
            .iter()
            .filter(|e| e.user_id == user_id && e.timestamp >= since)
            .cloned()
            .collect();

        sort_by_timestamp(&mut matching, order);
        matching.truncate(limit);
        Ok(matching)
    }

    async fn query_by_conversation(&self, conversation_id: &str) -> Result<Vec<FeedbackEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<FeedbackEvent>> {
        let events = self.events.read().await;
        let mut matching: Vec<FeedbackEvent> = events
            .iter()
            .filter(|e| e.timestamp >= since && e.timestamp <= until)
            .filter(|e| user_id.map_or(true, |uid| e.user_id == uid))
            .cloned()
            .collect();

        sort_by_timestamp(&mut matching, SortOrder::Descending);
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExplicitKind, ExplicitPayload, FeedbackKind};
    use chrono::Duration;

    fn event(id: &str, user: &str, conversation: &str, age_days: i64) -> FeedbackEvent {
        FeedbackEvent {
            id: id.to_string(),
            user_id: user.to_string(),
            conversation_id: conversation.to_string(),
            message_id: "msg".to_string(),
            timestamp: Utc::now() - Duration::days(age_days),
            kind: FeedbackKind::Explicit {
                kind: ExplicitKind::Helpful,
                payload: ExplicitPayload::default(),
            },
        }
    }

    #[tokio::test]
    async fn test_query_by_user_window_order_and_limit() {
        let store = InMemoryFeedbackStore::with_events(vec![
            event("old", "u1", "c1", 40),
            event("a", "u1", "c1", 3),
            event("b", "u1", "c2", 1),
            event("c", "u1", "c2", 2),
            event("other", "u2", "c1", 1),
        ]);

        let since = Utc::now() - Duration::days(30);
        let events = store
            .query_by_user("u1", since, 2, SortOrder::Descending)
            .await
            .unwrap();

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_query_by_conversation_any_user() {
        let store = InMemoryFeedbackStore::with_events(vec![
            event("a", "u1", "c1", 1),
            event("b", "u2", "c1", 1),
            event("c", "u1", "c2", 1),
        ]);

        let events = store.query_by_conversation("c1").await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_query_range_with_user_filter() {
        let store = InMemoryFeedbackStore::with_events(vec![
            event("a", "u1", "c1", 1),
            event("b", "u2", "c1", 2),
            event("c", "u1", "c2", 10),
        ]);

        let until = Utc::now();
        let since = until - Duration::days(5);

        let all = store.query_range(since, until, 500, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");

        let only_u2 = store.query_range(since, until, 500, Some("u2")).await.unwrap();
        assert_eq!(only_u2.len(), 1);
        assert_eq!(only_u2[0].id, "b");
    }

    #[tokio::test]
    async fn test_append_returns_id() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.is_empty().await);

        let id = store.append(&event("x", "u1", "c1", 0)).await.unwrap();
        assert_eq!(id, "x");
        assert_eq!(store.len().await, 1);
    }
}
