//! Common test utilities and helpers

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use hearthloop_core::{
    AdaptationConfig, ConnectionMode, ExplicitKind, ExplicitPayload, FeedbackEngine,
    FeedbackEvent, FeedbackKind, ImplicitKind, ImplicitPayload, InMemoryFeedbackStore,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Engine over an in-process store seeded with `events`
pub fn engine_with_events(events: Vec<FeedbackEvent>) -> FeedbackEngine {
    FeedbackEngine::new(
        Arc::new(InMemoryFeedbackStore::with_events(events)),
        AdaptationConfig::default(),
    )
    .expect("Failed to create engine")
}

/// Engine over a libSQL file inside a fresh temp dir.
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn create_file_engine() -> (FeedbackEngine, TempDir, String) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir
        .path()
        .join("feedback.db")
        .to_string_lossy()
        .to_string();

    let engine = FeedbackEngine::open(
        ConnectionMode::Local(db_path.clone()),
        AdaptationConfig::default(),
    )
    .await
    .expect("Failed to open engine");

    (engine, temp_dir, db_path)
}

fn event(user: &str, conversation: &str, timestamp: DateTime<Utc>, kind: FeedbackKind) -> FeedbackEvent {
    FeedbackEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.to_string(),
        conversation_id: conversation.to_string(),
        message_id: format!("msg-{}", uuid::Uuid::new_v4()),
        timestamp,
        kind,
    }
}

/// Explicit rating made `age_hours` ago
pub fn rating(
    user: &str,
    conversation: &str,
    kind: ExplicitKind,
    payload: ExplicitPayload,
    age_hours: i64,
) -> FeedbackEvent {
    event(
        user,
        conversation,
        Utc::now() - Duration::hours(age_hours),
        FeedbackKind::Explicit { kind, payload },
    )
}

/// Implicit signal made `age_hours` ago
pub fn signal(user: &str, conversation: &str, kind: ImplicitKind, age_hours: i64) -> FeedbackEvent {
    event(
        user,
        conversation,
        Utc::now() - Duration::hours(age_hours),
        FeedbackKind::Implicit {
            kind,
            payload: ImplicitPayload::default(),
        },
    )
}
