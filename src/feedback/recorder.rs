//! Feedback recording.
//!
//! Validates and appends three kinds of feedback:
//! - Explicit ratings of an assistant message (helpful, confusing, ...)
//! - Implicit signals inferred from user actions (accepted a suggestion, ...)
//! - Question-level feedback, stored for later use but not analyzed
//!
//! Recording must never block the chat flow. Callers either await the
//! `record_*` methods and log failures, or use the `spawn_*` variants.

use crate::error::{HearthloopError, Result};
use crate::feedback::cache::FeedbackCache;
use crate::storage::FeedbackStore;
use crate::types::{
    ExplicitKind, ExplicitPayload, FeedbackEvent, FeedbackKind, ImplicitKind, ImplicitPayload,
    QuestionFeedback,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Appends feedback events to the store and keeps the cache warm
#[derive(Clone)]
pub struct FeedbackRecorder {
    store: Arc<dyn FeedbackStore>,
    cache: Option<Arc<FeedbackCache>>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HearthloopError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_ids(user_id: &str, conversation_id: &str, message_field: &str, message_id: &str) -> Result<()> {
    require("user_id", user_id)?;
    require("conversation_id", conversation_id)?;
    require(message_field, message_id)
}

impl FeedbackRecorder {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store, cache: None }
    }

    /// Opportunistically append recorded events to this cache
    pub fn with_cache(mut self, cache: Arc<FeedbackCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Record a direct rating of an assistant message
    ///
    /// Returns the generated event id
    pub async fn record_explicit(
        &self,
        user_id: &str,
        conversation_id: &str,
        message_id: &str,
        kind: ExplicitKind,
        payload: ExplicitPayload,
    ) -> Result<String> {
        validate_ids(user_id, conversation_id, "message_id", message_id)?;
        if payload.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(HearthloopError::Validation(
                "topics must not contain blank entries".to_string(),
            ));
        }

        let event = self.build_event(
            user_id,
            conversation_id,
            message_id,
            FeedbackKind::Explicit { kind, payload },
        );
        let id = self.persist(event).await?;

        info!("Recorded explicit feedback: {}", kind);
        Ok(id)
    }

    /// Record a signal inferred from a user action
    pub async fn record_implicit(
        &self,
        user_id: &str,
        conversation_id: &str,
        message_id: &str,
        kind: ImplicitKind,
        action_data: ImplicitPayload,
    ) -> Result<String> {
        validate_ids(user_id, conversation_id, "message_id", message_id)?;

        let event = self.build_event(
            user_id,
            conversation_id,
            message_id,
            FeedbackKind::Implicit {
                kind,
                payload: action_data,
            },
        );
        let id = self.persist(event).await?;

        info!("Tracked implicit feedback: {}", kind);
        Ok(id)
    }

    /// Record feedback about one generated question
    pub async fn record_question_feedback(
        &self,
        user_id: &str,
        conversation_id: &str,
        question_id: &str,
        feedback: QuestionFeedback,
    ) -> Result<String> {
        validate_ids(user_id, conversation_id, "question_id", question_id)?;

        let event = self.build_event(
            user_id,
            conversation_id,
            question_id,
            FeedbackKind::QuestionSpecific { payload: feedback },
        );
        let id = self.persist(event).await?;

        info!("Recorded question feedback for question {}", question_id);
        Ok(id)
    }

    /// Record an explicit rating on a background task, logging any failure
    pub fn spawn_explicit(
        &self,
        user_id: String,
        conversation_id: String,
        message_id: String,
        kind: ExplicitKind,
        payload: ExplicitPayload,
    ) -> JoinHandle<Option<String>> {
        let recorder = self.clone();
        tokio::spawn(async move {
            match recorder
                .record_explicit(&user_id, &conversation_id, &message_id, kind, payload)
                .await
            {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Failed to record explicit feedback for {}: {}", user_id, e);
                    None
                }
            }
        })
    }

    /// Record an implicit signal on a background task, logging any failure
    pub fn spawn_implicit(
        &self,
        user_id: String,
        conversation_id: String,
        message_id: String,
        kind: ImplicitKind,
        action_data: ImplicitPayload,
    ) -> JoinHandle<Option<String>> {
        let recorder = self.clone();
        tokio::spawn(async move {
            match recorder
                .record_implicit(&user_id, &conversation_id, &message_id, kind, action_data)
                .await
            {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Failed to track implicit feedback for {}: {}", user_id, e);
                    None
                }
            }
        })
    }

    fn build_event(
        &self,
        user_id: &str,
        conversation_id: &str,
        message_id: &str,
        kind: FeedbackKind,
    ) -> FeedbackEvent {
        FeedbackEvent {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            conversation_id: conversation_id.to_string(),
            message_id: message_id.to_string(),
            timestamp: Utc::now(),
            kind,
        }
    }

    async fn persist(&self, event: FeedbackEvent) -> Result<String> {
        debug!(
            "Recording {} feedback {} for user {}",
            event.source(),
            event.id,
            event.user_id
        );

        let id = self.store.append(&event).await?;

        if let Some(cache) = &self.cache {
            cache.append(&event).await;
        }

        Ok(id)
    }
}
