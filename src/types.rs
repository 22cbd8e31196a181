//! Core data types for feedback events and adaptation parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::HearthloopError;

/// Version of the typed payload schema written with every stored event
pub const PAYLOAD_SCHEMA_VERSION: u32 = 1;

/// Where a feedback event came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Explicit,
    Implicit,
    QuestionSpecific,
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackSource::Explicit => write!(f, "explicit"),
            FeedbackSource::Implicit => write!(f, "implicit"),
            FeedbackSource::QuestionSpecific => write!(f, "question_specific"),
        }
    }
}

/// Direct user rating of an assistant message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExplicitKind {
    Helpful,
    NotHelpful,
    Confusing,
    Incorrect,
    Great,
}

impl ExplicitKind {
    pub const ALL: [ExplicitKind; 5] = [
        ExplicitKind::Helpful,
        ExplicitKind::NotHelpful,
        ExplicitKind::Confusing,
        ExplicitKind::Incorrect,
        ExplicitKind::Great,
    ];

    /// Helpful or Great
    pub fn is_positive(self) -> bool {
        matches!(self, ExplicitKind::Helpful | ExplicitKind::Great)
    }
}

impl fmt::Display for ExplicitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplicitKind::Helpful => write!(f, "helpful"),
            ExplicitKind::NotHelpful => write!(f, "not_helpful"),
            ExplicitKind::Confusing => write!(f, "confusing"),
            ExplicitKind::Incorrect => write!(f, "incorrect"),
            ExplicitKind::Great => write!(f, "great"),
        }
    }
}

impl FromStr for ExplicitKind {
    type Err = HearthloopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "helpful" => Ok(ExplicitKind::Helpful),
            "not_helpful" => Ok(ExplicitKind::NotHelpful),
            "confusing" => Ok(ExplicitKind::Confusing),
            "incorrect" => Ok(ExplicitKind::Incorrect),
            "great" => Ok(ExplicitKind::Great),
            other => Err(HearthloopError::Validation(format!(
                "Unknown explicit feedback kind: {}",
                other
            ))),
        }
    }
}

/// Feedback inferred from user behaviour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImplicitKind {
    AcceptedSuggestion,
    RejectedSuggestion,
    ModifiedSuggestion,
    IgnoredMessage,
    AskedFollowup,
    CorrectedInfo,
}

impl fmt::Display for ImplicitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImplicitKind::AcceptedSuggestion => write!(f, "accepted_suggestion"),
            ImplicitKind::RejectedSuggestion => write!(f, "rejected_suggestion"),
            ImplicitKind::ModifiedSuggestion => write!(f, "modified_suggestion"),
            ImplicitKind::IgnoredMessage => write!(f, "ignored_message"),
            ImplicitKind::AskedFollowup => write!(f, "asked_followup"),
            ImplicitKind::CorrectedInfo => write!(f, "corrected_info"),
        }
    }
}

impl FromStr for ImplicitKind {
    type Err = HearthloopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accepted_suggestion" => Ok(ImplicitKind::AcceptedSuggestion),
            "rejected_suggestion" => Ok(ImplicitKind::RejectedSuggestion),
            "modified_suggestion" => Ok(ImplicitKind::ModifiedSuggestion),
            "ignored_message" => Ok(ImplicitKind::IgnoredMessage),
            "asked_followup" => Ok(ImplicitKind::AskedFollowup),
            "corrected_info" => Ok(ImplicitKind::CorrectedInfo),
            other => Err(HearthloopError::Validation(format!(
                "Unknown implicit feedback kind: {}",
                other
            ))),
        }
    }
}

/// Details attached to an explicit rating
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ExplicitPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub too_many_questions: bool,
    pub too_few_questions: bool,
    pub too_detailed: bool,
    pub not_detailed_enough: bool,
    /// Topics tagged through the fixed UI choices
    pub topics: BTreeSet<String>,
    /// Conversational context, e.g. "event_creation"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl ExplicitPayload {
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Details attached to an implicit action
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ImplicitPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<String>,
    /// Free text describing the modification or correction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Feedback about one generated question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct QuestionFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful: Option<bool>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

/// Source, kind and payload of an event in one value, so an explicit
/// event can never carry an implicit kind and vice versa
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FeedbackKind {
    Explicit {
        kind: ExplicitKind,
        payload: ExplicitPayload,
    },
    Implicit {
        kind: ImplicitKind,
        payload: ImplicitPayload,
    },
    QuestionSpecific {
        payload: QuestionFeedback,
    },
}

/// One immutable feedback record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,
    /// Rated message, or the question id for question feedback
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: FeedbackKind,
}

impl FeedbackEvent {
    pub fn source(&self) -> FeedbackSource {
        match self.kind {
            FeedbackKind::Explicit { .. } => FeedbackSource::Explicit,
            FeedbackKind::Implicit { .. } => FeedbackSource::Implicit,
            FeedbackKind::QuestionSpecific { .. } => FeedbackSource::QuestionSpecific,
        }
    }

    pub fn explicit_kind(&self) -> Option<ExplicitKind> {
        match &self.kind {
            FeedbackKind::Explicit { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn implicit_kind(&self) -> Option<ImplicitKind> {
        match &self.kind {
            FeedbackKind::Implicit { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn explicit_payload(&self) -> Option<&ExplicitPayload> {
        match &self.kind {
            FeedbackKind::Explicit { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Conversational context tag, whichever payload carries it
    pub fn event_type(&self) -> Option<&str> {
        match &self.kind {
            FeedbackKind::Explicit { payload, .. } => payload.event_type.as_deref(),
            FeedbackKind::Implicit { payload, .. } => payload.event_type.as_deref(),
            FeedbackKind::QuestionSpecific { payload } => payload.event_type.as_deref(),
        }
    }

    /// Free-text comment, whichever payload carries it
    pub fn comment(&self) -> Option<&str> {
        match &self.kind {
            FeedbackKind::Explicit { payload, .. } => payload.comment.as_deref(),
            FeedbackKind::Implicit { payload, .. } => payload.comment.as_deref(),
            FeedbackKind::QuestionSpecific { payload } => payload.comment.as_deref(),
        }
    }

    /// Kind label as stored in the `kind` column
    pub fn kind_label(&self) -> String {
        match &self.kind {
            FeedbackKind::Explicit { kind, .. } => kind.to_string(),
            FeedbackKind::Implicit { kind, .. } => kind.to_string(),
            FeedbackKind::QuestionSpecific { .. } => "question".to_string(),
        }
    }
}

/// Desired number of follow-up questions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCount {
    Fewer,
    #[default]
    Default,
    More,
}

/// Desired level of detail in questions and responses
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Simpler,
    #[default]
    Default,
    Detailed,
}

/// Derived per-user adaptation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdaptationParameters {
    pub question_count: QuestionCount,
    pub detail_level: DetailLevel,
    pub focus_areas: BTreeSet<String>,
    pub avoid_areas: BTreeSet<String>,
}

impl AdaptationParameters {
    /// True when nothing would change downstream behaviour
    pub fn is_default(&self) -> bool {
        *self == AdaptationParameters::default()
    }
}

/// Sort order for store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit_event(kind: ExplicitKind) -> FeedbackEvent {
        FeedbackEvent {
            id: "evt-1".to_string(),
            user_id: "user-1".to_string(),
            conversation_id: "conv-1".to_string(),
            message_id: "msg-1".to_string(),
            timestamp: Utc::now(),
            kind: FeedbackKind::Explicit {
                kind,
                payload: ExplicitPayload::default().with_event_type("event_creation"),
            },
        }
    }

    #[test]
    fn test_explicit_kind_parse() {
        assert_eq!("helpful".parse::<ExplicitKind>().unwrap(), ExplicitKind::Helpful);
        assert_eq!(
            "Not_Helpful".parse::<ExplicitKind>().unwrap(),
            ExplicitKind::NotHelpful
        );

        let err = "meh".parse::<ExplicitKind>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_implicit_kind_display_round_trip() {
        for kind in [
            ImplicitKind::AcceptedSuggestion,
            ImplicitKind::RejectedSuggestion,
            ImplicitKind::ModifiedSuggestion,
            ImplicitKind::IgnoredMessage,
            ImplicitKind::AskedFollowup,
            ImplicitKind::CorrectedInfo,
        ] {
            assert_eq!(kind.to_string().parse::<ImplicitKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = explicit_event(ExplicitKind::Great);
        assert_eq!(event.source(), FeedbackSource::Explicit);
        assert_eq!(event.explicit_kind(), Some(ExplicitKind::Great));
        assert_eq!(event.implicit_kind(), None);
        assert_eq!(event.event_type(), Some("event_creation"));
        assert_eq!(event.kind_label(), "great");
    }

    #[test]
    fn test_payload_rejects_misspelled_flag() {
        let json = r#"{"tooManyQuestion": true}"#;
        let parsed = serde_json::from_str::<ExplicitPayload>(json);
        assert!(parsed.is_err());

        let json = r#"{"tooManyQuestions": true, "topics": ["calendar"]}"#;
        let parsed: ExplicitPayload = serde_json::from_str(json).unwrap();
        assert!(parsed.too_many_questions);
        assert!(parsed.topics.contains("calendar"));
    }

    #[test]
    fn test_event_json_shape() {
        let event = explicit_event(ExplicitKind::Helpful);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["source"], "explicit");
        assert_eq!(value["kind"], "helpful");

        let back: FeedbackEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_default_parameters() {
        let params = AdaptationParameters::default();
        assert!(params.is_default());
        assert_eq!(params.question_count, QuestionCount::Default);
        assert_eq!(params.detail_level, DetailLevel::Default);
    }
}
