//! Per-conversation quality scoring.
//!
//! Four 0-100 metrics derived from the feedback recorded against one
//! conversation, plus canned insights when a metric falls below its floor.

use crate::error::Result;
use crate::storage::FeedbackStore;
use crate::types::{ExplicitKind, FeedbackEvent, FeedbackKind, ImplicitKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const INSIGHT_RULES: [(Metric, u32, &str); 4] = [
    (
        Metric::Helpfulness,
        50,
        "Responses are not being perceived as helpful. Consider more specific guidance.",
    ),
    (
        Metric::Clarity,
        60,
        "Messages may be confusing. Consider simpler language and more structure.",
    ),
    (
        Metric::Accuracy,
        70,
        "Information accuracy needs improvement. Verify data sources and event details.",
    ),
    (
        Metric::Efficiency,
        50,
        "Suggestions aren't being accepted. Consider more relevant and actionable recommendations.",
    ),
];

#[derive(Debug, Clone, Copy)]
enum Metric {
    Helpfulness,
    Clarity,
    Accuracy,
    Efficiency,
}

/// Quality metrics for one conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationScore {
    pub helpfulness: u32,
    pub clarity: u32,
    pub accuracy: u32,
    pub efficiency: u32,
    pub insights: Vec<String>,
}

impl ConversationScore {
    fn metric(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Helpfulness => self.helpfulness,
            Metric::Clarity => self.clarity,
            Metric::Accuracy => self.accuracy,
            Metric::Efficiency => self.efficiency,
        }
    }
}

/// Per-kind counts for one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationTally {
    pub helpful: usize,
    pub not_helpful: usize,
    pub confusing: usize,
    pub incorrect: usize,
    pub great: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub modified: usize,
    pub ignored: usize,
    pub followups: usize,
    pub corrections: usize,
    pub question_feedback: usize,
}

impl ConversationTally {
    pub fn from_events(events: &[FeedbackEvent]) -> Self {
        let mut tally = Self::default();
        for event in events {
            match &event.kind {
                FeedbackKind::Explicit { kind, .. } => match kind {
                    ExplicitKind::Helpful => tally.helpful += 1,
                    ExplicitKind::NotHelpful => tally.not_helpful += 1,
                    ExplicitKind::Confusing => tally.confusing += 1,
                    ExplicitKind::Incorrect => tally.incorrect += 1,
                    ExplicitKind::Great => tally.great += 1,
                },
                FeedbackKind::Implicit { kind, .. } => match kind {
                    ImplicitKind::AcceptedSuggestion => tally.accepted += 1,
                    ImplicitKind::RejectedSuggestion => tally.rejected += 1,
                    ImplicitKind::ModifiedSuggestion => tally.modified += 1,
                    ImplicitKind::IgnoredMessage => tally.ignored += 1,
                    ImplicitKind::AskedFollowup => tally.followups += 1,
                    ImplicitKind::CorrectedInfo => tally.corrections += 1,
                },
                FeedbackKind::QuestionSpecific { .. } => tally.question_feedback += 1,
            }
        }
        tally
    }

    pub fn explicit_total(&self) -> usize {
        self.helpful + self.not_helpful + self.confusing + self.incorrect + self.great
    }

    /// Suggestion outcomes; ignored messages, follow-ups and corrections are not counted
    pub fn suggestion_total(&self) -> usize {
        self.accepted + self.rejected + self.modified
    }
}

fn percent(numerator: f64, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (100.0 * numerator / denominator as f64).round() as u32
}

/// Scores conversations from their recorded feedback
pub struct ConversationScorer {
    store: Arc<dyn FeedbackStore>,
}

impl ConversationScorer {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Score a conversation. Store failures yield a zeroed score.
    pub async fn score(&self, conversation_id: &str) -> ConversationScore {
        match self.try_score(conversation_id).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Failed to score conversation {}: {}", conversation_id, e);
                ConversationScore::default()
            }
        }
    }

    /// Same as `score` but surfaces store failures
    pub async fn try_score(&self, conversation_id: &str) -> Result<ConversationScore> {
        let events = self.store.query_by_conversation(conversation_id).await?;
        debug!(
            "Scoring conversation {} from {} events",
            conversation_id,
            events.len()
        );
        Ok(Self::score_events(&events))
    }

    /// Pure scoring over an event list; order does not matter
    pub fn score_events(events: &[FeedbackEvent]) -> ConversationScore {
        if events.is_empty() {
            return ConversationScore::default();
        }

        let tally = ConversationTally::from_events(events);
        let explicit = tally.explicit_total();

        let mut score = ConversationScore {
            helpfulness: percent((tally.helpful + tally.great) as f64, explicit),
            clarity: if explicit == 0 {
                0
            } else {
                percent((explicit - tally.confusing) as f64, explicit)
            },
            accuracy: if explicit == 0 {
                0
            } else {
                percent((explicit - tally.incorrect) as f64, explicit)
            },
            efficiency: percent(
                tally.accepted as f64 + 0.5 * tally.modified as f64,
                tally.suggestion_total(),
            ),
            insights: Vec::new(),
        };

        score.insights = INSIGHT_RULES
            .iter()
            .filter(|(metric, floor, _)| score.metric(*metric) < *floor)
            .map(|(_, _, text)| text.to_string())
            .collect();

        score
    }
}
