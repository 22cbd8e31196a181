//! Threshold-based pattern analysis.
//!
//! Turns a list of feedback events into `AdaptationParameters`:
//! 1. Optionally keep only events tagged with the requested event type
//! 2. Tally the question-count and detail-level flags on explicit ratings
//! 3. Tally positive/negative mentions per tagged topic
//! 4. Apply ratio thresholds; a decision needs a non-zero denominator
//!
//! The analysis is a pure aggregate over counts, so the result does not
//! depend on event order.

use crate::config::Thresholds;
use crate::types::{
    AdaptationParameters, DetailLevel, ExplicitKind, FeedbackEvent, FeedbackKind, QuestionCount,
};
use std::collections::{BTreeMap, BTreeSet};

/// Positive and negative mentions of one topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicInterest {
    pub positive: usize,
    pub negative: usize,
}

impl TopicInterest {
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }
}

/// Raw signal counts behind a set of adaptation parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackTally {
    pub too_many_questions: usize,
    pub too_few_questions: usize,
    pub too_detailed: usize,
    pub not_detailed_enough: usize,
    pub topics: BTreeMap<String, TopicInterest>,
}

impl FeedbackTally {
    pub fn question_signals(&self) -> usize {
        self.too_many_questions + self.too_few_questions
    }

    pub fn detail_signals(&self) -> usize {
        self.too_detailed + self.not_detailed_enough
    }
}

/// `Some(first)` when first/(first+second) > ratio, `Some(second)` when
/// second/(first+second) > ratio, `None` otherwise or with no signals
fn ratio_decision<T>(first: usize, second: usize, ratio: f64, on_first: T, on_second: T) -> Option<T> {
    let total = first + second;
    if total == 0 {
        return None;
    }
    if first as f64 / total as f64 > ratio {
        Some(on_first)
    } else if second as f64 / total as f64 > ratio {
        Some(on_second)
    } else {
        None
    }
}

/// Derives adaptation parameters from feedback
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    thresholds: Thresholds,
}

impl PatternAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Count the signals carried by explicit events, optionally scoped to one event type
    pub fn tally(&self, events: &[FeedbackEvent], event_type: Option<&str>) -> FeedbackTally {
        let mut tally = FeedbackTally::default();

        let relevant = events
            .iter()
            .filter(|e| event_type.map_or(true, |wanted| e.event_type() == Some(wanted)));

        for event in relevant {
            let FeedbackKind::Explicit { kind, payload } = &event.kind else {
                continue;
            };

            tally.too_many_questions += payload.too_many_questions as usize;
            tally.too_few_questions += payload.too_few_questions as usize;
            tally.too_detailed += payload.too_detailed as usize;
            tally.not_detailed_enough += payload.not_detailed_enough as usize;

            for topic in &payload.topics {
                let interest = tally.topics.entry(topic.clone()).or_default();
                match kind {
                    ExplicitKind::Helpful | ExplicitKind::Great => interest.positive += 1,
                    ExplicitKind::NotHelpful | ExplicitKind::Confusing => interest.negative += 1,
                    ExplicitKind::Incorrect => {}
                }
            }
        }

        tally
    }

    /// Apply the thresholds to a tally
    pub fn decide(&self, tally: &FeedbackTally) -> AdaptationParameters {
        let t = &self.thresholds;

        let question_count = ratio_decision(
            tally.too_many_questions,
            tally.too_few_questions,
            t.question_count_ratio,
            QuestionCount::Fewer,
            QuestionCount::More,
        )
        .unwrap_or_default();

        let detail_level = ratio_decision(
            tally.too_detailed,
            tally.not_detailed_enough,
            t.detail_level_ratio,
            DetailLevel::Simpler,
            DetailLevel::Detailed,
        )
        .unwrap_or_default();

        let mut focus_areas = BTreeSet::new();
        let mut avoid_areas = BTreeSet::new();
        for (topic, interest) in &tally.topics {
            if interest.total() < t.min_topic_mentions {
                continue;
            }
            match ratio_decision(interest.positive, interest.negative, t.topic_ratio, true, false) {
                Some(true) => {
                    focus_areas.insert(topic.clone());
                }
                Some(false) => {
                    avoid_areas.insert(topic.clone());
                }
                None => {}
            }
        }

        AdaptationParameters {
            question_count,
            detail_level,
            focus_areas,
            avoid_areas,
        }
    }

    /// Analyze events, optionally scoped to one event type
    pub fn analyze(&self, events: &[FeedbackEvent], event_type: Option<&str>) -> AdaptationParameters {
        self.decide(&self.tally(events, event_type))
    }
}
