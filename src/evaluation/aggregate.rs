//! Cross-user feedback statistics for admin reporting.
//!
//! Computed over a bounded, newest-first window of events:
//! - Percentage breakdown by explicit kind
//! - Per-day totals with positive/negative counts
//! - Comment clustering against a fixed keyword table
//! - Corpus-wide adaptation suggestions

use crate::adaptation::PatternAnalyzer;
use crate::config::ReportingConfig;
use crate::error::{HearthloopError, Result};
use crate::storage::FeedbackStore;
use crate::types::{DetailLevel, ExplicitKind, FeedbackEvent, FeedbackKind, QuestionCount};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Comment categories, checked in order; the first keyword hit wins
const ISSUE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Too many questions",
        &["too many questions", "too much questioning", "asking too much", "too many follow ups"],
    ),
    (
        "Confusing responses",
        &["confusing", "unclear", "don't understand", "hard to follow"],
    ),
    (
        "Incorrect information",
        &["wrong", "incorrect", "not right", "inaccurate", "mistake", "error"],
    ),
    (
        "Calendar issues",
        &["calendar", "schedule", "appointment", "event", "time", "date"],
    ),
    (
        "School events",
        &["school", "class", "teacher", "homework", "assignment"],
    ),
    (
        "Medical appointments",
        &["doctor", "medical", "health", "appointment", "prescription"],
    ),
    (
        "Not detailed enough",
        &["more detail", "more information", "not enough detail", "too vague"],
    ),
    (
        "Too detailed",
        &["too detailed", "too much detail", "too much information"],
    ),
];

const OTHER_ISSUES: &str = "Other issues";

/// Share of each explicit kind, as rounded percentages of `total`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindBreakdown {
    pub total: usize,
    pub helpful: u32,
    pub not_helpful: u32,
    pub confusing: u32,
    pub incorrect: u32,
    pub great: u32,
}

/// Feedback volume for one UTC day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyFeedback {
    pub date: NaiveDate,
    pub total: usize,
    /// Helpful and Great
    pub positive: usize,
    /// NotHelpful, Confusing and Incorrect
    pub negative: usize,
    pub great: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    QuestionCount,
    DetailLevel,
    TopicFocus,
    TopicImprovement,
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionCategory::QuestionCount => write!(f, "Question Count"),
            SuggestionCategory::DetailLevel => write!(f, "Detail Level"),
            SuggestionCategory::TopicFocus => write!(f, "Topic Focus"),
            SuggestionCategory::TopicImprovement => write!(f, "Topic Improvement"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdaptationSuggestion {
    pub category: SuggestionCategory,
    pub suggestion: String,
    pub confidence: Confidence,
}

/// Everything the admin report shows for one window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateReport {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    /// Rows scanned, at most the configured row limit
    pub events_scanned: usize,
    pub breakdown: KindBreakdown,
    pub daily: Vec<DailyFeedback>,
    pub top_issues: Vec<IssueCount>,
    pub suggestions: Vec<AdaptationSuggestion>,
}

/// Computes aggregate reports straight from the store
pub struct AggregateMetricsComputer {
    store: Arc<dyn FeedbackStore>,
    analyzer: PatternAnalyzer,
    config: ReportingConfig,
}

impl AggregateMetricsComputer {
    pub fn new(store: Arc<dyn FeedbackStore>, analyzer: PatternAnalyzer, config: ReportingConfig) -> Self {
        Self {
            store,
            analyzer,
            config,
        }
    }

    /// Report over `[since, until]`, optionally for a single user
    pub async fn compute(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        user_id: Option<&str>,
    ) -> Result<AggregateReport> {
        if since > until {
            return Err(HearthloopError::Validation(format!(
                "report window starts after it ends ({} > {})",
                since, until
            )));
        }

        let events = self
            .store
            .query_range(since, until, self.config.row_limit, user_id)
            .await?;
        debug!("Aggregating {} feedback events", events.len());

        let report = AggregateReport {
            since,
            until,
            events_scanned: events.len(),
            breakdown: kind_breakdown(&events),
            daily: daily_feedback(&events),
            top_issues: top_issues(&events, self.config.top_issues),
            suggestions: self.suggestions(&events),
        };

        info!(
            "Aggregate report: {} events, {} suggestions",
            report.events_scanned,
            report.suggestions.len()
        );
        Ok(report)
    }

    /// Report over the last `days` days
    pub async fn compute_recent(&self, days: i64, user_id: Option<&str>) -> Result<AggregateReport> {
        if days <= 0 {
            return Err(HearthloopError::Validation(format!(
                "days must be positive, got {}",
                days
            )));
        }
        let until = Utc::now();
        let since = Duration::try_days(days)
            .and_then(|window| until.checked_sub_signed(window))
            .ok_or_else(|| HearthloopError::Validation(format!("days out of range: {}", days)))?;
        self.compute(since, until, user_id).await
    }

    /// Corpus-wide suggestions from question/detail flags and topic mentions
    pub fn suggestions(&self, events: &[FeedbackEvent]) -> Vec<AdaptationSuggestion> {
        let thresholds = self.analyzer.thresholds();
        let confidence_for = |signals: usize| {
            if signals >= thresholds.high_confidence_mentions {
                Confidence::High
            } else {
                Confidence::Medium
            }
        };

        let tally = self.analyzer.tally(events, None);
        let decided = self.analyzer.decide(&tally);
        let mut suggestions = Vec::new();

        let question_text = match decided.question_count {
            QuestionCount::Fewer => Some(
                "Reduce the number of follow-up questions. Users find the current questioning excessive.",
            ),
            QuestionCount::More => {
                Some("Increase the number of clarifying questions. Users want more guidance.")
            }
            QuestionCount::Default => None,
        };
        if let Some(text) = question_text {
            suggestions.push(AdaptationSuggestion {
                category: SuggestionCategory::QuestionCount,
                suggestion: text.to_string(),
                confidence: confidence_for(tally.question_signals()),
            });
        }

        let detail_text = match decided.detail_level {
            DetailLevel::Simpler => {
                Some("Simplify responses. Users find the current level of detail overwhelming.")
            }
            DetailLevel::Detailed => Some(
                "Provide more comprehensive information. Users want more details in responses.",
            ),
            DetailLevel::Default => None,
        };
        if let Some(text) = detail_text {
            suggestions.push(AdaptationSuggestion {
                category: SuggestionCategory::DetailLevel,
                suggestion: text.to_string(),
                confidence: confidence_for(tally.detail_signals()),
            });
        }

        // Every rating counts here, Incorrect included
        let mut topics: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
        for event in events {
            let FeedbackKind::Explicit { kind, payload } = &event.kind else {
                continue;
            };
            for topic in &payload.topics {
                let (total, positive, negative) = topics.entry(topic.as_str()).or_default();
                *total += 1;
                if kind.is_positive() {
                    *positive += 1;
                } else {
                    *negative += 1;
                }
            }
        }

        for (topic, (total, positive, negative)) in topics {
            if total < thresholds.min_topic_mentions {
                continue;
            }
            let positive_ratio = positive as f64 / total as f64;
            let negative_ratio = negative as f64 / total as f64;

            let suggestion = if positive_ratio > thresholds.topic_ratio {
                AdaptationSuggestion {
                    category: SuggestionCategory::TopicFocus,
                    suggestion: format!(
                        "Emphasize \"{}\" topics. Users find this content particularly helpful.",
                        topic
                    ),
                    confidence: confidence_for(total),
                }
            } else if negative_ratio > thresholds.topic_ratio {
                AdaptationSuggestion {
                    category: SuggestionCategory::TopicImprovement,
                    suggestion: format!(
                        "Improve responses about \"{}\". Users are consistently dissatisfied with this content.",
                        topic
                    ),
                    confidence: confidence_for(total),
                }
            } else {
                continue;
            };
            suggestions.push(suggestion);
        }

        suggestions
    }
}

fn kind_breakdown(events: &[FeedbackEvent]) -> KindBreakdown {
    let mut counts: HashMap<ExplicitKind, usize> = HashMap::new();
    for kind in events.iter().filter_map(FeedbackEvent::explicit_kind) {
        *counts.entry(kind).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    let share = |kind: ExplicitKind| -> u32 {
        if total == 0 {
            return 0;
        }
        let count = counts.get(&kind).copied().unwrap_or(0);
        (100.0 * count as f64 / total as f64).round() as u32
    };

    KindBreakdown {
        total,
        helpful: share(ExplicitKind::Helpful),
        not_helpful: share(ExplicitKind::NotHelpful),
        confusing: share(ExplicitKind::Confusing),
        incorrect: share(ExplicitKind::Incorrect),
        great: share(ExplicitKind::Great),
    }
}

fn daily_feedback(events: &[FeedbackEvent]) -> Vec<DailyFeedback> {
    let mut days: BTreeMap<NaiveDate, DailyFeedback> = BTreeMap::new();
    for event in events {
        let date = event.timestamp.date_naive();
        let day = days.entry(date).or_insert_with(|| DailyFeedback {
            date,
            total: 0,
            positive: 0,
            negative: 0,
            great: 0,
        });

        day.total += 1;
        match event.explicit_kind() {
            Some(ExplicitKind::Helpful) => day.positive += 1,
            Some(ExplicitKind::Great) => {
                day.great += 1;
                day.positive += 1;
            }
            Some(ExplicitKind::NotHelpful | ExplicitKind::Confusing | ExplicitKind::Incorrect) => {
                day.negative += 1
            }
            None => {}
        }
    }
    days.into_values().collect()
}

/// Category for one comment
pub fn classify_comment(comment: &str) -> &'static str {
    let lowered = comment.to_lowercase();
    ISSUE_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_ISSUES)
}

fn top_issues(events: &[FeedbackEvent], limit: usize) -> Vec<IssueCount> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for comment in events.iter().filter_map(FeedbackEvent::comment) {
        if comment.trim().is_empty() {
            continue;
        }
        *counts.entry(classify_comment(comment)).or_default() += 1;
    }

    // Table order first so the stable sort breaks ties by it
    let mut issues: Vec<IssueCount> = ISSUE_CATEGORIES
        .iter()
        .map(|(category, _)| *category)
        .chain(std::iter::once(OTHER_ISSUES))
        .filter_map(|category| {
            counts.get(category).map(|&count| IssueCount {
                issue: category.to_string(),
                count,
            })
        })
        .collect();

    issues.sort_by(|a, b| b.count.cmp(&a.count));
    issues.truncate(limit);
    issues
}
