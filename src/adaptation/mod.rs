//! Turning recorded feedback into conversational adaptations.
//!
//! - `analyzer`: pure event list to `AdaptationParameters`
//! - `provider`: cache-backed per-user lookup that never fails
//! - `questions`: applies parameters to candidate questions and prompts

pub mod analyzer;
pub mod provider;
pub mod questions;

pub use analyzer::{FeedbackTally, PatternAnalyzer, TopicInterest};
pub use provider::AdaptationParameterProvider;
pub use questions::{Priority, Question, QuestionAdapter};
