//! Evaluation of recorded feedback.
//!
//! - **ConversationScorer**: helpfulness, clarity, accuracy and efficiency
//!   for one conversation, plus canned insights
//! - **AggregateMetricsComputer**: cross-user statistics for admin reporting
//!
//! # Usage
//!
//! ```rust,no_run
//! use hearthloop_core::evaluation::ConversationScorer;
//! use hearthloop_core::storage::InMemoryFeedbackStore;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let scorer = ConversationScorer::new(Arc::new(InMemoryFeedbackStore::new()));
//! let score = scorer.score("conversation-123").await;
//! for insight in &score.insights {
//!     println!("{}", insight);
//! }
//! # }
//! ```

pub mod aggregate;
pub mod scorer;

pub use aggregate::{
    AdaptationSuggestion, AggregateMetricsComputer, AggregateReport, Confidence, DailyFeedback,
    IssueCount, KindBreakdown, SuggestionCategory,
};
pub use scorer::{ConversationScore, ConversationScorer, ConversationTally};
