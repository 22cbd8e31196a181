//! Hearthloop - feedback-driven conversation adaptation
//!
//! Learns each user's preferred conversational style from explicit ratings
//! and implicit interaction signals, and feeds it back into question
//! generation. Also scores finished conversations and aggregates feedback
//! for admin reporting.
//!
//! # Architecture
//!
//! - **Types**: feedback events, typed payloads, adaptation parameters
//! - **Storage**: append-only `FeedbackStore` (in-memory, libSQL)
//! - **Feedback**: recorder and per-user TTL cache
//! - **Adaptation**: pattern analyzer, parameter provider, question adapter
//! - **Evaluation**: conversation scorer and aggregate metrics
//! - **Engine**: one-stop wiring of the above
//!
//! # Example
//!
//! ```ignore
//! use hearthloop_core::{AdaptationConfig, ConnectionMode, ExplicitKind, ExplicitPayload, FeedbackEngine};
//!
//! #[tokio::main]
//! async fn main() -> hearthloop_core::Result<()> {
//!     let engine = FeedbackEngine::open(
//!         ConnectionMode::Local("feedback.db".to_string()),
//!         AdaptationConfig::default(),
//!     )
//!     .await?;
//!
//!     engine
//!         .recorder()
//!         .record_explicit(
//!             "family-1",
//!             "conv-1",
//!             "msg-1",
//!             ExplicitKind::Helpful,
//!             ExplicitPayload::default().with_topics(["calendar"]),
//!         )
//!         .await?;
//!
//!     let adapter = engine.question_adapter("family-1", Some("doctor_appointment")).await;
//!     println!("{:?}", adapter.prompt_adaptations());
//!     Ok(())
//! }
//! ```

pub mod adaptation;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod feedback;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use adaptation::{
    AdaptationParameterProvider, PatternAnalyzer, Priority, Question, QuestionAdapter,
};
pub use config::{AdaptationConfig, CacheConfig, ReportingConfig, Thresholds};
pub use engine::FeedbackEngine;
pub use error::{HearthloopError, Result};
pub use evaluation::{
    AggregateMetricsComputer, AggregateReport, ConversationScore, ConversationScorer,
};
pub use feedback::{FeedbackCache, FeedbackRecorder};
pub use storage::{ConnectionMode, FeedbackStore, InMemoryFeedbackStore, LibsqlFeedbackStore};
pub use types::{
    AdaptationParameters, DetailLevel, ExplicitKind, ExplicitPayload, FeedbackEvent,
    FeedbackKind, FeedbackSource, ImplicitKind, ImplicitPayload, QuestionCount, QuestionFeedback,
    SortOrder,
};
