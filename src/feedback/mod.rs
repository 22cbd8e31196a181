//! Feedback capture: recording events and caching each user's recent window.

pub mod cache;
pub mod recorder;

pub use cache::FeedbackCache;
pub use recorder::FeedbackRecorder;
