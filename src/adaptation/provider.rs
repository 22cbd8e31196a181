//! Adaptation parameter lookup for the chat flow.
//!
//! Adaptation is a soft enhancement: every failure degrades to the
//! all-default parameters instead of reaching the conversation.

use crate::adaptation::analyzer::PatternAnalyzer;
use crate::error::Result;
use crate::feedback::FeedbackCache;
use crate::types::AdaptationParameters;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves per-user adaptation parameters from the feedback cache
pub struct AdaptationParameterProvider {
    cache: Arc<FeedbackCache>,
    analyzer: PatternAnalyzer,
}

impl AdaptationParameterProvider {
    pub fn new(cache: Arc<FeedbackCache>, analyzer: PatternAnalyzer) -> Self {
        Self { cache, analyzer }
    }

    /// Parameters for `user_id`, optionally scoped to one conversational context.
    /// Never fails; errors are logged and yield defaults.
    pub async fn get_parameters(&self, user_id: &str, event_type: Option<&str>) -> AdaptationParameters {
        match self.try_get_parameters(user_id, event_type).await {
            Ok(params) => params,
            Err(e) => {
                warn!("Failed to get adaptation parameters for {}: {}", user_id, e);
                AdaptationParameters::default()
            }
        }
    }

    /// Same as `get_parameters` but surfaces store failures
    pub async fn try_get_parameters(
        &self,
        user_id: &str,
        event_type: Option<&str>,
    ) -> Result<AdaptationParameters> {
        let events = self.cache.ensure_fresh(user_id).await?;
        let params = self.analyzer.analyze(&events, event_type);

        debug!(
            "Adaptation for {} (event_type={:?}): {:?}",
            user_id, event_type, params
        );
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::storage::test_utils::{flagged, CountingStore};
    use crate::types::{ExplicitKind, QuestionCount};

    fn provider_over(store: Arc<CountingStore>) -> AdaptationParameterProvider {
        let cache = Arc::new(FeedbackCache::new(store, CacheConfig::default()));
        AdaptationParameterProvider::new(cache, PatternAnalyzer::default())
    }

    #[tokio::test]
    async fn test_new_user_gets_defaults() {
        let provider = provider_over(Arc::new(CountingStore::default()));
        let params = provider.get_parameters("new-user", None).await;
        assert!(params.is_default());
    }

    #[tokio::test]
    async fn test_store_failure_yields_defaults() {
        let store = Arc::new(CountingStore::with_events(vec![
            flagged("u1", ExplicitKind::Helpful, |p| p.too_many_questions = true),
        ]));
        store.set_fail_reads(true);
        let provider = provider_over(store);

        assert!(provider.try_get_parameters("u1", None).await.is_err());
        assert!(provider.get_parameters("u1", None).await.is_default());
    }

    #[tokio::test]
    async fn test_unrepresentable_window_yields_defaults() {
        let store = Arc::new(CountingStore::with_events(vec![
            flagged("u1", ExplicitKind::Helpful, |p| p.too_many_questions = true),
        ]));
        let config = CacheConfig {
            window_days: 100_000_000,
            ..CacheConfig::default()
        };
        let cache = Arc::new(FeedbackCache::new(store, config));
        let provider = AdaptationParameterProvider::new(cache, PatternAnalyzer::default());

        assert!(provider.try_get_parameters("u1", None).await.is_err());
        assert!(provider.get_parameters("u1", None).await.is_default());
    }

    #[tokio::test]
    async fn test_parameters_reflect_user_feedback() {
        let store = Arc::new(CountingStore::with_events(vec![
            flagged("u1", ExplicitKind::Helpful, |p| p.too_many_questions = true),
            flagged("u1", ExplicitKind::Helpful, |p| p.too_many_questions = true),
            flagged("u2", ExplicitKind::Helpful, |p| p.too_few_questions = true),
        ]));
        let provider = provider_over(store);

        let u1 = provider.get_parameters("u1", None).await;
        assert_eq!(u1.question_count, QuestionCount::Fewer);

        let u2 = provider.get_parameters("u2", None).await;
        assert_eq!(u2.question_count, QuestionCount::More);
    }
}
