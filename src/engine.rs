//! Wiring for the whole feedback loop.
//!
//! `FeedbackEngine` builds the recorder, cache, parameter provider, scorer and
//! aggregate computer around one shared store and one configuration.

use crate::adaptation::{AdaptationParameterProvider, PatternAnalyzer, QuestionAdapter};
use crate::config::AdaptationConfig;
use crate::error::Result;
use crate::evaluation::{AggregateMetricsComputer, ConversationScorer};
use crate::feedback::{FeedbackCache, FeedbackRecorder};
use crate::storage::{ConnectionMode, FeedbackStore, LibsqlFeedbackStore};
use crate::types::AdaptationParameters;
use std::sync::Arc;
use tracing::info;

pub struct FeedbackEngine {
    config: AdaptationConfig,
    store: Arc<dyn FeedbackStore>,
    cache: Arc<FeedbackCache>,
    recorder: FeedbackRecorder,
    provider: AdaptationParameterProvider,
    scorer: ConversationScorer,
    aggregates: AggregateMetricsComputer,
}

impl FeedbackEngine {
    /// Build an engine over an existing store. Fails on invalid configuration.
    pub fn new(store: Arc<dyn FeedbackStore>, config: AdaptationConfig) -> Result<Self> {
        config.validate()?;

        let analyzer = PatternAnalyzer::new(config.thresholds.clone());
        let cache = Arc::new(FeedbackCache::new(store.clone(), config.cache.clone()));
        let recorder = FeedbackRecorder::new(store.clone()).with_cache(cache.clone());
        let provider = AdaptationParameterProvider::new(cache.clone(), analyzer.clone());
        let scorer = ConversationScorer::new(store.clone());
        let aggregates =
            AggregateMetricsComputer::new(store.clone(), analyzer, config.reporting.clone());

        Ok(Self {
            config,
            store,
            cache,
            recorder,
            provider,
            scorer,
            aggregates,
        })
    }

    /// Open a libSQL-backed engine
    pub async fn open(mode: ConnectionMode, config: AdaptationConfig) -> Result<Self> {
        let store = LibsqlFeedbackStore::new(mode).await?;
        info!("Feedback engine opened");
        Self::new(Arc::new(store), config)
    }

    pub fn config(&self) -> &AdaptationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn FeedbackStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<FeedbackCache> {
        &self.cache
    }

    pub fn recorder(&self) -> &FeedbackRecorder {
        &self.recorder
    }

    pub fn provider(&self) -> &AdaptationParameterProvider {
        &self.provider
    }

    pub fn scorer(&self) -> &ConversationScorer {
        &self.scorer
    }

    pub fn aggregates(&self) -> &AggregateMetricsComputer {
        &self.aggregates
    }

    /// Shorthand for `provider().get_parameters`
    pub async fn parameters(&self, user_id: &str, event_type: Option<&str>) -> AdaptationParameters {
        self.provider.get_parameters(user_id, event_type).await
    }

    /// Question adapter primed with the user's current parameters
    pub async fn question_adapter(&self, user_id: &str, event_type: Option<&str>) -> QuestionAdapter {
        QuestionAdapter::new(self.parameters(user_id, event_type).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::storage::InMemoryFeedbackStore;
    use crate::types::{ExplicitKind, ExplicitPayload, QuestionCount};

    #[test]
    fn test_invalid_config_rejected() {
        let config = AdaptationConfig {
            thresholds: Thresholds {
                question_count_ratio: 0.2,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = FeedbackEngine::new(Arc::new(InMemoryFeedbackStore::new()), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_recorded_feedback_changes_parameters() {
        let engine =
            FeedbackEngine::new(Arc::new(InMemoryFeedbackStore::new()), AdaptationConfig::default())
                .unwrap();

        assert!(engine.parameters("u1", None).await.is_default());

        let payload = ExplicitPayload {
            too_many_questions: true,
            ..Default::default()
        };
        for i in 0..3 {
            engine
                .recorder()
                .record_explicit("u1", "c1", &format!("m{}", i), ExplicitKind::Helpful, payload.clone())
                .await
                .unwrap();
        }

        // Appended to the cached window without waiting for the TTL
        let params = engine.parameters("u1", None).await;
        assert_eq!(params.question_count, QuestionCount::Fewer);

        let adapter = engine.question_adapter("u1", None).await;
        assert_eq!(adapter.parameters().question_count, QuestionCount::Fewer);
    }

    #[tokio::test]
    async fn test_open_in_memory_libsql() {
        let engine = FeedbackEngine::open(ConnectionMode::InMemory, AdaptationConfig::default())
            .await
            .unwrap();
        let score = engine.scorer().score("none").await;
        assert_eq!(score.helpfulness, 0);
    }
}
