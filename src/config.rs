//! Adaptation policy configuration
//!
//! Every threshold the analyzer, cache and reporting paths use lives here so
//! it can be tuned without code changes. Values load from:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `HEARTHLOOP__<SECTION>__<KEY>` environment variables

use crate::error::{HearthloopError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Prefix for environment overrides, e.g. `HEARTHLOOP__CACHE__MAX_USERS=8`
pub const ENV_PREFIX: &str = "HEARTHLOOP";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdaptationConfig {
    pub thresholds: Thresholds,
    pub cache: CacheConfig,
    pub reporting: ReportingConfig,
}

/// Decision thresholds for pattern analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Share of too-many (or too-few) signals required to change question count
    pub question_count_ratio: f64,

    /// Share of too-detailed (or not-detailed-enough) signals required to change detail level
    pub detail_level_ratio: f64,

    /// Share of positive (or negative) mentions required to focus (or avoid) a topic
    pub topic_ratio: f64,

    /// Minimum mentions before a topic is considered at all
    pub min_topic_mentions: usize,

    /// Mentions at which a reporting suggestion is labelled high confidence
    pub high_confidence_mentions: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            question_count_ratio: 0.6,
            detail_level_ratio: 0.7,
            topic_ratio: 0.7,
            min_topic_mentions: 3,
            high_confidence_mentions: 5,
        }
    }
}

/// Per-user feedback window cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age of a cached window before it is reloaded (seconds)
    #[serde(with = "serde_duration")]
    pub ttl: Duration,

    /// How far back a reload looks, in days
    pub window_days: i64,

    /// Maximum events held per user
    pub max_events: usize,

    /// Number of users cached at once. 1 keeps a single active user.
    pub max_users: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600), // 1 hour
            window_days: 30,
            max_events: 100,
            max_users: 1,
        }
    }
}

/// Admin reporting settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportingConfig {
    /// Maximum rows scanned by one aggregate computation
    pub row_limit: usize,

    /// Number of issue clusters returned
    pub top_issues: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            row_limit: 500,
            top_issues: 5,
        }
    }
}

// Custom serde module for Duration (serialize/deserialize as seconds)
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl AdaptationConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AdaptationConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Loading adaptation config from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: AdaptationConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Ratios below 0.5 would let both sides of a decision pass at once
        let ratios = [
            ("question_count_ratio", self.thresholds.question_count_ratio),
            ("detail_level_ratio", self.thresholds.detail_level_ratio),
            ("topic_ratio", self.thresholds.topic_ratio),
        ];
        for (name, value) in ratios {
            if !(0.5..1.0).contains(&value) {
                return Err(HearthloopError::InvalidConfig(format!(
                    "thresholds.{}: must be in [0.5, 1.0), got {}",
                    name, value
                )));
            }
        }

        if self.thresholds.min_topic_mentions == 0 {
            return Err(HearthloopError::InvalidConfig(
                "thresholds.min_topic_mentions: must be at least 1".to_string(),
            ));
        }

        if self.cache.window_days < 1 || self.cache.window_days > 3650 {
            return Err(HearthloopError::InvalidConfig(
                "cache.window_days: must be between 1 and 3650".to_string(),
            ));
        }

        if self.cache.max_events == 0 || self.cache.max_events > 10_000 {
            return Err(HearthloopError::InvalidConfig(
                "cache.max_events: must be between 1 and 10000".to_string(),
            ));
        }

        if self.cache.max_users == 0 {
            return Err(HearthloopError::InvalidConfig(
                "cache.max_users: must be at least 1".to_string(),
            ));
        }

        if self.reporting.row_limit == 0 {
            return Err(HearthloopError::InvalidConfig(
                "reporting.row_limit: must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| HearthloopError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
