//! Shared helper functions for CLI commands

use hearthloop_core::{error::Result, AdaptationConfig, ConnectionMode, FeedbackEngine};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "HEARTHLOOP_DB_PATH";

/// Get the default database path under the platform data directory
pub fn get_default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearthloop")
        .join("feedback.db")
}

/// Get the database path from CLI arg, env var, or default
pub fn get_db_path(cli_path: Option<String>) -> String {
    cli_path
        .or_else(|| std::env::var(DB_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| get_default_db_path().to_string_lossy().to_string())
}

/// Load configuration from the optional file plus environment overrides
pub fn load_config(config_path: Option<&Path>) -> Result<AdaptationConfig> {
    AdaptationConfig::load(config_path)
}

/// Open the engine against the resolved database
pub async fn open_engine(
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<FeedbackEngine> {
    let db_path = get_db_path(global_db_path);
    debug!("Database path: {}", db_path);

    let config = load_config(config_path)?;
    FeedbackEngine::open(ConnectionMode::Local(db_path), config).await
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_path_wins() {
        assert_eq!(get_db_path(Some("/tmp/x.db".to_string())), "/tmp/x.db");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("calendar, school,,")), vec!["calendar", "school"]);
        assert!(split_list(None).is_empty());
    }
}
