//! Conversation scoring command

use hearthloop_core::error::Result;
use std::path::Path;

use super::helpers::{open_engine, print_json};

/// Handle conversation scoring command
pub async fn handle(
    conversation: String,
    format: String,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let engine = open_engine(global_db_path, config_path).await?;
    let score = engine.scorer().try_score(&conversation).await?;

    if format == "json" {
        return print_json(&score);
    }

    println!("Conversation {}", conversation);
    println!("  Helpfulness: {:>3}", score.helpfulness);
    println!("  Clarity:     {:>3}", score.clarity);
    println!("  Accuracy:    {:>3}", score.accuracy);
    println!("  Efficiency:  {:>3}", score.efficiency);
    if !score.insights.is_empty() {
        println!();
        println!("Insights:");
        for insight in &score.insights {
            println!("  • {}", insight);
        }
    }
    Ok(())
}
