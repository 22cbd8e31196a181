//! Aggregate feedback report command

use hearthloop_core::error::Result;
use std::path::Path;

use super::helpers::{open_engine, print_json};

/// Handle aggregate report command
pub async fn handle(
    days: i64,
    user: Option<String>,
    format: String,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let engine = open_engine(global_db_path, config_path).await?;
    let report = engine.aggregates().compute_recent(days, user.as_deref()).await?;

    if format == "json" {
        return print_json(&report);
    }

    let b = &report.breakdown;
    println!(
        "Feedback over the last {} days ({} events scanned)",
        days, report.events_scanned
    );
    println!();
    println!("Explicit ratings: {}", b.total);
    println!(
        "  Helpful {}%  Great {}%  Not helpful {}%  Confusing {}%  Incorrect {}%",
        b.helpful, b.great, b.not_helpful, b.confusing, b.incorrect
    );

    if !report.daily.is_empty() {
        println!();
        println!("By day:");
        for day in &report.daily {
            println!(
                "  {}  total {:>3}  positive {:>3}  negative {:>3}  great {:>3}",
                day.date, day.total, day.positive, day.negative, day.great
            );
        }
    }

    if !report.top_issues.is_empty() {
        println!();
        println!("Top issues:");
        for issue in &report.top_issues {
            println!("  {:>3}  {}", issue.count, issue.issue);
        }
    }

    if !report.suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for s in &report.suggestions {
            println!("  [{}] ({}) {}", s.category, s.confidence, s.suggestion);
        }
    }
    Ok(())
}
