//! Adaptation parameter lookup command

use hearthloop_core::error::Result;
use std::path::Path;

use super::helpers::{open_engine, print_json};

/// Handle parameter lookup command
pub async fn handle(
    user: String,
    event_type: Option<String>,
    format: String,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let engine = open_engine(global_db_path, config_path).await?;
    let params = engine.parameters(&user, event_type.as_deref()).await;

    if format == "json" {
        return print_json(&params);
    }

    println!("Adaptation parameters for {}", user);
    if let Some(et) = &event_type {
        println!("  Event type:     {}", et);
    }
    println!("  Question count: {:?}", params.question_count);
    println!("  Detail level:   {:?}", params.detail_level);
    if !params.focus_areas.is_empty() {
        let focus: Vec<&str> = params.focus_areas.iter().map(String::as_str).collect();
        println!("  Focus areas:    {}", focus.join(", "));
    }
    if !params.avoid_areas.is_empty() {
        let avoid: Vec<&str> = params.avoid_areas.iter().map(String::as_str).collect();
        println!("  Avoid areas:    {}", avoid.join(", "));
    }
    if params.is_default() {
        println!("  (no adaptation yet)");
    }
    Ok(())
}
