//! Question adaptation command

use anyhow::Context;
use hearthloop_core::{error::Result, Question};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::helpers::{open_engine, print_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdaptedOutput {
    questions: Vec<Question>,
    prompt_adaptations: Vec<String>,
}

/// Handle question adaptation command
///
/// Reads a JSON array of questions and prints the adapted list together
/// with the prompt directives.
pub async fn handle(
    user: String,
    questions: PathBuf,
    event_type: Option<String>,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let candidates = read_questions(&questions)?;
    debug!("Loaded {} candidate questions", candidates.len());

    let engine = open_engine(global_db_path, config_path).await?;
    let adapter = engine.question_adapter(&user, event_type.as_deref()).await;

    print_json(&AdaptedOutput {
        questions: adapter.adapt(&candidates, event_type.as_deref()),
        prompt_adaptations: adapter.prompt_adaptations(),
    })
}

/// Load the candidate questions from a JSON file
fn read_questions(path: &Path) -> Result<Vec<Question>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions file {}", path.display()))?;
    let candidates = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse questions in {}", path.display()))?;
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthloop_core::HearthloopError;

    #[test]
    fn test_read_questions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(
            &path,
            r#"[{"id": "when", "text": "When is it?", "priority": "high"}]"#,
        )
        .unwrap();

        let questions = read_questions(&path).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "when");
    }

    #[test]
    fn test_read_questions_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        match read_questions(&missing) {
            Err(HearthloopError::Other(msg)) => assert!(msg.contains("missing.json")),
            other => panic!("expected Other error, got {:?}", other.map(|q| q.len())),
        }

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "not json").unwrap();
        match read_questions(&garbled) {
            Err(HearthloopError::Other(msg)) => assert!(msg.contains("Failed to parse questions")),
            other => panic!("expected Other error, got {:?}", other.map(|q| q.len())),
        }
    }
}
