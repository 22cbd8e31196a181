//! Feedback recording commands

use clap::Args;
use hearthloop_core::{
    error::Result, ExplicitKind, ExplicitPayload, ImplicitKind, ImplicitPayload, QuestionFeedback,
};
use std::path::Path;
use tracing::debug;

use super::helpers::{open_engine, split_list};

/// Identifiers shared by every recording
#[derive(Args, Debug)]
pub struct Target {
    /// User (family) id
    #[arg(short, long)]
    pub user: String,

    /// Conversation id
    #[arg(short, long)]
    pub conversation: String,

    /// Conversational context, e.g. doctor_appointment
    #[arg(long)]
    pub event_type: Option<String>,

    /// Free-text comment
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExplicitArgs {
    #[command(flatten)]
    pub target: Target,

    /// Rated message id
    #[arg(short, long)]
    pub message: String,

    /// helpful|not_helpful|confusing|incorrect|great
    #[arg(short, long)]
    pub kind: String,

    /// Comma-separated topic tags
    #[arg(long)]
    pub topics: Option<String>,

    #[arg(long)]
    pub too_many_questions: bool,

    #[arg(long)]
    pub too_few_questions: bool,

    #[arg(long)]
    pub too_detailed: bool,

    #[arg(long)]
    pub not_detailed_enough: bool,
}

#[derive(Args, Debug)]
pub struct ImplicitArgs {
    #[command(flatten)]
    pub target: Target,

    /// Message the action relates to
    #[arg(short, long)]
    pub message: String,

    /// accepted_suggestion|rejected_suggestion|modified_suggestion|ignored_message|asked_followup|corrected_info
    #[arg(short, long)]
    pub kind: String,

    /// Suggestion the action refers to
    #[arg(long)]
    pub suggestion_id: Option<String>,

    /// What was modified or corrected
    #[arg(long)]
    pub detail: Option<String>,
}

#[derive(Args, Debug)]
pub struct QuestionArgs {
    #[command(flatten)]
    pub target: Target,

    /// Question id
    #[arg(short, long)]
    pub question: String,

    /// Whether the question was helpful
    #[arg(long)]
    pub helpful: Option<bool>,

    /// The user skipped the question
    #[arg(long)]
    pub skipped: bool,
}

/// Handle explicit rating command
pub async fn handle_explicit(
    args: ExplicitArgs,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Parse before touching the database
    let kind: ExplicitKind = args.kind.parse()?;
    let payload = ExplicitPayload {
        comment: args.target.comment,
        too_many_questions: args.too_many_questions,
        too_few_questions: args.too_few_questions,
        too_detailed: args.too_detailed,
        not_detailed_enough: args.not_detailed_enough,
        topics: split_list(args.topics.as_deref()).into_iter().collect(),
        event_type: args.target.event_type,
    };
    debug!("Recording explicit {} with {:?}", kind, payload);

    let engine = open_engine(global_db_path, config_path).await?;
    let id = engine
        .recorder()
        .record_explicit(&args.target.user, &args.target.conversation, &args.message, kind, payload)
        .await?;

    println!("Recorded {} feedback: {}", kind, id);
    Ok(())
}

/// Handle implicit signal command
pub async fn handle_implicit(
    args: ImplicitArgs,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let kind: ImplicitKind = args.kind.parse()?;
    let payload = ImplicitPayload {
        comment: args.target.comment,
        event_type: args.target.event_type,
        suggestion_id: args.suggestion_id,
        detail: args.detail,
    };

    let engine = open_engine(global_db_path, config_path).await?;
    let id = engine
        .recorder()
        .record_implicit(&args.target.user, &args.target.conversation, &args.message, kind, payload)
        .await?;

    println!("Tracked {} signal: {}", kind, id);
    Ok(())
}

/// Handle question feedback command
pub async fn handle_question(
    args: QuestionArgs,
    global_db_path: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let feedback = QuestionFeedback {
        helpful: args.helpful,
        skipped: args.skipped,
        comment: args.target.comment,
        event_type: args.target.event_type,
    };

    let engine = open_engine(global_db_path, config_path).await?;
    let id = engine
        .recorder()
        .record_question_feedback(&args.target.user, &args.target.conversation, &args.question, feedback)
        .await?;

    println!("Recorded question feedback: {}", id);
    Ok(())
}
