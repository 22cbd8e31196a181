//! Hearthloop - feedback-driven conversation adaptation
//!
//! Command-line entry point for recording feedback, inspecting adaptation
//! parameters, adapting question lists, scoring conversations and
//! producing aggregate reports against a local libSQL database.

mod cli;

use clap::{Parser, Subcommand};
use hearthloop_core::error::Result;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

use cli::record::{ExplicitArgs, ImplicitArgs, QuestionArgs};

#[derive(Parser)]
#[command(name = "hearthloop")]
#[command(about = "Feedback-driven conversation adaptation engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path (falls back to HEARTHLOOP_DB_PATH, then the platform data dir)
    #[arg(long, global = true)]
    db_path: Option<String>,

    /// Configuration file (TOML); HEARTHLOOP__SECTION__KEY variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the feedback database
    Init {
        /// Database path (overrides --db-path)
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Record feedback
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Show adaptation parameters for a user
    Params {
        /// User (family) id
        user: String,

        /// Restrict to one conversational context
        #[arg(long)]
        event_type: Option<String>,

        /// Output format (text|json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Adapt a JSON list of candidate questions for a user
    Adapt {
        /// User (family) id
        user: String,

        /// JSON file holding an array of questions
        #[arg(short, long)]
        questions: PathBuf,

        /// Active conversational context
        #[arg(long)]
        event_type: Option<String>,
    },

    /// Score a conversation from its feedback
    Score {
        /// Conversation id
        conversation: String,

        /// Output format (text|json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Aggregate feedback report
    Report {
        /// Days to look back
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// Restrict to one user
        #[arg(short, long)]
        user: Option<String>,

        /// Output format (text|json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// Direct rating of an assistant message
    Explicit(ExplicitArgs),

    /// Signal inferred from a user action
    Implicit(ImplicitArgs),

    /// Feedback on one generated question
    Question(QuestionArgs),
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration to a file
    Init {
        /// Output path
        #[arg(short, long, default_value = "hearthloop.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Our crates at the requested level, libSQL internals only on warnings
    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "hearthloop={},hearthloop_core={},libsql=warn",
        level, level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Hearthloop v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { database } => cli::init::handle(database, cli.db_path).await,
        Commands::Record { command } => match command {
            RecordCommands::Explicit(args) => {
                cli::record::handle_explicit(args, cli.db_path, config_path).await
            }
            RecordCommands::Implicit(args) => {
                cli::record::handle_implicit(args, cli.db_path, config_path).await
            }
            RecordCommands::Question(args) => {
                cli::record::handle_question(args, cli.db_path, config_path).await
            }
        },
        Commands::Params {
            user,
            event_type,
            format,
        } => cli::params::handle(user, event_type, format, cli.db_path, config_path).await,
        Commands::Adapt {
            user,
            questions,
            event_type,
        } => cli::adapt::handle(user, questions, event_type, cli.db_path, config_path).await,
        Commands::Score {
            conversation,
            format,
        } => cli::score::handle(conversation, format, cli.db_path, config_path).await,
        Commands::Report { days, user, format } => {
            cli::report::handle(days, user, format, cli.db_path, config_path).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::config::show(config_path),
            ConfigAction::Init { output, force } => cli::config::init(output, force),
            ConfigAction::Validate { path } => cli::config::validate(path),
        },
    }
}
