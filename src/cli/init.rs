//! Database initialization command

use hearthloop_core::{error::Result, ConnectionMode, LibsqlFeedbackStore};
use tracing::debug;

use super::helpers::get_db_path;

/// Handle database initialization command
pub async fn handle(database: Option<String>, global_db_path: Option<String>) -> Result<()> {
    debug!("Initializing database...");

    let db_path = get_db_path(database.or(global_db_path));
    debug!("Database path: {}", db_path);

    // Creates the parent directory and schema if missing
    let _store = LibsqlFeedbackStore::new(ConnectionMode::Local(db_path.clone())).await?;

    println!("Database initialized: {}", db_path);
    Ok(())
}
