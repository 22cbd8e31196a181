//! LibSQL feedback store implementation
//!
//! Persists feedback events to a single append-only `feedback_events` table.
//! The typed payload is stored as JSON alongside flat columns used for
//! filtering, plus a `schema_version` so older binaries refuse rows they
//! cannot interpret.

use crate::error::{HearthloopError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, FeedbackKind, SortOrder, PAYLOAD_SCHEMA_VERSION};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection, Database};
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS feedback_events (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        conversation_id TEXT NOT NULL,
        message_id TEXT NOT NULL,
        source TEXT NOT NULL,
        kind TEXT NOT NULL,
        payload TEXT NOT NULL,
        schema_version INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feedback_user_time ON feedback_events(user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_conversation ON feedback_events(conversation_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_time ON feedback_events(created_at)",
];

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, conversation_id, message_id, payload, schema_version, created_at FROM feedback_events";

/// Database connection mode
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing)
    InMemory,
}

/// LibSQL-backed feedback store
pub struct LibsqlFeedbackStore {
    _db: Database,
    // One long-lived connection: libSQL's :memory: mode gives every
    // connection its own database
    conn: Connection,
}

impl LibsqlFeedbackStore {
    /// Open (creating if needed) the database and ensure the schema exists
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        let db = match mode {
            ConnectionMode::Local(ref path) => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            HearthloopError::Storage(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }

                Builder::new_local(path).build().await.map_err(|e| {
                    HearthloopError::Storage(format!("Failed to create local database: {}", e))
                })?
            }
            ConnectionMode::InMemory => Builder::new_local(":memory:").build().await.map_err(|e| {
                HearthloopError::Storage(format!("Failed to create in-memory database: {}", e))
            })?,
        };

        let conn = db
            .connect()
            .map_err(|e| HearthloopError::Storage(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.init_schema().await?;

        info!("Feedback store ready ({:?})", mode);
        Ok(store)
    }

    /// Create the feedback table and indexes. Safe to call repeatedly.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            self.conn
                .execute(statement, params![])
                .await
                .map_err(|e| HearthloopError::Storage(format!("Failed to initialize schema: {}", e)))?;
        }

        debug!("Feedback schema initialized");
        Ok(())
    }

    async fn collect_rows(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<Vec<FeedbackEvent>> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| HearthloopError::Storage(format!("Failed to query feedback: {}", e)))?;

        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| HearthloopError::Storage(format!("Failed to read row: {}", e)))?
        {
            events.push(row_to_event(&row)?);
        }

        Ok(events)
    }
}

/// Convert database row to FeedbackEvent
fn row_to_event(row: &libsql::Row) -> Result<FeedbackEvent> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let conversation_id: String = row.get(2)?;
    let message_id: String = row.get(3)?;
    let payload: String = row.get(4)?;
    let schema_version: i64 = row.get(5)?;
    let created_at: i64 = row.get(6)?;

    if schema_version > PAYLOAD_SCHEMA_VERSION as i64 {
        return Err(HearthloopError::Storage(format!(
            "Feedback {} uses payload schema v{}, this build reads up to v{}",
            id, schema_version, PAYLOAD_SCHEMA_VERSION
        )));
    }

    let kind: FeedbackKind = serde_json::from_str(&payload)?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(created_at).ok_or_else(|| {
        HearthloopError::Storage(format!("Invalid timestamp {} on feedback {}", created_at, id))
    })?;

    Ok(FeedbackEvent {
        id,
        user_id,
        conversation_id,
        message_id,
        timestamp,
        kind,
    })
}

#[async_trait]
impl FeedbackStore for LibsqlFeedbackStore {
    async fn append(&self, event: &FeedbackEvent) -> Result<String> {
        let payload = serde_json::to_string(&event.kind)?;

        self.conn
            .execute(
                r#"
                INSERT INTO feedback_events (
                    id, user_id, conversation_id, message_id,
                    source, kind, payload, schema_version, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    event.id.clone(),
                    event.user_id.clone(),
                    event.conversation_id.clone(),
                    event.message_id.clone(),
                    event.source().to_string(),
                    event.kind_label(),
                    payload,
                    PAYLOAD_SCHEMA_VERSION as i64,
                    event.timestamp.timestamp_millis(),
                ],
            )
            .await
            .map_err(|e| HearthloopError::Storage(format!("Failed to append feedback: {}", e)))?;

        debug!("Appended feedback {} ({})", event.id, event.kind_label());
        Ok(event.id.clone())
    }

    async fn query_by_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<FeedbackEvent>> {
        let direction = match order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let sql = format!(
            "{} WHERE user_id = ? AND created_at >= ? ORDER BY created_at {} LIMIT ?",
            SELECT_COLUMNS, direction
        );

        self.collect_rows(
            &sql,
            params![user_id, since.timestamp_millis(), limit as i64],
        )
        .await
    }

    async fn query_by_conversation(&self, conversation_id: &str) -> Result<Vec<FeedbackEvent>> {
        let sql = format!(
            "{} WHERE conversation_id = ? ORDER BY created_at ASC",
            SELECT_COLUMNS
        );
        self.collect_rows(&sql, params![conversation_id]).await
    }

    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<FeedbackEvent>> {
        match user_id {
            Some(uid) => {
                let sql = format!(
                    "{} WHERE created_at >= ? AND created_at <= ? AND user_id = ? ORDER BY created_at DESC LIMIT ?",
                    SELECT_COLUMNS
                );
                self.collect_rows(
                    &sql,
                    params![
                        since.timestamp_millis(),
                        until.timestamp_millis(),
                        uid,
                        limit as i64
                    ],
                )
                .await
            }
            None => {
                let sql = format!(
                    "{} WHERE created_at >= ? AND created_at <= ? ORDER BY created_at DESC LIMIT ?",
                    SELECT_COLUMNS
                );
                self.collect_rows(
                    &sql,
                    params![since.timestamp_millis(), until.timestamp_millis(), limit as i64],
                )
                .await
            }
        }
    }
}
