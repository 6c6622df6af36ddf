//! SQLite mirror for the long-term memory store.
//!
//! One row per user, `content` holding the note list as a JSON array.
//! Writes are upserts keyed by `user_id`; the whole list is replaced on
//! every mutation.

use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use tracing::{info, warn};
use uuid::Uuid;

/// SQLite-backed repository for per-user memory rows.
#[derive(Clone)]
pub struct MemoryRepository {
    pool: SqlitePool,
}

impl MemoryRepository {
    pub async fn new(database_path: &str) -> Result<Self, anyhow::Error> {
        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(database_path);
        let pool = SqlitePool::connect_with(options).await?;
        let repository = Self { pool };
        repository.init_schema().await?;
        Ok(repository)
    }

    async fn init_schema(&self) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS memory (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts or replaces the user's note list. On conflict the existing
    /// row keeps its id and `created_at`; `content` and `updated_at` are
    /// replaced.
    pub async fn upsert(&self, user_id: i64, notes: &[String]) -> Result<(), anyhow::Error> {
        let content = serde_json::to_string(notes)?;
        let now = Utc::now().timestamp_millis();
        sqlx::query(
            r#"
            INSERT INTO memory (id, user_id, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(&content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        info!(user_id, notes = notes.len(), "memory row upserted");
        Ok(())
    }

    /// Reads every user's note list. Rows with malformed JSON are skipped
    /// with a warning rather than failing the whole load.
    pub async fn load_all(&self) -> Result<Vec<(i64, Vec<String>)>, anyhow::Error> {
        let rows = sqlx::query("SELECT user_id, content FROM memory")
            .fetch_all(&self.pool)
            .await?;
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let user_id: i64 = row.try_get("user_id")?;
            let content: String = row.try_get("content")?;
            match serde_json::from_str::<Vec<String>>(&content) {
                Ok(notes) => result.push((user_id, notes)),
                Err(e) => warn!(error = %e, user_id, "skipping memory row with malformed content"),
            }
        }
        Ok(result)
    }
}
