//! Activity log repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use packrat_core::{ActivityKind, ActivityRepository, Error, Result};

/// SQLite implementation of ActivityRepository.
///
/// The log is append-only; entries are never updated or deleted, and the
/// time-windowed analytics read nothing else.
pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    /// Create a new SqliteActivityRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for SqliteActivityRepository {
    async fn record(
        &self,
        user_id: i64,
        action: ActivityKind,
        details: Option<&str>,
    ) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            "INSERT INTO activity_log (user_id, action, details, timestamp)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(action.as_str())
        .bind(details)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "activity",
            op = "record",
            user_id,
            action = action.as_str(),
            "Recorded activity"
        );
        Ok(())
    }
}
