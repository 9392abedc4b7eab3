//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use tracing::warn;

use packrat_core::{Error, Result, TagCount, TagRepository};

/// SQLite implementation of TagRepository.
pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    /// Create a new SqliteTagRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// True when the error is a foreign-key violation, meaning the target note
/// was deleted between selection and tagging. The race loses to the delete;
/// anything else propagates.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::ForeignKeyViolation)
    )
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn add(&self, note_id: i64, tag: &str) -> Result<()> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return Err(Error::InvalidInput(
                "tag is empty after normalization".to_string(),
            ));
        }

        // Duplicates are absorbed by INSERT OR IGNORE against the
        // (note_id, tag) uniqueness constraint.
        let result = sqlx::query("INSERT OR IGNORE INTO tags (note_id, tag) VALUES (?, ?)")
            .bind(note_id)
            .bind(&tag)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => {
                warn!(
                    subsystem = "database",
                    component = "tags",
                    op = "add",
                    note_id,
                    tag = %tag,
                    "Tag dropped: note no longer exists"
                );
                Ok(())
            }
            Err(err) => Err(Error::Database(err)),
        }
    }

    async fn add_many(&self, note_id: i64, tags: &[String]) -> Result<()> {
        if tags.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for tag in tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }

            let result = sqlx::query("INSERT OR IGNORE INTO tags (note_id, tag) VALUES (?, ?)")
                .bind(note_id)
                .bind(&tag)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(_) => {}
                Err(err) if is_foreign_key_violation(&err) => {
                    // The note is gone; dropping the transaction rolls back
                    // whatever part of the batch already went in.
                    warn!(
                        subsystem = "database",
                        component = "tags",
                        op = "add_many",
                        note_id,
                        "Tag batch dropped: note no longer exists"
                    );
                    return Ok(());
                }
                Err(err) => return Err(Error::Database(err)),
            }
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn for_note(&self, note_id: i64) -> Result<Vec<String>> {
        let tags = sqlx::query_scalar("SELECT tag FROM tags WHERE note_id = ? ORDER BY tag")
            .bind(note_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(tags)
    }

    async fn popular(&self, user_id: i64, limit: i64) -> Result<Vec<TagCount>> {
        let tags = sqlx::query_as::<_, TagCount>(
            "SELECT t.tag, COUNT(*) AS count
             FROM tags t
             JOIN notes n ON t.note_id = n.note_id
             WHERE n.user_id = ?
             GROUP BY t.tag
             ORDER BY count DESC, t.tag ASC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(tags)
    }
}
