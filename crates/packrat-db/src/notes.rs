//! Note repository implementation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use packrat_core::{
    defaults, CreateNoteRequest, Error, Note, NoteRepository, NoteSummary, Result,
};

use crate::escape_like;
use crate::hashtag_extraction::extract_inline_hashtags;

/// SQLite implementation of NoteRepository.
///
/// Every query is scoped by owner inside the SQL itself, so a foreign
/// `user_id` behaves exactly like a missing row.
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Columns selected for full [`Note`] rows, with the tag set aggregated
/// into one comma-separated column.
const NOTE_COLUMNS: &str = "n.note_id, n.user_id, n.content, n.kind, n.file_ref, \
     n.created_at, n.pinned, n.origin_chat_id, n.origin_chat_title, \
     GROUP_CONCAT(t.tag) AS tags";

/// Columns selected for [`NoteSummary`] list rows.
const SUMMARY_COLUMNS: &str = "n.note_id, n.content, n.kind, n.created_at, n.pinned, \
     GROUP_CONCAT(t.tag) AS tags";

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn save(&self, req: CreateNoteRequest) -> Result<i64> {
        let tags = extract_inline_hashtags(&req.content);
        let now = Utc::now().naive_utc();

        // Note and its inline tags land atomically: a crash between the two
        // must not leave an untagged note that claimed tags in its content.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query(
            "INSERT INTO notes
                 (user_id, content, kind, file_ref, created_at, pinned,
                  origin_chat_id, origin_chat_title)
             VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(req.user_id)
        .bind(&req.content)
        .bind(req.kind.as_str())
        .bind(&req.file_ref)
        .bind(now)
        .bind(req.origin_chat_id)
        .bind(&req.origin_chat_title)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let note_id = result.last_insert_rowid();

        for tag in &tags {
            sqlx::query("INSERT OR IGNORE INTO tags (note_id, tag) VALUES (?, ?)")
                .bind(note_id)
                .bind(tag)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "save",
            note_id,
            user_id = req.user_id,
            kind = req.kind.as_str(),
            tag_count = tags.len(),
            "Saved note"
        );
        Ok(note_id)
    }

    async fn get(&self, note_id: i64, user_id: i64) -> Result<Note> {
        let row = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.note_id = ? AND n.user_id = ?
             GROUP BY n.note_id"
        ))
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => map_row_to_note(row),
            None => Err(Error::NoteNotFound(note_id)),
        }
    }

    async fn toggle_pin(&self, note_id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE notes
             SET pinned = CASE WHEN pinned = 1 THEN 0 ELSE 1 END
             WHERE note_id = ?",
        )
        .bind(note_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "toggle_pin",
            note_id,
            rows_affected = result.rows_affected(),
            "Toggled pin flag"
        );
        Ok(())
    }

    async fn delete(&self, note_id: i64) -> Result<()> {
        // Tags go via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM notes WHERE note_id = ?")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id,
            rows_affected = result.rows_affected(),
            "Deleted note"
        );
        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NoteSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ?
             GROUP BY n.note_id
             ORDER BY n.created_at DESC, n.note_id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note_summary).collect())
    }

    async fn count(&self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }

    async fn pinned(&self, user_id: i64) -> Result<Vec<NoteSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ? AND n.pinned = 1
             GROUP BY n.note_id
             ORDER BY n.created_at DESC, n.note_id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note_summary).collect())
    }

    async fn search_content(&self, user_id: i64, query: &str) -> Result<Vec<NoteSummary>> {
        let pattern = format!("%{}%", escape_like(query));

        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ? AND n.content LIKE ? ESCAPE '\\'
             GROUP BY n.note_id
             ORDER BY n.created_at DESC, n.note_id DESC
             LIMIT ?"
        ))
        .bind(user_id)
        .bind(&pattern)
        .bind(defaults::SEARCH_RESULT_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "search_content",
            user_id,
            result_count = rows.len(),
            "Searched note content"
        );
        Ok(rows.into_iter().map(map_row_to_note_summary).collect())
    }

    async fn search_by_tag(&self, user_id: i64, tag: &str) -> Result<Vec<NoteSummary>> {
        let tag = tag.trim().to_lowercase();

        // Membership is tested in a subquery so the outer join can still
        // aggregate the note's full tag set without fan-out duplicates.
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ?
               AND n.note_id IN (SELECT note_id FROM tags WHERE tag = ?)
             GROUP BY n.note_id
             ORDER BY n.created_at DESC, n.note_id DESC
             LIMIT ?"
        ))
        .bind(user_id)
        .bind(&tag)
        .bind(defaults::SEARCH_RESULT_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note_summary).collect())
    }

    async fn search_since(&self, user_id: i64, window_days: i64) -> Result<Vec<NoteSummary>> {
        let cutoff = Utc::now().naive_utc() - Duration::days(window_days);

        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ? AND n.created_at >= ?
             GROUP BY n.note_id
             ORDER BY n.created_at DESC, n.note_id DESC"
        ))
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note_summary).collect())
    }

    async fn random(&self, user_id: i64) -> Result<Note> {
        let row = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes n
             LEFT JOIN tags t ON n.note_id = t.note_id
             WHERE n.user_id = ?
             GROUP BY n.note_id
             ORDER BY RANDOM()
             LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => map_row_to_note(row),
            None => Err(Error::NotFound(format!("user {user_id} has no notes"))),
        }
    }
}

fn map_row_to_note(row: SqliteRow) -> Result<Note> {
    let kind_str: String = row.get("kind");
    let kind = kind_str
        .parse()
        .map_err(|_| Error::Serialization(format!("unknown note kind: {kind_str}")))?;

    Ok(Note {
        note_id: row.get("note_id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        kind,
        file_ref: row.get("file_ref"),
        created_at: row.get("created_at"),
        pinned: row.get("pinned"),
        origin_chat_id: row.get("origin_chat_id"),
        origin_chat_title: row.get("origin_chat_title"),
        tags: split_tags(row.get("tags")),
    })
}

fn map_row_to_note_summary(row: SqliteRow) -> NoteSummary {
    let kind_str: String = row.get("kind");

    NoteSummary {
        note_id: row.get("note_id"),
        content: row.get("content"),
        // A kind this build does not know is shown as text rather than
        // failing the whole listing.
        kind: kind_str.parse().unwrap_or_default(),
        created_at: row.get("created_at"),
        pinned: row.get("pinned"),
        tags: split_tags(row.get("tags")),
    }
}

/// Split a `GROUP_CONCAT` tag column into a sorted tag list.
fn split_tags(tags: Option<String>) -> Vec<String> {
    match tags {
        Some(s) if !s.is_empty() => {
            let mut tags: Vec<String> = s.split(',').map(String::from).collect();
            tags.sort();
            tags
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags(Some("work,errands,home".to_string())),
            vec![
                "errands".to_string(),
                "home".to_string(),
                "work".to_string()
            ]
        );
        assert!(split_tags(Some(String::new())).is_empty());
        assert!(split_tags(None).is_empty());
    }
}
