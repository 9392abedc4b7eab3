//! Cross-user analytics queries.
//!
//! Read-only aggregates over the four tables. Results are computed per call
//! and never cached; the action column is read as raw strings so entries
//! written by retired vocabulary versions still count toward activity.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::{Row, SqlitePool};

use packrat_core::{
    defaults, AnalyticsRepository, DailyCount, Error, KindCount, LanguageCount, Result,
    RetentionStats, TagCount, UserNoteCount, UserStats,
};

/// SQLite implementation of AnalyticsRepository.
pub struct SqliteAnalyticsRepository {
    pool: SqlitePool,
}

impl SqliteAnalyticsRepository {
    /// Create a new SqliteAnalyticsRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for SqliteAnalyticsRepository {
    async fn user_stats(&self, user_id: i64) -> Result<UserStats> {
        let total_notes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let pinned_notes: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE user_id = ? AND pinned = 1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let distinct_tags: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT t.tag)
             FROM tags t
             JOIN notes n ON t.note_id = n.note_id
             WHERE n.user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let first_note_at: Option<NaiveDateTime> =
            sqlx::query_scalar("SELECT MIN(created_at) FROM notes WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let top_tags = sqlx::query_as::<_, TagCount>(
            "SELECT t.tag, COUNT(*) AS count
             FROM tags t
             JOIN notes n ON t.note_id = n.note_id
             WHERE n.user_id = ?
             GROUP BY t.tag
             ORDER BY count DESC, t.tag ASC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(defaults::STATS_TOP_TAGS)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(UserStats {
            total_notes,
            pinned_notes,
            distinct_tags,
            first_note_at,
            top_tags,
        })
    }

    async fn total_users(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn total_notes(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn active_users(&self, days: i64) -> Result<i64> {
        let cutoff = Utc::now().naive_utc() - Duration::days(days);

        sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM activity_log WHERE timestamp >= ?",
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn notes_by_kind(&self) -> Result<Vec<KindCount>> {
        let rows = sqlx::query(
            "SELECT kind, COUNT(*) AS count
             FROM notes
             GROUP BY kind
             ORDER BY count DESC, kind ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter()
            .map(|row| {
                let kind_str: String = row.get("kind");
                let kind = kind_str
                    .parse()
                    .map_err(|_| Error::Serialization(format!("unknown note kind: {kind_str}")))?;
                Ok(KindCount {
                    kind,
                    count: row.get("count"),
                })
            })
            .collect()
    }

    async fn top_users(&self, limit: Option<i64>) -> Result<Vec<UserNoteCount>> {
        // A negative LIMIT means unlimited in SQLite.
        let users = sqlx::query_as::<_, UserNoteCount>(
            "SELECT u.user_id, u.username, u.first_name, COUNT(n.note_id) AS note_count
             FROM users u
             LEFT JOIN notes n ON u.user_id = n.user_id
             GROUP BY u.user_id
             ORDER BY note_count DESC, u.user_id ASC
             LIMIT ?",
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(users)
    }

    async fn language_distribution(&self) -> Result<Vec<LanguageCount>> {
        let languages = sqlx::query_as::<_, LanguageCount>(
            "SELECT language, COUNT(*) AS count
             FROM users
             GROUP BY language
             ORDER BY count DESC, language ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(languages)
    }

    async fn popular_tags_global(&self, limit: i64) -> Result<Vec<TagCount>> {
        let tags = sqlx::query_as::<_, TagCount>(
            "SELECT tag, COUNT(*) AS count
             FROM tags
             GROUP BY tag
             ORDER BY count DESC, tag ASC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(tags)
    }

    async fn new_users_today(&self) -> Result<i64> {
        let today = Utc::now().date_naive();

        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE DATE(created_at) = ?")
            .bind(today)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn notes_created_today(&self) -> Result<i64> {
        let today = Utc::now().date_naive();

        sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE DATE(created_at) = ?")
            .bind(today)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn retention(&self) -> Result<RetentionStats> {
        let total_users = self.total_users().await?;

        // A user "returns" once they have activity on two distinct
        // calendar days, however far apart.
        let returning_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM (
                 SELECT user_id
                 FROM activity_log
                 GROUP BY user_id
                 HAVING COUNT(DISTINCT DATE(timestamp)) >= 2
             )",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let retention_rate = if total_users > 0 {
            returning_users as f64 / total_users as f64 * 100.0
        } else {
            0.0
        };

        Ok(RetentionStats {
            total_users,
            returning_users,
            retention_rate,
        })
    }

    async fn user_growth(&self, days: i64) -> Result<Vec<DailyCount>> {
        let cutoff = Utc::now().naive_utc() - Duration::days(days);

        let counts = sqlx::query_as::<_, DailyCount>(
            "SELECT DATE(created_at) AS day, COUNT(*) AS count
             FROM users
             WHERE created_at >= ?
             GROUP BY DATE(created_at)
             ORDER BY day ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(counts)
    }

    async fn daily_notes(&self, days: i64) -> Result<Vec<DailyCount>> {
        let cutoff = Utc::now().naive_utc() - Duration::days(days);

        let counts = sqlx::query_as::<_, DailyCount>(
            "SELECT DATE(created_at) AS day, COUNT(*) AS count
             FROM notes
             WHERE created_at >= ?
             GROUP BY DATE(created_at)
             ORDER BY day ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(counts)
    }
}
