//! # packrat-db
//!
//! SQLite storage and query layer for packrat.
//!
//! This crate provides:
//! - Connection pool management (WAL mode, enforced foreign keys)
//! - Repository implementations for users, notes, tags, and activity
//! - Inline hashtag extraction
//! - Cross-user analytics aggregates
//!
//! ## Example
//!
//! ```rust,ignore
//! use packrat_db::{CreateNoteRequest, Database, NoteRepository, UserRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:packrat.db").await?;
//!
//!     db.users.ensure(42, Some("alice"), Some("Alice"), "en").await?;
//!     let note_id = db
//!         .notes
//!         .save(CreateNoteRequest::text(42, "Buy milk #errands"))
//!         .await?;
//!
//!     println!("Created note: {}", note_id);
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod analytics;
pub mod hashtag_extraction;
pub mod notes;
pub mod pool;
pub mod tags;
pub mod users;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use TestDatabase
pub mod test_fixtures;

// Re-export core types
pub use packrat_core::*;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export hashtag extraction
pub use hashtag_extraction::{extract_inline_hashtags, parse_tag_line};

// Re-export repository implementations
pub use activity::SqliteActivityRepository;
pub use analytics::SqliteAnalyticsRepository;
pub use notes::SqliteNoteRepository;
pub use pool::{
    create_memory_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
};
pub use tags::SqliteTagRepository;
pub use users::SqliteUserRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// User identity and language preferences.
    pub users: SqliteUserRepository,
    /// Note persistence, browsing, and search.
    pub notes: SqliteNoteRepository,
    /// Tag management.
    pub tags: SqliteTagRepository,
    /// Append-only activity log.
    pub activity: SqliteActivityRepository,
    /// Cross-user aggregates for reporting.
    pub analytics: SqliteAnalyticsRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    ///
    /// Does not touch the schema; callers owning their own pool run
    /// [`Database::migrate`] themselves.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            users: SqliteUserRepository::new(pool.clone()),
            notes: SqliteNoteRepository::new(pool.clone()),
            tags: SqliteTagRepository::new(pool.clone()),
            activity: SqliteActivityRepository::new(pool.clone()),
            analytics: SqliteAnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the given URL and bring the schema up to date.
    ///
    /// Safe to call on every startup; only unapplied migrations run.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = pool::create_pool(url).await?;
        let db = Self::new(pool);
        db.migrate().await?;
        Ok(db)
    }

    /// Connect with custom pool configuration and bring the schema up to date.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = pool::create_pool_with_config(url, config).await?;
        let db = Self::new(pool);
        db.migrate().await?;
        Ok(db)
    }

    /// Open a private in-memory database and bring the schema up to date.
    ///
    /// The store lives as long as this handle; dropping it drops the data.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = pool::create_memory_pool().await?;
        let db = Self::new(pool);
        db.migrate().await?;
        Ok(db)
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("C:\\notes"), "C:\\\\notes");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_escape_like_escapes_backslash_first() {
        // "\%" must become "\\\%" (escaped backslash, then escaped percent),
        // not "\\%" which would read as an escaped percent alone.
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }
}
