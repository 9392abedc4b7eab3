//! Test fixtures for database integration tests.
//!
//! Provides reusable setup functions and test data builders for consistent
//! testing across the codebase.
//!
//! ## Configuration
//!
//! By default every [`TestDatabase`] is a private in-memory store, so tests
//! are fully isolated and need no external services. Set
//! `PACKRAT_TEST_DATABASE_URL` to run the same tests against a file-backed
//! database instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use packrat_db::test_fixtures::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::new().await;
//!     let data = TestDataBuilder::new(&test_db.db, 42)
//!         .with_user("alice", "Alice")
//!         .await
//!         .with_note("Test content #demo")
//!         .await
//!         .build()
//!         .await;
//!
//!     // Run your tests...
//! }
//! ```

use chrono::NaiveDateTime;

use packrat_core::{
    defaults, ActivityKind, ActivityRepository, CreateNoteRequest, NoteRepository, TagRepository,
    UserRepository,
};

use crate::Database;

/// Environment variable overriding the in-memory default.
pub const TEST_DATABASE_URL_VAR: &str = "PACKRAT_TEST_DATABASE_URL";

/// Migrated database for one test.
///
/// Dropping it drops the store (in-memory databases live exactly as long as
/// their single pooled connection).
pub struct TestDatabase {
    pub db: Database,
}

impl TestDatabase {
    /// Create a fresh, migrated test database.
    pub async fn new() -> Self {
        let db = match std::env::var(TEST_DATABASE_URL_VAR) {
            Ok(url) => Database::connect(&url)
                .await
                .expect("Failed to connect to test database"),
            Err(_) => Database::connect_in_memory()
                .await
                .expect("Failed to create in-memory test database"),
        };
        Self { db }
    }
}

/// Insert a user row with an explicit creation timestamp.
///
/// Goes through raw SQL on purpose: the repository assigns timestamps
/// itself, and window/boundary tests need to control them.
pub async fn seed_user_at(db: &Database, user_id: i64, created_at: NaiveDateTime) {
    sqlx::query(
        "INSERT OR IGNORE INTO users (user_id, username, first_name, language, created_at)
         VALUES (?, NULL, NULL, ?, ?)",
    )
    .bind(user_id)
    .bind(defaults::LANGUAGE)
    .bind(created_at)
    .execute(&db.pool)
    .await
    .expect("Failed to seed user");
}

/// Insert a note row with an explicit creation timestamp; returns its id.
pub async fn seed_note_at(
    db: &Database,
    user_id: i64,
    content: &str,
    created_at: NaiveDateTime,
) -> i64 {
    let result = sqlx::query(
        "INSERT INTO notes (user_id, content, kind, file_ref, created_at, pinned)
         VALUES (?, ?, 'text', NULL, ?, 0)",
    )
    .bind(user_id)
    .bind(content)
    .bind(created_at)
    .execute(&db.pool)
    .await
    .expect("Failed to seed note");

    result.last_insert_rowid()
}

/// Insert an activity entry with an explicit timestamp.
///
/// Takes the action as a raw string so tests can also cover entries written
/// by retired vocabulary versions.
pub async fn seed_activity_at(db: &Database, user_id: i64, action: &str, timestamp: NaiveDateTime) {
    sqlx::query(
        "INSERT INTO activity_log (user_id, action, details, timestamp)
         VALUES (?, ?, NULL, ?)",
    )
    .bind(user_id)
    .bind(action)
    .bind(timestamp)
    .execute(&db.pool)
    .await
    .expect("Failed to seed activity");
}

/// Builder for test data with fluent API.
///
/// All writes go through the public repositories, so seeded data is exactly
/// what production writes would produce.
pub struct TestDataBuilder<'a> {
    db: &'a Database,
    user_id: i64,
    created_notes: Vec<i64>,
}

impl<'a> TestDataBuilder<'a> {
    pub fn new(db: &'a Database, user_id: i64) -> Self {
        Self {
            db,
            user_id,
            created_notes: Vec::new(),
        }
    }

    /// Register the user (first write wins, like production).
    pub async fn with_user(self, username: &str, first_name: &str) -> Self {
        self.db
            .users
            .ensure(
                self.user_id,
                Some(username),
                Some(first_name),
                defaults::LANGUAGE,
            )
            .await
            .expect("Failed to ensure test user");
        self
    }

    /// Create a text note; inline hashtags in the content are extracted
    /// exactly as in production.
    pub async fn with_note(mut self, content: &str) -> Self {
        let note_id = self
            .db
            .notes
            .save(CreateNoteRequest::text(self.user_id, content))
            .await
            .expect("Failed to create test note");

        self.created_notes.push(note_id);
        self
    }

    /// Create a note and attach explicit tags on top of any inline ones.
    pub async fn with_tagged_note(mut self, content: &str, tags: &[&str]) -> Self {
        self = self.with_note(content).await;
        let note_id = *self.created_notes.last().expect("note was just created");

        let tags: Vec<String> = tags.iter().map(|s| s.to_string()).collect();
        self.db
            .tags
            .add_many(note_id, &tags)
            .await
            .expect("Failed to tag test note");
        self
    }

    /// Record one activity entry for the user.
    pub async fn with_activity(self, action: ActivityKind) -> Self {
        self.db
            .activity
            .record(self.user_id, action, None)
            .await
            .expect("Failed to record test activity");
        self
    }

    /// Build and return the created identifiers.
    pub async fn build(self) -> TestData {
        TestData {
            notes: self.created_notes,
        }
    }
}

/// Test data created by the builder.
#[derive(Debug)]
pub struct TestData {
    pub notes: Vec<i64>,
}

/// Seed one user with a couple of notes for basic operations.
pub async fn seed_minimal_data(db: &Database, user_id: i64) -> TestData {
    TestDataBuilder::new(db, user_id)
        .with_user("tester", "Tester")
        .await
        .with_note("Test note 1")
        .await
        .with_note("Test note 2 #demo")
        .await
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let test_db = TestDatabase::new().await;
        assert!(test_db.db.pool.size() > 0);
    }

    #[tokio::test]
    async fn test_data_builder_notes() {
        let test_db = TestDatabase::new().await;
        let data = TestDataBuilder::new(&test_db.db, 1)
            .with_user("builder", "Builder")
            .await
            .with_note("Test 1")
            .await
            .with_note("Test 2")
            .await
            .build()
            .await;

        assert_eq!(data.notes.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_minimal_data() {
        let test_db = TestDatabase::new().await;
        let data = seed_minimal_data(&test_db.db, 7).await;

        assert_eq!(data.notes.len(), 2);
        let tags = test_db.db.tags.for_note(data.notes[1]).await.unwrap();
        assert_eq!(tags, vec!["demo".to_string()]);
    }
}
