//! Core traits for packrat abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::activity::ActivityKind;
use crate::error::Result;
use crate::models::*;

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user identity and preferences.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user if absent. Existing rows are never overwritten,
    /// so the first write wins for name and handle.
    async fn ensure(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        language: &str,
    ) -> Result<()>;

    /// Update the language preference. An unknown id affects zero rows
    /// and is not an error.
    async fn set_language(&self, user_id: i64, language: &str) -> Result<()>;

    /// The user's language, or [`crate::defaults::LANGUAGE`] when the
    /// user is unknown.
    async fn language(&self, user_id: i64) -> Result<String>;

    /// Fetch one user row.
    async fn get(&self, user_id: i64) -> Result<Option<User>>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub user_id: i64,
    /// Required; callers pass a placeholder label for pure-media notes.
    pub content: String,
    pub kind: NoteKind,
    /// Opaque media reference, expected iff `kind` is not text.
    pub file_ref: Option<String>,
    pub origin_chat_id: Option<i64>,
    pub origin_chat_title: Option<String>,
}

impl CreateNoteRequest {
    /// Plain text note, the common case.
    pub fn text(user_id: i64, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            kind: NoteKind::Text,
            file_ref: None,
            origin_chat_id: None,
            origin_chat_title: None,
        }
    }

    /// Media note carrying an opaque file reference.
    pub fn media(
        user_id: i64,
        content: impl Into<String>,
        kind: NoteKind,
        file_ref: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            content: content.into(),
            kind,
            file_ref: Some(file_ref.into()),
            origin_chat_id: None,
            origin_chat_title: None,
        }
    }
}

/// Repository for note storage and per-user retrieval.
///
/// Every user-scoped read filters by owner inside the query itself; the
/// contract is that a foreign `user_id` behaves exactly like a missing row.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note and return its store-assigned identifier.
    ///
    /// Identifiers are strictly increasing and never reused. Inline
    /// hashtags found in the content are attached as tags in the same
    /// transaction.
    async fn save(&self, req: CreateNoteRequest) -> Result<i64>;

    /// Fetch one note with its tags.
    ///
    /// Returns [`crate::Error::NoteNotFound`] when the id is absent or the
    /// note belongs to a different user.
    async fn get(&self, note_id: i64, user_id: i64) -> Result<Note>;

    /// Flip the pinned flag. An absent id affects zero rows and is not
    /// reported back.
    async fn toggle_pin(&self, note_id: i64) -> Result<()>;

    /// Delete a note; its tags go with it. An absent id is a no-op.
    async fn delete(&self, note_id: i64) -> Result<()>;

    /// Recent notes newest first, with tags, for paginated browsing.
    async fn list_recent(&self, user_id: i64, limit: i64, offset: i64)
        -> Result<Vec<NoteSummary>>;

    /// Total note count for one user, for page-count math.
    async fn count(&self, user_id: i64) -> Result<i64>;

    /// Pinned notes newest first, with tags.
    async fn pinned(&self, user_id: i64) -> Result<Vec<NoteSummary>>;

    /// Substring match against content, newest first, capped at
    /// [`crate::defaults::SEARCH_RESULT_LIMIT`]. Matching is
    /// ASCII-case-insensitive; `%`, `_` and `\` in the query are literal.
    async fn search_content(&self, user_id: i64, query: &str) -> Result<Vec<NoteSummary>>;

    /// Exact tag match (normalized), newest first, capped at
    /// [`crate::defaults::SEARCH_RESULT_LIMIT`].
    async fn search_by_tag(&self, user_id: i64, tag: &str) -> Result<Vec<NoteSummary>>;

    /// Notes created within the trailing window, newest first, uncapped.
    async fn search_since(&self, user_id: i64, window_days: i64) -> Result<Vec<NoteSummary>>;

    /// One uniformly random note owned by the user.
    ///
    /// Returns [`crate::Error::NotFound`] when the user has no notes.
    async fn random(&self, user_id: i64) -> Result<Note>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tag operations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Normalize (trim, lowercase) and attach a tag to a note.
    ///
    /// Duplicates are silent no-ops. A note that vanished between lookup
    /// and insert is logged and swallowed; only store failures propagate.
    async fn add(&self, note_id: i64, tag: &str) -> Result<()>;

    /// Attach several tags in one transaction.
    async fn add_many(&self, note_id: i64, tags: &[String]) -> Result<()>;

    /// Tags attached to a note, sorted ascending.
    async fn for_note(&self, note_id: i64) -> Result<Vec<String>>;

    /// Most used tags for one user: count descending, then tag ascending
    /// so equal counts order deterministically.
    async fn popular(&self, user_id: i64, limit: i64) -> Result<Vec<TagCount>>;
}

// =============================================================================
// ACTIVITY REPOSITORY
// =============================================================================

/// Repository for the append-only activity log.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append one entry. There is no update or delete.
    async fn record(
        &self,
        user_id: i64,
        action: ActivityKind,
        details: Option<&str>,
    ) -> Result<()>;
}

// =============================================================================
// ANALYTICS REPOSITORY
// =============================================================================

/// Read-only aggregates over the whole store.
///
/// Every query here is a pure function of the entity tables; nothing is
/// cached or materialized.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Per-user statistics block.
    async fn user_stats(&self, user_id: i64) -> Result<UserStats>;

    /// Registered user count.
    async fn total_users(&self) -> Result<i64>;

    /// Note count across all users.
    async fn total_notes(&self) -> Result<i64>;

    /// Distinct users with at least one activity entry in the trailing
    /// window.
    async fn active_users(&self, days: i64) -> Result<i64>;

    /// Note counts per content kind, descending.
    async fn notes_by_kind(&self) -> Result<Vec<KindCount>>;

    /// Users ranked by note count (zero-note users included), descending,
    /// ties by user id ascending. `None` ranks every user.
    async fn top_users(&self, limit: Option<i64>) -> Result<Vec<UserNoteCount>>;

    /// User counts per language preference, descending.
    async fn language_distribution(&self) -> Result<Vec<LanguageCount>>;

    /// Most used tags across all users, descending.
    async fn popular_tags_global(&self, limit: i64) -> Result<Vec<TagCount>>;

    /// Users created on the current UTC calendar day.
    async fn new_users_today(&self) -> Result<i64>;

    /// Notes created on the current UTC calendar day.
    async fn notes_created_today(&self) -> Result<i64>;

    /// Returning-user retention; see [`RetentionStats`].
    async fn retention(&self) -> Result<RetentionStats>;

    /// New users per calendar day over the trailing window, ascending.
    async fn user_growth(&self, days: i64) -> Result<Vec<DailyCount>>;

    /// Notes created per calendar day over the trailing window, ascending.
    async fn daily_notes(&self, days: i64) -> Result<Vec<DailyCount>>;
}
