//! Core data models for packrat.
//!
//! These types are shared across all packrat crates and represent
//! the core domain entities. Every row shape that crosses the storage
//! boundary is a named record; field order is never a contract.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user of the capture service.
///
/// The identifier is assigned by the upstream chat platform, never generated
/// here. Rows are created on first contact and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    /// Optional platform handle (e.g. "@maria").
    pub username: Option<String>,
    /// Display name shown in greetings.
    pub first_name: Option<String>,
    /// ISO 639-1 language preference.
    pub language: String,
    pub created_at: NaiveDateTime,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Content type of a note.
///
/// `Text` notes carry their content inline; every other kind additionally
/// carries an opaque media reference the transport layer can re-fetch the
/// original payload with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Text,
    Photo,
    Video,
    Document,
    Voice,
    Audio,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Text => "text",
            NoteKind::Photo => "photo",
            NoteKind::Video => "video",
            NoteKind::Document => "document",
            NoteKind::Voice => "voice",
            NoteKind::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(NoteKind::Text),
            "photo" => Some(NoteKind::Photo),
            "video" => Some(NoteKind::Video),
            "document" => Some(NoteKind::Document),
            "voice" => Some(NoteKind::Voice),
            "audio" => Some(NoteKind::Audio),
            _ => None,
        }
    }
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NoteKind::parse(s).ok_or_else(|| format!("unknown note kind: {s}"))
    }
}

/// Complete note record with its tag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: i64,
    pub user_id: i64,
    /// Required; a placeholder label for pure-media notes.
    pub content: String,
    pub kind: NoteKind,
    /// Opaque media reference; present iff `kind` is not text.
    pub file_ref: Option<String>,
    pub created_at: NaiveDateTime,
    pub pinned: bool,
    /// Set only when the note was forwarded from a named source chat.
    pub origin_chat_id: Option<i64>,
    pub origin_chat_title: Option<String>,
    /// Lowercased tags, sorted ascending.
    pub tags: Vec<String>,
}

/// Lightweight note view for list screens: enough to render one line
/// plus the tag chips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: i64,
    pub content: String,
    pub kind: NoteKind,
    pub created_at: NaiveDateTime,
    pub pinned: bool,
    pub tags: Vec<String>,
}

// =============================================================================
// TAG TYPES
// =============================================================================

/// A tag with its usage count, for popularity rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

// =============================================================================
// PER-USER STATISTICS
// =============================================================================

/// Per-user statistics block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_notes: i64,
    pub pinned_notes: i64,
    pub distinct_tags: i64,
    /// Creation time of the oldest note; `None` when the user has no notes.
    pub first_note_at: Option<NaiveDateTime>,
    /// Top tags by usage count, at most five entries.
    pub top_tags: Vec<TagCount>,
}

impl UserStats {
    /// Sentinel shown by presentation layers when the user has no notes.
    pub const NO_NOTES_LABEL: &'static str = "N/A";

    /// Human-oriented first-note label ("January 05, 2024" or "N/A").
    pub fn first_note_label(&self) -> String {
        match self.first_note_at {
            Some(ts) => ts.format("%B %d, %Y").to_string(),
            None => Self::NO_NOTES_LABEL.to_string(),
        }
    }
}

// =============================================================================
// GLOBAL AGGREGATES
// =============================================================================

/// Note count for one user, for the top-users leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserNoteCount {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub note_count: i64,
}

/// User count for one language preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LanguageCount {
    pub language: String,
    pub count: i64,
}

/// Note count for one content kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: NoteKind,
    pub count: i64,
}

/// Event count for one calendar day, for time-series reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Returning-user retention over the whole store.
///
/// A user "returns" when their activity log spans at least two distinct
/// calendar days. The rate is a percentage of all registered users and is
/// `0.0` for an empty store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionStats {
    pub total_users: i64,
    pub returning_users: i64,
    pub retention_rate: f64,
}
