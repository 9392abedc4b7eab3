//! Activity log action vocabulary.
//!
//! The store keeps the action column as a plain string so old rows survive
//! vocabulary changes, but everything above the storage layer speaks this
//! closed enum. Analytics queries aggregate over the raw strings and so
//! keep counting rows whose action has since been retired.

use serde::{Deserialize, Serialize};

/// What a user did, for the append-only activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// First contact or /start command.
    BotStarted,
    /// A note was persisted.
    NoteCreated,
    /// A single note was opened from a list.
    NoteViewed,
    /// Pin flag flipped on a note.
    NotePinned,
    /// A note was permanently removed.
    NoteDeleted,
    /// Tags supplied interactively were attached.
    TagsAdded,
    /// Language preference changed.
    LanguageChanged,
    /// Search prompt opened.
    SearchInitiated,
    /// Free-text search executed.
    SearchPerformed,
    /// Tag search executed.
    SearchByTag,
    /// Last-seven-days search executed.
    SearchWeek,
    /// Random note drawn.
    RandomNote,
    /// Returned to the main menu.
    MenuHome,
    /// Opened the note list.
    ViewNotes,
    /// Opened the pinned-notes list.
    ViewPinned,
    /// Opened personal statistics.
    ViewStats,
    /// Opened the help screen.
    ViewHelp,
    /// Opened the settings screen.
    ViewSettings,
    /// Operator opened the usage report.
    AdminAnalyticsViewed,
}

impl ActivityKind {
    /// Stable string form persisted in the activity log.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::BotStarted => "bot_started",
            ActivityKind::NoteCreated => "note_created",
            ActivityKind::NoteViewed => "note_viewed",
            ActivityKind::NotePinned => "note_pinned",
            ActivityKind::NoteDeleted => "note_deleted",
            ActivityKind::TagsAdded => "tags_added",
            ActivityKind::LanguageChanged => "language_changed",
            ActivityKind::SearchInitiated => "search_initiated",
            ActivityKind::SearchPerformed => "search_performed",
            ActivityKind::SearchByTag => "search_by_tag",
            ActivityKind::SearchWeek => "search_week",
            ActivityKind::RandomNote => "random_note",
            ActivityKind::MenuHome => "menu_home",
            ActivityKind::ViewNotes => "view_notes",
            ActivityKind::ViewPinned => "view_pinned",
            ActivityKind::ViewStats => "view_stats",
            ActivityKind::ViewHelp => "view_help",
            ActivityKind::ViewSettings => "view_settings",
            ActivityKind::AdminAnalyticsViewed => "admin_analytics_viewed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bot_started" => Some(ActivityKind::BotStarted),
            "note_created" => Some(ActivityKind::NoteCreated),
            "note_viewed" => Some(ActivityKind::NoteViewed),
            "note_pinned" => Some(ActivityKind::NotePinned),
            "note_deleted" => Some(ActivityKind::NoteDeleted),
            "tags_added" => Some(ActivityKind::TagsAdded),
            "language_changed" => Some(ActivityKind::LanguageChanged),
            "search_initiated" => Some(ActivityKind::SearchInitiated),
            "search_performed" => Some(ActivityKind::SearchPerformed),
            "search_by_tag" => Some(ActivityKind::SearchByTag),
            "search_week" => Some(ActivityKind::SearchWeek),
            "random_note" => Some(ActivityKind::RandomNote),
            "menu_home" => Some(ActivityKind::MenuHome),
            "view_notes" => Some(ActivityKind::ViewNotes),
            "view_pinned" => Some(ActivityKind::ViewPinned),
            "view_stats" => Some(ActivityKind::ViewStats),
            "view_help" => Some(ActivityKind::ViewHelp),
            "view_settings" => Some(ActivityKind::ViewSettings),
            "admin_analytics_viewed" => Some(ActivityKind::AdminAnalyticsViewed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ActivityKind] = &[
        ActivityKind::BotStarted,
        ActivityKind::NoteCreated,
        ActivityKind::NoteViewed,
        ActivityKind::NotePinned,
        ActivityKind::NoteDeleted,
        ActivityKind::TagsAdded,
        ActivityKind::LanguageChanged,
        ActivityKind::SearchInitiated,
        ActivityKind::SearchPerformed,
        ActivityKind::SearchByTag,
        ActivityKind::SearchWeek,
        ActivityKind::RandomNote,
        ActivityKind::MenuHome,
        ActivityKind::ViewNotes,
        ActivityKind::ViewPinned,
        ActivityKind::ViewStats,
        ActivityKind::ViewHelp,
        ActivityKind::ViewSettings,
        ActivityKind::AdminAnalyticsViewed,
    ];

    #[test]
    fn as_str_parse_round_trips() {
        for kind in ALL {
            assert_eq!(ActivityKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_action() {
        assert_eq!(ActivityKind::parse("note_edited"), None);
        assert_eq!(ActivityKind::parse(""), None);
    }

    #[test]
    fn strings_are_snake_case_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in ALL {
            let s = kind.as_str();
            assert!(seen.insert(s), "duplicate action string: {s}");
            assert!(s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_' || c.is_ascii_digit()));
        }
    }

    #[test]
    fn serde_matches_as_str() {
        for kind in ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
