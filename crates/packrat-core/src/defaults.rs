//! Centralized default constants for packrat.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// USERS
// =============================================================================

/// Fallback language for unknown users and the schema default.
pub const LANGUAGE: &str = "en";

// =============================================================================
// PAGINATION
// =============================================================================

/// Notes per page in the browse view.
pub const PAGE_SIZE: i64 = 5;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

/// Result cap for substring and tag searches. Interactive surfaces render
/// one message per hit, so anything past this is noise.
pub const SEARCH_RESULT_LIMIT: i64 = 20;

// =============================================================================
// TAGS
// =============================================================================

/// Popular tags shown on the tag keyboard.
pub const POPULAR_TAGS_LIMIT: i64 = 6;

/// Top tags listed in the per-user statistics block.
pub const STATS_TOP_TAGS: i64 = 5;

/// Globally popular tags fetched for the usage report.
pub const GLOBAL_TAGS_LIMIT: i64 = 20;

// =============================================================================
// ANALYTICS
// =============================================================================

/// "Active user" window for the short-horizon activity rate, in days.
pub const ACTIVE_WINDOW_SHORT_DAYS: i64 = 7;

/// "Active user" window for the long-horizon activity rate, in days.
pub const ACTIVE_WINDOW_LONG_DAYS: i64 = 30;

/// Trailing window for per-day time series (user growth, daily notes).
pub const TIME_SERIES_DAYS: i64 = 30;

/// Users on the report leaderboard.
pub const TOP_USERS_LIMIT: i64 = 10;

/// "Last week" search window, in days.
pub const WEEK_WINDOW_DAYS: i64 = 7;

// =============================================================================
// PAGE MATH
// =============================================================================

/// Number of pages needed for `total` items at `page_size` per page.
///
/// Always at least 1 so an empty list still renders page 1 of 1.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    std::cmp::max(1, (total + page_size - 1) / page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_are_consistent() {
        // Use const block to satisfy clippy::assertions_on_constants
        const {
            assert!(SEARCH_RESULT_LIMIT > PAGE_SIZE);
            assert!(STATS_TOP_TAGS < POPULAR_TAGS_LIMIT);
            assert!(ACTIVE_WINDOW_SHORT_DAYS < ACTIVE_WINDOW_LONG_DAYS);
        }
    }

    #[test]
    fn page_count_empty_is_one() {
        assert_eq!(page_count(0, PAGE_SIZE), 1);
    }

    #[test]
    fn page_count_exact_boundary() {
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(10, 5), 2);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(11, 5), 3);
        assert_eq!(page_count(1, 5), 1);
    }

    #[test]
    fn page_count_degenerate_page_size() {
        assert_eq!(page_count(10, 0), 1);
        assert_eq!(page_count(10, -3), 1);
    }
}
