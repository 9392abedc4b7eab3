//! Inline hashtag extraction from note content.
//!
//! Notes arrive as chat messages, not markdown, so extraction is a plain
//! word-character scan: `#` followed by one or more `\w` characters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Matches `#tag` anywhere in the text. `\w` is Unicode-aware, so non-ASCII
/// tags come through intact.
static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern"));

/// Comma / whitespace separators for interactively supplied tag lines.
static TAG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]+").expect("separator pattern"));

/// Extract inline hashtags from note content.
///
/// Returns lowercase, deduplicated tag names in sorted order. Numeric-only
/// tags such as `#2025` are kept; they are valid labels here.
///
/// # Examples
///
/// ```
/// use packrat_db::extract_inline_hashtags;
///
/// let tags = extract_inline_hashtags("Buy milk #errands #Home");
/// assert_eq!(tags, vec!["errands".to_string(), "home".to_string()]);
/// ```
pub fn extract_inline_hashtags(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    for cap in HASHTAG.captures_iter(content) {
        if let Some(tag) = cap.get(1) {
            seen.insert(tag.as_str().to_lowercase());
        }
    }

    let mut tags: Vec<String> = seen.into_iter().collect();
    tags.sort();
    tags
}

/// Split an interactively supplied tag line into normalized tag names.
///
/// Tokens are comma or whitespace separated; each is lowercased, stripped of
/// a leading `#` (users type both `work` and `#work`), and empties are
/// dropped. Returns deduplicated names in sorted order.
pub fn parse_tag_line(line: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    for token in TAG_SEPARATORS.split(line.trim()) {
        let tag = token.trim_start_matches('#').to_lowercase();
        if !tag.is_empty() {
            seen.insert(tag);
        }
    }

    let mut tags: Vec<String> = seen.into_iter().collect();
    tags.sort();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_and_lowercases() {
        let tags = extract_inline_hashtags("Meeting notes #Work #projectX");
        assert_eq!(tags, vec!["projectx".to_string(), "work".to_string()]);
    }

    #[test]
    fn test_case_variants_deduplicate() {
        let tags = extract_inline_hashtags("#Home #home #HOME");
        assert_eq!(tags, vec!["home".to_string()]);
    }

    #[test]
    fn test_numeric_tags_kept() {
        let tags = extract_inline_hashtags("taxes #2025");
        assert_eq!(tags, vec!["2025".to_string()]);
    }

    #[test]
    fn test_unicode_tags() {
        let tags = extract_inline_hashtags("записка #дом");
        assert_eq!(tags, vec!["дом".to_string()]);
    }

    #[test]
    fn test_no_hashtags() {
        assert!(extract_inline_hashtags("plain text").is_empty());
        assert!(extract_inline_hashtags("").is_empty());
        // A bare '#' captures nothing.
        assert!(extract_inline_hashtags("# not a tag").is_empty());
    }

    #[test]
    fn test_hashtag_mid_word() {
        // The pattern has no left boundary: "a#b" yields "b".
        let tags = extract_inline_hashtags("a#b");
        assert_eq!(tags, vec!["b".to_string()]);
    }

    #[test]
    fn test_parse_tag_line_separators() {
        let tags = parse_tag_line("work, personal  home");
        assert_eq!(
            tags,
            vec![
                "home".to_string(),
                "personal".to_string(),
                "work".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_tag_line_strips_hash_and_case() {
        let tags = parse_tag_line("#Work,#WORK work");
        assert_eq!(tags, vec!["work".to_string()]);
    }

    #[test]
    fn test_parse_tag_line_empty() {
        assert!(parse_tag_line("").is_empty());
        assert!(parse_tag_line("  , ,, ").is_empty());
    }
}
