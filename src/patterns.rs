//! Compiled regex patterns used while scraping.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Whitespace
// =============================================================================

/// Three or more newlines (with optional blank-line whitespace) in a row.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n(?:[ \t\r]*\n)+").expect("MULTIPLE_NEWLINES regex"));

/// Any run of HTML whitespace, collapsed to one space in inline text.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("WHITESPACE_RUN regex"));

/// Inline `display: none` declarations.
pub static DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display\s*:\s*none").expect("DISPLAY_NONE regex"));

// =============================================================================
// Charset Declarations
// =============================================================================

/// `<meta charset="...">`, or the charset parameter of an
/// `http-equiv="Content-Type"` meta's `content`.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).expect("META_CHARSET regex")
});

// =============================================================================
// Speaker Detection
// =============================================================================

/// Class fragments that mark a human message.
pub static USER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(user|human|items-end)").expect("USER_CLASS regex"));

/// Class fragments that mark an assistant message.
///
/// `ai` only counts as a whole class-name segment so that `container` or
/// `detail` don't read as assistant markers.
pub static ASSISTANT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(assistant|grok|bot|items-start|(?:^|[\s_-])ai(?:$|[\s_-]))")
        .expect("ASSISTANT_CLASS regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_newlines_matches_three_or_more() {
        assert!(!MULTIPLE_NEWLINES.is_match("a\n\nb"));
        assert!(MULTIPLE_NEWLINES.is_match("a\n\n\nb"));
        assert!(MULTIPLE_NEWLINES.is_match("a\n  \n \n\nb"));
    }

    #[test]
    fn assistant_class_ignores_ai_inside_words() {
        assert!(ASSISTANT_CLASS.is_match("message ai-reply"));
        assert!(ASSISTANT_CLASS.is_match("msg-ai"));
        assert!(ASSISTANT_CLASS.is_match("grok-bubble"));
        assert!(!ASSISTANT_CLASS.is_match("message-container"));
        assert!(!ASSISTANT_CLASS.is_match("detail"));
    }

    #[test]
    fn user_class_matches_alignment_family() {
        assert!(USER_CLASS.is_match("flex items-end"));
        assert!(USER_CLASS.is_match("HumanMessage"));
        assert!(!USER_CLASS.is_match("flex items-start"));
    }
}
