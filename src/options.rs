//! Configuration options for conversation scraping.
//!
//! The `Options` struct controls thresholds, selectors and output labels.
//! The defaults reproduce the layout of Grok's chat pages.

/// Default document title when the page has no usable heading.
pub const DEFAULT_TITLE: &str = "Grok Conversation";

/// Default filename offered to the download collaborator.
pub const DEFAULT_FILENAME: &str = "grok-conversation.md";

/// MIME type of every emitted document.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Continuation prompt appended after the last turn.
pub const DEFAULT_INSTRUCTIONS: &str =
    "Continue the conversation from the last message, using the context provided above.";

/// Generic "looks like a message" selectors, tried in order.
pub const DEFAULT_MESSAGE_SELECTORS: &[&str] = &[
    r#"[class*="message"]"#,
    r#"[class*="bubble"]"#,
    r#"[class*="chat-"]"#,
    r#"[role="listitem"]"#,
    r#"[class*="thread-message"]"#,
];

/// Configuration options for scraping.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::Options;
///
/// let options = Options {
///     assistant_heading: "Assistant".to_string(),
///     page_url: Some("https://grok.com/chat/abc".to_string()),
///     ..Options::default()
/// };
/// assert_eq!(options.min_turn_chars, 10);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Title used when no heading-like element yields text.
    ///
    /// Default: `"Grok Conversation"`
    pub default_title: String,

    /// Heading label for human turns (`## User`).
    ///
    /// Default: `"User"`
    pub user_heading: String,

    /// Heading label for assistant turns (`## Grok`).
    ///
    /// Default: `"Grok"`
    pub assistant_heading: String,

    /// Plain-text turns must be strictly longer than this many characters.
    ///
    /// Default: `10`
    pub min_turn_chars: usize,

    /// Paragraph-fallback nodes must be strictly longer than this many characters.
    ///
    /// Default: `15`
    pub min_paragraph_chars: usize,

    /// Generic message selectors for the pattern strategy, in priority order.
    pub message_selectors: Vec<String>,

    /// Selector for heading-like elements scanned for the title.
    ///
    /// Default: `h1, .title, header h1, [class*="title"]`
    pub title_selector: String,

    /// Selector for the main content region used by the raw-page fallback.
    ///
    /// Falls back to `body`, then the whole document, when nothing matches.
    ///
    /// Default: `"main"`
    pub raw_content_selector: String,

    /// Append the continuation instructions after the last turn.
    ///
    /// Default: `true`
    pub include_instructions: bool,

    /// Body of the `## Instructions for Grok` section.
    pub instructions: String,

    /// URL of the scraped page. Relative link and image URLs are resolved
    /// against it when present.
    ///
    /// Default: `None`
    pub page_url: Option<String>,

    /// Maximum element nesting walked by text extraction and formatting.
    ///
    /// Default: `512`
    pub max_tree_depth: usize,

    /// Filename handed to the download collaborator.
    ///
    /// Default: `"grok-conversation.md"`
    pub filename: String,

    /// Host answered as the target site by the page-type query.
    ///
    /// Default: `"grok.com"`
    pub target_host: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            user_heading: "User".to_string(),
            assistant_heading: "Grok".to_string(),
            min_turn_chars: 10,
            min_paragraph_chars: 15,
            message_selectors: DEFAULT_MESSAGE_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            title_selector: r#"h1, .title, header h1, [class*="title"]"#.to_string(),
            raw_content_selector: "main".to_string(),
            include_instructions: true,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            page_url: None,
            max_tree_depth: 512,
            filename: DEFAULT_FILENAME.to_string(),
            target_host: "grok.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_grok_layout() {
        let options = Options::default();
        assert_eq!(options.default_title, "Grok Conversation");
        assert_eq!(options.assistant_heading, "Grok");
        assert_eq!(options.min_turn_chars, 10);
        assert_eq!(options.min_paragraph_chars, 15);
        assert_eq!(options.filename, "grok-conversation.md");
    }

    #[test]
    fn message_selectors_keep_priority_order() {
        let options = Options::default();
        assert_eq!(options.message_selectors.len(), 5);
        assert_eq!(options.message_selectors[0], r#"[class*="message"]"#);
        assert_eq!(options.message_selectors[3], r#"[role="listitem"]"#);
    }
}
