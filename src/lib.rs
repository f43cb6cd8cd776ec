//! # grok-convo-scraper
//!
//! Extracts the conversation from a saved Grok chat page and renders it as a
//! Markdown document.
//!
//! Turns are found by a cascade of heuristics over the page DOM, from the
//! alignment classes Grok uses for each side of the chat down to plain
//! positional alternation. Assistant turns keep their formatting (code,
//! emphasis, links, lists, tables); user turns are quoted as plain text.
//! When no conversation can be recognized, the page text is exported raw
//! with a disclaimer.
//!
//! ## Quick Start
//!
//! ```rust
//! use grok_convo_scraper::scrape;
//!
//! let html = r#"
//!     <h1>Greeting</h1>
//!     <div class="items-end group flex flex-col">Hello there</div>
//!     <div class="items-start group flex flex-col"><strong>Hi</strong></div>
//! "#;
//!
//! let markdown = scrape(html);
//! assert!(markdown.starts_with("# Greeting\n\n*Exported on: "));
//! assert!(markdown.contains("## User\n\n> Hello there\n\n## Grok\n\n**Hi**\n\n"));
//! ```
//!
//! ## Pipeline
//!
//! - [`locator`]: strategy cascade producing speaker-tagged turns
//! - [`text`] and [`markdown`]: plain-text and Markdown rendering of a node
//! - [`assemble()`]: speaker sections, instructions and fallbacks
//! - [`emit()`]: title and timestamp header
//! - [`Scraper`]: `{"action":"scrape"}` dispatch to a download sink

mod assemble;
mod emit;
mod error;
mod options;
mod patterns;
mod result;
mod scraper;

/// Read-only helpers over `dom_query` and document-order indexing.
pub mod dom;

/// Visible-text extraction.
pub mod text;

/// HTML fragment to Markdown formatting.
pub mod markdown;

/// Turn location strategies and title lookup.
pub mod locator;

/// URL resolution and target-site checks.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use assemble::assemble;
pub use emit::{emit, format_timestamp};
pub use error::{Error, Result};
pub use options::{Options, DEFAULT_FILENAME, DEFAULT_INSTRUCTIONS, DEFAULT_TITLE, MARKDOWN_MIME};
pub use result::{Content, Conversation, Message, ScrapeResponse, Speaker, Turn};
pub use scraper::{Command, DownloadSink, FileSink, Page, ScrapeCounter, Scraper, TelemetrySink};

/// Scrape a page with default options and return the Markdown document.
#[must_use]
pub fn scrape(html: &str) -> String {
    scrape_with_options(html, &Options::default())
}

/// Scrape a page with custom options and return the Markdown document.
///
/// ```rust
/// use grok_convo_scraper::{scrape_with_options, Options};
///
/// let options = Options {
///     include_instructions: false,
///     ..Options::default()
/// };
/// let markdown = scrape_with_options("<main>Nothing here</main>", &options);
/// assert!(markdown.contains("## Raw Content\n\nNothing here\n\n"));
/// ```
#[must_use]
pub fn scrape_with_options(html: &str, options: &Options) -> String {
    emit(&scrape_conversation(html, options))
}

/// Scrape a page into a [`Conversation`] without emitting it.
#[must_use]
pub fn scrape_conversation(html: &str, options: &Options) -> Conversation {
    let doc = dom::parse(html);
    assemble(&doc, options)
}

/// Scrape page bytes, decoding them per their declared charset.
#[must_use]
pub fn scrape_bytes(html: &[u8]) -> String {
    scrape_bytes_with_options(html, &Options::default())
}

/// Scrape page bytes with custom options.
#[must_use]
pub fn scrape_bytes_with_options(html: &[u8], options: &Options) -> String {
    scrape_with_options(&encoding::transcode_to_utf8(html), options)
}
