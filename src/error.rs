//! Error types for grok-convo-scraper.
//!
//! Most extraction failures are recovered where they happen (a bad selector
//! or an over-deep subtree degrades a single turn). The variants here are the
//! ones that cross a module boundary.

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A CSS selector could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A subtree was nested deeper than `Options::max_tree_depth`.
    #[error("DOM nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    /// A command arrived before the scraper was initialized on the page.
    #[error("Scraper is not loaded on this page")]
    NotInitialized,

    /// The trigger message named an action the scraper does not handle.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The download collaborator rejected the document.
    #[error("Download failed: {0}")]
    Sink(String),

    /// Filesystem failure while saving a document.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The trigger message was not valid JSON.
    #[error("Malformed message: {0}")]
    Message(#[from] serde_json::Error),
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;
