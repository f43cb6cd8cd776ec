//! Command dispatch around the extraction core.
//!
//! A host (browser bridge, CLI, test harness) hands the scraper a loaded
//! [`Page`] and a JSON trigger message. The scraper assembles the document,
//! passes it to a [`DownloadSink`], notifies a [`TelemetrySink`] and answers
//! with a [`ScrapeResponse`].
//!
//! ```
//! use grok_convo_scraper::{Options, Page, Scraper};
//!
//! let saved: Vec<(String, String, String)> = Vec::new();
//! let mut scraper = Scraper::new(Options::default(), saved);
//! scraper.initialize();
//!
//! let page = Page::new("<main><p>Nothing to see</p></main>");
//! let response = scraper.handle_message(&page, r#"{"action":"scrape"}"#);
//! assert!(response.success);
//!
//! let (content, filename, _) = &scraper.sink()[0];
//! assert_eq!(filename, "grok-conversation.md");
//! assert!(content.contains("## Raw Content"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::assemble::assemble;
use crate::dom;
use crate::emit::emit;
use crate::error::{Error, Result};
use crate::options::{Options, MARKDOWN_MIME};
use crate::result::{Conversation, ScrapeResponse};
use crate::url_utils;

/// Response message after a successful scrape.
pub const SCRAPED_MESSAGE: &str = "Conversation scraped and downloaded";

/// A loaded page as supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Serialized DOM.
    pub html: String,
    /// Address of the page, when known.
    pub url: Option<String>,
    /// Document title reported by the host, used for logging.
    pub title: Option<String>,
}

impl Page {
    /// A page with no URL or title.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    /// Set the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the host-reported title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Commands the scraper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Extract the conversation and hand it to the download sink.
    Scrape,
}

#[derive(Deserialize)]
struct Trigger {
    action: String,
}

impl Command {
    /// Parse a trigger message such as `{"action":"scrape"}`.
    pub fn from_message(message: &str) -> Result<Self> {
        let trigger: Trigger = serde_json::from_str(message)?;
        match trigger.action.as_str() {
            "scrape" => Ok(Self::Scrape),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// Receives finished documents.
pub trait DownloadSink {
    /// Save `content` under the suggested `filename`.
    fn save(&mut self, content: &str, filename: &str, mime_type: &str) -> Result<()>;
}

/// Collects documents in memory as `(content, filename, mime_type)`.
impl DownloadSink for Vec<(String, String, String)> {
    fn save(&mut self, content: &str, filename: &str, mime_type: &str) -> Result<()> {
        self.push((content.to_string(), filename.to_string(), mime_type.to_string()));
        Ok(())
    }
}

/// Writes documents into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileSink {
    fn save(&mut self, content: &str, filename: &str, _mime_type: &str) -> Result<()> {
        // Only the final component is honoured
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::Sink(format!("invalid filename: {filename:?}")))?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, content)?;
        log::info!("saved {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

/// Notified once per successful scrape.
pub trait TelemetrySink {
    /// A document was produced and saved.
    fn scraped(&mut self);
}

impl TelemetrySink for () {
    fn scraped(&mut self) {}
}

/// In-memory count of successful scrapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeCounter {
    count: u64,
}

impl ScrapeCounter {
    /// Scrapes counted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl TelemetrySink for ScrapeCounter {
    fn scraped(&mut self) {
        self.count += 1;
    }
}

/// Command handler owning its options, sinks and run-once init guard.
#[derive(Debug)]
pub struct Scraper<D: DownloadSink, T: TelemetrySink = ()> {
    options: Options,
    sink: D,
    telemetry: T,
    initialized: bool,
}

impl<D: DownloadSink> Scraper<D> {
    /// Scraper without telemetry.
    #[must_use]
    pub fn new(options: Options, sink: D) -> Self {
        Self::with_telemetry(options, sink, ())
    }
}

impl<D: DownloadSink, T: TelemetrySink> Scraper<D, T> {
    /// Scraper reporting successful scrapes to `telemetry`.
    #[must_use]
    pub fn with_telemetry(options: Options, sink: D, telemetry: T) -> Self {
        Self {
            options,
            sink,
            telemetry,
            initialized: false,
        }
    }

    /// Mark the scraper as loaded. Returns `true` only for the call that
    /// performed the initialization.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            log::debug!("scraper already initialized");
            return false;
        }
        self.initialized = true;
        log::debug!("scraper initialized");
        true
    }

    /// Whether [`initialize`](Self::initialize) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The download sink.
    #[must_use]
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// The telemetry sink.
    #[must_use]
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Handle a JSON trigger message. Every failure becomes a
    /// `{ success: false }` response.
    pub fn handle_message(&mut self, page: &Page, message: &str) -> ScrapeResponse {
        match Command::from_message(message).and_then(|command| self.dispatch(page, command)) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("scrape command failed: {e}");
                ScrapeResponse::failed(format!("Error: {e}"))
            }
        }
    }

    /// Run a parsed command.
    pub fn dispatch(&mut self, page: &Page, command: Command) -> Result<ScrapeResponse> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        match command {
            Command::Scrape => {
                let markdown = emit(&self.scrape(page));
                self.sink.save(&markdown, &self.options.filename, MARKDOWN_MIME)?;
                self.telemetry.scraped();
                Ok(ScrapeResponse::ok(SCRAPED_MESSAGE))
            }
        }
    }

    /// Assemble the conversation on `page` without saving it.
    #[must_use]
    pub fn scrape(&self, page: &Page) -> Conversation {
        log::info!(
            "scraping page url={} title={}",
            page.url.as_deref().unwrap_or("-"),
            page.title.as_deref().unwrap_or("-")
        );
        if let Some(url) = page.url.as_deref() {
            if !url_utils::is_target_page(url, &self.options.target_host) {
                log::info!("{url} is not on {}, results may be poor", self.options.target_host);
            }
        }

        let doc = dom::parse(&page.html);
        if self.options.page_url.is_none() && page.url.is_some() {
            let options = Options {
                page_url: page.url.clone(),
                ..self.options.clone()
            };
            assemble(&doc, &options)
        } else {
            assemble(&doc, &self.options)
        }
    }
}
