//! Conversation assembly.
//!
//! Drives the locator over a parsed page and turns the result into the
//! speaker-tagged Markdown body. Assembly never fails: when no conversation
//! is found the page text is captured raw, and when even that fails the
//! body carries an error section.

use chrono::Local;

use crate::dom::{Document, DocumentOrder};
use crate::locator::{self, ScanContext};
use crate::options::Options;
use crate::result::{Content, Conversation, Message, Speaker};

/// Heading of the continuation section.
pub const INSTRUCTIONS_HEADING: &str = "## Instructions for Grok";

/// Heading of the raw fallback section.
pub const RAW_HEADING: &str = "## Raw Content";

/// Disclaimer closing the raw fallback section.
pub const RAW_DISCLAIMER: &str =
    "*Note: The scraper couldn't identify the conversation structure. This is the raw page content.*";

/// Locate turns and title in `doc` and assemble the conversation.
#[must_use]
pub fn assemble(doc: &Document, options: &Options) -> Conversation {
    let order = DocumentOrder::new(doc);
    let ctx = ScanContext::new(doc, &order, options);

    let title = locator::extract_title(&ctx);
    let messages: Vec<Message> = locator::locate_turns(&ctx).iter().map(|t| t.to_message()).collect();

    let (content, body) = if messages.is_empty() {
        match locator::raw_page_text(&ctx) {
            Ok(raw) => {
                log::info!("no conversation structure found, using raw page content ({} chars)", raw.len());
                let body = render_raw(&raw);
                (Content::Raw(raw), body)
            }
            Err(e) => {
                log::warn!("raw page capture failed: {e}");
                let message = e.to_string();
                let body = render_error(&message);
                (Content::Failed(message), body)
            }
        }
    } else {
        let body = render_turns(&messages, options);
        (Content::Turns(messages), body)
    };

    let conversation = Conversation {
        title,
        exported_at: Local::now(),
        content,
        body,
    };

    let (users, assistants) = conversation.counts();
    log::info!(
        "assembled '{}': {users} {} turns, {assistants} {} turns",
        conversation.title,
        options.user_heading,
        options.assistant_heading
    );
    conversation
}

/// Speaker sections followed by the instructions section.
pub(crate) fn render_turns(messages: &[Message], options: &Options) -> String {
    let mut body = String::new();
    for message in messages {
        match message.speaker {
            Speaker::User => {
                body.push_str(&format!("## {}\n\n", options.user_heading));
                body.push_str(&quote(&message.text));
                body.push_str("\n\n");
            }
            Speaker::Assistant => {
                body.push_str(&format!("## {}\n\n{}\n\n", options.assistant_heading, message.text));
            }
            Speaker::Unknown => {}
        }
    }

    if options.include_instructions {
        body.push_str(&format!("{INSTRUCTIONS_HEADING}\n\n{}\n", options.instructions));
    }
    body
}

/// Prefix every line with `> `.
fn quote(text: &str) -> String {
    text.split('\n').map(|line| format!("> {line}")).collect::<Vec<_>>().join("\n")
}

fn render_raw(raw: &str) -> String {
    format!("{RAW_HEADING}\n\n{raw}\n\n{RAW_DISCLAIMER}\n")
}

fn render_error(message: &str) -> String {
    format!("## Error\n\nFailed to extract content: {message}\n")
}
