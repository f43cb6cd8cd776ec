//! Result types for scraping output.
//!
//! `Turn` is the transient, DOM-borrowing form produced by the locator.
//! `Conversation` is the owned document handed to the emitter; it no longer
//! references the page once assembly is done.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::dom::NodeRef;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// The human side of the chat.
    User,
    /// The AI side of the chat.
    Assistant,
    /// Not yet classified. Never reaches rendering.
    Unknown,
}

impl Speaker {
    /// The opposite role. `Unknown` stays `Unknown`.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::User => Self::Assistant,
            Self::Assistant => Self::User,
            Self::Unknown => Self::Unknown,
        }
    }
}

/// A located turn with its rendered text.
#[derive(Clone)]
pub struct Turn<'a> {
    /// The element holding the turn (borrowed from the page, never edited).
    pub node: NodeRef<'a>,
    /// Rendered Markdown (assistant) or plain text (user).
    pub text: String,
    /// Tree-order index of `node`; ascending order is conversation order.
    pub dom_position: usize,
    /// Resolved speaker.
    pub speaker: Speaker,
}

impl fmt::Debug for Turn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Turn")
            .field("speaker", &self.speaker)
            .field("dom_position", &self.dom_position)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl Turn<'_> {
    /// Detach from the page, keeping what the document needs.
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message {
            speaker: self.speaker,
            text: self.text.clone(),
            dom_position: self.dom_position,
        }
    }
}

/// An owned turn inside an assembled conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Resolved speaker.
    pub speaker: Speaker,
    /// Rendered Markdown (assistant) or plain text (user).
    pub text: String,
    /// Tree-order index of the source node.
    pub dom_position: usize,
}

/// What the extraction found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Conversational turns, in ascending DOM order.
    Turns(Vec<Message>),
    /// No conversation structure; the page's visible text instead.
    Raw(String),
    /// Even the raw capture failed; the error message.
    Failed(String),
}

/// An assembled conversation document.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Title line text.
    pub title: String,
    /// When the export was produced.
    pub exported_at: DateTime<Local>,
    /// Turns or fallback text.
    pub content: Content,
    /// Speaker-tagged Markdown body (everything after the timestamp line).
    pub body: String,
}

impl Conversation {
    /// Number of (user, assistant) turns.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        match &self.content {
            Content::Turns(messages) => {
                let users = messages.iter().filter(|m| m.speaker == Speaker::User).count();
                (users, messages.len() - users)
            }
            Content::Raw(_) | Content::Failed(_) => (0, 0),
        }
    }

    /// Messages when a conversation was found, empty otherwise.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        match &self.content {
            Content::Turns(messages) => messages,
            Content::Raw(_) | Content::Failed(_) => &[],
        }
    }

    /// The raw-page text when no conversation was found.
    #[must_use]
    pub fn raw_fallback(&self) -> Option<&str> {
        match &self.content {
            Content::Raw(text) => Some(text),
            Content::Turns(_) | Content::Failed(_) => None,
        }
    }
}

/// Reply to a trigger command, serialized as `{ "success": .., "message": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    /// Whether the document was produced and saved.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl ScrapeResponse {
    /// Successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Failed outcome.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(speaker: Speaker) -> Message {
        Message {
            speaker,
            text: "text".to_string(),
            dom_position: 0,
        }
    }

    #[test]
    fn speaker_flip() {
        assert_eq!(Speaker::User.flipped(), Speaker::Assistant);
        assert_eq!(Speaker::Assistant.flipped(), Speaker::User);
        assert_eq!(Speaker::Unknown.flipped(), Speaker::Unknown);
    }

    #[test]
    fn counts_split_by_speaker() {
        let conversation = Conversation {
            title: "t".to_string(),
            exported_at: Local::now(),
            content: Content::Turns(vec![
                message(Speaker::User),
                message(Speaker::Assistant),
                message(Speaker::User),
            ]),
            body: String::new(),
        };
        assert_eq!(conversation.counts(), (2, 1));
        assert!(conversation.raw_fallback().is_none());
    }

    #[test]
    fn response_serializes_to_extension_shape() {
        let json = serde_json::to_string(&ScrapeResponse::ok("done")).unwrap();
        assert_eq!(json, r#"{"success":true,"message":"done"}"#);
    }
}
