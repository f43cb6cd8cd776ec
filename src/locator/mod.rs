//! Turn location: the strategy cascade.
//!
//! Chat pages change their markup often, so turns are located by an ordered
//! list of independent heuristics. Each strategy is a plain function from the
//! parsed page to a list of speaker-tagged turns. Strategies run lazily in
//! priority order and the first one that yields a plausible conversation
//! (at least two turns, with both speakers present) wins; later strategies
//! are never consulted.
//!
//! # Module Structure
//!
//! - `structural`: alignment-class matches (`items-end` / `items-start`)
//! - `generic`: generic "message"-like selector patterns with keyword roles
//! - `paragraph`: positional alternation over text blocks (lowest confidence)
//! - `title`: document title lookup, independent of the cascade
//!
//! When every strategy comes up empty, [`raw_page_text`] supplies the
//! whole-page text for the raw fallback.

pub mod generic;
pub mod paragraph;
pub mod structural;
pub mod title;

pub use title::extract_title;

use crate::dom::{self, Document, DocumentOrder, NodeRef};
use crate::error::Result;
use crate::markdown;
use crate::result::{Speaker, Turn};
use crate::text;
use crate::Options;

/// Container holding the answer body inside an assistant turn.
const MESSAGE_BUBBLE_SELECTOR: &str = ".message-bubble";

/// Read-only inputs shared by every strategy in one extraction run.
pub struct ScanContext<'a> {
    /// The parsed page.
    pub doc: &'a Document,
    /// Tree-order index of `doc`, built once per run.
    pub order: &'a DocumentOrder,
    /// Thresholds and selectors.
    pub options: &'a Options,
}

impl<'a> ScanContext<'a> {
    /// Bundle a page with its order index and options.
    #[must_use]
    pub fn new(doc: &'a Document, order: &'a DocumentOrder, options: &'a Options) -> Self {
        Self { doc, order, options }
    }

    /// Visible text of a node.
    #[must_use]
    pub fn text(&self, node: &NodeRef) -> String {
        text::get_text(Some(node), self.options)
    }

    /// Sort nodes into document order.
    pub fn sort_nodes(&self, nodes: &mut [NodeRef<'a>]) {
        nodes.sort_by(|a, b| self.order.compare(a, b));
    }

    /// Build a user turn: plain text, kept only when longer than `min_turn_chars`.
    #[must_use]
    pub fn user_turn(&self, node: NodeRef<'a>) -> Option<Turn<'a>> {
        let text = self.text(&node);
        if text.chars().count() <= self.options.min_turn_chars {
            log::debug!("skipping short user candidate ({} chars)", text.chars().count());
            return None;
        }
        Some(self.turn(node, text, Speaker::User))
    }

    /// Build an assistant turn: formatted Markdown, kept when non-empty.
    ///
    /// When the node holds a `.message-bubble`, only the bubble is formatted.
    #[must_use]
    pub fn assistant_turn(&self, node: NodeRef<'a>) -> Option<Turn<'a>> {
        let bubble = dom::query_first(&node, MESSAGE_BUBBLE_SELECTOR).ok().flatten();
        let text = markdown::render_markdown(&bubble.unwrap_or(node), self.options);
        if text.is_empty() {
            log::debug!("skipping empty assistant candidate");
            return None;
        }
        Some(self.turn(node, text, Speaker::Assistant))
    }

    /// Build a turn for an already-resolved speaker.
    #[must_use]
    pub fn speaker_turn(&self, node: NodeRef<'a>, speaker: Speaker) -> Option<Turn<'a>> {
        match speaker {
            Speaker::User => self.user_turn(node),
            Speaker::Assistant => self.assistant_turn(node),
            Speaker::Unknown => None,
        }
    }

    fn turn(&self, node: NodeRef<'a>, text: String, speaker: Speaker) -> Turn<'a> {
        Turn {
            node,
            text,
            dom_position: self.order.position(&node),
            speaker,
        }
    }
}

/// A named turn-location heuristic.
pub struct Strategy {
    /// Name used in logs.
    pub name: &'static str,
    /// The heuristic. An error is local to the strategy and counts as no result.
    pub run: for<'a> fn(&ScanContext<'a>) -> Result<Vec<Turn<'a>>>,
}

/// The cascade, highest confidence first.
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "role-class",
        run: structural::role_class_match,
    },
    Strategy {
        name: "relaxed-structural",
        run: structural::relaxed_match,
    },
    Strategy {
        name: "message-pattern",
        run: generic::message_pattern_match,
    },
    Strategy {
        name: "alternating-paragraph",
        run: paragraph::alternating_paragraphs,
    },
];

/// Whether a candidate set reads as a conversation: two or more turns with
/// both speakers present.
#[must_use]
pub fn is_plausible(turns: &[Turn]) -> bool {
    turns.len() >= 2
        && turns.iter().any(|t| t.speaker == Speaker::User)
        && turns.iter().any(|t| t.speaker == Speaker::Assistant)
}

/// Run the cascade and return the winning turns in document order.
///
/// Returns an empty vector when no strategy finds a conversation.
#[must_use]
pub fn locate_turns<'a>(ctx: &ScanContext<'a>) -> Vec<Turn<'a>> {
    locate_with(ctx, STRATEGIES).map(|(_, turns)| turns).unwrap_or_default()
}

/// Run a custom cascade, returning the winning strategy's name and turns.
#[must_use]
pub fn locate_with<'a>(ctx: &ScanContext<'a>, strategies: &[Strategy]) -> Option<(&'static str, Vec<Turn<'a>>)> {
    for strategy in strategies {
        match (strategy.run)(ctx) {
            Ok(mut turns) => {
                turns.retain(|t| t.speaker != Speaker::Unknown);
                if is_plausible(&turns) {
                    turns.sort_by_key(|t| t.dom_position);
                    log::info!("strategy '{}' found {} turns", strategy.name, turns.len());
                    return Some((strategy.name, turns));
                }
                log::debug!("strategy '{}' found no usable conversation ({} turns)", strategy.name, turns.len());
            }
            Err(e) => log::warn!("strategy '{}' failed: {e}", strategy.name),
        }
    }
    None
}

/// Visible text of the page's main content region, for the raw fallback.
///
/// Uses the first match of `Options::raw_content_selector`, then `<body>`,
/// then the whole document.
pub fn raw_page_text(ctx: &ScanContext) -> Result<String> {
    let region = match dom::query_all(ctx.doc, &ctx.options.raw_content_selector)?.first() {
        Some(main) => *main,
        None => dom::query_all(ctx.doc, "body")?
            .first()
            .copied()
            .unwrap_or_else(|| ctx.doc.root()),
    };
    Ok(ctx.text(&region))
}
