//! Generic "looks like a message" selector patterns.
//!
//! Used when the page carries none of the alignment classes. The first
//! pattern from `Options::message_selectors` with at least two matches
//! supplies the candidates. Nested matches are discarded in favour of their
//! outermost matched ancestor, and each survivor is classified by keyword
//! fragments in its class list and sender attributes.

use std::collections::HashSet;

use crate::dom::{self, NodeId, NodeRef};
use crate::error::Result;
use crate::patterns::{ASSISTANT_CLASS, USER_CLASS};
use crate::result::{Speaker, Turn};

use super::ScanContext;

/// Attributes naming the message author explicitly.
const SENDER_ATTRIBUTES: &[&str] = &["data-sender-type", "data-message-author-role", "data-role"];

/// Generic message-pattern match.
///
/// An invalid selector is logged and skipped. Nodes with no keyword signal
/// take the running role and flip it for the next ambiguous node; a node
/// with a keyword signal sets the running role without flipping.
pub fn message_pattern_match<'a>(ctx: &ScanContext<'a>) -> Result<Vec<Turn<'a>>> {
    let Some(matches) = first_repeated_pattern(ctx) else {
        return Ok(Vec::new());
    };

    let matched: HashSet<NodeId> = matches.iter().map(|node| node.id).collect();
    let mut standalone: Vec<NodeRef<'a>> = matches
        .iter()
        .filter(|node| !dom::has_ancestor_in(node, &matched))
        .copied()
        .filter(|node| ctx.text(node).chars().count() > ctx.options.min_turn_chars)
        .collect();
    ctx.sort_nodes(&mut standalone);

    log::debug!("message-pattern: {} standalone candidates", standalone.len());
    if standalone.len() < 2 {
        return Ok(Vec::new());
    }

    let mut running = Speaker::User;
    let mut turns = Vec::new();
    for node in standalone {
        let detected = classify(&node);
        if let Some(speaker) = detected {
            running = speaker;
        }
        if let Some(turn) = ctx.speaker_turn(node, running) {
            turns.push(turn);
        }
        if detected.is_none() {
            running = running.flipped();
        }
    }

    Ok(turns)
}

/// Matches of the first configured pattern that hits two or more nodes.
fn first_repeated_pattern<'a>(ctx: &ScanContext<'a>) -> Option<Vec<NodeRef<'a>>> {
    for selector in &ctx.options.message_selectors {
        match dom::query_all(ctx.doc, selector) {
            Ok(nodes) if nodes.len() >= 2 => {
                log::debug!("message-pattern: '{selector}' matched {} nodes", nodes.len());
                return Some(nodes);
            }
            Ok(_) => {}
            Err(e) => log::warn!("message-pattern: skipping selector: {e}"),
        }
    }
    None
}

/// Speaker suggested by a node's classes or sender attributes.
///
/// User signals win when both are present.
pub fn classify(node: &NodeRef) -> Option<Speaker> {
    let class = dom::class_name(node);
    let sender = SENDER_ATTRIBUTES
        .iter()
        .find_map(|name| dom::get_attribute(node, name))
        .map(|value| value.trim().to_ascii_lowercase());

    let sender_is = |role: &[&str]| sender.as_deref().is_some_and(|s| role.contains(&s));

    if USER_CLASS.is_match(&class) || sender_is(&["user", "human"]) {
        Some(Speaker::User)
    } else if ASSISTANT_CLASS.is_match(&class) || sender_is(&["assistant", "ai", "bot", "grok"]) {
        Some(Speaker::Assistant)
    } else {
        None
    }
}
