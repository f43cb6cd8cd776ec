//! Alignment-class strategies.
//!
//! Grok lays the human side out with end alignment (`items-end`) and the
//! assistant side with start alignment (`items-start`). The strict strategy
//! only accepts top-level message containers; the relaxed one accepts a
//! looser class combination and classifies each node by its alignment.

use std::collections::HashSet;

use crate::dom::{self, NodeId};
use crate::error::Result;
use crate::result::Turn;

use super::ScanContext;

/// End-aligned containers (human turns).
pub const USER_ALIGNMENT_CLASS: &str = "items-end";

/// Start-aligned containers (assistant turns).
pub const ASSISTANT_ALIGNMENT_CLASS: &str = "items-start";

/// Classes a top-level message container carries all at once. Nested
/// sub-elements reusing an alignment class lack at least one of them.
pub const TOP_LEVEL_CLASSES: &[&str] = &["group", "flex", "flex-col"];

/// Looser container combination for the relaxed strategy.
pub const RELAXED_SELECTOR: &str = ".relative.group.flex";

/// Role-class structural match.
///
/// Queries the two alignment families separately. Both must be present
/// for the strategy to produce anything. User turns are kept as plain text,
/// assistant turns are formatted as Markdown.
pub fn role_class_match<'a>(ctx: &ScanContext<'a>) -> Result<Vec<Turn<'a>>> {
    let users = dom::query_all(ctx.doc, &format!(".{USER_ALIGNMENT_CLASS}"))?;
    let assistants = dom::query_all(ctx.doc, &format!(".{ASSISTANT_ALIGNMENT_CLASS}"))?;

    log::debug!(
        "role-class: {} end-aligned and {} start-aligned candidates",
        users.len(),
        assistants.len()
    );

    if users.is_empty() || assistants.is_empty() {
        return Ok(Vec::new());
    }

    let mut turns = Vec::new();
    let mut taken: HashSet<NodeId> = HashSet::new();

    for node in users {
        if !dom::has_all_classes(&node, TOP_LEVEL_CLASSES) {
            continue;
        }
        if let Some(turn) = ctx.user_turn(node) {
            taken.insert(node.id);
            turns.push(turn);
        }
    }

    // A node carrying both alignment classes stays on the user side
    for node in assistants {
        if taken.contains(&node.id) || !dom::has_all_classes(&node, TOP_LEVEL_CLASSES) {
            continue;
        }
        if let Some(turn) = ctx.assistant_turn(node) {
            turns.push(turn);
        }
    }

    Ok(turns)
}

/// Relaxed structural match.
///
/// Accepts any `.relative.group.flex` container and classifies it by
/// alignment class; containers with neither class are ignored.
pub fn relaxed_match<'a>(ctx: &ScanContext<'a>) -> Result<Vec<Turn<'a>>> {
    let containers = dom::query_all(ctx.doc, RELAXED_SELECTOR)?;
    log::debug!("relaxed-structural: {} containers", containers.len());

    let turns = containers
        .into_iter()
        .filter_map(|node| {
            if dom::has_class(&node, USER_ALIGNMENT_CLASS) {
                ctx.user_turn(node)
            } else if dom::has_class(&node, ASSISTANT_ALIGNMENT_CLASS) {
                ctx.assistant_turn(node)
            } else {
                None
            }
        })
        .collect();

    Ok(turns)
}
