//! Positional fallback: alternate speakers over text blocks.
//!
//! No content classification happens here. Every `div`/`p` with enough text
//! becomes a turn, and roles alternate strictly in document order starting
//! with the user. Containers and their children both qualify, so nested
//! blocks can repeat text; this is the lowest-confidence strategy.

use crate::dom::{self, NodeRef};
use crate::error::Result;
use crate::result::{Speaker, Turn};

use super::ScanContext;

/// Blocks considered by the fallback.
pub const BLOCK_SELECTOR: &str = "div, p";

/// Alternating-paragraph match.
pub fn alternating_paragraphs<'a>(ctx: &ScanContext<'a>) -> Result<Vec<Turn<'a>>> {
    let mut blocks: Vec<NodeRef<'a>> = dom::query_all(ctx.doc, BLOCK_SELECTOR)?
        .into_iter()
        .filter(|node| ctx.text(node).chars().count() > ctx.options.min_paragraph_chars)
        .collect();
    ctx.sort_nodes(&mut blocks);

    log::debug!("alternating-paragraph: {} blocks with substantial text", blocks.len());
    if blocks.len() < 2 {
        return Ok(Vec::new());
    }

    let mut speaker = Speaker::User;
    let mut turns = Vec::with_capacity(blocks.len());
    for node in blocks {
        if let Some(turn) = ctx.speaker_turn(node, speaker) {
            turns.push(turn);
        }
        speaker = speaker.flipped();
    }

    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentOrder;
    use crate::Options;

    #[test]
    fn test_alternates_from_user() {
        let doc = dom::parse(
            "<p>What time is it in Tokyo?</p><p>short</p><p>It is currently late evening there.</p>",
        );
        let order = DocumentOrder::new(&doc);
        let options = Options::default();
        let ctx = ScanContext::new(&doc, &order, &options);

        let turns = alternating_paragraphs(&ctx).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[0].text, "What time is it in Tokyo?");
        assert_eq!(turns[1].speaker, Speaker::Assistant);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly 15 characters each
        let doc = dom::parse("<p>abcdefghijklmno</p><p>pqrstuvwxyzabcd</p>");
        let order = DocumentOrder::new(&doc);
        let options = Options::default();
        let ctx = ScanContext::new(&doc, &order, &options);
        assert!(alternating_paragraphs(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_single_block_yields_nothing() {
        let doc = dom::parse("<p>Just one paragraph of prose.</p>");
        let order = DocumentOrder::new(&doc);
        let options = Options::default();
        let ctx = ScanContext::new(&doc, &order, &options);
        assert!(alternating_paragraphs(&ctx).unwrap().is_empty());
    }
}
