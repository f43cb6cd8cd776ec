//! Conversation title lookup.

use crate::dom;
use crate::patterns::WHITESPACE_RUN;

use super::ScanContext;

/// Title of the conversation.
///
/// The first element matching `Options::title_selector` in document order
/// whose visible text is non-empty supplies the title, collapsed onto one
/// line. Falls back to `Options::default_title`.
#[must_use]
pub fn extract_title(ctx: &ScanContext) -> String {
    let mut candidates = match dom::query_all(ctx.doc, &ctx.options.title_selector) {
        Ok(nodes) => nodes,
        Err(e) => {
            log::warn!("title lookup failed: {e}");
            return ctx.options.default_title.clone();
        }
    };
    ctx.sort_nodes(&mut candidates);

    for node in &candidates {
        let text = WHITESPACE_RUN.replace_all(&ctx.text(node), " ").trim().to_string();
        if !text.is_empty() {
            log::debug!("using title: {text}");
            return text;
        }
    }

    log::debug!("no title element with text among {} candidates", candidates.len());
    ctx.options.default_title.clone()
}
