//! Visible-text extraction.
//!
//! Approximates a browser's rendered text (`innerText`) from the static DOM:
//! whitespace in ordinary text collapses, block boundaries become line
//! breaks, `<br>` is a newline, and script, style and hidden subtrees
//! contribute nothing. When the rendered walk cannot run, the raw text
//! content of the node is used instead.

use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::patterns::{DISPLAY_NONE, WHITESPACE_RUN};
use crate::Options;

/// Elements whose content never renders as text.
pub(crate) const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "svg",
    "iframe", "object", "canvas",
];

/// Elements laid out as blocks (one line break before and after).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "pre", "section", "summary", "table", "ul", "tr",
    "caption", "body", "html",
];

/// Elements whose whitespace is preserved.
const PREFORMATTED_TAGS: &[&str] = &["pre", "textarea", "listing", "plaintext"];

/// Check whether an element is excluded from rendering.
pub(crate) fn is_hidden(node: &NodeRef) -> bool {
    if dom::is_one_of_tags(node, SKIPPED_TAGS) {
        return true;
    }
    if node.attr("hidden").is_some() {
        return true;
    }
    node.attr("style").is_some_and(|style| DISPLAY_NONE.is_match(&style))
}

/// Extract the visible text of a node, trimmed.
///
/// Returns an empty string for a missing node. Never fails: if the rendered
/// walk is aborted (for instance by the nesting guard), the node's raw text
/// content is returned instead.
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::{dom, text, Options};
///
/// let doc = dom::parse("<div><p>Hello</p><p>there</p></div>");
/// let div = dom::query_all(&doc, "div")?[0];
/// assert_eq!(text::get_text(Some(&div), &Options::default()), "Hello\n\nthere");
/// assert_eq!(text::get_text(None, &Options::default()), "");
/// # Ok::<(), grok_convo_scraper::Error>(())
/// ```
#[must_use]
pub fn get_text(node: Option<&NodeRef>, options: &Options) -> String {
    let Some(node) = node else {
        return String::new();
    };

    if !node.is_element() {
        return text_content(node);
    }

    match rendered_text(node, options.max_tree_depth) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("rendered text unavailable ({e}); using raw text content");
            text_content(node)
        }
    }
}

/// Raw text content of a node and its descendants, trimmed.
#[must_use]
pub fn text_content(node: &NodeRef) -> String {
    node.text().trim().to_string()
}

/// Rendered text of an element, trimmed.
pub fn rendered_text(node: &NodeRef, max_depth: usize) -> Result<String> {
    let mut writer = TextWriter::default();
    walk(node, &mut writer, false, 0, max_depth)?;
    Ok(writer.finish())
}

fn walk(
    node: &NodeRef,
    writer: &mut TextWriter,
    preformatted: bool,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    if depth > max_depth {
        return Err(Error::DepthExceeded(max_depth));
    }

    for child in node.children() {
        if child.is_text() {
            writer.text(&child.text(), preformatted);
            continue;
        }
        if !child.is_element() || is_hidden(&child) {
            continue;
        }

        let tag = dom::tag_name(&child).unwrap_or_default();
        match tag.as_str() {
            "br" => writer.hard_break(),
            "p" => {
                writer.block_break(2);
                walk(&child, writer, preformatted, depth + 1, max_depth)?;
                writer.block_break(2);
            }
            "td" | "th" => {
                walk(&child, writer, preformatted, depth + 1, max_depth)?;
                if dom::next_element_sibling(&child).is_some() {
                    writer.tab();
                }
            }
            _ if BLOCK_TAGS.contains(&tag.as_str()) => {
                let pre = preformatted || PREFORMATTED_TAGS.contains(&tag.as_str());
                writer.block_break(1);
                walk(&child, writer, pre, depth + 1, max_depth)?;
                writer.block_break(1);
            }
            _ => {
                let pre = preformatted || PREFORMATTED_TAGS.contains(&tag.as_str());
                walk(&child, writer, pre, depth + 1, max_depth)?;
            }
        }
    }

    Ok(())
}

/// Accumulates rendered text with `innerText`-style required line breaks.
#[derive(Default)]
struct TextWriter {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
}

impl TextWriter {
    fn text(&mut self, raw: &str, preformatted: bool) {
        if preformatted {
            if raw.is_empty() {
                return;
            }
            self.flush();
            self.out.push_str(raw);
            return;
        }

        let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            if !collapsed.is_empty() {
                self.pending_space = true;
            }
            return;
        }

        if collapsed.starts_with(' ') {
            self.pending_space = true;
        }
        self.flush();
        self.out.push_str(trimmed);
        self.pending_space = collapsed.ends_with(' ');
    }

    fn block_break(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
        self.pending_space = false;
    }

    fn hard_break(&mut self) {
        self.flush();
        self.out.push('\n');
        self.pending_space = false;
    }

    fn tab(&mut self) {
        self.flush();
        self.out.push('\t');
        self.pending_space = false;
    }

    fn flush(&mut self) {
        if self.pending_breaks > 0 {
            if !self.out.is_empty() {
                trim_trailing_spaces(&mut self.out);
                for _ in 0..self.pending_breaks {
                    self.out.push('\n');
                }
            }
            self.pending_breaks = 0;
            self.pending_space = false;
        } else if self.pending_space {
            if !self.out.is_empty() && !self.out.ends_with(['\n', '\t', ' ']) {
                self.out.push(' ');
            }
            self.pending_space = false;
        }
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches(' ').len();
    out.truncate(kept);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(html: &str, selector: &str) -> String {
        let doc = dom::parse(html);
        let node = dom::query_all(&doc, selector).unwrap()[0];
        get_text(Some(&node), &Options::default())
    }

    #[test]
    fn test_missing_node_is_empty() {
        assert_eq!(get_text(None, &Options::default()), "");
    }

    #[test]
    fn test_collapses_inline_whitespace() {
        assert_eq!(text_of("<div>  Hello \n\t <b>there</b>  </div>", "div"), "Hello there");
    }

    #[test]
    fn test_blocks_become_lines() {
        let html = "<div id='t'><div>first</div><div>second</div><span>third</span></div>";
        assert_eq!(text_of(html, "#t"), "first\nsecond\nthird");
    }

    #[test]
    fn test_paragraphs_get_blank_lines() {
        assert_eq!(text_of("<div><p>one</p><p>two</p></div>", "div"), "one\n\ntwo");
    }

    #[test]
    fn test_br_is_newline() {
        assert_eq!(text_of("<div>line one<br>line two</div>", "div"), "line one\nline two");
    }

    #[test]
    fn test_hidden_content_is_skipped() {
        let html = r#"<div>shown<script>var x = 1;</script><span hidden>no</span><span style="display: none">nope</span></div>"#;
        assert_eq!(text_of(html, "div"), "shown");
    }

    #[test]
    fn test_pre_keeps_whitespace() {
        let html = "<div><pre>fn main() {\n    run();\n}</pre></div>";
        assert_eq!(text_of(html, "div"), "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_table_cells_are_tab_separated() {
        let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>";
        assert_eq!(text_of(html, "table"), "a\tb\nc\td");
    }

    #[test]
    fn test_depth_guard_falls_back_to_text_content() {
        let html = "<div id='t'><div><div><div><p>deep   text</p></div></div></div></div>";
        let doc = dom::parse(html);
        let node = dom::query_all(&doc, "#t").unwrap()[0];
        let options = Options {
            max_tree_depth: 1,
            ..Options::default()
        };
        assert!(rendered_text(&node, 1).is_err());
        assert_eq!(get_text(Some(&node), &options), "deep   text");
    }
}
