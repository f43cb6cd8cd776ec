//! Rich-turn formatting: HTML fragment to Markdown.
//!
//! A read-only recursive descent over the turn's subtree that writes
//! Markdown directly. The page is never edited and no scratch document is
//! built. Supported markup is the subset chat bubbles actually use:
//! code (fenced and inline), bold/italic, links, images, blockquotes,
//! horizontal rules, headings, lists, tables and paragraphs.
//!
//! Any failure (currently only the nesting guard) falls back to the node's
//! plain visible text, so formatting can never sink a whole extraction.

mod list;
mod table;

pub use list::render_list;
pub use table::render_table;

use url::Url;

use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::patterns::{MULTIPLE_NEWLINES, WHITESPACE_RUN};
use crate::text;
use crate::url_utils;
use crate::Options;

/// Elements treated as block containers (blank line before and after).
const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "header", "footer", "aside", "nav", "figure",
    "figcaption", "details", "summary", "dl", "dd", "dt", "address", "form", "fieldset",
];

/// Render a node's inner markup as Markdown.
///
/// Falls back to [`text::get_text`] on the original node when rendering
/// fails.
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::{dom, markdown, Options};
///
/// let doc = dom::parse("<div><h2>Plan</h2><p>Use <strong>Rust</strong>.</p></div>");
/// let div = dom::query_all(&doc, "div")?[0];
/// assert_eq!(markdown::render_markdown(&div, &Options::default()), "## Plan\n\nUse **Rust**.");
/// # Ok::<(), grok_convo_scraper::Error>(())
/// ```
#[must_use]
pub fn render_markdown(node: &NodeRef, options: &Options) -> String {
    match InlineFormatter::new(options).render(node) {
        Ok(markdown) => markdown,
        Err(e) => {
            log::warn!("markdown rendering failed ({e}); using plain text");
            text::get_text(Some(node), options)
        }
    }
}

/// Collapse runs of three or more newlines to exactly two.
#[must_use]
pub fn collapse_newlines(markdown: &str) -> String {
    MULTIPLE_NEWLINES.replace_all(markdown, "\n\n").into_owned()
}

/// Converts an element's children to Markdown.
pub struct InlineFormatter<'o> {
    options: &'o Options,
    base_url: Option<Url>,
}

impl<'o> InlineFormatter<'o> {
    /// Create a formatter resolving relative URLs against `options.page_url`.
    #[must_use]
    pub fn new(options: &'o Options) -> Self {
        let base_url = options.page_url.as_deref().and_then(url_utils::parse_absolute);
        Self { options, base_url }
    }

    /// Render the children of `node` as a Markdown document fragment.
    pub fn render(&self, node: &NodeRef) -> Result<String> {
        let mut buf = Buffer::default();
        self.children(node, &mut buf, 0)?;
        Ok(buf.finish())
    }

    /// Render the children of `node` as a single line of inline Markdown.
    pub(crate) fn render_line(&self, node: &NodeRef, depth: usize, skip_lists: bool) -> Result<String> {
        let mut buf = Buffer::default();
        for child in node.children() {
            if skip_lists && dom::is_one_of_tags(&child, &["ul", "ol"]) {
                continue;
            }
            self.node(&child, &mut buf, depth)?;
        }
        Ok(WHITESPACE_RUN.replace_all(&buf.finish(), " ").into_owned())
    }

    fn children(&self, node: &NodeRef, buf: &mut Buffer, depth: usize) -> Result<()> {
        for child in node.children() {
            self.node(&child, buf, depth)?;
        }
        Ok(())
    }

    fn node(&self, node: &NodeRef, buf: &mut Buffer, depth: usize) -> Result<()> {
        if node.is_text() {
            buf.text(&node.text());
            return Ok(());
        }
        if !node.is_element() || text::is_hidden(node) {
            return Ok(());
        }

        let depth = depth + 1;
        if depth > self.options.max_tree_depth {
            return Err(Error::DepthExceeded(self.options.max_tree_depth));
        }

        let tag = dom::tag_name(node).unwrap_or_default();
        match tag.as_str() {
            "pre" => {
                let code = fenced_code(node);
                buf.block(&code);
            }
            "code" | "kbd" | "samp" => {
                let code = inline_code(node);
                if !code.is_empty() {
                    buf.inline(&code, edge_space(node));
                }
            }
            "strong" | "b" => self.wrap(node, buf, depth, "**")?,
            "em" | "i" => self.wrap(node, buf, depth, "*")?,
            "a" => self.link(node, buf, depth)?,
            "img" => {
                if let Some(image) = self.image(node) {
                    buf.inline(&image, (false, false));
                }
            }
            "blockquote" => {
                let mut inner = Buffer::default();
                self.children(node, &mut inner, depth)?;
                let inner = inner.finish();
                if !inner.is_empty() {
                    buf.block(&quote_lines(&inner));
                }
            }
            "hr" => buf.block("---"),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(tag.as_bytes()[1] - b'0');
                let heading = self.render_line(node, depth, false)?;
                if !heading.is_empty() {
                    buf.block(&format!("{} {}", "#".repeat(level), heading));
                }
            }
            "ul" | "ol" => {
                let list = render_list(self, node, depth, 0)?;
                if !list.is_empty() {
                    buf.block(list.trim_end_matches('\n'));
                }
            }
            "table" => {
                let table = render_table(self, node, depth)?;
                if !table.is_empty() {
                    buf.block(table.trim_end_matches('\n'));
                }
            }
            "p" => {
                let mut inner = Buffer::default();
                self.children(node, &mut inner, depth)?;
                let inner = inner.finish();
                if !inner.is_empty() {
                    buf.block(&inner);
                }
            }
            "br" => buf.line_break(),
            _ if CONTAINER_TAGS.contains(&tag.as_str()) => {
                buf.paragraph_break();
                self.children(node, buf, depth)?;
                buf.paragraph_break();
            }
            _ => self.children(node, buf, depth)?,
        }

        Ok(())
    }

    fn wrap(&self, node: &NodeRef, buf: &mut Buffer, depth: usize, marker: &str) -> Result<()> {
        let inner = self.render_line(node, depth, false)?;
        let inner = inner.trim();
        if !inner.is_empty() {
            buf.inline(&format!("{marker}{inner}{marker}"), edge_space(node));
        }
        Ok(())
    }

    fn link(&self, node: &NodeRef, buf: &mut Buffer, depth: usize) -> Result<()> {
        let label = self.render_line(node, depth, false)?;
        let label = label.trim();
        let href = node
            .attr("href")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        match href {
            Some(href) => {
                let target = url_utils::resolve(&href, self.base_url.as_ref());
                let label = if label.is_empty() { target.as_str() } else { label };
                buf.inline(&format!("[{label}]({target})"), edge_space(node));
            }
            // Without a target only the text survives
            None if !label.is_empty() => buf.inline(label, edge_space(node)),
            None => {}
        }
        Ok(())
    }

    fn image(&self, node: &NodeRef) -> Option<String> {
        let src = node.attr("src")?.trim().to_string();
        if src.is_empty() {
            return None;
        }
        let alt = node.attr("alt").map(|a| a.trim().to_string()).unwrap_or_default();
        let src = url_utils::resolve(&src, self.base_url.as_ref());
        Some(format!("![{alt}]({src})"))
    }
}

/// Whether the node's raw text starts / ends with whitespace.
fn edge_space(node: &NodeRef) -> (bool, bool) {
    let raw = node.text();
    (
        raw.starts_with(char::is_whitespace),
        raw.ends_with(char::is_whitespace),
    )
}

fn fenced_code(node: &NodeRef) -> String {
    let raw = node.text();
    let code = raw.trim_start_matches('\n').trim_end();
    format!("```\n{code}\n```")
}

fn inline_code(node: &NodeRef) -> String {
    let raw = node.text();
    let code = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    if code.is_empty() {
        return String::new();
    }
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output buffer tracking pending block breaks and inter-word spaces.
#[derive(Default)]
struct Buffer {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
}

impl Buffer {
    fn text(&mut self, raw: &str) {
        let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            if !collapsed.is_empty() {
                self.pending_space = true;
            }
            return;
        }
        self.inline(trimmed, (collapsed.starts_with(' '), collapsed.ends_with(' ')));
    }

    fn inline(&mut self, fragment: &str, (leading, trailing): (bool, bool)) {
        if leading {
            self.pending_space = true;
        }
        self.flush();
        self.out.push_str(fragment);
        self.pending_space = trailing;
    }

    fn block(&mut self, content: &str) {
        self.paragraph_break();
        self.flush();
        self.out.push_str(content);
        self.paragraph_break();
    }

    fn paragraph_break(&mut self) {
        self.pending_breaks = 2;
        self.pending_space = false;
    }

    fn line_break(&mut self) {
        self.flush();
        trim_trailing_spaces(&mut self.out);
        self.out.push('\n');
        self.pending_space = false;
    }

    fn flush(&mut self) {
        if self.pending_breaks > 0 {
            if !self.out.is_empty() {
                trim_trailing_spaces(&mut self.out);
                let existing = self.out.len() - self.out.trim_end_matches('\n').len();
                for _ in existing..self.pending_breaks {
                    self.out.push('\n');
                }
            }
            self.pending_breaks = 0;
            self.pending_space = false;
        } else if self.pending_space {
            if !self.out.is_empty() && !self.out.ends_with(['\n', ' ']) {
                self.out.push(' ');
            }
            self.pending_space = false;
        }
    }

    fn finish(self) -> String {
        collapse_newlines(&self.out).trim().to_string()
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches([' ', '\t']).len();
    out.truncate(kept);
}
