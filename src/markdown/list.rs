//! Ordered and unordered list rendering.
//!
//! Top-level lists render at the left margin; a list nested under an item
//! renders one indent level deeper, right after the parent item's line.
//! Lists nested below that are not indented further: every nested level
//! shares the single extra indent.

use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};

use super::InlineFormatter;

/// Indent applied per nesting level.
const INDENT: &str = "  ";

/// Deepest indent level used; lists nested further are flattened onto it.
const MAX_INDENT_LEVEL: usize = 1;

/// Render a `<ul>`/`<ol>` element as Markdown list lines.
///
/// Each item's line holds the item's own content with any directly nested
/// list removed; nested lists follow on their own lines. Every line,
/// including the last, ends with `\n`.
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] once nesting passes the configured
/// maximum tree depth.
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::{dom, markdown, Options};
/// use grok_convo_scraper::markdown::InlineFormatter;
///
/// let doc = dom::parse("<ol><li>a</li><li>b</li></ol>");
/// let ol = dom::query_all(&doc, "ol")?[0];
/// let options = Options::default();
/// let formatter = InlineFormatter::new(&options);
/// assert_eq!(markdown::render_list(&formatter, &ol, 0, 0)?, "1. a\n2. b\n");
/// # Ok::<(), grok_convo_scraper::Error>(())
/// ```
pub fn render_list(
    formatter: &InlineFormatter,
    list: &NodeRef,
    depth: usize,
    level: usize,
) -> Result<String> {
    let max_depth = formatter.options.max_tree_depth;
    if depth > max_depth {
        return Err(Error::DepthExceeded(max_depth));
    }

    let ordered = dom::is_one_of_tags(list, &["ol"]);
    let indent = INDENT.repeat(level.min(MAX_INDENT_LEVEL));
    let mut output = String::new();
    let mut number = 0usize;

    for item in dom::element_children(list) {
        if !dom::is_one_of_tags(&item, &["li"]) {
            continue;
        }
        number += 1;

        let content = formatter.render_line(&item, depth + 1, true)?;
        let content = content.trim();
        if ordered {
            output.push_str(&format!("{indent}{number}. {content}\n"));
        } else {
            output.push_str(&format!("{indent}- {content}\n"));
        }

        for nested in dom::element_children(&item) {
            if dom::is_one_of_tags(&nested, &["ul", "ol"]) {
                output.push_str(&render_list(formatter, &nested, depth + 2, level + 1)?);
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    fn list(html: &str) -> String {
        let doc = dom::parse(html);
        let node = dom::query_all(&doc, "ul, ol").unwrap()[0];
        let options = Options::default();
        render_list(&InlineFormatter::new(&options), &node, 0, 0).unwrap()
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(list("<ol><li>a</li><li>b</li></ol>"), "1. a\n2. b\n");
    }

    #[test]
    fn test_unordered_list_with_nested_item() {
        assert_eq!(list("<ul><li>parent<ul><li>child</li></ul></li></ul>"), "- parent\n  - child\n");
    }

    #[test]
    fn test_nested_ordered_under_unordered() {
        let html = "<ul><li>one<ol><li>x</li><li>y</li></ol></li><li>two</li></ul>";
        assert_eq!(list(html), "- one\n  1. x\n  2. y\n- two\n");
    }

    #[test]
    fn test_deeper_nesting_shares_one_indent() {
        let html = "<ul><li>a<ul><li>b<ul><li>c</li></ul></li></ul></li></ul>";
        assert_eq!(list(html), "- a\n  - b\n  - c\n");
    }

    #[test]
    fn test_nesting_past_max_depth_is_an_error() {
        let html = format!("{}a{}", "<ul><li>a".repeat(6), "</li></ul>".repeat(6));
        let doc = dom::parse(&html);
        let node = dom::query_all(&doc, "ul").unwrap()[0];
        let options = Options {
            max_tree_depth: 4,
            ..Options::default()
        };
        let result = render_list(&InlineFormatter::new(&options), &node, 0, 0);
        assert!(matches!(result, Err(Error::DepthExceeded(4))));
    }

    #[test]
    fn test_item_formatting_is_kept() {
        let html = "<ul><li><strong>Key:</strong> value with <code>code</code></li></ul>";
        assert_eq!(list(html), "- **Key:** value with `code`\n");
    }

    #[test]
    fn test_multi_paragraph_item_is_one_line() {
        assert_eq!(list("<ol><li><p>first</p><p>second</p></li></ol>"), "1. first second\n");
    }

    #[test]
    fn test_numbering_counts_items_only() {
        assert_eq!(list("<ol><li>a</li><script>x</script><li>b</li></ol>"), "1. a\n2. b\n");
    }
}
