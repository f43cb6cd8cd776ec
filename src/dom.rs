//! DOM Operations Adapter
//!
//! Read-only helpers over the `dom_query` crate. Scraping never edits the
//! parsed page: every function here takes a `NodeRef` borrowed from the
//! document and returns owned strings or further borrowed nodes.

use std::collections::{HashMap, HashSet};

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};
pub use tendril::StrTendril;

use dom_query::Matcher;

use crate::error::{Error, Result};

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Tag/Node Information ===

/// Get tag name (lowercase). `None` for text, comment and document nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Check whether the node is an element with one of the given tag names.
#[must_use]
pub fn is_one_of_tags(node: &NodeRef, tags: &[&str]) -> bool {
    tag_name(node).is_some_and(|t| tags.contains(&t.as_str()))
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Get the class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class_name(node: &NodeRef) -> String {
    get_attribute(node, "class").unwrap_or_default()
}

/// Check for a whole class token, as `classList.contains` does.
#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    class_name(node).split_ascii_whitespace().any(|c| c == class)
}

/// Check that every listed class token is present.
#[must_use]
pub fn has_all_classes(node: &NodeRef, classes: &[&str]) -> bool {
    let class_attr = class_name(node);
    let tokens: Vec<&str> = class_attr.split_ascii_whitespace().collect();
    classes.iter().all(|c| tokens.contains(c))
}

// === Tree Navigation ===

/// Direct element children, skipping text and comment nodes.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// True when any proper ancestor of `node` is in `ids`.
#[must_use]
pub fn has_ancestor_in(node: &NodeRef, ids: &HashSet<NodeId>) -> bool {
    node.ancestors(None).iter().any(|a| ids.contains(&a.id))
}

// === Querying ===

fn matcher(selector: &str) -> Result<Matcher> {
    Matcher::new(selector).map_err(|_| Error::InvalidSelector(selector.to_string()))
}

/// Query all elements of the document matching a CSS selector.
///
/// Unlike `Document::select`, an unparsable selector is reported as
/// `Error::InvalidSelector` instead of panicking.
pub fn query_all<'a>(doc: &'a Document, selector: &str) -> Result<Vec<NodeRef<'a>>> {
    let matcher = matcher(selector)?;
    Ok(doc.select_matcher(&matcher).nodes().to_vec())
}

/// Query descendants of `node` matching a CSS selector.
pub fn query_within<'a>(node: &NodeRef<'a>, selector: &str) -> Result<Vec<NodeRef<'a>>> {
    let matcher = matcher(selector)?;
    Ok(Selection::from(*node).select_matcher(&matcher).nodes().to_vec())
}

/// First descendant of `node` matching a CSS selector.
pub fn query_first<'a>(node: &NodeRef<'a>, selector: &str) -> Result<Option<NodeRef<'a>>> {
    Ok(query_within(node, selector)?.into_iter().next())
}

// === Document Order ===

/// Tree-order index of every node in a document.
///
/// Built with a single pre-order walk, after which position lookups and
/// comparisons are constant time.
#[derive(Debug, Default)]
pub struct DocumentOrder {
    positions: HashMap<NodeId, usize>,
}

impl DocumentOrder {
    /// Index every node reachable from the document root.
    #[must_use]
    pub fn new(doc: &Document) -> Self {
        let mut positions = HashMap::new();
        let mut stack = vec![doc.root()];
        let mut next = 0usize;

        while let Some(node) = stack.pop() {
            positions.insert(node.id, next);
            next += 1;
            // Reverse so the first child is popped first
            for child in node.children().into_iter().rev() {
                stack.push(child);
            }
        }

        Self { positions }
    }

    /// Document position of a node. Nodes outside the indexed document sort last.
    #[must_use]
    pub fn position(&self, node: &NodeRef) -> usize {
        self.positions.get(&node.id).copied().unwrap_or(usize::MAX)
    }

    /// Compare two nodes by tree order.
    #[must_use]
    pub fn compare(&self, a: &NodeRef, b: &NodeRef) -> std::cmp::Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
