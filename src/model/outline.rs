//! Library-neutral outline tree.

use serde::{Deserialize, Serialize};

/// Textual destination of an outline entry, e.g. `#page=5&view=Fit`.
///
/// Produced by [`destination::encode`](crate::outline::destination::encode)
/// or read from a document; turned back into a page number by
/// [`destination::decode`](crate::outline::destination::decode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationToken(String);

impl DestinationToken {
    /// Wrap a raw destination string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw destination string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DestinationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single outline entry as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Entry title
    pub title: Option<String>,

    /// Jump target, if it is a page destination
    pub destination: Option<DestinationToken>,

    /// Whether the entry is shown expanded
    pub expanded: bool,

    /// Child entries
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a collapsed leaf entry.
    pub fn new(title: impl Into<String>, destination: Option<DestinationToken>) -> Self {
        Self {
            title: Some(title.into()),
            destination,
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Add a child entry.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }

    /// Builder variant of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: OutlineNode) -> Self {
        self.add_child(child);
        self
    }

    /// Number of entries in this subtree, including this one.
    pub fn total_items(&self) -> usize {
        1 + count_items(&self.children)
    }

    /// Depth of this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + max_depth(&self.children)
    }
}

/// Total number of entries in a forest, nested ones included.
pub(crate) fn count_items(nodes: &[OutlineNode]) -> usize {
    nodes.iter().map(OutlineNode::total_items).sum()
}

/// Depth of a forest (0 when empty).
pub(crate) fn max_depth(nodes: &[OutlineNode]) -> usize {
    nodes.iter().map(OutlineNode::depth).max().unwrap_or(0)
}
