//! The flat bookmark record.

use serde::{Deserialize, Serialize};

/// A single bookmark: a title and the 1-based page it jumps to.
///
/// A page of `0` means the destination could not be resolved when the
/// bookmark was read from a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark {
    /// Display title
    pub name: String,

    /// Target page number (1-indexed, 0 = unknown)
    pub page: u32,
}

impl Bookmark {
    /// Create a new bookmark.
    pub fn new(name: impl Into<String>, page: u32) -> Self {
        Self {
            name: name.into(),
            page,
        }
    }

    /// Whether this bookmark would be accepted by [`BookmarkList::add`].
    ///
    /// [`BookmarkList::add`]: crate::model::BookmarkList::add
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.page >= 1
    }

    /// Whether the page is the unknown-page sentinel.
    pub fn has_unknown_page(&self) -> bool {
        self.page == 0
    }
}

impl std::fmt::Display for Bookmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_unknown_page() {
            write!(f, "{} (page ?)", self.name)
        } else {
            write!(f, "{} (page {})", self.name, self.page)
        }
    }
}
