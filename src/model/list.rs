//! Editable bookmark list with a reset baseline.

use super::Bookmark;
use crate::error::{Error, Result};

/// An ordered, editable list of bookmarks.
///
/// The baseline is captured by [`initialize`](Self::initialize) and never
/// changes afterwards; [`reset`](Self::reset) copies it back into the
/// current list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkList {
    current: Vec<Bookmark>,
    baseline: Vec<Bookmark>,
}

impl BookmarkList {
    /// Create an empty list with an empty baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list whose current state and baseline are both `bookmarks`.
    pub fn with_baseline(bookmarks: Vec<Bookmark>) -> Self {
        let mut list = Self::new();
        list.initialize(bookmarks);
        list
    }

    /// Replace both the current list and the baseline.
    pub fn initialize(&mut self, bookmarks: Vec<Bookmark>) {
        self.baseline = bookmarks.clone();
        self.current = bookmarks;
    }

    /// Append a bookmark.
    ///
    /// Returns `false` and leaves the list untouched when the name is blank
    /// or the page is below 1.
    pub fn add(&mut self, name: impl Into<String>, page: u32) -> bool {
        self.try_add(name, page).is_ok()
    }

    /// Append a bookmark, reporting why it was rejected.
    pub fn try_add(&mut self, name: impl Into<String>, page: u32) -> Result<()> {
        let bookmark = Bookmark::new(name, page);
        if !bookmark.is_valid() {
            let reason = if bookmark.name.trim().is_empty() {
                "name is empty".to_string()
            } else {
                format!("page must be at least 1, got {}", page)
            };
            return Err(Error::InvalidBookmarkInput(reason));
        }
        self.current.push(bookmark);
        Ok(())
    }

    /// Remove and return the bookmark at `index`.
    pub fn delete_at(&mut self, index: usize) -> Result<Bookmark> {
        self.check_index(index)?;
        Ok(self.current.remove(index))
    }

    /// Move the bookmark at `from` so that it ends up at position `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let bookmark = self.current.remove(from);
            self.current.insert(to, bookmark);
        }
        Ok(())
    }

    /// Stable sort by page number, ascending.
    pub fn sort_by_page(&mut self) {
        // Vec::sort_by_key is stable; equal pages keep their order.
        self.current.sort_by_key(|b| b.page);
    }

    /// Restore the current list to the baseline.
    pub fn reset(&mut self) {
        self.current = self.baseline.clone();
    }

    /// Copy of the current list.
    pub fn snapshot(&self) -> Vec<Bookmark> {
        self.current.clone()
    }

    /// The baseline captured at initialization.
    pub fn baseline(&self) -> &[Bookmark] {
        &self.baseline
    }

    /// Whether the current list differs from the baseline.
    pub fn is_modified(&self) -> bool {
        self.current != self.baseline
    }

    /// Get the bookmark at `index`.
    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.current.get(index)
    }

    /// Iterate over the current bookmarks.
    pub fn iter(&self) -> std::slice::Iter<'_, Bookmark> {
        self.current.iter()
    }

    /// Number of bookmarks in the current list.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Check if the current list is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.current.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.current.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[Bookmark]> for BookmarkList {
    fn as_ref(&self) -> &[Bookmark] {
        &self.current
    }
}

impl<'a> IntoIterator for &'a BookmarkList {
    type Item = &'a Bookmark;
    type IntoIter = std::slice::Iter<'a, Bookmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
