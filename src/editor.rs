//! Editing surface: ties a bookmark list to a document.
//!
//! The editor decides where the baseline comes from. A valid imported list
//! wins over the document's own outline; a failed import is remembered for
//! display and the outline is used instead.

use crate::backend::OutlineBackend;
use crate::error::Result;
use crate::model::{Bookmark, BookmarkList};
use crate::session::DocumentSession;
use crate::worker::SessionHandle;

/// Something that holds an open document and can read and write its
/// bookmarks: a [`DocumentSession`] or a [`SessionHandle`].
pub trait OutlineStore {
    /// The document's outline as flat bookmarks.
    fn load_bookmarks(&mut self) -> Result<Vec<Bookmark>>;

    /// Replace the outline with `bookmarks` and serialize the document.
    fn save_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<Vec<u8>>;
}

impl<B: OutlineBackend> OutlineStore for DocumentSession<B> {
    fn load_bookmarks(&mut self) -> Result<Vec<Bookmark>> {
        self.bookmarks()
    }

    fn save_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<Vec<u8>> {
        self.save(bookmarks)
    }
}

impl OutlineStore for SessionHandle {
    fn load_bookmarks(&mut self) -> Result<Vec<Bookmark>> {
        self.bookmarks()
    }

    fn save_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<Vec<u8>> {
        self.save(bookmarks)
    }
}

/// Outcome of importing an external bookmark list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportStatus {
    /// No import was attempted
    #[default]
    NotRequested,
    /// The imported list is the baseline
    Loaded {
        /// Number of imported bookmarks
        count: usize,
    },
    /// The import failed; the document outline is used instead
    Failed(String),
}

/// Bookmark list plus the bookkeeping of where its baseline came from.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    list: BookmarkList,
    import: ImportStatus,
}

impl Editor {
    /// Create an editor with an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of importing an external list.
    ///
    /// A valid list becomes the baseline right away, replacing a list that
    /// was already loaded (edits included). An error is kept for
    /// [`import_error`](Self::import_error) and leaves the list alone.
    pub fn set_imported(&mut self, imported: Result<Vec<Bookmark>>) {
        match imported {
            Ok(bookmarks) => {
                log::info!("Using {} imported bookmarks", bookmarks.len());
                self.import = ImportStatus::Loaded {
                    count: bookmarks.len(),
                };
                self.list.initialize(bookmarks);
            }
            Err(e) => {
                log::warn!("Bookmark import failed, keeping document outline: {}", e);
                self.import = ImportStatus::Failed(e.to_string());
            }
        }
    }

    /// Take the baseline from the open document unless an import is active.
    pub fn load<S: OutlineStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        if let ImportStatus::Loaded { count } = self.import {
            log::debug!("Keeping {} imported bookmarks over document outline", count);
            return Ok(());
        }
        let bookmarks = store.load_bookmarks()?;
        log::debug!("Loaded {} bookmarks from document outline", bookmarks.len());
        self.list.initialize(bookmarks);
        Ok(())
    }

    /// Write the current list into the document and serialize it.
    pub fn save<S: OutlineStore + ?Sized>(&self, store: &mut S) -> Result<Vec<u8>> {
        store.save_bookmarks(&self.list.snapshot())
    }

    /// How the import went.
    pub fn import_status(&self) -> &ImportStatus {
        &self.import
    }

    /// The import failure message, if the import failed.
    pub fn import_error(&self) -> Option<&str> {
        match &self.import {
            ImportStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The bookmark list being edited.
    pub fn list(&self) -> &BookmarkList {
        &self.list
    }

    /// Mutable access to the bookmark list.
    pub fn list_mut(&mut self) -> &mut BookmarkList {
        &mut self.list
    }
}
