//! Document session: the single owner of an open document.

use crate::backend::{LopdfBackend, OutlineBackend};
use crate::error::{Error, Result};
use crate::model::{Bookmark, OutlineNode};
use crate::options::SaveOptions;
use crate::outline::{flatten, rebuild};

/// Owns at most one open document.
///
/// Opening a new document drops the previous one. Every outline operation
/// on an empty session fails with [`Error::NoDocumentLoaded`].
///
/// # Example
///
/// ```no_run
/// use pdfmarks::{Bookmark, DocumentSession};
///
/// let mut session = DocumentSession::new();
/// session.open(&std::fs::read("book.pdf")?)?;
///
/// let mut bookmarks = session.bookmarks()?;
/// bookmarks.push(Bookmark::new("Appendix", 120));
/// std::fs::write("book_with_bookmarks.pdf", session.save(&bookmarks)?)?;
/// # Ok::<(), pdfmarks::Error>(())
/// ```
pub struct DocumentSession<B: OutlineBackend = LopdfBackend> {
    document: Option<B>,
    options: SaveOptions,
}

impl DocumentSession<LopdfBackend> {
    /// Create an empty session backed by lopdf.
    pub fn new() -> Self {
        Self::with_options(SaveOptions::default())
    }
}

impl Default for DocumentSession<LopdfBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: OutlineBackend> DocumentSession<B> {
    /// Create an empty session with custom save options.
    pub fn with_options(options: SaveOptions) -> Self {
        Self {
            document: None,
            options,
        }
    }

    /// Parse `data` and make it the open document.
    ///
    /// If parsing fails, a previously open document stays open.
    pub fn open(&mut self, data: &[u8]) -> Result<()> {
        let document = B::load(data)?;
        let pages = document.page_count();
        if self.document.replace(document).is_some() {
            log::debug!("Released previously open document");
        }
        log::info!("Opened document ({} bytes, {} pages)", data.len(), pages);
        Ok(())
    }

    /// Drop the open document, if any.
    pub fn close(&mut self) {
        if self.document.take().is_some() {
            log::info!("Closed document");
        }
    }

    /// Check if a document is open.
    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Number of pages of the open document.
    pub fn page_count(&self) -> Result<u32> {
        Ok(self.document()?.page_count())
    }

    /// The full native outline, nesting included.
    pub fn outline(&self) -> Result<Vec<OutlineNode>> {
        self.document()?.read_outline()
    }

    /// The native outline flattened to top-level bookmarks.
    ///
    /// Only the top-level chain is read; nested entries are never visited.
    pub fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        Ok(flatten(&self.document()?.read_top_level()?))
    }

    /// Replace the native outline with `bookmarks` without serializing.
    pub fn write_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<()> {
        rebuild(self.document_mut()?, bookmarks)
    }

    /// Replace the native outline with `bookmarks` and serialize the document.
    pub fn save(&mut self, bookmarks: &[Bookmark]) -> Result<Vec<u8>> {
        self.write_bookmarks(bookmarks)?;
        self.serialize()
    }

    /// Serialize the document as it currently is.
    pub fn serialize(&mut self) -> Result<Vec<u8>> {
        let options = self.options.clone();
        let bytes = self.document_mut()?.save(&options)?;
        log::info!("Serialized document ({} bytes)", bytes.len());
        Ok(bytes)
    }

    /// Options applied on save.
    pub fn save_options(&self) -> &SaveOptions {
        &self.options
    }

    /// Change the options applied on save.
    pub fn set_save_options(&mut self, options: SaveOptions) {
        self.options = options;
    }

    fn document(&self) -> Result<&B> {
        self.document.as_ref().ok_or(Error::NoDocumentLoaded)
    }

    fn document_mut(&mut self) -> Result<&mut B> {
        self.document.as_mut().ok_or(Error::NoDocumentLoaded)
    }
}
