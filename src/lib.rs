//! # pdfmarks
//!
//! Read, edit and rewrite PDF bookmarks (the document outline) as a flat
//! list.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmarks::{BookmarkList, DocumentSession};
//!
//! fn main() -> pdfmarks::Result<()> {
//!     let mut session = DocumentSession::new();
//!     session.open(&std::fs::read("book.pdf")?)?;
//!
//!     // Flatten the outline into an editable list
//!     let mut list = BookmarkList::with_baseline(session.bookmarks()?);
//!     list.add("Appendix", 120);
//!     list.sort_by_page();
//!
//!     // Replace the outline and write the document back out
//!     let bytes = session.save(&list.snapshot())?;
//!     std::fs::write("book_with_bookmarks.pdf", bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - **Flat model**: only top-level outline entries are read; a saved
//!   outline is always a single level of collapsed entries.
//! - **Page destinations only**: entries that do not point at a page of the
//!   document read back as page `0`.
//! - **Atomic rewrite**: a rejected outline leaves the document untouched.
//! - **Off-thread sessions**: [`SessionWorker`] runs a session on its own
//!   thread behind a request/response handle.

pub mod backend;
pub mod detect;
pub mod editor;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod options;
pub mod outline;
pub mod session;
pub mod worker;

// Re-export commonly used types
pub use backend::{LopdfBackend, OutlineBackend};
pub use detect::{is_pdf_bytes, sniff_header, PdfHeader};
pub use editor::{Editor, ImportStatus, OutlineStore};
pub use error::{Error, Result};
pub use export::JsonFormat;
pub use model::{Bookmark, BookmarkList, DestinationToken, OutlineNode};
pub use options::SaveOptions;
pub use session::DocumentSession;
pub use worker::{SessionHandle, SessionWorker};

use std::path::Path;

/// Read the flattened bookmarks of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfmarks::read_bookmarks;
///
/// for bookmark in read_bookmarks("book.pdf").unwrap() {
///     println!("{}", bookmark);
/// }
/// ```
pub fn read_bookmarks<P: AsRef<Path>>(path: P) -> Result<Vec<Bookmark>> {
    read_bookmarks_from_bytes(&std::fs::read(path)?)
}

/// Read the flattened bookmarks of a PDF held in memory.
pub fn read_bookmarks_from_bytes(data: &[u8]) -> Result<Vec<Bookmark>> {
    let mut session = DocumentSession::new();
    session.open(data)?;
    session.bookmarks()
}

/// Replace the outline of a PDF held in memory and return the new file.
///
/// Uses the default [`SaveOptions`].
///
/// # Example
///
/// ```no_run
/// use pdfmarks::{write_bookmarks, Bookmark};
///
/// let data = std::fs::read("book.pdf").unwrap();
/// let marks = vec![Bookmark::new("Intro", 1), Bookmark::new("Finale", 42)];
/// std::fs::write("book_with_bookmarks.pdf", write_bookmarks(&data, &marks).unwrap()).unwrap();
/// ```
pub fn write_bookmarks(data: &[u8], bookmarks: &[Bookmark]) -> Result<Vec<u8>> {
    write_bookmarks_with_options(data, bookmarks, SaveOptions::default())
}

/// Replace the outline of a PDF held in memory with custom save options.
pub fn write_bookmarks_with_options(
    data: &[u8],
    bookmarks: &[Bookmark],
    options: SaveOptions,
) -> Result<Vec<u8>> {
    let mut session = DocumentSession::<LopdfBackend>::with_options(options);
    session.open(data)?;
    session.save(bookmarks)
}
