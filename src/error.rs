//! Error types for pdfmarks.

use std::io;
use thiserror::Error;

/// Result type alias for pdfmarks operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, editing or writing bookmarks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// A required PDF object is missing.
    #[error("Missing required object: {0}")]
    MissingObject(String),

    /// An outline operation was issued before a document was opened.
    #[error("Document not loaded")]
    NoDocumentLoaded,

    /// A destination did not carry a recognizable page fragment.
    ///
    /// Decoding absorbs this into the unknown page `0`; it only surfaces
    /// from the strict parsing helpers.
    #[error("Malformed destination: {0}")]
    MalformedDestination(String),

    /// A bookmark failed validation (blank name or page below 1).
    #[error("Invalid bookmark: {0}")]
    InvalidBookmarkInput(String),

    /// An imported bookmark list could not be fetched or has the wrong shape.
    #[error("Invalid bookmark source: {0}")]
    ExternalSourceInvalid(String),

    /// The document could not be written out.
    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    /// A list index is outside the bookmark list.
    #[error("Index {index} is out of range (list has {len} bookmarks)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A bookmark points past the end of the document.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The session worker thread is gone.
    #[error("Session worker disconnected")]
    WorkerDisconnected,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ExternalSourceInvalid(err.to_string())
    }
}
