//! PDF header sniffing.
//!
//! Runs before handing bytes to the parser so that obviously wrong input
//! (HTML error pages, JSON, empty buffers) fails fast with
//! [`Error::UnknownFormat`] instead of a parser diagnostic.

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept the header anywhere in the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// Information taken from the `%PDF-x.y` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the header (non-zero when junk precedes it)
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Locate and validate the PDF header in `data`.
///
/// # Example
/// ```
/// use pdfmarks::detect::sniff_header;
///
/// let header = sniff_header(b"%PDF-1.7\n%...").unwrap();
/// assert_eq!(header.version, "1.7");
/// ```
pub fn sniff_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(version_bytes) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version, offset })
}

/// `d.d` with a major version of 1 or 2.
fn is_valid_version(v: &[u8]) -> bool {
    matches!(v, [major @ (b'1' | b'2'), b'.', minor] if minor.is_ascii_digit() && (*major == b'1' || *minor == b'0'))
}

/// Check if bytes start like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_header(data).is_ok()
}
