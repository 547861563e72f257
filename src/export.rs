//! Exporting bookmark lists and naming output files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Bookmark;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize bookmarks as a JSON array of `{name, page}` objects.
pub fn to_json(bookmarks: &[Bookmark], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(bookmarks),
        JsonFormat::Compact => serde_json::to_string(bookmarks),
    };

    result.map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))
}

/// File name for exported bookmarks: `<stem>_bookmarks.json`.
pub fn bookmarks_file_name(source: Option<&Path>) -> String {
    match file_stem(source) {
        Some(stem) => format!("{}_bookmarks.json", stem),
        None => "bookmarks.json".to_string(),
    }
}

/// File name for a saved document: `<stem>_with_bookmarks.pdf`.
///
/// Spaces in the stem become underscores.
pub fn output_pdf_name(source: Option<&Path>) -> String {
    let stem = file_stem(source)
        .map(|stem| stem.trim().split(' ').collect::<Vec<_>>().join("_"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string());
    format!("{}_with_bookmarks.pdf", stem)
}

fn file_stem(source: Option<&Path>) -> Option<String> {
    source
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().to_string())
}
