//! Importing bookmark lists from JSON.
//!
//! An imported list must be a JSON array of objects, each with a string
//! `name` and a numeric `page`. Extra fields are ignored. Every failure,
//! whether reading the source or validating it, is reported as
//! [`Error::ExternalSourceInvalid`] so callers can show it and fall back to
//! the document's own outline.

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Bookmark;

/// Parse and validate a JSON bookmark list.
///
/// ```
/// use pdfmarks::import::parse_bookmarks;
///
/// let bookmarks = parse_bookmarks(r#"[{"name": "Intro", "page": 1}]"#).unwrap();
/// assert_eq!(bookmarks[0].name, "Intro");
/// ```
pub fn parse_bookmarks(json: &str) -> Result<Vec<Bookmark>> {
    let value: Value = serde_json::from_str(json)?;
    bookmarks_from_value(&value)
}

/// Parse and validate a JSON bookmark list from raw bytes.
pub fn parse_bookmarks_slice(data: &[u8]) -> Result<Vec<Bookmark>> {
    let value: Value = serde_json::from_slice(data)?;
    bookmarks_from_value(&value)
}

/// Read and validate a JSON bookmark list from a file.
pub fn read_bookmarks_file<P: AsRef<Path>>(path: P) -> Result<Vec<Bookmark>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        Error::ExternalSourceInvalid(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_bookmarks_slice(&data)
}

/// Validate an already parsed JSON value.
pub fn bookmarks_from_value(value: &Value) -> Result<Vec<Bookmark>> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("expected an array of bookmarks"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(format!("bookmark {} has no string \"name\"", index)))?;

            let page = item
                .get("page")
                .ok_or_else(|| invalid(format!("bookmark {} has no \"page\"", index)))?;
            if !page.is_number() {
                return Err(invalid(format!("bookmark {} has a non-numeric \"page\"", index)));
            }
            let page = page
                .as_u64()
                .and_then(|p| u32::try_from(p).ok())
                .ok_or_else(|| {
                    invalid(format!(
                        "bookmark {} has page {}, expected a non-negative integer",
                        index, page
                    ))
                })?;

            Ok(Bookmark::new(name, page))
        })
        .collect()
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ExternalSourceInvalid(message.into())
}
