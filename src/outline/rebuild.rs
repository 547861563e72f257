//! Flat bookmark list -> native outline.

use super::destination;
use crate::backend::OutlineBackend;
use crate::error::Result;
use crate::model::{Bookmark, OutlineNode};

/// Build the single-level outline that represents `bookmarks`.
///
/// Entries are collapsed and keep the input order. A bookmark with the
/// unknown page `0` gets no destination, so it reads back as page `0`.
pub fn outline_from_bookmarks(bookmarks: &[Bookmark]) -> Vec<OutlineNode> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let target = if bookmark.page == destination::UNKNOWN_PAGE {
                None
            } else {
                Some(destination::encode(bookmark.page))
            };
            OutlineNode::new(bookmark.name.clone(), target)
        })
        .collect()
}

/// Replace the whole outline of `backend` with `bookmarks`.
///
/// The backend validates every destination before touching the document,
/// so on error the previous outline is left as it was.
pub fn rebuild<B>(backend: &mut B, bookmarks: &[Bookmark]) -> Result<()>
where
    B: OutlineBackend + ?Sized,
{
    let nodes = outline_from_bookmarks(bookmarks);
    log::debug!("Rebuilding outline with {} entries", nodes.len());
    backend.replace_outline(&nodes)
}
