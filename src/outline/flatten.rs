//! Native outline -> flat bookmark list.

use super::destination;
use crate::model::{Bookmark, OutlineNode};

/// Project an outline forest onto a flat bookmark list.
///
/// Only top-level entries are emitted, in document order. Children are
/// dropped: a bookmark list has no nesting and a later rebuild writes a
/// single-level outline.
pub fn flatten(forest: &[OutlineNode]) -> Vec<Bookmark> {
    forest
        .iter()
        .map(|node| {
            let page = destination::decode(node.destination.as_ref());
            if page == destination::UNKNOWN_PAGE {
                log::debug!(
                    "Outline entry {:?} has no page destination",
                    node.title.as_deref().unwrap_or_default()
                );
            }
            Bookmark::new(node.title.clone().unwrap_or_default(), page)
        })
        .collect()
}
