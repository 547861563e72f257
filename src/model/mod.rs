//! Data model for bookmark editing.
//!
//! [`Bookmark`] is the flat, user-editable record; [`BookmarkList`] holds an
//! ordered list of them together with the baseline used for resets.
//! [`OutlineNode`] is the library-neutral view of a native outline entry,
//! which may still be nested.

mod bookmark;
mod list;
mod outline;

pub use bookmark::Bookmark;
pub use list::BookmarkList;
pub use outline::{DestinationToken, OutlineNode};
