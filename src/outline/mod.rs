//! Outline synchronization: native outline <-> flat bookmark list.
//!
//! - [`destination`] converts page numbers to destination tokens and back.
//! - [`flatten`](flatten::flatten) projects a native outline onto bookmarks.
//! - [`rebuild`](rebuild::rebuild) replaces a native outline with bookmarks.

pub mod destination;
mod flatten;
mod rebuild;

pub use flatten::flatten;
pub use rebuild::{outline_from_bookmarks, rebuild};
