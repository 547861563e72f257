//! Command-line edit operations applied to a bookmark list.

use pdfmarks::{Bookmark, BookmarkList};

/// Edits requested on the command line, applied in a fixed order:
/// deletes, moves, adds, sort, reset.
#[derive(Debug, Default)]
pub struct EditPlan {
    pub delete: Vec<usize>,
    pub moves: Vec<(usize, usize)>,
    pub add: Vec<Bookmark>,
    pub sort: bool,
    pub reset: bool,
}

impl EditPlan {
    pub fn apply(&self, list: &mut BookmarkList) -> pdfmarks::Result<()> {
        // Delete indices refer to the list as loaded, so remove from the back.
        let mut delete = self.delete.clone();
        delete.sort_unstable();
        delete.dedup();
        for &index in delete.iter().rev() {
            let removed = list.delete_at(index)?;
            log::debug!("Deleted bookmark {}: {}", index, removed);
        }

        for &(from, to) in &self.moves {
            list.move_item(from, to)?;
        }

        for bookmark in &self.add {
            list.try_add(bookmark.name.clone(), bookmark.page)?;
        }

        if self.sort {
            list.sort_by_page();
        }

        if self.reset {
            list.reset();
        }

        Ok(())
    }
}

/// Parse `NAME@PAGE`. The last `@` separates the page, so names may contain `@`.
pub fn parse_add(s: &str) -> Result<Bookmark, String> {
    let (name, page) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@PAGE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("bookmark name is empty".to_string());
    }
    let page: u32 = page
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number '{}'", page))?;
    if page < 1 {
        return Err("page numbers start at 1".to_string());
    }
    Ok(Bookmark::new(name, page))
}

/// Parse `FROM:TO`.
pub fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{}'", s))?;
    let from = from
        .trim()
        .parse()
        .map_err(|_| format!("invalid index '{}'", from))?;
    let to = to
        .trim()
        .parse()
        .map_err(|_| format!("invalid index '{}'", to))?;
    Ok((from, to))
}
