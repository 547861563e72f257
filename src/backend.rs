//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the outline operations the engine
//! needs, isolating the concrete PDF library (lopdf) from the flatten and
//! rebuild logic.

use std::collections::{BTreeMap, HashMap, HashSet};

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, StringFormat};

use crate::detect::sniff_header;
use crate::error::{Error, Result};
use crate::model::{DestinationToken, OutlineNode};
use crate::options::SaveOptions;
use crate::outline::destination;

/// Outline levels read by [`OutlineBackend::read_outline`] before deeper
/// entries are skipped.
pub const MAX_OUTLINE_DEPTH: usize = 256;

/// Abstract interface for document access.
///
/// Implementations own one parsed document and expose its outline as
/// library-neutral [`OutlineNode`]s.
pub trait OutlineBackend {
    /// Parse a document from raw bytes.
    fn load(data: &[u8]) -> Result<Self>
    where
        Self: Sized;

    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Read the complete outline forest in document order.
    fn read_outline(&self) -> Result<Vec<OutlineNode>>;

    /// Read only the top-level entries, without their children.
    fn read_top_level(&self) -> Result<Vec<OutlineNode>>;

    /// Replace the complete outline with `nodes`.
    ///
    /// Must either succeed completely or leave the existing outline intact.
    fn replace_outline(&mut self, nodes: &[OutlineNode]) -> Result<()>;

    /// Serialize the whole document.
    fn save(&mut self, options: &SaveOptions) -> Result<Vec<u8>>;
}

/// Decode a PDF text string (outline titles, URIs).
///
/// Handles UTF-16BE and UTF-8 byte order marks, then plain UTF-8, then
/// falls back to PDFDocEncoding.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| pdf_doc_char(b)).collect()
}

/// PDFDocEncoding byte to char.
///
/// Matches Latin-1 except for the accent block at 0x18-0x1F and the
/// typographic block at 0x80-0xA0. Undefined codes fall through as Latin-1.
fn pdf_doc_char(byte: u8) -> char {
    match byte {
        0x18 => '\u{02D8}', // Breve
        0x19 => '\u{02C7}', // Caron
        0x1A => '\u{02C6}', // Circumflex
        0x1B => '\u{02D9}', // Dot above
        0x1C => '\u{02DD}', // Double acute
        0x1D => '\u{02DB}', // Ogonek
        0x1E => '\u{02DA}', // Ring above
        0x1F => '\u{02DC}', // Small tilde
        0x80 => '\u{2022}', // Bullet
        0x81 => '\u{2020}', // Dagger
        0x82 => '\u{2021}', // Double dagger
        0x83 => '\u{2026}', // Ellipsis
        0x84 => '\u{2014}', // Em dash
        0x85 => '\u{2013}', // En dash
        0x86 => '\u{0192}', // Florin
        0x87 => '\u{2044}', // Fraction slash
        0x88 => '\u{2039}', // Single left angle quotation mark
        0x89 => '\u{203A}', // Single right angle quotation mark
        0x8A => '\u{2212}', // Minus
        0x8B => '\u{2030}', // Per mille
        0x8C => '\u{201E}', // Double low-9 quotation mark
        0x8D => '\u{201C}', // Left double quotation mark
        0x8E => '\u{201D}', // Right double quotation mark
        0x8F => '\u{2018}', // Left single quotation mark
        0x90 => '\u{2019}', // Right single quotation mark
        0x91 => '\u{201A}', // Single low-9 quotation mark
        0x92 => '\u{2122}', // Trade mark sign
        0x93 => '\u{FB01}', // fi ligature
        0x94 => '\u{FB02}', // fl ligature
        0x95 => '\u{0141}', // L with stroke
        0x96 => '\u{0152}', // OE ligature
        0x97 => '\u{0160}', // S with caron
        0x98 => '\u{0178}', // Y with diaeresis
        0x99 => '\u{017D}', // Z with caron
        0x9A => '\u{0131}', // Dotless i
        0x9B => '\u{0142}', // l with stroke
        0x9C => '\u{0153}', // oe ligature
        0x9D => '\u{0161}', // s with caron
        0x9E => '\u{017E}', // z with caron
        0xA0 => '\u{20AC}', // Euro sign
        other => other as char,
    }
}

/// Encode a title as a PDF text string.
///
/// ASCII titles are written as literal strings; anything else as UTF-16BE
/// with a byte order mark.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`OutlineBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

/// An outline entry whose title and destination are already PDF objects.
struct StagedEntry {
    title: Object,
    dest: Option<Object>,
    expanded: bool,
    children: Vec<StagedEntry>,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        sniff_header(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Follow one level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn catalog_id(&self) -> Result<ObjectId> {
        self.doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| Error::MissingObject("document catalog".to_string()))
    }

    /// Object id of the `/Outlines` dictionary, if the catalog has a usable one.
    fn outline_root_id(&self) -> Option<ObjectId> {
        let catalog_id = self.catalog_id().ok()?;
        let catalog = self.doc.get_dictionary(catalog_id).ok()?;
        let root_id = catalog.get(b"Outlines").and_then(Object::as_reference).ok()?;
        self.doc.get_dictionary(root_id).ok().map(|_| root_id)
    }

    /// Page object id -> 1-based page number.
    fn page_numbers(&self) -> HashMap<ObjectId, u32> {
        self.doc
            .get_pages()
            .into_iter()
            .map(|(number, id)| (id, number))
            .collect()
    }

    /// Walk a sibling chain through `Next`, without descending.
    fn read_chain(
        &self,
        mut next: Option<ObjectId>,
        pages: &HashMap<ObjectId, u32>,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<OutlineNode> {
        let mut nodes = Vec::new();

        while let Some(id) = next {
            let Some(item) = self.visit(id, visited) else {
                break;
            };
            nodes.push(self.entry_node(item, pages));
            next = reference(item, b"Next");
        }

        nodes
    }

    /// Pre-order walk of the whole outline with an explicit stack.
    ///
    /// Entries nested deeper than [`MAX_OUTLINE_DEPTH`] are skipped.
    fn read_tree(
        &self,
        first: Option<ObjectId>,
        pages: &HashMap<ObjectId, u32>,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<OutlineNode> {
        // (entry, index of its parent in `entries`)
        let mut entries: Vec<(OutlineNode, Option<usize>)> = Vec::new();
        let mut pending = vec![(first, None, 1usize)];

        while let Some((cursor, parent, depth)) = pending.pop() {
            let Some(id) = cursor else {
                continue;
            };
            let Some(item) = self.visit(id, visited) else {
                continue;
            };

            let index = entries.len();
            entries.push((self.entry_node(item, pages), parent));

            // Next sibling goes below the children so they are read first.
            pending.push((reference(item, b"Next"), parent, depth));
            if let Some(child) = reference(item, b"First") {
                if depth < MAX_OUTLINE_DEPTH {
                    pending.push((Some(child), Some(index), depth + 1));
                } else {
                    log::warn!(
                        "Outline nested deeper than {} levels; skipping below {:?}",
                        MAX_OUTLINE_DEPTH,
                        id
                    );
                }
            }
        }

        // Descendants follow their ancestor in pre-order, so attaching in
        // reverse completes every child list before its parent is moved.
        let mut slots: Vec<Option<OutlineNode>> = Vec::with_capacity(entries.len());
        let mut parents = Vec::with_capacity(entries.len());
        for (node, parent) in entries {
            slots.push(Some(node));
            parents.push(parent);
        }

        let mut roots = Vec::new();
        for index in (0..slots.len()).rev() {
            let Some(mut node) = slots[index].take() else {
                continue;
            };
            node.children.reverse();
            match parents[index] {
                Some(p) => match slots[p].as_mut() {
                    Some(parent) => parent.children.push(node),
                    None => roots.push(node),
                },
                None => roots.push(node),
            }
        }
        roots.reverse();
        roots
    }

    /// Mark `id` as visited and return its dictionary.
    fn visit<'a>(
        &'a self,
        id: ObjectId,
        visited: &mut HashSet<ObjectId>,
    ) -> Option<&'a Dictionary> {
        if !visited.insert(id) {
            log::warn!("Outline loops back to object {:?}; stopping", id);
            return None;
        }
        match self.doc.get_dictionary(id) {
            Ok(item) => Some(item),
            Err(_) => {
                log::warn!("Outline entry {:?} is missing or not a dictionary", id);
                None
            }
        }
    }

    /// One outline entry without its children.
    fn entry_node(&self, item: &Dictionary, pages: &HashMap<ObjectId, u32>) -> OutlineNode {
        let title = item
            .get(b"Title")
            .ok()
            .and_then(|t| self.resolve(t))
            .and_then(|t| t.as_str().ok())
            .map(decode_text_string);
        let expanded = item
            .get(b"Count")
            .and_then(Object::as_i64)
            .map(|count| count > 0)
            .unwrap_or(false);

        OutlineNode {
            title,
            destination: self.destination_of(item, pages),
            expanded,
            children: Vec::new(),
        }
    }

    /// Page destination of an outline entry, as a token.
    fn destination_of(
        &self,
        item: &Dictionary,
        pages: &HashMap<ObjectId, u32>,
    ) -> Option<DestinationToken> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.explicit_destination(dest, pages);
        }

        let action = item
            .get(b"A")
            .ok()
            .and_then(|a| self.resolve(a))
            .and_then(|a| a.as_dict().ok())?;

        match action.get(b"S").and_then(Object::as_name_str) {
            Ok("GoTo") => action
                .get(b"D")
                .ok()
                .and_then(|d| self.explicit_destination(d, pages)),
            Ok("URI") => {
                let uri = action
                    .get(b"URI")
                    .ok()
                    .and_then(|u| self.resolve(u))
                    .and_then(|u| u.as_str().ok())
                    .map(decode_text_string)?;
                // Only same-document fragments can carry a page number.
                uri.starts_with('#').then(|| DestinationToken::new(uri))
            }
            _ => None,
        }
    }

    /// `[page /Fit ...]` style destination.
    ///
    /// Named destinations resolve to `None`.
    fn explicit_destination(
        &self,
        dest: &Object,
        pages: &HashMap<ObjectId, u32>,
    ) -> Option<DestinationToken> {
        let Ok(array) = self.resolve(dest)?.as_array() else {
            log::debug!("Skipping named or unsupported destination");
            return None;
        };

        let page = match array.first()? {
            Object::Reference(id) => *pages.get(id)?,
            // Remote-style destinations use a 0-based page index.
            Object::Integer(index) => u32::try_from(*index).ok()?.checked_add(1)?,
            _ => return None,
        };
        Some(destination::encode(page))
    }

    /// Turn outline nodes into PDF objects without mutating the document.
    fn stage(
        &self,
        nodes: &[OutlineNode],
        pages: &BTreeMap<u32, ObjectId>,
    ) -> Result<Vec<StagedEntry>> {
        nodes
            .iter()
            .map(|node| {
                let page = destination::decode(node.destination.as_ref());
                let dest = if page == destination::UNKNOWN_PAGE {
                    None
                } else {
                    let page_id = pages
                        .get(&page)
                        .ok_or(Error::PageOutOfRange(page, pages.len() as u32))?;
                    Some(Object::Array(vec![
                        Object::Reference(*page_id),
                        Object::Name(b"Fit".to_vec()),
                    ]))
                };

                Ok(StagedEntry {
                    title: encode_text_string(node.title.as_deref().unwrap_or_default()),
                    dest,
                    expanded: node.expanded,
                    children: self.stage(&node.children, pages)?,
                })
            })
            .collect()
    }

    /// Remove top-level entries until the outline is empty.
    ///
    /// Always takes the current `/First` entry; no cursor survives a removal.
    fn clear_outline(&mut self, root_id: ObjectId) {
        let mut removed = 0usize;

        while let Some(first) = self
            .doc
            .get_dictionary(root_id)
            .ok()
            .and_then(|root| reference(root, b"First"))
        {
            let next = self.remove_entry(first);
            if let Ok(root) = self.doc.get_object_mut(root_id).and_then(Object::as_dict_mut) {
                match next {
                    Some(next) => root.set("First", next),
                    None => {
                        root.remove(b"First");
                    }
                }
            }
            removed += 1;
        }

        if let Ok(root) = self.doc.get_object_mut(root_id).and_then(Object::as_dict_mut) {
            root.remove(b"Last");
            root.set("Count", 0i64);
        }
        log::debug!("Removed {} top-level outline entries", removed);
    }

    /// Delete one entry and its whole subtree; returns the following sibling.
    fn remove_entry(&mut self, id: ObjectId) -> Option<ObjectId> {
        let entry = match self.doc.objects.remove(&id) {
            Some(Object::Dictionary(entry)) => entry,
            _ => return None,
        };

        let mut pending: Vec<ObjectId> = reference(&entry, b"First").into_iter().collect();
        while let Some(child) = pending.pop() {
            if let Some(Object::Dictionary(child)) = self.doc.objects.remove(&child) {
                pending.extend(reference(&child, b"First"));
                pending.extend(reference(&child, b"Next"));
            }
        }

        // A dangling or self-referencing Next ends the walk in clear_outline.
        reference(&entry, b"Next").filter(|next| *next != id)
    }

    /// Insert staged entries as the children of `parent`.
    ///
    /// Returns the first and last child ids and the number of entries that
    /// are visible below `parent` when it is open.
    fn append_entries(
        &mut self,
        parent: ObjectId,
        entries: Vec<StagedEntry>,
    ) -> (Option<ObjectId>, Option<ObjectId>, i64) {
        let ids: Vec<ObjectId> = entries.iter().map(|_| self.doc.new_object_id()).collect();
        let mut visible = 0i64;

        for (i, entry) in entries.into_iter().enumerate() {
            let mut item = dictionary! {
                "Title" => entry.title,
                "Parent" => parent,
            };
            if i > 0 {
                item.set("Prev", ids[i - 1]);
            }
            if let Some(next) = ids.get(i + 1) {
                item.set("Next", *next);
            }
            if let Some(dest) = entry.dest {
                item.set("Dest", dest);
            }

            let (first, last, below) = self.append_entries(ids[i], entry.children);
            if let (Some(first), Some(last)) = (first, last) {
                item.set("First", first);
                item.set("Last", last);
                item.set("Count", if entry.expanded { below } else { -below });
            }

            visible += 1 + if entry.expanded { below } else { 0 };
            self.doc.objects.insert(ids[i], Object::Dictionary(item));
        }

        (ids.first().copied(), ids.last().copied(), visible)
    }
}

impl OutlineBackend for LopdfBackend {
    fn load(data: &[u8]) -> Result<Self> {
        Self::load_bytes(data)
    }

    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn read_outline(&self) -> Result<Vec<OutlineNode>> {
        let Some(root_id) = self.outline_root_id() else {
            return Ok(Vec::new());
        };
        let root = self.doc.get_dictionary(root_id)?;

        let pages = self.page_numbers();
        let mut visited = HashSet::from([root_id]);
        Ok(self.read_tree(reference(root, b"First"), &pages, &mut visited))
    }

    fn read_top_level(&self) -> Result<Vec<OutlineNode>> {
        let Some(root_id) = self.outline_root_id() else {
            return Ok(Vec::new());
        };
        let root = self.doc.get_dictionary(root_id)?;

        let pages = self.page_numbers();
        let mut visited = HashSet::from([root_id]);
        Ok(self.read_chain(reference(root, b"First"), &pages, &mut visited))
    }

    fn replace_outline(&mut self, nodes: &[OutlineNode]) -> Result<()> {
        // Phase 1: everything that can fail, without touching the document.
        let catalog_id = self.catalog_id()?;
        self.doc
            .get_dictionary(catalog_id)
            .map_err(|_| Error::Corrupted("catalog is not a dictionary".to_string()))?;
        let pages = self.doc.get_pages();
        let staged = self.stage(nodes, &pages)?;

        // Phase 2: swap the outline.
        let root_id = match self.outline_root_id() {
            Some(root_id) => root_id,
            None => {
                let root_id = self.doc.add_object(dictionary! {
                    "Type" => "Outlines",
                    "Count" => 0i64,
                });
                let catalog = self
                    .doc
                    .get_object_mut(catalog_id)
                    .and_then(Object::as_dict_mut)?;
                catalog.set("Outlines", root_id);
                root_id
            }
        };

        self.clear_outline(root_id);
        let (first, last, visible) = self.append_entries(root_id, staged);

        let root = self
            .doc
            .get_object_mut(root_id)
            .and_then(Object::as_dict_mut)?;
        if let (Some(first), Some(last)) = (first, last) {
            root.set("First", first);
            root.set("Last", last);
        }
        root.set("Count", visible);

        log::debug!("Outline replaced with {} visible entries", visible);
        Ok(())
    }

    fn save(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        if options.garbage_collect {
            let pruned = self.doc.prune_objects();
            log::debug!("Pruned {} unreferenced objects", pruned.len());
            self.doc.renumber_objects();
        }
        if options.compress {
            self.doc.compress();
        }
        log::debug!(
            "Permission mask {} recorded; output is not encrypted",
            options.permissions
        );

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(buffer)
    }
}

/// Indirect reference stored under `key`, if any.
fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).and_then(Object::as_reference).ok()
}
