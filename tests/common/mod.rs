//! Shared lopdf fixtures for the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Where a fixture outline entry points.
#[derive(Debug, Clone)]
pub enum Target {
    /// `/Dest [page /Fit]` with a 1-based page number
    Page(u32),
    /// `/Dest [index /Fit]` with a raw 0-based page index
    Index(i64),
    /// `/A << /S /GoTo /D [page /XYZ null null null] >>`
    GoTo(u32),
    /// `/A << /S /URI /URI (...) >>`
    Uri(&'static str),
    /// `/Dest (name)`
    Named(&'static str),
    /// No destination at all
    Nothing,
}

/// One outline entry of a fixture document.
#[derive(Debug, Clone)]
pub struct Entry {
    pub title: &'static str,
    pub target: Target,
    pub open: bool,
    pub children: Vec<Entry>,
}

impl Entry {
    pub fn page(title: &'static str, page: u32) -> Self {
        Self::new(title, Target::Page(page))
    }

    pub fn new(title: &'static str, target: Target) -> Self {
        Self {
            title,
            target,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: Entry) -> Self {
        self.children.push(child);
        self
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }
}

/// Build a document with `page_count` pages and no outline.
pub fn pdf_with_pages(page_count: u32) -> Vec<u8> {
    let (mut doc, _) = build_document(page_count);
    save(&mut doc)
}

/// Build a document with `page_count` pages and the given outline.
pub fn pdf_with_outline(page_count: u32, entries: &[Entry]) -> Vec<u8> {
    let (mut doc, pages) = build_document(page_count);

    let outline_id = doc.new_object_id();
    let (first, last, count) = add_entries(&mut doc, outline_id, entries, &pages);
    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => count,
    };
    if let (Some(first), Some(last)) = (first, last) {
        outlines.set("First", first);
        outlines.set("Last", last);
    }
    doc.objects.insert(outline_id, Object::Dictionary(outlines));

    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set("Outlines", outline_id);

    save(&mut doc)
}

/// The chapter scenario: three chapters, the second with a subsection.
pub fn chapters_pdf() -> Vec<u8> {
    pdf_with_outline(
        12,
        &[
            Entry::page("Ch1", 1),
            Entry::page("Ch2", 4).child(Entry::page("Ch2a", 5)),
            Entry::page("Ch3", 9),
        ],
    )
}

/// A single top-level entry with a chain of `depth - 1` nested children,
/// each the only child of the one above.
pub fn pdf_with_deep_outline(depth: usize) -> Vec<u8> {
    let (mut doc, pages) = build_document(1);

    let outline_id = doc.new_object_id();
    let ids: Vec<ObjectId> = (0..depth).map(|_| doc.new_object_id()).collect();
    for (level, id) in ids.iter().enumerate() {
        let parent = if level == 0 { outline_id } else { ids[level - 1] };
        let mut item = dictionary! {
            "Title" => Object::string_literal(format!("Level {}", level)),
            "Parent" => parent,
            "Dest" => vec![Object::Reference(pages[0]), Object::Name(b"Fit".to_vec())],
        };
        if let Some(child) = ids.get(level + 1) {
            item.set("First", *child);
            item.set("Last", *child);
            item.set("Count", -1i64);
        }
        doc.objects.insert(*id, Object::Dictionary(item));
    }

    doc.objects.insert(
        outline_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => ids[0],
            "Last" => ids[0],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set("Outlines", outline_id);

    save(&mut doc)
}

/// Raw outline dictionaries of a saved document, top-level first.
pub fn top_level_titles(data: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(data).unwrap();
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(catalog_id).unwrap();
    let Ok(outlines) = catalog.get(b"Outlines").and_then(Object::as_reference) else {
        return Vec::new();
    };
    let root = doc.get_dictionary(outlines).unwrap();

    let mut titles = Vec::new();
    let mut next = root.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        let item = doc.get_dictionary(id).unwrap();
        assert!(
            item.get(b"First").is_err(),
            "rebuilt entries have no children"
        );
        let title = item.get(b"Title").unwrap().as_str().unwrap();
        titles.push(pdfmarks::backend::decode_text_string(title));
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
    titles
}

fn build_document(page_count: u32) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for number in 1..=page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", number))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, kids)
}

fn add_entries(
    doc: &mut Document,
    parent: ObjectId,
    entries: &[Entry],
    pages: &[ObjectId],
) -> (Option<ObjectId>, Option<ObjectId>, i64) {
    let ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();
    let mut visible = 0i64;

    for (i, entry) in entries.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => Object::String(entry.title.as_bytes().to_vec(), StringFormat::Literal),
            "Parent" => parent,
        };
        if i > 0 {
            item.set("Prev", ids[i - 1]);
        }
        if let Some(next) = ids.get(i + 1) {
            item.set("Next", *next);
        }

        let page_ref = |page: u32| Object::Reference(pages[page as usize - 1]);
        match &entry.target {
            Target::Page(page) => {
                item.set("Dest", vec![page_ref(*page), Object::Name(b"Fit".to_vec())]);
            }
            Target::Index(index) => {
                item.set(
                    "Dest",
                    vec![Object::Integer(*index), Object::Name(b"Fit".to_vec())],
                );
            }
            Target::GoTo(page) => {
                item.set(
                    "A",
                    dictionary! {
                        "S" => "GoTo",
                        "D" => vec![
                            page_ref(*page),
                            Object::Name(b"XYZ".to_vec()),
                            Object::Null,
                            Object::Null,
                            Object::Null,
                        ],
                    },
                );
            }
            Target::Uri(uri) => {
                item.set(
                    "A",
                    dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(*uri),
                    },
                );
            }
            Target::Named(name) => {
                item.set("Dest", Object::string_literal(*name));
            }
            Target::Nothing => {}
        }

        let (first, last, below) = add_entries(doc, ids[i], &entry.children, pages);
        if let (Some(first), Some(last)) = (first, last) {
            item.set("First", first);
            item.set("Last", last);
            item.set("Count", if entry.open { below } else { -below });
        }

        visible += 1 + if entry.open { below } else { 0 };
        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    (ids.first().copied(), ids.last().copied(), visible)
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
