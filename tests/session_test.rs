//! Integration tests for reading and rewriting outlines through a session.

mod common;

use common::{
    chapters_pdf, pdf_with_deep_outline, pdf_with_outline, pdf_with_pages, top_level_titles,
    Entry, Target,
};
use pdfmarks::backend::MAX_OUTLINE_DEPTH;
use pdfmarks::{Bookmark, BookmarkList, DocumentSession, Error, SaveOptions};

fn open(data: &[u8]) -> DocumentSession {
    let mut session = DocumentSession::new();
    session.open(data).unwrap();
    session
}

#[test]
fn test_flatten_drops_children() {
    let data = pdf_with_outline(
        8,
        &[
            Entry::page("Ch1", 1),
            Entry::page("Ch2", 5).child(Entry::page("Ch2a", 6)),
        ],
    );
    let session = open(&data);

    assert_eq!(session.page_count().unwrap(), 8);
    assert_eq!(
        session.bookmarks().unwrap(),
        vec![Bookmark::new("Ch1", 1), Bookmark::new("Ch2", 5)]
    );

    let outline = session.outline().unwrap();
    assert_eq!(outline[1].children.len(), 1);
    assert_eq!(outline[1].children[0].title.as_deref(), Some("Ch2a"));
}

#[test]
fn test_chapter_scenario() {
    let data = pdf_with_outline(
        10,
        &[
            Entry::page("Ch1", 1),
            Entry::page("Ch2", 5).child(Entry::page("Ch2a", 6)),
        ],
    );
    let mut session = open(&data);

    let mut list = BookmarkList::with_baseline(session.bookmarks().unwrap());
    assert!(list.add("Ch3", 9));
    let expected = vec![
        Bookmark::new("Ch1", 1),
        Bookmark::new("Ch2", 5),
        Bookmark::new("Ch3", 9),
    ];
    assert_eq!(list.snapshot(), expected);

    session.write_bookmarks(&list.snapshot()).unwrap();
    assert_eq!(session.bookmarks().unwrap(), expected);
    assert!(session
        .outline()
        .unwrap()
        .iter()
        .all(|node| node.children.is_empty() && !node.expanded));
}

#[test]
fn test_save_round_trip() {
    let mut session = open(&chapters_pdf());
    let bookmarks = vec![
        Bookmark::new("Preface", 2),
        Bookmark::new("Body", 6),
        Bookmark::new("Index", 12),
    ];

    let bytes = session.save(&bookmarks).unwrap();

    assert_eq!(pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap(), bookmarks);
    assert_eq!(top_level_titles(&bytes), vec!["Preface", "Body", "Index"]);
}

#[test]
fn test_rebuild_flattens_nesting() {
    let data = pdf_with_outline(
        20,
        &[
            Entry::page("A", 1)
                .opened()
                .child(Entry::page("A.1", 2).child(Entry::page("A.1.a", 3)))
                .child(Entry::page("A.2", 4)),
            Entry::page("B", 10).child(Entry::page("B.1", 11)),
        ],
    );
    let mut session = open(&data);
    let bookmarks = session.bookmarks().unwrap();
    assert_eq!(bookmarks.len(), 2);

    let bytes = session.save(&bookmarks).unwrap();
    let reopened = open(&bytes);
    let outline = reopened.outline().unwrap();

    assert_eq!(outline.len(), bookmarks.len());
    assert!(outline.iter().all(|node| node.depth() == 1));
    assert_eq!(top_level_titles(&bytes), vec!["A", "B"]);
}

#[test]
fn test_page_out_of_range_keeps_outline() {
    let mut session = open(&chapters_pdf());
    let before = session.outline().unwrap();

    let result = session.write_bookmarks(&[Bookmark::new("Fine", 1), Bookmark::new("Far", 13)]);

    assert!(matches!(result, Err(Error::PageOutOfRange(13, 12))));
    assert_eq!(session.outline().unwrap(), before);
    assert_eq!(
        session.bookmarks().unwrap(),
        vec![
            Bookmark::new("Ch1", 1),
            Bookmark::new("Ch2", 4),
            Bookmark::new("Ch3", 9)
        ]
    );
}

#[test]
fn test_document_without_outline() {
    let data = pdf_with_pages(3);
    let mut session = open(&data);
    assert!(session.bookmarks().unwrap().is_empty());

    let bytes = session.save(&[Bookmark::new("Start", 1)]).unwrap();
    assert_eq!(
        pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap(),
        vec![Bookmark::new("Start", 1)]
    );
}

#[test]
fn test_empty_rebuild_clears_outline() {
    let mut session = open(&chapters_pdf());
    let bytes = session.save(&[]).unwrap();

    assert!(pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap().is_empty());
    assert!(top_level_titles(&bytes).is_empty());
}

#[test]
fn test_unknown_page_round_trips() {
    let mut session = open(&pdf_with_pages(4));
    let bookmarks = vec![Bookmark::new("Somewhere", 0), Bookmark::new("Two", 2)];

    let bytes = session.save(&bookmarks).unwrap();
    assert_eq!(pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap(), bookmarks);
}

#[test]
fn test_native_destination_kinds() {
    let data = pdf_with_outline(
        6,
        &[
            Entry::new("Explicit", Target::Page(2)),
            Entry::new("Index", Target::Index(3)),
            Entry::new("GoTo", Target::GoTo(5)),
            Entry::new("Fragment", Target::Uri("#page=6&view=Fit")),
            Entry::new("Web", Target::Uri("https://example.com/#page=2")),
            Entry::new("Named", Target::Named("chapter.1")),
            Entry::new("Nowhere", Target::Nothing),
        ],
    );
    let session = open(&data);

    let pages: Vec<u32> = session
        .bookmarks()
        .unwrap()
        .iter()
        .map(|b| b.page)
        .collect();
    assert_eq!(pages, vec![2, 4, 5, 6, 0, 0, 0]);
}

#[test]
fn test_unicode_titles() {
    let mut session = open(&pdf_with_pages(3));
    let bookmarks = vec![
        Bookmark::new("Überblick", 1),
        Bookmark::new("第二章", 2),
        Bookmark::new("Plain", 3),
    ];

    let bytes = session.save(&bookmarks).unwrap();
    assert_eq!(pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap(), bookmarks);
}

#[test]
fn test_repeated_rebuilds() {
    let mut session = open(&chapters_pdf());
    for round in 1..=5u32 {
        let bookmarks: Vec<Bookmark> = (1..=round)
            .map(|page| Bookmark::new(format!("Round {} / {}", round, page), page))
            .collect();
        session.write_bookmarks(&bookmarks).unwrap();
        assert_eq!(session.bookmarks().unwrap(), bookmarks);
    }
}

#[test]
fn test_save_options_verbatim() {
    let mut session: DocumentSession = DocumentSession::with_options(SaveOptions::new().verbatim());
    session.open(&chapters_pdf()).unwrap();
    let bytes = session.save(&[Bookmark::new("Only", 3)]).unwrap();

    assert!(pdfmarks::is_pdf_bytes(&bytes));
    assert_eq!(
        pdfmarks::read_bookmarks_from_bytes(&bytes).unwrap(),
        vec![Bookmark::new("Only", 3)]
    );
}

#[test]
fn test_failed_open_keeps_previous_document() {
    let mut session = open(&chapters_pdf());
    assert!(session.open(b"definitely not a pdf").is_err());
    assert!(session.is_open());
    assert_eq!(session.page_count().unwrap(), 12);

    session.open(&pdf_with_pages(2)).unwrap();
    assert_eq!(session.page_count().unwrap(), 2);
    assert!(session.bookmarks().unwrap().is_empty());

    session.close();
    assert!(matches!(session.bookmarks(), Err(Error::NoDocumentLoaded)));
}

#[test]
fn test_write_bookmarks_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chapters.pdf");
    std::fs::write(&path, chapters_pdf()).unwrap();

    let data = std::fs::read(&path).unwrap();
    let bytes = pdfmarks::write_bookmarks(&data, &[Bookmark::new("Solo", 7)]).unwrap();
    let out = dir.path().join(pdfmarks::export::output_pdf_name(Some(&path)));
    std::fs::write(&out, bytes).unwrap();

    assert_eq!(
        out.file_name().unwrap().to_str(),
        Some("chapters_with_bookmarks.pdf")
    );
    assert_eq!(
        pdfmarks::read_bookmarks(&out).unwrap(),
        vec![Bookmark::new("Solo", 7)]
    );
}

#[test]
fn test_deeply_nested_outline() {
    let mut session = open(&pdf_with_deep_outline(10_000));

    let bookmarks = session.bookmarks().unwrap();
    assert_eq!(bookmarks, vec![Bookmark::new("Level 0", 1)]);

    let outline = session.outline().unwrap();
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].depth(), MAX_OUTLINE_DEPTH);

    let bytes = session.save(&bookmarks).unwrap();
    let reopened = open(&bytes);
    assert_eq!(reopened.outline().unwrap()[0].depth(), 1);
}

#[test]
fn test_deeply_nested_outline_through_worker() {
    let mut handle = pdfmarks::SessionWorker::spawn().unwrap();
    handle.open(pdf_with_deep_outline(10_000)).unwrap();
    assert_eq!(handle.bookmarks().unwrap().len(), 1);
    handle.shutdown().unwrap();
}

#[test]
fn test_outline_keeps_nesting_order() {
    let data = pdf_with_outline(
        20,
        &[
            Entry::page("A", 1)
                .opened()
                .child(Entry::page("A.1", 2).child(Entry::page("A.1.a", 3)))
                .child(Entry::page("A.2", 4)),
            Entry::page("B", 10).child(Entry::page("B.1", 11)),
            Entry::page("C", 12),
        ],
    );
    let outline = open(&data).outline().unwrap();

    let titles = |nodes: &[pdfmarks::OutlineNode]| -> Vec<String> {
        nodes.iter().filter_map(|n| n.title.clone()).collect()
    };
    assert_eq!(titles(&outline), vec!["A", "B", "C"]);
    assert!(outline[0].expanded);
    assert_eq!(titles(&outline[0].children), vec!["A.1", "A.2"]);
    assert_eq!(titles(&outline[0].children[0].children), vec!["A.1.a"]);
    assert_eq!(titles(&outline[1].children), vec!["B.1"]);
    assert!(outline[2].children.is_empty());
}
