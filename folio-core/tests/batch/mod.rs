//! Multi-document merge over fixture files.

use crate::common::fixture;
use folio_core::batch::{merge, DOCUMENT_SEPARATOR};
use folio_core::parser::ParseOptions;

#[test]
fn merge_order_follows_input_order() {
    let forward = merge(
        &[fixture("chapter-a.md"), fixture("chapter-b.md"), fixture("chapter-c.md")],
        &ParseOptions::default(),
    )
    .unwrap();
    let titles: Vec<_> = forward.toc.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter A", "Chapter B", "Chapter C"]);

    let backward = merge(
        &[fixture("chapter-c.md"), fixture("chapter-b.md"), fixture("chapter-a.md")],
        &ParseOptions::default(),
    )
    .unwrap();
    let titles: Vec<_> = backward.toc.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter C", "Chapter B", "Chapter A"]);

    let a = forward.html.find("Alpha.").unwrap();
    let c = forward.html.find("SELECT").unwrap();
    assert!(a < c);
}

#[test]
fn nested_entries_stay_with_their_chapter() {
    let merged = merge(
        &[fixture("chapter-a.md"), fixture("chapter-b.md")],
        &ParseOptions::default(),
    )
    .unwrap();
    assert!(merged.toc[0].children.is_empty());
    assert_eq!(merged.toc[1].children[0].title, "Details");
}

#[test]
fn separators_sit_between_documents() {
    let merged = merge(
        &[fixture("chapter-a.md"), fixture("chapter-b.md"), fixture("chapter-c.md")],
        &ParseOptions::default(),
    )
    .unwrap();
    assert_eq!(merged.html.matches(DOCUMENT_SEPARATOR).count(), 2);
    assert!(!merged.html.starts_with(DOCUMENT_SEPARATOR));
}

#[test]
fn first_source_wins_metadata() {
    let merged = merge(
        &[fixture("chapter-a.md"), fixture("chapter-c.md")],
        &ParseOptions::default(),
    )
    .unwrap();
    assert_eq!(merged.metadata["title"], "Handbook");
    assert_eq!(merged.metadata["client"], "Contoso");
}
