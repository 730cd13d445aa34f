//! Full pipeline runs with the fake engine standing in for Chrome.

use crate::common::{fixture, FakeEngine};
use folio_core::themes::{Branding, ThemeKind};
use folio_core::{FolioError, Pipeline, Stage};
use tempfile::tempdir;

#[test]
fn technical_single_document() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("title.pdf");
    let mut pipeline = Pipeline::new(FakeEngine::new(3));

    let outcome = pipeline
        .render_markdown(
            "# Title\n\nHello.\n\n```python\nprint(1)\n```",
            ThemeKind::Technical,
            &Branding::new(),
            &out,
        )
        .unwrap();

    assert!(outcome.artifact.page_count >= 1);
    assert!(outcome.artifact.file_size_bytes > 0);
    assert!(outcome.artifact.output_path.is_absolute());
    assert_eq!(outcome.toc.len(), 1);
    assert_eq!(outcome.toc[0].title, "Title");
    assert_eq!(outcome.toc[0].anchor, "title");
    assert!(out.exists());
}

#[test]
fn printed_html_is_fully_assembled() {
    let dir = tempdir().unwrap();
    let mut pipeline = Pipeline::new(FakeEngine::new(1));
    pipeline
        .render(
            &fixture("report.md"),
            ThemeKind::Executive,
            &Branding::new().with_colors("#123456", "not-a-color"),
            dir.path().join("report.pdf"),
        )
        .unwrap();

    let printed = &pipeline.engine().jobs[0];
    assert!(printed.html.starts_with("<!DOCTYPE html>"));
    assert!(printed.html.contains("<body class=\"folio theme-executive\">"));
    assert!(printed.html.contains("--folio-primary: #123456;"));
    // Invalid secondary falls back to the theme palette.
    assert!(printed.html.contains("--folio-secondary: #b45309;"));
    assert!(printed.html.contains("<h2 class=\"toc-heading\">At a Glance</h2>"));
    assert!(printed.html.contains("class=\"code-block\" data-language=\"rust\""));
    assert!(printed.footer_template.contains("Acme Corp"));
}

#[test]
fn warnings_are_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let mut pipeline = Pipeline::new(FakeEngine::new(5));
    let outcome = pipeline
        .render(
            &fixture("report.md"),
            ThemeKind::Professional,
            &Branding::new(),
            dir.path().join("report.pdf"),
        )
        .unwrap();
    assert_eq!(outcome.warnings.len(), 2);
    assert_eq!(outcome.metadata["client"], "Acme Corp");
    assert_eq!(outcome.artifact.page_count, 5);
    assert_eq!(outcome.estimated_pages, 8);
}

#[test]
fn batch_render_uses_merged_toc() {
    let dir = tempdir().unwrap();
    let mut pipeline = Pipeline::new(FakeEngine::new(6));
    let outcome = pipeline
        .merge_and_render(
            &[fixture("chapter-a.md"), fixture("chapter-b.md"), fixture("chapter-c.md")],
            ThemeKind::Technical,
            &Branding::new(),
            dir.path().join("handbook.pdf"),
        )
        .unwrap();
    let titles: Vec<_> = outcome.toc.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter A", "Chapter B", "Chapter C"]);
    assert_eq!(outcome.metadata["title"], "Handbook");
}

#[test]
fn render_failure_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.pdf");
    let mut pipeline = Pipeline::new(FakeEngine::failing("browser launch failed"));
    let err = pipeline
        .render_markdown("# Hi\n", ThemeKind::Technical, &Branding::new(), &out)
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Render);
    assert!(!out.exists());
}

#[test]
fn parse_failure_names_the_stage() {
    let dir = tempdir().unwrap();
    let mut pipeline = Pipeline::new(FakeEngine::new(1));
    let err = pipeline
        .render_markdown(
            "---\n- not\n- a map\n---\n# Hi\n",
            ThemeKind::Technical,
            &Branding::new(),
            dir.path().join("x.pdf"),
        )
        .unwrap_err();
    assert!(matches!(err, FolioError::Parse { .. }));
    assert_eq!(err.stage().to_string(), "parse");
}
