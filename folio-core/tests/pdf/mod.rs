use crate::common::FakeEngine;
use folio_core::pdf::{count_pages, PdfOptions, PdfRenderer};
use folio_core::themes::{RenderedDocument, ThemeKind};
use std::fs;
use tempfile::tempdir;

fn document() -> RenderedDocument {
    RenderedDocument {
        html: "<!DOCTYPE html><html><body><h1 id=\"t\">T</h1></body></html>".to_string(),
        header_template: "<div style=\"font-size:8px\"><span class=\"title\"></span></div>"
            .to_string(),
        footer_template: "<div style=\"font-size:8px\"><span class=\"pageNumber\"></span></div>"
            .to_string(),
        theme: ThemeKind::Technical,
        title: "T".to_string(),
        estimated_pages: 3,
    }
}

#[test]
fn templates_are_passed_through_verbatim() {
    let dir = tempdir().unwrap();
    let mut renderer = PdfRenderer::new(FakeEngine::new(2), PdfOptions::default());
    let doc = document();
    renderer.generate(&doc, dir.path().join("a.pdf")).unwrap();
    let job = &renderer.engine().jobs[0];
    assert_eq!(job.header_template, doc.header_template);
    assert_eq!(job.footer_template, doc.footer_template);
    assert_eq!(job.html, doc.html);
}

#[test]
fn overwrites_existing_output_atomically() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.pdf");
    fs::write(&out, b"old").unwrap();
    let mut renderer = PdfRenderer::new(FakeEngine::new(4), PdfOptions::default());
    let artifact = renderer.generate(&document(), &out).unwrap();
    assert_eq!(artifact.page_count, 4);
    let written = fs::read(&out).unwrap();
    assert!(written.starts_with(b"%PDF"));
    assert_eq!(written.len() as u64, artifact.file_size_bytes);
    // No stray temp files next to the output.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn render_failure_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.pdf");
    fs::write(&out, b"old").unwrap();
    let mut renderer = PdfRenderer::new(FakeEngine::failing("timed out"), PdfOptions::default());
    let err = renderer.generate(&document(), &out).unwrap_err();
    assert_eq!(err.to_string(), "Rendering failed: timed out");
    assert_eq!(fs::read(&out).unwrap(), b"old");
}

#[test]
fn page_count_scan() {
    assert_eq!(count_pages(b"%PDF-1.7 << /Type /Pages >> << /Type /Page >> << /Type /Page >>"), Some(2));
    assert_eq!(count_pages(b"%PDF-1.7"), None);
}

#[cfg(all(unix, feature = "native-export"))]
mod chrome_lookup {
    use folio_core::pdf::resolve_chrome_binary;
    use std::path::PathBuf;

    #[test]
    fn env_override_wins() {
        let prev = std::env::var("FOLIO_CHROME_BIN").ok();
        std::env::set_var("FOLIO_CHROME_BIN", "/opt/custom/chrome");

        let resolved = resolve_chrome_binary().unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/custom/chrome"));

        if let Some(prev) = prev {
            std::env::set_var("FOLIO_CHROME_BIN", prev);
        } else {
            std::env::remove_var("FOLIO_CHROME_BIN");
        }
    }
}
