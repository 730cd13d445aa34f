//! Theme assembly over parsed fixtures.

use crate::common::fixture;
use folio_core::highlight::Highlighter;
use folio_core::parser::{parse_source, ParseOptions};
use folio_core::themes::{Branding, ThemeKind, ThemeRenderer};
use folio_core::HighlightedContent;

fn report() -> HighlightedContent {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();
    Highlighter::new().highlight_content(content)
}

#[test]
fn frontmatter_feeds_the_cover() {
    let renderer = ThemeRenderer::default();
    let doc = renderer
        .render(&report(), ThemeKind::Professional, &Branding::new())
        .unwrap();
    assert_eq!(doc.title, "Quarterly Platform Report");
    assert!(doc.html.contains("Prepared for Acme Corp"));
    assert!(doc.html.contains("March 3, 2025"));
    assert!(doc.html.contains("<title>Quarterly Platform Report</title>"));
}

#[test]
fn explicit_branding_overrides_frontmatter() {
    let renderer = ThemeRenderer::default();
    let branding = Branding::new()
        .with_client_name("Globex")
        .with_project_title("Override");
    let doc = renderer
        .render(&report(), ThemeKind::Professional, &branding)
        .unwrap();
    assert!(doc.html.contains("Prepared for Globex"));
    assert_eq!(doc.title, "Override");
}

#[test]
fn toc_page_links_every_top_level_entry() {
    let renderer = ThemeRenderer::default();
    let doc = renderer
        .render(&report(), ThemeKind::Technical, &Branding::new())
        .unwrap();
    for anchor in ["overview", "goals", "rollout-plan", "rollout-plan-2"] {
        assert!(doc.html.contains(&format!("<a href=\"#{anchor}\">")));
        assert!(doc.html.contains(&format!("id=\"{anchor}\"")));
    }
    assert!(doc.html.contains("<h2 class=\"toc-heading\">Contents</h2>"));
}

#[test]
fn technical_cover_shows_document_control() {
    let renderer = ThemeRenderer::default();
    let doc = renderer
        .render(&report(), ThemeKind::Technical, &Branding::new())
        .unwrap();
    assert!(doc.html.contains("<tr><th>Version</th><td>2.1</td></tr>"));
}

#[test]
fn page_estimates_differ_by_theme() {
    let renderer = ThemeRenderer::default();
    let content = report();
    let pages = |kind| {
        renderer
            .render(&content, kind, &Branding::new())
            .unwrap()
            .estimated_pages
    };
    // Three chapters, one subsection.
    assert_eq!(pages(ThemeKind::Professional), 8);
    assert_eq!(pages(ThemeKind::Technical), 6);
    assert_eq!(pages(ThemeKind::Executive), 5);
}

#[test]
fn highlight_stylesheet_is_injected_once() {
    let renderer = ThemeRenderer::default();
    let content = report();
    let doc = renderer
        .render(&content, ThemeKind::Executive, &Branding::new())
        .unwrap();
    let css = content.stylesheet.trim();
    assert!(css.contains(".hl-"));
    assert_eq!(doc.html.matches(css).count(), 1);
}

#[test]
fn templates_carry_browser_placeholders() {
    let renderer = ThemeRenderer::default();
    for kind in ThemeKind::ALL {
        let doc = renderer.render(&report(), kind, &Branding::new()).unwrap();
        assert!(doc.footer_template.contains("class=\"pageNumber\""), "{kind}");
        assert!(doc.header_template.contains("font-size"), "{kind}");
    }
}
