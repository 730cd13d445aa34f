//! Parser behaviour over realistic documents.

use crate::common::{fixture, fixture_path};
use folio_core::parser::{
    count_nodes, parse, parse_source, slugify, ParseOptions, TocNode, WarningKind,
};
use proptest::prelude::*;

fn anchors(nodes: &[TocNode], out: &mut Vec<String>) {
    for node in nodes {
        out.push(node.anchor.clone());
        anchors(&node.children, out);
    }
}

#[test]
fn report_fixture_toc_and_anchors() {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();

    let titles: Vec<_> = content.toc.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Overview", "Rollout Plan", "Rollout Plan"]);
    assert_eq!(content.toc[0].children[0].title, "Goals");
    assert_eq!(count_nodes(&content.toc), 4);

    let mut all = Vec::new();
    anchors(&content.toc, &mut all);
    assert_eq!(all, vec!["overview", "goals", "rollout-plan", "rollout-plan-2"]);
    for anchor in &all {
        assert!(
            content.html.contains(&format!("id=\"{anchor}\"")),
            "anchor {anchor} missing from html"
        );
    }
}

#[test]
fn report_fixture_metadata() {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();
    assert_eq!(content.metadata["title"], "Quarterly Platform Report");
    assert_eq!(content.metadata["client"], "Acme Corp");
    assert_eq!(content.metadata["version"], "2.1");
    assert_eq!(content.metadata["tags"], "platform, infra");
    assert!(!content.html.contains("Quarterly Platform Report"));
}

#[test]
fn report_fixture_link_validation() {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();

    let kinds: Vec<_> = content.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::MissingAnchor, WarningKind::BrokenImage]);
    assert_eq!(content.warnings[0].target, "#does-not-exist");
    assert_eq!(content.warnings[1].target, "assets/missing.png");

    assert!(content.html.contains("data-broken=\"missing-anchor\""));
    assert!(content.html.contains("data-broken=\"missing-file\""));
    assert!(content.html.contains("Broken</a>"));
}

#[test]
fn existing_images_become_file_urls() {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();
    let diagram = url::Url::from_file_path(
        std::path::absolute(fixture_path("assets/diagram.png")).unwrap(),
    )
    .unwrap();
    assert!(content.html.contains(&format!("src=\"{diagram}\"")));
}

#[test]
fn validation_can_be_switched_off() {
    let options = ParseOptions {
        validate_links: false,
        ..ParseOptions::default()
    };
    let content = parse_source(&fixture("report.md"), &options).unwrap();
    assert!(content.warnings.is_empty());
    assert!(!content.html.contains("data-broken"));
}

#[test]
fn gfm_extensions_render() {
    let content = parse_source(&fixture("report.md"), &ParseOptions::default()).unwrap();
    assert!(content.html.contains("<table>"));
    assert!(content.html.contains("type=\"checkbox\""));
    assert!(content.html.contains("callout callout-warning"));
    assert!(content.html.contains("<p class=\"callout-title\">Heads up</p>"));
    assert!(content.html.contains("<code class=\"language-rust\">"));
}

#[test]
fn parse_is_idempotent() {
    let source = std::fs::read_to_string(fixture_path("report.md")).unwrap();
    let options = ParseOptions::default().with_base_dir(fixture_path(""));
    let first = parse(&source, &options).unwrap();
    let second = parse(&source, &options).unwrap();
    assert_eq!(first.html, second.html);
    assert_eq!(first.toc, second.toc);
}

#[test]
fn setup_collision_gets_numeric_suffix() {
    let content = parse("## Setup\n\n## Setup\n", &ParseOptions::default()).unwrap();
    let anchors: Vec<_> = content.toc.iter().map(|n| n.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["setup", "setup-2"]);
}

#[test]
fn literal_heading_after_generated_suffix() {
    let content = parse("# A\n\n# A\n\n# A 2\n", &ParseOptions::default()).unwrap();
    let anchors: Vec<_> = content.toc.iter().map(|n| n.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["a", "a-2", "a-2-2"]);
}

#[test]
fn three_h1_with_two_h2_each() {
    let md = "# One\n## a\n## b\n# Two\n## c\n## d\n# Three\n## e\n## f\n";
    let content = parse(md, &ParseOptions::default()).unwrap();
    assert_eq!(content.toc.len(), 3);
    assert!(content.toc.iter().all(|n| n.children.len() == 2));
    assert_eq!(count_nodes(&content.toc), 9);
}

#[test]
fn malformed_frontmatter_is_fatal() {
    let err = parse("---\ntitle: [oops\n---\n# Body\n", &ParseOptions::default()).unwrap_err();
    assert_eq!(err.stage(), folio_core::Stage::Parse);
    assert!(err.to_string().starts_with("Malformed frontmatter"));
}

proptest! {
    #[test]
    fn slugify_is_pure(s in ".{0,64}") {
        prop_assert_eq!(slugify(&s), slugify(&s));
    }

    #[test]
    fn slugs_have_no_stray_separators(s in ".{0,64}") {
        let slug = slugify(&s);
        prop_assert!(!slug.is_empty());
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
        prop_assert!(!slug.chars().any(char::is_whitespace));
    }
}

#[test]
fn hello_world_slug() {
    assert_eq!(slugify("Hello World!"), "hello-world");
}
