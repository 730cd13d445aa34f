//! Table-of-contents page and page-number estimation.
//!
//! The page numbers printed on the TOC page are an estimate. A counter starts
//! after the fixed cover and TOC pages and advances by a per-theme weight for
//! every top-level and second-level entry. Real pagination is done later by
//! the browser and may diverge; nothing reconciles the two.

use crate::parser::TocNode;
use std::fmt::Write as _;

/// Pagination constants for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageWeights {
    /// First body page (cover and TOC come before it).
    pub start: f32,
    /// Pages consumed per top-level entry.
    pub h1: f32,
    /// Pages consumed per second-level entry.
    pub h2: f32,
}

/// A TOC line with its estimated page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub depth: usize,
    pub title: String,
    pub anchor: String,
    pub page: u32,
    pub children: Vec<TocEntry>,
}

/// Estimated TOC plus an overall page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEstimate {
    pub entries: Vec<TocEntry>,
    pub total_pages: u32,
}

/// Walk top-level entries and their direct children, numbering each with the
/// current counter before advancing it. Deeper levels are not listed.
pub fn estimate(toc: &[TocNode], weights: PageWeights) -> PageEstimate {
    let mut counter = weights.start;
    let mut entries = Vec::with_capacity(toc.len());

    for node in toc {
        let page = counter.floor() as u32;
        counter += weights.h1;

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            children.push(TocEntry {
                depth: 1,
                title: child.title.clone(),
                anchor: child.anchor.clone(),
                page: counter.floor() as u32,
                children: Vec::new(),
            });
            counter += weights.h2;
        }

        entries.push(TocEntry {
            depth: 0,
            title: node.title.clone(),
            anchor: node.anchor.clone(),
            page,
            children,
        });
    }

    let total_pages = ((counter.ceil() as i64) - 1).max(1) as u32;
    PageEstimate {
        entries,
        total_pages,
    }
}

/// Render the TOC page. Returns an empty string when there are no entries.
pub fn toc_page(heading: &str, entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    html.push_str("<section class=\"toc-page\" aria-label=\"Table of contents\">\n");
    let _ = writeln!(
        html,
        "<h2 class=\"toc-heading\">{}</h2>",
        html_escape::encode_text(heading)
    );
    write_list(&mut html, entries, "toc-list");
    html.push_str("</section>\n");
    html
}

fn write_list(html: &mut String, entries: &[TocEntry], class: &str) {
    let _ = writeln!(html, "<ol class=\"{class}\">");
    for entry in entries {
        let _ = write!(
            html,
            "<li class=\"toc-entry toc-level-{level}\"><a href=\"#{anchor}\">\
             <span class=\"toc-title\">{title}</span>\
             <span class=\"toc-leader\" aria-hidden=\"true\"></span>\
             <span class=\"toc-page-number\">{page}</span></a>",
            level = entry.depth + 1,
            anchor = html_escape::encode_double_quoted_attribute(&entry.anchor),
            title = html_escape::encode_text(&entry.title),
            page = entry.page,
        );
        if !entry.children.is_empty() {
            html.push('\n');
            write_list(html, &entry.children, "toc-sublist");
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ol>\n");
}
