//! Content parser (Markdown → enriched HTML fragment)
//!
//! Pipeline: source → frontmatter split → callout expansion → comrak HTML →
//! DOM enrichment (anchors, link checks) → TOC tree.
//!
//! # Library Choice
//!
//! `comrak` does the CommonMark/GFM rendering; the enrichment pass works on an
//! `html5ever` RcDom so that anchors land on the actual heading elements no
//! matter whether the heading came from markdown or from raw HTML.
//!
//! # Failure Model
//!
//! Only malformed frontmatter is fatal. Everything else degrades the way
//! CommonMark does (unrecognised syntax is literal text) and broken links or
//! images are annotated in the output and reported as [`ContentWarning`]s.

pub mod callouts;
pub mod enrich;
pub mod frontmatter;
pub mod slug;
pub mod toc;

pub use enrich::{ContentWarning, WarningKind};
pub use frontmatter::Metadata;
pub use slug::{slugify, AnchorRegistry};
pub use toc::{build_toc, count_nodes, Heading, TocNode};

use crate::error::FolioError;
use crate::source::SourceDocument;
use comrak::{markdown_to_html, Options};
use std::path::PathBuf;
use tracing::debug;

/// Knobs for a single parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Directory relative links and images are resolved against. When unset,
    /// only `#fragment` links are validated.
    pub base_dir: Option<PathBuf>,
    /// Annotate broken links/images
    pub validate_links: bool,
    /// Expand `:::variant` containers
    pub callouts: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            validate_links: true,
            callouts: true,
        }
    }
}

impl ParseOptions {
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

/// Parser output: HTML fragment, TOC tree and frontmatter metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedContent {
    pub html: String,
    pub toc: Vec<TocNode>,
    pub metadata: Metadata,
    pub warnings: Vec<ContentWarning>,
}

impl EnrichedContent {
    /// Document title: the `title` frontmatter key, else the first heading.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.toc.first().map(|node| node.title.as_str()))
    }
}

/// Parse markdown into enriched content.
pub fn parse(markdown: &str, options: &ParseOptions) -> Result<EnrichedContent, FolioError> {
    parse_with_anchors(markdown, options, &mut AnchorRegistry::new())
}

/// Like [`parse`], but heading ids are claimed in `anchors`, which may already
/// hold ids from other documents. Fragment links are rewritten to follow any
/// heading that had to be renamed.
pub fn parse_with_anchors(
    markdown: &str,
    options: &ParseOptions,
    anchors: &mut AnchorRegistry,
) -> Result<EnrichedContent, FolioError> {
    let (metadata, body) = frontmatter::split_frontmatter(markdown)?;

    let body = if options.callouts {
        callouts::expand_callouts(body)
    } else {
        body.to_string()
    };

    let fragment = markdown_to_html(&body, &comrak_options());
    let enriched = enrich::enrich(&fragment, options, anchors)?;
    let toc = build_toc(&enriched.headings);

    debug!(
        headings = enriched.headings.len(),
        warnings = enriched.warnings.len(),
        metadata_keys = metadata.len(),
        "parsed markdown"
    );

    Ok(EnrichedContent {
        html: enriched.html,
        toc,
        metadata,
        warnings: enriched.warnings,
    })
}

/// Parse a source document, resolving relative references against its
/// directory unless `options` already names one.
pub fn parse_source(
    source: &SourceDocument,
    options: &ParseOptions,
) -> Result<EnrichedContent, FolioError> {
    parse_source_with_anchors(source, options, &mut AnchorRegistry::new())
}

pub fn parse_source_with_anchors(
    source: &SourceDocument,
    options: &ParseOptions,
    anchors: &mut AnchorRegistry,
) -> Result<EnrichedContent, FolioError> {
    if options.base_dir.is_some() {
        return parse_with_anchors(source.text(), options, anchors);
    }
    let options = match source.directory() {
        Some(dir) => options.clone().with_base_dir(dir),
        None => options.clone(),
    };
    parse_with_anchors(source.text(), &options, anchors)
}

fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.render.unsafe_ = true;
    options
}
