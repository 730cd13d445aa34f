//! Multi-document merge.
//!
//! Sources are parsed one after another in input order and combined into a
//! single [`EnrichedContent`]: fragments are joined with a page-break
//! separator, top-level TOC entries are concatenated, the first source to
//! define a metadata key wins and warnings are kept in order.
//!
//! All sources claim heading ids in one [`AnchorRegistry`], so ids stay
//! unique across the merged document. A later chapter's `## Overview` becomes
//! `overview-2`, and that chapter's own `#overview` links are rewritten to
//! match.

use crate::error::FolioError;
use crate::parser::{
    parse_source_with_anchors, AnchorRegistry, EnrichedContent, Metadata, ParseOptions,
};
use crate::source::SourceDocument;
use tracing::debug;

/// Marker placed between documents. Themes style it as a page break.
pub const DOCUMENT_SEPARATOR: &str = "<div class=\"document-break\" role=\"separator\"></div>";

/// Parse `sources` in order and merge them.
pub fn merge(
    sources: &[SourceDocument],
    options: &ParseOptions,
) -> Result<EnrichedContent, FolioError> {
    let mut anchors = AnchorRegistry::new();
    let parsed = sources
        .iter()
        .map(|source| parse_source_with_anchors(source, options, &mut anchors))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(combine(parsed))
}

/// Merge already-parsed documents, preserving their order.
///
/// Ids are only unique across `parts` when they were parsed against one
/// shared registry, as [`merge`] does.
pub fn combine(parts: Vec<EnrichedContent>) -> EnrichedContent {
    let count = parts.len();
    let mut html = Vec::with_capacity(count);
    let mut toc = Vec::new();
    let mut metadata = Metadata::new();
    let mut warnings = Vec::new();

    for part in parts {
        html.push(part.html);
        toc.extend(part.toc);
        for (key, value) in part.metadata {
            metadata.entry(key).or_insert(value);
        }
        warnings.extend(part.warnings);
    }

    debug!(documents = count, toc_entries = toc.len(), "merged documents");

    EnrichedContent {
        html: html.join(&format!("\n{DOCUMENT_SEPARATOR}\n")),
        toc,
        metadata,
        warnings,
    }
}
