//! Theme rendering (highlighted content → complete HTML document)
//!
//! A theme is a presentation strategy: cover page, TOC page, body CSS,
//! palette and pagination constants, plus the header/footer fragments the
//! browser repeats on every printed page. The set of themes is closed
//! ([`ThemeKind`]) and each one is registered in a [`ThemeRegistry`].
//!
//! # Styling
//!
//! Styles are layered the same way for every theme:
//!
//! - `css/baseline.css`: reset, page rules, callouts, code blocks (always included)
//! - `css/themes/theme-*.css`: theme typography and colors on top of the baseline
//! - token stylesheet from the highlighter
//!
//! Branding colors are exposed to the stylesheets as `--folio-primary` and
//! `--folio-secondary` custom properties.
//!
//! # Page numbers
//!
//! TOC page numbers and [`RenderedDocument::estimated_pages`] come from
//! [`pages::estimate`] and are indicative only. The PDF renderer reports the
//! real page count when it can read it from the output.

pub mod branding;
pub mod executive;
pub mod pages;
pub mod professional;
pub mod registry;
pub mod technical;

pub use branding::{is_valid_color, Branding, BrandingDefaults, ResolvedBranding};
pub use pages::{PageEstimate, PageWeights, TocEntry};
pub use registry::ThemeRegistry;

use crate::error::FolioError;
use crate::highlight::HighlightedContent;
use crate::parser::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const BASELINE_CSS: &str = include_str!("../../css/baseline.css");

/// Built-in themes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Professional,
    Technical,
    Executive,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 3] = [
        ThemeKind::Professional,
        ThemeKind::Technical,
        ThemeKind::Executive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Professional => "professional",
            ThemeKind::Technical => "technical",
            ThemeKind::Executive => "executive",
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ThemeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| FolioError::Template(s.to_string()))
    }
}

/// Default colors of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
}

/// A pluggable presentation strategy.
pub trait Theme: Send + Sync {
    fn kind(&self) -> ThemeKind;

    fn description(&self) -> &str;

    /// Fallback values for unset branding fields.
    fn defaults(&self) -> BrandingDefaults;

    fn weights(&self) -> PageWeights;

    /// Theme stylesheet layered over the baseline.
    fn stylesheet(&self) -> &'static str;

    fn cover_page(&self, branding: &ResolvedBranding, metadata: &Metadata) -> String;

    fn toc_heading(&self) -> &str {
        "Table of Contents"
    }

    fn toc_page(&self, entries: &[TocEntry]) -> String {
        pages::toc_page(self.toc_heading(), entries)
    }

    /// Repeating header. May use the `pageNumber`, `totalPages`, `title` and
    /// `date` placeholder classes.
    fn header_template(&self, branding: &ResolvedBranding) -> String;

    fn footer_template(&self, branding: &ResolvedBranding) -> String;
}

/// A complete HTML document ready for printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    pub header_template: String,
    pub footer_template: String,
    pub theme: ThemeKind,
    pub title: String,
    /// Heuristic page count. Do not rely on it matching the printed output.
    pub estimated_pages: u32,
}

/// Assembles documents using the registered themes.
pub struct ThemeRenderer {
    registry: ThemeRegistry,
}

impl Default for ThemeRenderer {
    fn default() -> Self {
        Self::new(ThemeRegistry::with_defaults())
    }
}

impl ThemeRenderer {
    pub fn new(registry: ThemeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Render by theme name; unknown names are a template error.
    pub fn render_named(
        &self,
        content: &HighlightedContent,
        theme: &str,
        branding: &Branding,
    ) -> Result<RenderedDocument, FolioError> {
        self.render(content, theme.parse()?, branding)
    }

    pub fn render(
        &self,
        content: &HighlightedContent,
        kind: ThemeKind,
        branding: &Branding,
    ) -> Result<RenderedDocument, FolioError> {
        let theme = self.registry.get(kind)?;
        let resolved = branding.resolve(&content.metadata, content.title(), &theme.defaults());
        let estimate = pages::estimate(&content.toc, theme.weights());

        let html = assemble(
            theme,
            &resolved,
            &theme.cover_page(&resolved, &content.metadata),
            &theme.toc_page(&estimate.entries),
            content,
        );

        debug!(
            theme = %kind,
            toc_entries = content.toc.len(),
            estimated_pages = estimate.total_pages,
            "assembled document"
        );

        Ok(RenderedDocument {
            html,
            header_template: theme.header_template(&resolved),
            footer_template: theme.footer_template(&resolved),
            theme: kind,
            title: resolved.project_title.clone(),
            estimated_pages: estimate.total_pages,
        })
    }
}

fn assemble(
    theme: &dyn Theme,
    branding: &ResolvedBranding,
    cover: &str,
    toc: &str,
    content: &HighlightedContent,
) -> String {
    let title = html_escape::encode_text(&branding.project_title);
    let theme_css = theme.stylesheet();
    let token_css = &content.stylesheet;
    let body = &content.html;
    let name = theme.kind().name();
    let primary = &branding.primary_color;
    let secondary = &branding.secondary_color;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="folio">
  <title>{title}</title>
  <style>
:root {{ --folio-primary: {primary}; --folio-secondary: {secondary}; }}
{BASELINE_CSS}
{theme_css}
{token_css}
  </style>
</head>
<body class="folio theme-{name}">
{cover}
{toc}
<main class="document-body">
{body}
</main>
</body>
</html>"#
    )
}

/// Header/footer fragments are rendered outside the page, so they need
/// inline styles. Chrome defaults their font size to zero.
pub(crate) fn page_band(style: &str, inner: &str) -> String {
    format!(
        "<div style=\"font-size:8px;width:100%;padding:0 14mm;display:flex;\
         justify-content:space-between;align-items:center;{style}\">{inner}</div>"
    )
}

pub(crate) fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}
