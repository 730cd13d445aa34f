//! Document rendering pipeline.
//!
//! Provides the high-level API: one call takes markdown source(s) through
//! parse → highlight → theme → PDF and reports what was written.
//!
//! A [`Pipeline`] owns one parser configuration, one highlighter (and so one
//! language cache), the theme registry and one renderer session. Independent
//! pipelines share nothing mutable and can run on separate threads.
//!
//! ```ignore
//! let mut pipeline = Pipeline::new(ChromeEngine::new());
//! let outcome = pipeline.render(
//!     &SourceDocument::from_path("guide.md")?,
//!     ThemeKind::Technical,
//!     &Branding::new().with_client_name("Acme"),
//!     "guide.pdf",
//! )?;
//! println!("{} pages", outcome.artifact.page_count);
//! ```
//!
//! For more control over each stage use the components directly.

use crate::batch;
use crate::error::FolioError;
use crate::highlight::{HighlightedContent, Highlighter};
use crate::parser::{parse_source, ContentWarning, Metadata, ParseOptions, TocNode};
use crate::pdf::{write_atomic, PdfArtifact, PdfOptions, PdfRenderer, RenderEngine};
use crate::source::SourceDocument;
use crate::themes::{Branding, RenderedDocument, ThemeKind, ThemeRenderer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A themed document plus the content it was built from.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub document: RenderedDocument,
    pub content: HighlightedContent,
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutcome {
    pub artifact: PdfArtifact,
    pub toc: Vec<TocNode>,
    pub metadata: Metadata,
    pub warnings: Vec<ContentWarning>,
    /// Heuristic page count used for the TOC page.
    pub estimated_pages: u32,
}

pub struct Pipeline<E> {
    parse: ParseOptions,
    highlighter: Highlighter,
    themes: ThemeRenderer,
    renderer: PdfRenderer<E>,
}

impl<E: RenderEngine> Pipeline<E> {
    /// Pipeline with default parser, highlighter, themes and PDF options.
    pub fn new(engine: E) -> Self {
        Self {
            parse: ParseOptions::default(),
            highlighter: Highlighter::new(),
            themes: ThemeRenderer::default(),
            renderer: PdfRenderer::new(engine, PdfOptions::default()),
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_themes(mut self, themes: ThemeRenderer) -> Self {
        self.themes = themes;
        self
    }

    pub fn with_pdf_options(self, options: PdfOptions) -> Self {
        Self {
            renderer: PdfRenderer::new(self.renderer.into_engine(), options),
            ..self
        }
    }

    pub fn themes(&self) -> &ThemeRenderer {
        &self.themes
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn engine(&self) -> &E {
        self.renderer.engine()
    }

    /// Parse, highlight and theme one source without printing it.
    pub fn assemble(
        &mut self,
        source: &SourceDocument,
        theme: ThemeKind,
        branding: &Branding,
    ) -> Result<Assembled, FolioError> {
        self.themes.registry().get(theme)?;
        let content = parse_source(source, &self.parse)?;
        self.finish(content, theme, branding)
    }

    /// Merge several sources (in order) and theme the result.
    pub fn assemble_batch(
        &mut self,
        sources: &[SourceDocument],
        theme: ThemeKind,
        branding: &Branding,
    ) -> Result<Assembled, FolioError> {
        self.themes.registry().get(theme)?;
        let content = batch::merge(sources, &self.parse)?;
        self.finish(content, theme, branding)
    }

    /// Render one source to a PDF at `output`.
    pub fn render(
        &mut self,
        source: &SourceDocument,
        theme: ThemeKind,
        branding: &Branding,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutcome, FolioError> {
        let assembled = self.assemble(source, theme, branding)?;
        self.print(assembled, output.as_ref())
    }

    pub fn render_markdown(
        &mut self,
        markdown: &str,
        theme: ThemeKind,
        branding: &Branding,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutcome, FolioError> {
        self.render(
            &SourceDocument::from_string(markdown),
            theme,
            branding,
            output,
        )
    }

    /// Merge `sources` in input order and render them as one PDF.
    pub fn merge_and_render(
        &mut self,
        sources: &[SourceDocument],
        theme: ThemeKind,
        branding: &Branding,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutcome, FolioError> {
        let assembled = self.assemble_batch(sources, theme, branding)?;
        self.print(assembled, output.as_ref())
    }

    fn finish(
        &mut self,
        content: crate::parser::EnrichedContent,
        theme: ThemeKind,
        branding: &Branding,
    ) -> Result<Assembled, FolioError> {
        let content = self.highlighter.highlight_content(content);
        let document = self.themes.render(&content, theme, branding)?;
        debug!(theme = %theme, title = %document.title, "document assembled");
        Ok(Assembled { document, content })
    }

    fn print(&mut self, assembled: Assembled, output: &Path) -> Result<RenderOutcome, FolioError> {
        let artifact = self.renderer.generate(&assembled.document, output)?;
        Ok(RenderOutcome {
            artifact,
            toc: assembled.content.toc,
            metadata: assembled.content.metadata,
            warnings: assembled.content.warnings,
            estimated_pages: assembled.document.estimated_pages,
        })
    }
}

#[cfg(feature = "native-export")]
impl Default for Pipeline<crate::pdf::ChromeEngine> {
    fn default() -> Self {
        Self::new(crate::pdf::ChromeEngine::new())
    }
}

/// Write an assembled document as standalone HTML. Returns the absolute path.
pub fn write_html(
    document: &RenderedDocument,
    output: impl AsRef<Path>,
) -> Result<PathBuf, FolioError> {
    write_atomic(output.as_ref(), document.html.as_bytes())
}
