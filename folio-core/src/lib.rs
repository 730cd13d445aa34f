//! Markdown to themed, paginated PDF
//!
//!     This crate turns Markdown documents (with frontmatter, callouts and fenced code) into
//!     print-quality PDFs with a cover page, a table of contents and highlighted code.
//!
//!     This is a pure lib: it powers folio-cli but is shell agnostic. No code here prints to
//!     stdout or reads CLI flags. The only environment it consults is the Chrome binary lookup
//!     in the PDF stage.
//!
//! Architecture
//!
//!     Five stages, leaf first, data flowing strictly left to right. No stage reads state from a
//!     later one:
//!
//!     source ──► parser ──► highlight ──► themes ──► pdf
//!                  ▲
//!     sources ─► batch (parse each in order, merge)
//!
//!     - parser: frontmatter, callouts, comrak rendering, heading anchors, link checks, TOC.
//!     - highlight: class-tokenized code blocks (syntect), language aliases and detection.
//!     - themes: cover + TOC page + body assembly, header/footer fragments, page estimate.
//!     - pdf: headless browser printing behind the RenderEngine trait, atomic writes.
//!     - batch: ordered merge of several sources into one document.
//!
//!     pipeline ties the stages together for the common single-call use.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── source.rs
//!     ├── parser
//!     │   ├── frontmatter.rs
//!     │   ├── callouts.rs
//!     │   ├── enrich.rs       # DOM pass: anchors, links, images
//!     │   ├── slug.rs
//!     │   └── toc.rs
//!     ├── highlight
//!     │   └── languages.rs    # aliases, grammars, detection rules
//!     ├── themes
//!     │   ├── registry.rs
//!     │   ├── branding.rs
//!     │   ├── pages.rs        # TOC page + page estimate
//!     │   └── <theme>.rs
//!     ├── pdf
//!     │   └── chrome.rs       # feature native-export
//!     ├── batch.rs
//!     └── pipeline.rs
//!
//! Failure model
//!
//!     Fatal errors are FolioError values naming the stage that failed (parse, template, render,
//!     io). Everything else degrades: unknown languages become plain text, broken links and
//!     images are annotated and reported as warnings, invalid branding falls back to the theme.
//!     No partial output file is ever left behind.
//!
//! Testing
//!     tests
//!     ├── lib.rs          # aggregates the modules below
//!     ├── common/         # fixtures + fake render engine
//!     └── <area>/mod.rs   # parser, highlight, themes, batch, pdf, end_to_end
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Library Choices
//!
//!     As much as possible we lean on specialized crates: comrak for CommonMark/GFM, html5ever for
//!     the DOM pass, syntect for tokenizing, headless_chrome for printing. The code here adapts
//!     between them.

pub mod batch;
pub mod error;
pub mod highlight;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod source;
pub mod themes;

pub use batch::merge;
pub use error::{FolioError, Stage};
pub use highlight::{HighlightedContent, Highlighter};
pub use parser::{parse, ContentWarning, EnrichedContent, ParseOptions, TocNode};
pub use pdf::{PdfArtifact, PdfOptions, PdfRenderer, RenderEngine};
pub use pipeline::{Pipeline, RenderOutcome};
pub use source::SourceDocument;
pub use themes::{Branding, RenderedDocument, ThemeKind, ThemeRenderer};

#[cfg(feature = "native-export")]
pub use pdf::ChromeEngine;
