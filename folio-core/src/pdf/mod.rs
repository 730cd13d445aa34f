//! PDF production (rendered HTML → paginated PDF on disk)
//!
//! The assembled document is written to a temporary directory, loaded by a
//! [`RenderEngine`] through a `file://` URL and printed with the theme's
//! header/footer fragments. The engine returns the whole PDF in memory; it is
//! written to the destination in one atomic step (temp file in the target
//! directory, then rename), so a failed render never leaves a partial file.
//!
//! The production engine is [`ChromeEngine`] (feature `native-export`), which
//! drives headless Chrome over the DevTools protocol. Tests substitute their
//! own engine.

#[cfg(feature = "native-export")]
mod chrome;

#[cfg(feature = "native-export")]
pub use chrome::{resolve_chrome_binary, ChromeEngine};

use crate::error::FolioError;
use crate::themes::RenderedDocument;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tempfile::{tempdir, NamedTempFile};
use tracing::{debug, info};
use url::Url;

/// Paper sizes supported for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait width and height in inches.
    pub fn inches(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (8.27, 11.69),
            PageSize::Letter => (8.5, 11.0),
            PageSize::Legal => (8.5, 14.0),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
        };
        f.write_str(name)
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!("unknown page size '{other}' (expected A4, Letter or Legal)")),
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 22.0,
            right: 16.0,
            bottom: 20.0,
            left: 16.0,
        }
    }
}

impl Margins {
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

pub(crate) fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}

/// Physical layout and engine limits for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub page_size: PageSize,
    pub landscape: bool,
    pub margins: Margins,
    /// Upper bound for launching, loading and printing.
    pub timeout: Duration,
    /// Browser window size in CSS pixels.
    pub viewport: (u32, u32),
    pub device_scale_factor: f64,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            landscape: false,
            margins: Margins::default(),
            timeout: Duration::from_secs(60),
            viewport: (1280, 1600),
            device_scale_factor: 1.0,
        }
    }
}

impl PdfOptions {
    /// Paper width and height in inches, honouring orientation.
    pub fn paper_inches(&self) -> (f64, f64) {
        let (w, h) = self.page_size.inches();
        if self.landscape {
            (h, w)
        } else {
            (w, h)
        }
    }
}

/// Everything an engine needs to print one page.
#[derive(Debug, Clone)]
pub struct PrintJob<'a> {
    /// `file://` URL of the assembled HTML
    pub page_url: Url,
    pub header_template: &'a str,
    pub footer_template: &'a str,
    pub options: &'a PdfOptions,
}

/// A headless rendering surface able to print HTML to PDF.
///
/// `&mut self` keeps the surface exclusively held for one job at a time.
pub trait RenderEngine {
    fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>, FolioError>;
}

/// The written PDF. The byte buffer is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfArtifact {
    pub output_path: PathBuf,
    pub file_size_bytes: u64,
    pub page_count: u32,
}

pub struct PdfRenderer<E> {
    engine: E,
    options: PdfOptions,
}

impl<E: RenderEngine> PdfRenderer<E> {
    pub fn new(engine: E, options: PdfOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Print `document` and write it to `output`.
    pub fn generate(
        &mut self,
        document: &RenderedDocument,
        output: impl AsRef<Path>,
    ) -> Result<PdfArtifact, FolioError> {
        let output = output.as_ref();

        let staging = tempdir().map_err(|e| FolioError::io(std::env::temp_dir(), e))?;
        let html_path = staging.path().join("document.html");
        fs::write(&html_path, &document.html).map_err(|e| FolioError::io(&html_path, e))?;
        let page_url = Url::from_file_path(&html_path).map_err(|_| {
            FolioError::render(format!(
                "cannot build a file:// URL for {}",
                html_path.display()
            ))
        })?;

        let job = PrintJob {
            page_url,
            header_template: &document.header_template,
            footer_template: &document.footer_template,
            options: &self.options,
        };
        debug!(url = %job.page_url, theme = %document.theme, "printing document");
        let bytes = self.engine.print_to_pdf(&job)?;
        if bytes.is_empty() {
            return Err(FolioError::render("renderer produced an empty document"));
        }

        let output_path = write_atomic(output, &bytes)?;
        let page_count = count_pages(&bytes).unwrap_or(document.estimated_pages);
        let artifact = PdfArtifact {
            output_path,
            file_size_bytes: bytes.len() as u64,
            page_count,
        };
        info!(
            path = %artifact.output_path.display(),
            bytes = artifact.file_size_bytes,
            pages = artifact.page_count,
            "wrote pdf"
        );
        Ok(artifact)
    }
}

static PAGE_OBJECT: Lazy<regex::bytes::Regex> = Lazy::new(|| {
    regex::bytes::Regex::new(r"/Type\s*/Page\b").expect("page object pattern compiles")
});

/// Number of page objects in a PDF buffer, if any can be found.
///
/// Only uncompressed object dictionaries are visible to this scan.
pub fn count_pages(pdf: &[u8]) -> Option<u32> {
    let count = PAGE_OBJECT.find_iter(pdf).count();
    (count > 0).then_some(count as u32)
}

/// Write `bytes` to `path` via a sibling temp file and rename.
///
/// Returns the absolute path written.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<PathBuf, FolioError> {
    let target = std::path::absolute(path).map_err(|e| FolioError::io(path, e))?;
    let parent = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&parent).map_err(|e| FolioError::io(&parent, e))?;

    let mut staged = NamedTempFile::new_in(&parent).map_err(|e| FolioError::io(&parent, e))?;
    staged
        .write_all(bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| FolioError::io(&target, e))?;
    staged
        .persist(&target)
        .map_err(|e| FolioError::io(&target, e.error))?;
    Ok(target)
}
