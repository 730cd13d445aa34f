//! Shared fixtures and a render engine that stands in for Chrome.

use folio_core::pdf::{PrintJob, RenderEngine};
use folio_core::{FolioError, SourceDocument};
use std::fs;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> SourceDocument {
    SourceDocument::from_path(fixture_path(name)).expect("fixture exists")
}

/// What the fake engine saw for one print.
#[derive(Debug, Clone)]
pub struct RecordedJob {
    pub html: String,
    pub header_template: String,
    pub footer_template: String,
}

/// Returns a minimal PDF with `pages` page objects and records every job.
pub struct FakeEngine {
    pub pages: u32,
    pub jobs: Vec<RecordedJob>,
    pub fail_with: Option<String>,
}

impl FakeEngine {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            jobs: Vec::new(),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            pages: 0,
            jobs: Vec::new(),
            fail_with: Some(message.to_string()),
        }
    }
}

impl RenderEngine for FakeEngine {
    fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>, FolioError> {
        if let Some(message) = &self.fail_with {
            return Err(FolioError::Render(message.clone()));
        }
        let path = job.page_url.to_file_path().expect("file url");
        self.jobs.push(RecordedJob {
            html: fs::read_to_string(path).expect("staged html"),
            header_template: job.header_template.to_string(),
            footer_template: job.footer_template.to_string(),
        });

        let mut pdf = b"%PDF-1.7\n1 0 obj << /Type /Pages >> endobj\n".to_vec();
        for i in 0..self.pages {
            pdf.extend_from_slice(format!("{} 0 obj << /Type /Page >> endobj\n", i + 2).as_bytes());
        }
        pdf.extend_from_slice(b"%%EOF\n");
        Ok(pdf)
    }
}
