//! Source documents.

use crate::error::FolioError;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw markdown plus where it came from. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    text: String,
    path: Option<PathBuf>,
}

impl SourceDocument {
    /// In-memory document with no origin on disk.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    /// Read a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;
        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory relative references resolve against.
    pub fn directory(&self) -> Option<&Path> {
        let parent = self.path.as_deref()?.parent()?;
        if parent.as_os_str().is_empty() {
            Some(Path::new("."))
        } else {
            Some(parent)
        }
    }
}
