//! Error types for the rendering pipeline
//!
//! Every fatal failure surfaces as a [`FolioError`] naming the stage that failed.
//! Highlighting problems are the one recoverable class: they are represented by
//! [`HighlightError`], logged, and never returned to callers.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Template,
    Render,
    Io,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Parse => "parse",
            Stage::Template => "template",
            Stage::Render => "render",
            Stage::Io => "io",
        };
        f.write_str(name)
    }
}

/// Fatal errors raised while turning markdown into a PDF.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Frontmatter block could not be read as a key/value mapping.
    #[error("Malformed frontmatter: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    /// Rendered markdown could not be re-read or re-serialized as HTML.
    #[error("Malformed markup: {0}")]
    Markup(String),

    /// Requested theme has no registered implementation.
    #[error("Unknown theme '{0}'")]
    Template(String),

    /// Headless renderer failed, timed out or could not be launched.
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Source unreadable or output path unwritable.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FolioError {
    pub fn stage(&self) -> Stage {
        match self {
            FolioError::Parse { .. } | FolioError::Markup(_) => Stage::Parse,
            FolioError::Template(_) => Stage::Template,
            FolioError::Render(_) => Stage::Render,
            FolioError::Io { .. } => Stage::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FolioError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn markup(message: impl fmt::Display) -> Self {
        FolioError::Markup(message.to_string())
    }

    pub(crate) fn render(message: impl fmt::Display) -> Self {
        FolioError::Render(message.to_string())
    }
}

/// Recoverable highlighting failure. Contained inside the highlighter.
#[derive(Debug, Error)]
#[error("could not highlight '{language}' block: {reason}")]
pub struct HighlightError {
    pub language: String,
    pub reason: String,
}
