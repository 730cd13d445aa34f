//! Shared configuration loader for the folio toolchain.
//!
//! `defaults/folio.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`FolioConfig`].
//! The sections map onto the pipeline stages of `folio-core` and convert into
//! their option types.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use folio_core::highlight::Highlighter;
use folio_core::pdf::{Margins, PageSize, PdfOptions};
use folio_core::{Branding, ParseOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/folio.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG: &str = "folio.toml";

/// Top-level configuration consumed by folio applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    pub render: RenderConfig,
    #[serde(default)]
    pub branding: Branding,
    pub parse: ParseConfig,
    pub highlight: HighlightConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Theme name, checked against the registry when rendering.
    pub theme: String,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub validate_links: bool,
    pub callouts: bool,
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            validate_links: config.validate_links,
            callouts: config.callouts,
            ..ParseOptions::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub theme: String,
}

impl HighlightConfig {
    pub fn highlighter(&self) -> Highlighter {
        Highlighter::with_theme(&self.theme)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub page_size: String,
    pub landscape: bool,
    pub margins: Margins,
    pub timeout_secs: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub device_scale_factor: f64,
}

impl TryFrom<&PdfConfig> for PdfOptions {
    type Error = ConfigError;

    fn try_from(config: &PdfConfig) -> Result<Self, Self::Error> {
        let page_size: PageSize = config
            .page_size
            .parse()
            .map_err(|msg: String| ConfigError::Message(format!("pdf.page_size: {msg}")))?;
        if config.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "pdf.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if config.device_scale_factor <= 0.0 {
            return Err(ConfigError::Message(
                "pdf.device_scale_factor must be positive".to_string(),
            ));
        }
        Ok(PdfOptions {
            page_size,
            landscape: config.landscape,
            margins: config.margins,
            timeout: Duration::from_secs(config.timeout_secs),
            viewport: (config.viewport_width, config.viewport_height),
            device_scale_factor: config.device_scale_factor,
        })
    }
}

impl FolioConfig {
    pub fn parse_options(&self) -> ParseOptions {
        (&self.parse).into()
    }

    pub fn pdf_options(&self) -> Result<PdfOptions, ConfigError> {
        PdfOptions::try_from(&self.pdf)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FolioConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FolioConfig, ConfigError> {
    Loader::new().build()
}
