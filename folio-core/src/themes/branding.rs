//! Branding inputs and their resolution against frontmatter and theme defaults.

use super::Palette;
use crate::parser::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Caller-supplied branding. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub client_name: Option<String>,
    pub project_title: Option<String>,
    pub logo: Option<PathBuf>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub date: Option<String>,
}

impl Branding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn with_project_title(mut self, title: impl Into<String>) -> Self {
        self.project_title = Some(title.into());
        self
    }

    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo = Some(path.into());
        self
    }

    pub fn with_colors(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_color = Some(primary.into());
        self.secondary_color = Some(secondary.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Apply a `key=value` override as passed on the command line.
    ///
    /// Returns false when the key is not a branding field.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let value = value.to_string();
        match key.replace('_', "-").as_str() {
            "client-name" | "client" | "company" => self.client_name = Some(value),
            "project-title" | "title" => self.project_title = Some(value),
            "logo" => self.logo = Some(PathBuf::from(value)),
            "primary-color" => self.primary_color = Some(value),
            "secondary-color" => self.secondary_color = Some(value),
            "date" => self.date = Some(value),
            _ => return false,
        }
        true
    }

    /// Fill every field: explicit value → frontmatter → theme default.
    ///
    /// `fallback_title` is used before the theme default when neither the
    /// caller nor the frontmatter names the project (typically the first
    /// heading of the document).
    pub fn resolve(
        &self,
        metadata: &Metadata,
        fallback_title: Option<&str>,
        defaults: &BrandingDefaults,
    ) -> ResolvedBranding {
        let from_meta = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| metadata.get(*key))
                .map(|value| value.trim())
                .find(|value| !value.is_empty())
                .map(str::to_string)
        };

        let client_name = non_empty(&self.client_name)
            .or_else(|| from_meta(&["client", "company"]))
            .unwrap_or_else(|| defaults.client_name.to_string());

        let project_title = non_empty(&self.project_title)
            .or_else(|| from_meta(&["title"]))
            .or_else(|| fallback_title.map(str::to_string))
            .unwrap_or_else(|| defaults.project_title.to_string());

        let date = non_empty(&self.date)
            .or_else(|| from_meta(&["date"]))
            .unwrap_or_else(today);

        ResolvedBranding {
            client_name,
            project_title,
            logo_url: self.logo.as_deref().and_then(logo_url),
            primary_color: color_or(&self.primary_color, defaults.palette.primary, "primary"),
            secondary_color: color_or(
                &self.secondary_color,
                defaults.palette.secondary,
                "secondary",
            ),
            date,
        }
    }
}

/// What a theme falls back to when branding is unset.
#[derive(Debug, Clone, Copy)]
pub struct BrandingDefaults {
    pub client_name: &'static str,
    pub project_title: &'static str,
    pub palette: Palette,
}

/// Fully resolved branding. Values are raw text; escape on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBranding {
    pub client_name: String,
    pub project_title: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub date: String,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn today() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

fn color_or(value: &Option<String>, default: &str, which: &str) -> String {
    match non_empty(value) {
        Some(color) if is_valid_color(&color) => color,
        Some(color) => {
            warn!(color = %color, slot = which, fallback = default, "ignoring invalid color");
            default.to_string()
        }
        None => default.to_string(),
    }
}

fn logo_url(path: &Path) -> Option<String> {
    let absolute = match std::path::absolute(path) {
        Ok(p) if p.is_file() => p,
        _ => {
            warn!(logo = %path.display(), "logo not found, omitting it");
            return None;
        }
    };
    match Url::from_file_path(&absolute) {
        Ok(url) => Some(url.to_string()),
        Err(()) => {
            warn!(logo = %absolute.display(), "logo path cannot be expressed as a URL");
            None
        }
    }
}

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color pattern compiles")
});

const CSS_COLOR_NAMES: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

/// `#hex` (3, 4, 6 or 8 digits) or a CSS named color.
pub fn is_valid_color(value: &str) -> bool {
    HEX_COLOR.is_match(value) || CSS_COLOR_NAMES.contains(&value.to_ascii_lowercase().as_str())
}
