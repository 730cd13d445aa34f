//! Engineering documentation theme. Dense pagination, sans-serif body, wide
//! code blocks and a document-control table on the cover.

use super::{
    escape, page_band, BrandingDefaults, Palette, PageWeights, ResolvedBranding, Theme, ThemeKind,
};
use crate::parser::Metadata;
use std::fmt::Write as _;

/// Frontmatter keys shown in the cover's document-control table.
const CONTROL_FIELDS: &[(&str, &str)] = &[
    ("version", "Version"),
    ("status", "Status"),
    ("author", "Author"),
    ("reviewers", "Reviewers"),
];

pub struct TechnicalTheme;

impl Theme for TechnicalTheme {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Technical
    }

    fn description(&self) -> &str {
        "Technical documentation with dense pagination and prominent code"
    }

    fn defaults(&self) -> BrandingDefaults {
        BrandingDefaults {
            client_name: "Engineering",
            project_title: "Technical Documentation",
            palette: Palette {
                primary: "#0b6e4f",
                secondary: "#2d3436",
            },
        }
    }

    fn weights(&self) -> PageWeights {
        PageWeights {
            start: 3.0,
            h1: 1.0,
            h2: 0.5,
        }
    }

    fn stylesheet(&self) -> &'static str {
        include_str!("../../css/themes/theme-technical.css")
    }

    fn toc_heading(&self) -> &str {
        "Contents"
    }

    fn cover_page(&self, branding: &ResolvedBranding, metadata: &Metadata) -> String {
        let mut rows = String::new();
        let _ = writeln!(
            rows,
            "<tr><th>Owner</th><td>{}</td></tr>",
            escape(&branding.client_name)
        );
        let _ = writeln!(
            rows,
            "<tr><th>Date</th><td>{}</td></tr>",
            escape(&branding.date)
        );
        for (key, label) in CONTROL_FIELDS {
            if let Some(value) = metadata.get(*key).filter(|v| !v.trim().is_empty()) {
                let _ = writeln!(rows, "<tr><th>{label}</th><td>{}</td></tr>", escape(value));
            }
        }

        let logo = branding
            .logo_url
            .as_deref()
            .map(|url| {
                format!(
                    "<img class=\"cover-logo\" src=\"{}\" alt=\"\">\n",
                    html_escape::encode_double_quoted_attribute(url)
                )
            })
            .unwrap_or_default();

        format!(
            "<section class=\"cover-page\">\n{logo}\
             <p class=\"cover-kicker\">Technical Documentation</p>\n\
             <h1 class=\"cover-title\">{title}</h1>\n\
             <table class=\"cover-control\">\n{rows}</table>\n\
             </section>\n",
            title = escape(&branding.project_title),
        )
    }

    fn header_template(&self, _branding: &ResolvedBranding) -> String {
        page_band(
            "color:#4b5563;font-family:monospace;",
            "<span class=\"title\"></span><span class=\"date\"></span>",
        )
    }

    fn footer_template(&self, branding: &ResolvedBranding) -> String {
        page_band(
            "color:#4b5563;font-family:monospace;",
            &format!(
                "<span>{}</span><span><span class=\"pageNumber\"></span>/<span class=\"totalPages\"></span></span>",
                escape(&branding.client_name)
            ),
        )
    }
}
