//! Client-facing report theme: branded cover band, serif body, roomy chapters.

use super::{
    escape, page_band, BrandingDefaults, Palette, PageWeights, ResolvedBranding, Theme, ThemeKind,
};
use crate::parser::Metadata;

pub struct ProfessionalTheme;

impl Theme for ProfessionalTheme {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Professional
    }

    fn description(&self) -> &str {
        "Branded client report with a full-bleed cover and serif typography"
    }

    fn defaults(&self) -> BrandingDefaults {
        BrandingDefaults {
            client_name: "Client",
            project_title: "Project Report",
            palette: Palette {
                primary: "#1f3a5f",
                secondary: "#c9a227",
            },
        }
    }

    // Chapters start on a fresh spread.
    fn weights(&self) -> PageWeights {
        PageWeights {
            start: 3.0,
            h1: 2.0,
            h2: 0.0,
        }
    }

    fn stylesheet(&self) -> &'static str {
        include_str!("../../css/themes/theme-professional.css")
    }

    fn cover_page(&self, branding: &ResolvedBranding, metadata: &Metadata) -> String {
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
        let subtitle = metadata
            .get("subtitle")
            .map(|s| format!("<p class=\"cover-subtitle\">{}</p>\n", escape(s)))
            .unwrap_or_default();
        let author = metadata
            .get("author")
            .map(|a| format!("<p class=\"cover-author\">{}</p>\n", escape(a)))
            .unwrap_or_default();

        format!(
            "<section class=\"cover-page\">\n\
             <div class=\"cover-band\">\n{logo}\
             <p class=\"cover-client\">Prepared for {client}</p>\n\
             </div>\n\
             <div class=\"cover-main\">\n\
             <h1 class=\"cover-title\">{title}</h1>\n{subtitle}{author}\
             <p class=\"cover-date\">{date}</p>\n\
             </div>\n\
             </section>\n",
            client = escape(&branding.client_name),
            title = escape(&branding.project_title),
            date = escape(&branding.date),
        )
    }

    fn header_template(&self, branding: &ResolvedBranding) -> String {
        page_band(
            "color:#6b7280;",
            &format!(
                "<span>{}</span><span class=\"title\"></span>",
                escape(&branding.client_name)
            ),
        )
    }

    fn footer_template(&self, branding: &ResolvedBranding) -> String {
        page_band(
            &format!("color:#6b7280;border-top:0.5px solid {};", branding.secondary_color),
            "<span>Confidential</span>\
             <span>Page <span class=\"pageNumber\"></span> of <span class=\"totalPages\"></span></span>",
        )
    }
}
