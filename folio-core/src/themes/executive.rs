//! Briefing theme for leadership audiences: minimal cover, one page per topic.

use super::{
    escape, page_band, BrandingDefaults, Palette, PageWeights, ResolvedBranding, Theme, ThemeKind,
};
use crate::parser::Metadata;

pub struct ExecutiveTheme;

impl Theme for ExecutiveTheme {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Executive
    }

    fn description(&self) -> &str {
        "Executive briefing with a minimal cover and large type"
    }

    fn defaults(&self) -> BrandingDefaults {
        BrandingDefaults {
            client_name: "Leadership Team",
            project_title: "Executive Summary",
            palette: Palette {
                primary: "#111827",
                secondary: "#b45309",
            },
        }
    }

    fn weights(&self) -> PageWeights {
        PageWeights {
            start: 3.0,
            h1: 1.0,
            h2: 0.0,
        }
    }

    fn stylesheet(&self) -> &'static str {
        include_str!("../../css/themes/theme-executive.css")
    }

    fn toc_heading(&self) -> &str {
        "At a Glance"
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
        let summary = metadata
            .get("summary")
            .or_else(|| metadata.get("description"))
            .map(|s| format!("<p class=\"cover-summary\">{}</p>\n", escape(s)))
            .unwrap_or_default();

        format!(
            "<section class=\"cover-page\">\n{logo}\
             <div class=\"cover-rule\"></div>\n\
             <h1 class=\"cover-title\">{title}</h1>\n{summary}\
             <p class=\"cover-meta\"><span class=\"cover-client\">{client}</span> \
             <span class=\"cover-date\">{date}</span></p>\n\
             </section>\n",
            title = escape(&branding.project_title),
            client = escape(&branding.client_name),
            date = escape(&branding.date),
        )
    }

    fn header_template(&self, _branding: &ResolvedBranding) -> String {
        // Empty but sized, otherwise Chrome prints its default header.
        page_band("", "<span></span>")
    }

    fn footer_template(&self, branding: &ResolvedBranding) -> String {
        page_band(
            &format!("color:{};", branding.secondary_color),
            &format!(
                "<span>{}</span><span class=\"pageNumber\"></span>",
                escape(&branding.client_name)
            ),
        )
    }
}
