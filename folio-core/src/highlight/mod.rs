//! Syntax highlighting for code blocks and inline code spans
//!
//! Runs over the parser's HTML fragment. Each `<pre><code>` block is decoded,
//! its language resolved (fence label, alias table, then content detection)
//! and re-emitted as class-tokenized markup:
//!
//! ```text
//! <pre class="code-block" data-language="rust"><code class="language-rust">
//!   <span class="hl-source hl-rust">…</span>
//! </code></pre>
//! ```
//!
//! Colors live in one stylesheet generated from the syntect theme, see
//! [`Highlighter::stylesheet`]. Highlighting never fails: any block that
//! cannot be tokenized is emitted as escaped plain text under the `text` tag.

pub mod languages;

pub use languages::{LanguageCache, PLAIN_TEXT};

use crate::error::HighlightError;
use crate::parser::{ContentWarning, EnrichedContent, Metadata, TocNode};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

/// syntect theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre[^>]*>\s*<code(?:\s+class="([^"]*)")?[^>]*>(.*?)</code>\s*</pre>"#)
        .expect("code block pattern compiles")
});

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<code>([^<]*)</code>").expect("inline code pattern compiles"));

/// Content after highlighting; carries the token stylesheet once.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedContent {
    pub html: String,
    pub toc: Vec<TocNode>,
    pub metadata: Metadata,
    pub warnings: Vec<ContentWarning>,
    pub stylesheet: String,
    /// Languages that were actually tokenized, sorted.
    pub languages: Vec<String>,
}

impl HighlightedContent {
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.toc.first().map(|node| node.title.as_str()))
    }
}

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    theme_name: String,
    cache: LanguageCache,
    seen: BTreeSet<String>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Use a named syntect theme; unknown names fall back to the default.
    pub fn with_theme(name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let (theme_name, theme) = match themes.remove(name) {
            Some(theme) => (name.to_string(), theme),
            None => {
                warn!(theme = name, fallback = DEFAULT_THEME, "unknown highlight theme");
                let theme = themes.remove(DEFAULT_THEME).unwrap_or_default();
                (DEFAULT_THEME.to_string(), theme)
            }
        };
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name,
            cache: LanguageCache::new(),
            seen: BTreeSet::new(),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Names of the bundled syntect themes.
    pub fn available_themes() -> Vec<String> {
        ThemeSet::load_defaults().themes.into_keys().collect()
    }

    /// Token stylesheet for the configured theme.
    pub fn stylesheet(&self) -> String {
        match css_for_theme_with_class_style(&self.theme, CLASS_STYLE) {
            Ok(css) => css,
            Err(err) => {
                warn!(theme = %self.theme_name, error = %err, "could not generate token stylesheet");
                String::new()
            }
        }
    }

    /// Rewrite every code block and detectable inline code span in `html`.
    pub fn highlight(&mut self, html: &str) -> String {
        let blocks = CODE_BLOCK
            .replace_all(html, |caps: &Captures| self.highlight_block(caps))
            .into_owned();
        INLINE_CODE
            .replace_all(&blocks, |caps: &Captures| self.highlight_inline(caps))
            .into_owned()
    }

    /// Highlight parsed content and attach the stylesheet.
    pub fn highlight_content(&mut self, content: EnrichedContent) -> HighlightedContent {
        self.seen.clear();
        let html = self.highlight(&content.html);
        let languages: Vec<String> = self.seen.iter().cloned().collect();
        debug!(languages = ?languages, "highlighted code");
        HighlightedContent {
            html,
            toc: content.toc,
            metadata: content.metadata,
            warnings: content.warnings,
            stylesheet: self.stylesheet(),
            languages,
        }
    }

    fn highlight_block(&mut self, caps: &Captures) -> String {
        let label = caps.get(1).and_then(|m| language_label(m.as_str()));
        let code = html_escape::decode_html_entities(caps.get(2).map_or("", |m| m.as_str()));

        let language = match label {
            Some(label) => self.cache.resolve(label).to_string(),
            None => self
                .cache
                .detect(&code)
                .unwrap_or(PLAIN_TEXT)
                .to_string(),
        };

        if language == PLAIN_TEXT {
            return render_block(PLAIN_TEXT, &html_escape::encode_text(&code));
        }

        match self.tokenize(&language, &code) {
            Ok(tokens) => {
                self.seen.insert(language.clone());
                render_block(&language, &tokens)
            }
            Err(err) => {
                warn!(error = %err, "falling back to plain text");
                render_block(PLAIN_TEXT, &html_escape::encode_text(&code))
            }
        }
    }

    fn highlight_inline(&mut self, caps: &Captures) -> String {
        let original = caps.get(0).map_or("", |m| m.as_str()).to_string();
        let code = html_escape::decode_html_entities(caps.get(1).map_or("", |m| m.as_str()));
        let Some(language) = self.cache.detect(&code) else {
            return original;
        };

        let line = format!("{code}\n");
        match self.tokenize(language, &line) {
            Ok(tokens) => {
                self.seen.insert(language.to_string());
                format!(
                    "<code class=\"inline-code language-{language}\">{}</code>",
                    tokens.replace('\n', "")
                )
            }
            Err(err) => {
                debug!(error = %err, "inline span left as-is");
                original
            }
        }
    }

    fn tokenize(&self, language: &str, code: &str) -> Result<String, HighlightError> {
        let failure = |reason: String| HighlightError {
            language: language.to_string(),
            reason,
        };

        let token = languages::grammar_token(language)
            .ok_or_else(|| failure("no grammar registered".to_string()))?;
        let syntax = self
            .syntaxes
            .find_syntax_by_token(token)
            .ok_or_else(|| failure(format!("grammar '{token}' missing from syntax set")))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| failure(err.to_string()))?;
        }
        Ok(generator.finalize())
    }
}

/// Pull `lang` out of a class attribute such as `language-lang other`.
fn language_label(class: &str) -> Option<&str> {
    class
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
        .filter(|label| !label.is_empty())
}

fn render_block(language: &str, body: &str) -> String {
    format!(
        "<pre class=\"code-block\" data-language=\"{language}\"><code class=\"language-{language}\">{body}</code></pre>"
    )
}
