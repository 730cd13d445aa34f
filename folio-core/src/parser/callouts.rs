//! Named block containers ("callouts").
//!
//! Text-level preprocessing that runs before the markdown parser. A container
//! opens with `:::<variant> Optional title` (or `:::<variant>[Title]`) and
//! closes with a bare `:::` line. The opening/closing lines become raw HTML
//! wrappers separated by blank lines, so the container body is still parsed
//! as markdown.
//!
//! Lines inside fenced code blocks are never rewritten, unknown variants are
//! left as literal text and containers still open at the end of the document
//! are closed there.

use std::fmt::Write as _;

/// Supported container variants.
pub const CALLOUT_VARIANTS: &[&str] = &["info", "note", "tip", "success", "warning", "danger"];

/// A parsed opening line such as `:::warning[Heads up]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutOpening {
    pub variant: String,
    pub title: Option<String>,
}

impl CalloutOpening {
    fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => capitalize(&self.variant),
        }
    }

    fn open_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "\n<div class=\"callout callout-{variant}\" role=\"note\">\n\
             <p class=\"callout-title\">{title}</p>\n\
             <div class=\"callout-body\">\n\n",
            variant = self.variant,
            title = html_escape::encode_text(&self.display_title()),
        );
        html
    }
}

const CLOSE_HTML: &str = "\n</div>\n</div>\n\n";

/// Rewrite callout containers in `markdown` into HTML wrappers.
pub fn expand_callouts(markdown: &str) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut fence = FenceState::default();
    let mut open: Vec<CalloutOpening> = Vec::new();

    for line in markdown.split_inclusive('\n') {
        if fence.advance(line) {
            output.push_str(line);
            continue;
        }

        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(":::") {
            let rest = rest.trim_start_matches(':').trim();
            if rest.is_empty() {
                if open.pop().is_some() {
                    output.push_str(CLOSE_HTML);
                    continue;
                }
            } else if let Some(opening) = parse_opening(rest) {
                output.push_str(&opening.open_html());
                open.push(opening);
                continue;
            }
        }

        output.push_str(line);
    }

    for _ in open.drain(..) {
        output.push_str(CLOSE_HTML);
    }

    output
}

/// Parse what follows the `:::` marker.
pub fn parse_opening(rest: &str) -> Option<CalloutOpening> {
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let variant = rest[..name_len].to_ascii_lowercase();
    if !CALLOUT_VARIANTS.contains(&variant.as_str()) {
        return None;
    }

    let remainder = rest[name_len..].trim();
    let title = if let Some(bracketed) = remainder.strip_prefix('[') {
        bracketed
            .find(']')
            .map(|end| bracketed[..end].trim().to_string())
    } else if remainder.is_empty() {
        None
    } else {
        Some(remainder.to_string())
    };

    Some(CalloutOpening {
        variant,
        title: title.filter(|t| !t.is_empty()),
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Tracks whether we are inside a fenced code block.
#[derive(Debug, Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Feed one line; returns true when the line belongs to a fence (including
    /// its delimiters) and must be passed through untouched.
    fn advance(&mut self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let candidate = if indent <= 3 { fence_marker(line.trim_start()) } else { None };

        match (self.open, candidate) {
            (Some((ch, len)), Some((c, l, rest))) if c == ch && l >= len && rest.trim().is_empty() => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, Some((c, l, _))) => {
                self.open = Some((c, l));
                true
            }
            (None, None) => false,
        }
    }
}

fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let first = line.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = line.chars().take_while(|&c| c == first).count();
    if len < 3 {
        return None;
    }
    Some((first, len, &line[len..]))
}
