//! Heading anchors.
//!
//! [`slugify`] is a pure function of its input. Uniqueness is a separate concern
//! handled by [`AnchorRegistry`], which is scoped to a single document.

use std::collections::HashSet;

/// Fallback anchor for headings whose text contains no word characters.
const EMPTY_SLUG: &str = "section";

/// Turn heading text into a URL/ID-safe slug.
///
/// Lowercases, trims, turns whitespace runs into `-`, drops anything that is
/// not a word character or hyphen, collapses repeated hyphens and trims them
/// from both ends.
///
/// ```ignore
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  C++ -- Guide "), "c-guide");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Extracts a `{#custom-id}` suffix from heading text.
///
/// Returns the text without the suffix and the id when one is present. Ids
/// may only contain ASCII alphanumerics, `-` and `_`.
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('}') {
        return (text, None);
    }

    if let Some(open) = trimmed.rfind("{#") {
        let id = &trimmed[open + 2..trimmed.len() - 1];
        if !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return (trimmed[..open].trim_end(), Some(id));
        }
    }

    (text, None)
}

/// Tracks the ids already used in one document.
#[derive(Debug, Default, Clone)]
pub struct AnchorRegistry {
    used: HashSet<String>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an id as taken without generating anything.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Returns `base` on first use, then `base-2`, `base-3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
