//! Language names, aliases and content-based detection.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Tag used for blocks with no supported language.
pub const PLAIN_TEXT: &str = "text";

/// Alias → canonical language tag.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("node", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("python3", "python"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("yml", "yaml"),
    ("rs", "rust"),
    ("md", "markdown"),
    ("golang", "go"),
    ("htm", "html"),
    ("xhtml", "html"),
    ("rb", "ruby"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("c#", "csharp"),
    ("plaintext", PLAIN_TEXT),
    ("txt", PLAIN_TEXT),
    ("plain", PLAIN_TEXT),
];

/// Canonical tag → token handed to `SyntaxSet::find_syntax_by_token`.
///
/// The bundled grammar set has no TypeScript/JSX syntax, so those tags are
/// tokenized with the JavaScript grammar while keeping their own name.
const GRAMMARS: &[(&str, &str)] = &[
    ("rust", "rs"),
    ("go", "go"),
    ("python", "py"),
    ("javascript", "js"),
    ("typescript", "js"),
    ("jsx", "js"),
    ("tsx", "js"),
    ("java", "java"),
    ("sql", "sql"),
    ("bash", "sh"),
    ("yaml", "yaml"),
    ("css", "css"),
    ("html", "html"),
    ("xml", "xml"),
    ("json", "json"),
    ("markdown", "md"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("csharp", "cs"),
    ("ruby", "rb"),
    ("php", "php"),
    ("perl", "pl"),
    ("lua", "lua"),
    ("haskell", "hs"),
    ("scala", "scala"),
    ("diff", "diff"),
    ("makefile", "make"),
    ("latex", "tex"),
];

/// Resolve a fence label to its canonical tag. Does not check support.
pub fn canonical_name(label: &str) -> String {
    let label = label.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map(|(_, name)| name.to_string())
        .unwrap_or(label)
}

/// Grammar lookup token for a canonical tag, if the tag is supported.
pub fn grammar_token(language: &str) -> Option<&'static str> {
    GRAMMARS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, token)| *token)
}

enum Matcher {
    Pattern(Regex),
    Json,
}

impl Matcher {
    fn matches(&self, code: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(code),
            Matcher::Json => looks_like_json(code),
        }
    }
}

struct Rule {
    language: &'static str,
    matcher: Matcher,
}

fn pattern(language: &'static str, re: &str) -> Rule {
    Rule {
        language,
        matcher: Matcher::Pattern(Regex::new(re).expect("detection pattern compiles")),
    }
}

/// Detection rules in priority order; the first match wins.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        pattern("bash", r"\A#!.*\b(ba|z)?sh\b"),
        pattern("python", r"\A#!.*\bpython[0-9.]*\b"),
        pattern("javascript", r"\A#!.*\bnode\b"),
        Rule {
            language: "json",
            matcher: Matcher::Json,
        },
        pattern("xml", r"\A\s*<\?xml\b"),
        pattern(
            "html",
            r"(?i)\A\s*(<!doctype\s+html|<html\b|<(head|body|div|span|p|section|table|ul)\b[^>]*>)",
        ),
        pattern(
            "rust",
            r"(?m)^\s*(pub(\(crate\))?\s+)?(fn\s+\w+|struct\s+\w+|enum\s+\w+|impl\b|trait\s+\w+|mod\s+\w+;|use\s+\w+::)|\blet\s+mut\b|\b(println|vec|format)!\(",
        ),
        pattern(
            "go",
            r"(?m)^package\s+\w+\s*$|^\s*func\s+(\([^)]*\)\s*)?\w+\(|^import\s+\(|\bfmt\.\w+\(",
        ),
        pattern(
            "python",
            r"(?m)^\s*(def\s+\w+\s*\(.*\)\s*(->\s*[^:]+)?:|class\s+\w+\s*(\(.*\))?\s*:|from\s+[\w.]+\s+import\s|import\s+[\w.]+\s*$|if\s+__name__\s*==)",
        ),
        pattern(
            "typescript",
            r"(?m)^\s*(export\s+)?(interface\s+\w+\s*\{|type\s+\w+\s*=)|\b(const|let)\s+\w+\s*:\s*(string|number|boolean|any|unknown)\b",
        ),
        pattern(
            "javascript",
            r"(?m)^\s*(const|let|var)\s+\w+\s*=|\bfunction\s*\w*\s*\(|\bconsole\.\w+\(|\brequire\(|=>\s*[{(]?",
        ),
        pattern(
            "java",
            r"(?m)\bpublic\s+(static\s+)?(final\s+)?(class|void|interface)\b|\bSystem\.out\.print",
        ),
        pattern(
            "sql",
            r"(?is)\A\s*(select\s+.+\s+from\s|insert\s+into\s|update\s+\w+\s+set\s|delete\s+from\s|create\s+(table|index|view|unique\s+index)\s|alter\s+table\s|drop\s+table\s|with\s+\w+\s+as\s*\()",
        ),
        pattern(
            "bash",
            r"(?m)^\s*(\$\s+)?(sudo|apt(-get)?|brew|npm|npx|yarn|pnpm|cargo|pip3?|git|cd|ls|echo|export|curl|wget|docker|kubectl|mkdir|chmod|rm|cp|mv|make)(\s|$)",
        ),
        pattern(
            "yaml",
            r"\A(---[ \t]*\n)?([ \t]*(- )?[\w.-]+:([ \t].*)?\n)*[ \t]*(- )?[\w.-]+:([ \t].*)?\n?\z",
        ),
        pattern(
            "css",
            r"(?m)^\s*([.#@]?[\w-]+[\w\s.#:>,\[\]=-]*)\{\s*[\w-]+\s*:\s*[^;{}]+;",
        ),
    ]
});

fn looks_like_json(code: &str) -> bool {
    let trimmed = code.trim();
    let framed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    framed && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

/// Guess the language of an unlabeled snippet.
pub fn detect(code: &str) -> Option<&'static str> {
    if code.trim().is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(code))
        .map(|rule| rule.language)
}

/// Most detection results kept before the cache starts over.
pub const DETECTION_CACHE_LIMIT: usize = 256;

/// Memoized alias resolution and detection, owned by one highlighter.
///
/// Fence labels form a small closed set. Detection is keyed by code text, so
/// that map is bounded by [`DETECTION_CACHE_LIMIT`].
#[derive(Debug, Default)]
pub struct LanguageCache {
    resolved: HashMap<String, String>,
    detected: HashMap<String, Option<&'static str>>,
}

impl LanguageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical tag for a fence label, or `text` when unsupported.
    pub fn resolve(&mut self, label: &str) -> &str {
        if !self.resolved.contains_key(label) {
            let name = canonical_name(label);
            let name = if grammar_token(&name).is_some() {
                name
            } else {
                PLAIN_TEXT.to_string()
            };
            self.resolved.insert(label.to_string(), name);
        }
        self.resolved
            .get(label)
            .map(String::as_str)
            .unwrap_or(PLAIN_TEXT)
    }

    pub fn detect(&mut self, code: &str) -> Option<&'static str> {
        if let Some(hit) = self.detected.get(code) {
            return *hit;
        }
        let language = detect(code);
        if self.detected.len() >= DETECTION_CACHE_LIMIT {
            self.detected.clear();
        }
        self.detected.insert(code.to_string(), language);
        language
    }

    pub fn len(&self) -> usize {
        self.resolved.len() + self.detected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
