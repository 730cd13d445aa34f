//! Highlighting over parser output.

use folio_core::highlight::{Highlighter, PLAIN_TEXT};
use folio_core::parser::{parse, ParseOptions};

fn highlighted(markdown: &str) -> String {
    let content = parse(markdown, &ParseOptions::default()).unwrap();
    Highlighter::new().highlight_content(content).html
}

#[test]
fn unsupported_language_is_escaped_text() {
    let html = highlighted("```not-a-real-lang\nif a < b { x && y }\n```\n");
    assert!(html.contains(&format!(
        "<pre class=\"code-block\" data-language=\"{PLAIN_TEXT}\"><code class=\"language-text\">if a &lt; b {{ x &amp;&amp; y }}\n</code></pre>"
    )));
    assert!(!html.contains("hl-"));
}

#[test]
fn aliases_keep_canonical_tags() {
    let html = highlighted("```py\nprint(1)\n```\n\n```yml\nkey: value\n```\n\n```sh\nls -la\n```\n");
    assert!(html.contains("data-language=\"python\""));
    assert!(html.contains("data-language=\"yaml\""));
    assert!(html.contains("data-language=\"bash\""));
}

#[test]
fn every_block_keeps_a_language_tag() {
    let html = highlighted("```\nplain words only\n```\n\n```rust\nlet x = 1;\n```\n");
    assert_eq!(html.matches("<pre class=\"code-block\" data-language=").count(), 2);
    assert!(html.contains("data-language=\"text\""));
    assert!(html.contains("data-language=\"rust\""));
}

#[test]
fn code_in_callouts_is_highlighted() {
    let html = highlighted(":::tip Example\n```go\npackage main\n```\n:::\n");
    assert!(html.contains("callout-tip"));
    assert!(html.contains("data-language=\"go\""));
}

#[test]
fn highlighted_text_survives_tokenizing() {
    let html = highlighted("```javascript\nconst greeting = \"<hi>\";\n```\n");
    assert!(html.contains("greeting"));
    assert!(html.contains("&lt;hi&gt;"));
    assert!(!html.contains("\"<hi>\""));
}

#[test]
fn languages_are_reported_once() {
    let content = parse(
        "```rust\nfn a() {}\n```\n\n```rust\nfn b() {}\n```\n\n```python\nx = 1\n```\n",
        &ParseOptions::default(),
    )
    .unwrap();
    let out = Highlighter::new().highlight_content(content);
    assert_eq!(out.languages, vec!["python".to_string(), "rust".to_string()]);
}

#[test]
fn highlighters_do_not_share_state() {
    let mut a = Highlighter::new();
    let mut b = Highlighter::new();
    let block = "<pre><code class=\"language-rs\">fn main() {}\n</code></pre>";
    assert_eq!(a.highlight(block), b.highlight(block));
}
