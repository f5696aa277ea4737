//! Code blocks, highlighting and diagrams

use crate::common::{attr, elements, parse_html, text_content};
use marksmith_core::{HighlightError, Highlighter, Renderer, RendererOptions};

struct BrokenHighlighter;

impl Highlighter for BrokenHighlighter {
    fn highlight(&self, _code: &str, language: &str) -> Result<Option<String>, HighlightError> {
        Err(HighlightError {
            language: language.to_string(),
            message: "grammar crashed".to_string(),
        })
    }
}

#[test]
fn test_unknown_language_keeps_escaped_text_and_class() {
    let html = Renderer::default().render("```unknownlang\nhello\n```");
    let dom = parse_html(&html);
    let code = &elements(&dom, "code")[0];
    assert_eq!(attr(code, "class").as_deref(), Some("language-unknownlang"));
    assert_eq!(text_content(code), "hello\n");
    assert_eq!(elements(&dom, "pre").len(), 1);
}

#[test]
fn test_known_language_is_highlighted() {
    let html = Renderer::default().render("```rust\nlet x = 1;\n```");
    assert!(html.contains("<pre class=\"highlight\"><code class=\"language-rust\">"));
    assert!(html.contains("<span class=\""));
    let dom = parse_html(&html);
    assert_eq!(text_content(&elements(&dom, "code")[0]), "let x = 1;\n");
}

#[test]
fn test_alias_resolves_through_registry() {
    let html = Renderer::default().render("```sh\necho hi\n```");
    assert!(html.contains("<code class=\"language-sh\">"));
    assert!(html.contains("<span class=\""));
}

#[test]
fn test_highlighter_failure_falls_back() {
    let renderer = Renderer::default().with_highlighter(BrokenHighlighter);
    let html = renderer.render("```rust\nif a < b {}\n```");
    assert_eq!(
        html,
        "<pre><code class=\"language-rust\">if a &lt; b {}\n</code></pre>\n"
    );
}

#[test]
fn test_plain_fence_without_language() {
    let renderer = Renderer::new(RendererOptions {
        highlight: false,
        ..Default::default()
    });
    assert_eq!(
        renderer.render("~~~\n<b>\n~~~"),
        "<pre><code>&lt;b&gt;\n</code></pre>\n"
    );
}

#[test]
fn test_mermaid_blocks_get_unique_containers() {
    let source = "```mermaid\ngraph TD\n  A --> B\n```\n\n```mermaid\npie\n```";
    let dom = parse_html(&Renderer::default().render(source));
    let diagrams: Vec<_> = elements(&dom, "div")
        .into_iter()
        .filter(|div| attr(div, "class").as_deref() == Some("mermaid"))
        .collect();
    assert_eq!(diagrams.len(), 2);
    assert_eq!(attr(&diagrams[0], "id").as_deref(), Some("mermaid-0"));
    assert_eq!(attr(&diagrams[1], "id").as_deref(), Some("mermaid-1"));
    assert_eq!(text_content(&diagrams[0]), "graph TD\n  A --> B\n");
}

#[test]
fn test_indented_code() {
    let html = Renderer::default().render("    let x;\n    let y;");
    assert_eq!(html, "<pre><code>let x;\nlet y;\n</code></pre>\n");
}
