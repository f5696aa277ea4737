//! Math rendering through the substitution pass

use marksmith_core::{MathError, MathFormatter, Renderer};

struct FailingMath;

impl MathFormatter for FailingMath {
    fn format(&self, _expression: &str, _display_mode: bool) -> Result<String, MathError> {
        Err(MathError("parse error".to_string()))
    }
}

/// Marks display mode so tests can tell the two apart.
struct ModeMath;

impl MathFormatter for ModeMath {
    fn format(&self, expression: &str, display_mode: bool) -> Result<String, MathError> {
        let mode = if display_mode { "display" } else { "inline" };
        Ok(format!("<math data-mode=\"{mode}\">{expression}</math>"))
    }
}

#[test]
fn test_inline_math_is_formatted() {
    let html = Renderer::default().render("$E = mc^2$");
    assert!(!html.contains("$E = mc^2$"));
    assert!(html.contains("<span class=\"math math-inline\">\\(E = mc^2\\)</span>"));
}

#[test]
fn test_formatter_failure_keeps_literal() {
    let renderer = Renderer::default().with_math_formatter(FailingMath);
    assert_eq!(renderer.render("$E = mc^2$"), "<p>$E = mc^2$</p>\n");
}

#[test]
fn test_block_math_uses_display_mode() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    assert_eq!(
        renderer.render("$$\nx^2\n$$"),
        "<math data-mode=\"display\">x^2</math>\n"
    );
}

#[test]
fn test_single_line_block_math() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    assert_eq!(
        renderer.render("$$ a + b $$"),
        "<math data-mode=\"display\">a + b</math>\n"
    );
}

#[test]
fn test_fenced_math_languages() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    for fence in ["math", "katex", "tex"] {
        let html = renderer.render(&format!("```{fence}\n\\sum x\n```"));
        assert_eq!(html, "<math data-mode=\"display\">\\sum x</math>\n");
    }
}

#[test]
fn test_fenced_math_failure_keeps_code_block() {
    let renderer = Renderer::default().with_math_formatter(FailingMath);
    assert_eq!(
        renderer.render("```katex\na < b\n```"),
        "<pre><code class=\"language-katex\">a &lt; b\n</code></pre>\n"
    );
}

#[test]
fn test_unterminated_block_math_is_text() {
    let html = Renderer::default().render("$$unterminated");
    assert!(html.contains("unterminated"));
    assert!(!html.contains("math-display"));
}

#[test]
fn test_currency_is_not_math() {
    assert_eq!(
        Renderer::default().render("costs $5 and $10"),
        "<p>costs $5 and $10</p>\n"
    );
}

#[test]
fn test_repeated_expression_is_replaced_everywhere() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    let html = renderer.render("$x$ then $x$");
    assert_eq!(html.matches("data-mode=\"inline\">x<").count(), 2);
}

#[test]
fn test_math_inside_raw_html_is_substituted() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    let html = renderer.render("<div>\n$$a$$ and $b$\n</div>");
    assert_eq!(
        html,
        "<div>\n<math data-mode=\"display\">a</math> and <math data-mode=\"inline\">b</math>\n</div>\n"
    );
}

#[test]
fn test_math_in_code_span_is_left_alone() {
    assert_eq!(
        Renderer::default().render("`$x$`"),
        "<p><code>$x$</code></p>\n"
    );
}

#[test]
fn test_block_math_after_open_containers() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    assert_eq!(
        renderer.render("- item\n\n$$\ne\n$$"),
        "<ul>\n<li>item</li>\n</ul>\n<math data-mode=\"display\">e</math>\n"
    );

    let after_footnote = renderer.render("see[^n]\n\n[^n]: note\n\n$$\ne\n$$");
    assert!(after_footnote.contains("<math data-mode=\"display\">e</math>"));
    assert!(!after_footnote.contains("$$"));
}

#[test]
fn test_block_math_inside_containers() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    let quoted = renderer.render("> $$\n> e\n> $$");
    assert!(quoted.starts_with("<blockquote>"));
    assert!(quoted.contains("<math data-mode=\"display\">e</math>"));

    let in_item = renderer.render("- item\n\n  $$\n  e\n  $$");
    assert!(in_item.contains("<math data-mode=\"display\">e</math>\n</li>"));
}

#[test]
fn test_comment_shaped_like_a_placeholder_is_kept() {
    let renderer = Renderer::default().with_math_formatter(ModeMath);
    for comment in ["<!--math:0-->", "<!--math:0:0-->"] {
        let html = renderer.render(&format!("a {comment} b $x$"));
        assert_eq!(
            html,
            format!("<p>a {comment} b <math data-mode=\"inline\">x</math></p>\n")
        );
    }
}
