//! HTML output
//!
//! Serializes an annotated document tree to an HTML5 fragment, and
//! optionally wraps the fragment in a complete page.
//!
//! # Element Mapping Table
//!
//! | Node                  | HTML                                                      | Notes                                      |
//! |-----------------------|-----------------------------------------------------------|--------------------------------------------|
//! | `heading`             | `<h1>`..`<h6>`                                            | Other levels are a contract error          |
//! | `paragraph`           | `<p>`                                                     | Omitted directly inside tight list items   |
//! | `list`                | `<ul>` / `<ol start="N">`                                 | `contains-task-list` class with task items |
//! | `list-item`           | `<li>`                                                    |                                            |
//! | `task-item`           | `<li class="task-list-item">` + disabled checkbox         | `checked=""` when ticked                   |
//! | `code-block`          | `<pre><code class="language-X">`                          | Highlighted spans when recognized          |
//! | `code-block` mermaid  | `<div class="mermaid" id="mermaid-N">`                    | Escaped source, rendered client-side       |
//! | `block-quote`         | `<blockquote>`                                            |                                            |
//! | `table`               | `<table>` `<thead>` `<tbody>`                             | `style="text-align: …"` per column         |
//! | `thematic-break`      | `<hr />`                                                  |                                            |
//! | `raw-html`            | verbatim                                                  | Not sanitized                              |
//! | `footnote-definition` | `<li id="fn-N">` in `<section class="footnotes">`         | Numbered by first reference, with ↩ links  |
//! | `footnote-reference`  | `<sup class="footnote-ref"><a href="#fn-N">`              | Literal text when undefined                |
//! | `math-block`/`-inline`| `<!--math:TAG:ID-->`                                      | Replaced by the math substitution pass     |
//! | `emphasis-run`        | `<em>` / `<strong>` / `<del>`                             |                                            |
//! | `subscript` etc.      | `<sub>` / `<sup>` / `<mark>`                              |                                            |
//! | `video-thumbnail`     | `<a class="youtube-thumbnail"><img …/hqdefault.jpg>`      |                                            |
//! | `emoji`               | the glyph                                                 |                                            |
//!
//! # CSS and Theming
//!
//! [`standalone_page`] embeds:
//! - `css/baseline.css`: reset and default presentation (always included)
//! - the syntax highlighting theme stylesheet, when the document has
//!   highlighted code
//! - caller supplied CSS, appended last
//!
//! KaTeX and mermaid are loaded from a CDN only when the document contains
//! math or diagrams.

mod serializer;

pub use serializer::{serialize_to_html, HtmlOptions};

use crate::ast::nodes::Metadata;
use crate::common::escape::escape_html;
use crate::highlight::{theme_css, DEFAULT_THEME};

/// Stylesheet included in every standalone page.
pub fn get_default_css() -> &'static str {
    include_str!("../../../css/baseline.css")
}

const KATEX_ASSETS: &str = r#"  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css">
  <script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js"></script>
  <script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/contrib/auto-render.min.js"
    onload="renderMathInElement(document.body);"></script>
"#;

const MERMAID_ASSETS: &str = r#"  <script type="module">
    import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
    mermaid.initialize({ startOnLoad: true });
  </script>
"#;

/// What the page needs besides the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssets {
    pub highlight: bool,
    pub math: bool,
    pub diagrams: bool,
    /// Appended after the built-in stylesheets.
    pub custom_css: Option<String>,
}

impl PageAssets {
    /// Assets a document with this metadata needs
    pub fn for_metadata(metadata: &Metadata, highlight: bool) -> Self {
        PageAssets {
            highlight: highlight && !metadata.code_languages.is_empty(),
            math: !metadata.math_expressions.is_empty(),
            diagrams: !metadata.diagram_blocks.is_empty(),
            custom_css: None,
        }
    }

    pub fn with_custom_css(mut self, css: String) -> Self {
        self.custom_css = Some(css);
        self
    }
}

/// Wrap an HTML fragment in a complete, self-contained HTML5 document
pub fn standalone_page(body_html: &str, title: &str, assets: &PageAssets) -> String {
    let baseline_css = get_default_css();
    let highlight_css = if assets.highlight {
        theme_css(DEFAULT_THEME).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "no stylesheet for highlighting theme");
            String::new()
        })
    } else {
        String::new()
    };
    let custom_css = assets.custom_css.as_deref().unwrap_or("");
    let scripts = format!(
        "{}{}",
        if assets.math { KATEX_ASSETS } else { "" },
        if assets.diagrams { MERMAID_ASSETS } else { "" }
    );
    let escaped_title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="marksmith">
  <title>{escaped_title}</title>
  <style>
{baseline_css}
{highlight_css}
{custom_css}
  </style>
{scripts}</head>
<body>
<article class="marksmith-document">
{body_html}</article>
</body>
</html>
"#
    )
}
