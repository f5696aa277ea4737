//! Math substitution pass
//!
//! Runs over the serialized HTML once the tree walk is done. Two anchor
//! strategies coexist:
//!
//! - Placeholder: math nodes were serialized as `<!--math:TAG:ID-->`, so
//!   each placeholder is swapped for the formatter's markup in one exact
//!   pass. `TAG` is chosen per document so that no raw HTML in it contains
//!   the placeholder prefix, which keeps user comments from posing as
//!   placeholders.
//! - Literal: math typed inside raw HTML blocks never became nodes. Its
//!   delimited source is located with a whitespace tolerant pattern and the
//!   first occurrence is replaced. All block expressions go before inline
//!   ones so a `$...$` pattern cannot bite into an unprocessed `$$...$$`.
//!
//! A formatter error never aborts the pass. The expression falls back to its
//! original delimited source, HTML-escaped, and a warning is logged.

use crate::ast::events::Event;
use crate::ast::nodes::{Document, MathAnchor, MathExpression, MathKind, Node};
use crate::common::escape::escape_html;
use crate::common::tree_walk::TreeEvents;
use crate::math::MathFormatter;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--math:([0-9a-f]+):(\d+)-->").unwrap());

/// Placeholder format for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    tag: String,
}

impl Placeholders {
    /// Pick the first tag whose prefix appears in none of the document's
    /// raw or inline HTML.
    pub fn for_document(doc: &Document) -> Self {
        let mut raw = String::new();
        for event in TreeEvents::new(&doc.children) {
            if let Event::Enter(Node::RawHtml { html, .. } | Node::InlineHtml { html }) = event {
                raw.push_str(html);
            }
        }
        let mut counter: u64 = 0;
        loop {
            let tag = format!("{counter:x}");
            if !raw.contains(&format!("<!--math:{tag}:")) {
                return Placeholders { tag };
            }
            counter += 1;
        }
    }

    /// Placeholder the serializer emits for the math node with `id`.
    pub fn placeholder(&self, id: usize) -> String {
        format!("<!--math:{}:{id}-->", self.tag)
    }
}

pub fn substitute(
    html: &str,
    expressions: &[MathExpression],
    placeholders: &Placeholders,
    formatter: &dyn MathFormatter,
) -> String {
    if expressions.is_empty() {
        return html.to_string();
    }

    let mut output = html.to_string();
    for kind in [MathKind::Block, MathKind::Inline] {
        for expression in expressions
            .iter()
            .filter(|e| e.kind == kind && e.anchor == MathAnchor::Literal)
        {
            output = substitute_literal(&output, expression, formatter);
        }
    }

    let by_id: HashMap<usize, &MathExpression> = expressions
        .iter()
        .filter_map(|e| match e.anchor {
            MathAnchor::Placeholder { id } => Some((id, e)),
            MathAnchor::Literal => None,
        })
        .collect();
    if by_id.is_empty() {
        return output;
    }

    PLACEHOLDER
        .replace_all(&output, |caps: &Captures<'_>| {
            let expression = (caps[1] == placeholders.tag)
                .then(|| caps[2].parse::<usize>().ok())
                .flatten()
                .and_then(|id| by_id.get(&id));
            match expression {
                Some(expression) => format_or_fallback(expression, formatter),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn format_or_fallback(expression: &MathExpression, formatter: &dyn MathFormatter) -> String {
    let display_mode = expression.kind == MathKind::Block;
    match formatter.format(&expression.content, display_mode) {
        Ok(markup) => markup,
        Err(error) => {
            tracing::warn!(
                error = %error,
                expression = %expression.content,
                "math formatting failed, keeping source"
            );
            fallback(expression)
        }
    }
}

/// Escaped original source of an expression, as it would read unformatted.
pub fn fallback(expression: &MathExpression) -> String {
    let escaped = escape_html(&expression.content);
    match (expression.kind, &expression.fence) {
        (MathKind::Inline, _) => format!("${escaped}$"),
        (MathKind::Block, Some(fence)) => format!(
            "<pre><code class=\"language-{}\">{escaped}\n</code></pre>",
            escape_html(fence)
        ),
        (MathKind::Block, None) => format!("<p>$$\n{escaped}\n$$</p>"),
    }
}

fn substitute_literal(
    html: &str,
    expression: &MathExpression,
    formatter: &dyn MathFormatter,
) -> String {
    let Some(pattern) = literal_pattern(expression) else {
        return html.to_string();
    };
    if !pattern.is_match(html) {
        tracing::debug!(expression = %expression.content, "math expression not found in output");
        return html.to_string();
    }
    match formatter.format(&expression.content, expression.kind == MathKind::Block) {
        Ok(markup) => pattern
            .replacen(html, 1, regex::NoExpand(&markup))
            .into_owned(),
        Err(error) => {
            tracing::warn!(
                error = %error,
                expression = %expression.content,
                "math formatting failed, keeping source"
            );
            html.to_string()
        }
    }
}

/// Delimited source pattern where any whitespace run in the content, and
/// any whitespace next to the delimiters, is optional or interchangeable.
fn literal_pattern(expression: &MathExpression) -> Option<Regex> {
    let body = expression
        .content
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    if body.is_empty() {
        return None;
    }
    let pattern = match expression.kind {
        MathKind::Block => format!(r"\$\$\s*{body}\s*\$\$"),
        MathKind::Inline => format!(r"\$\s*{body}\s*\$"),
    };
    Regex::new(&pattern).ok()
}
