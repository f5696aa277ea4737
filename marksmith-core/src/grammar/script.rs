//! Superscript (`^text^`) and subscript (`~text~`).
//!
//! Both share one tokenizer parameterized by the delimiter. A doubled
//! delimiter is declined so `~~` stays available to strikethrough, and the
//! content may not hold unescaped whitespace, so `x^2 + y^2` stays text.

use crate::ast::nodes::Node;
use crate::formats::markdown::LexContext;
use crate::grammar::RuleMatch;

pub fn tokenize(input: &str, delimiter: char, ctx: &mut LexContext) -> Option<RuleMatch> {
    let rest = input.strip_prefix(delimiter)?;
    if rest.starts_with(delimiter) {
        return None;
    }
    let end = rest.find(|c: char| c == delimiter || c == '\n')?;
    if !rest[end..].starts_with(delimiter) {
        return None;
    }
    let content = &rest[..end];
    if content.is_empty() || content.contains('$') || has_unescaped_whitespace(content) {
        return None;
    }
    let after = &rest[end + delimiter.len_utf8()..];
    if after.starts_with(delimiter) {
        return None;
    }

    let children = ctx.parse_nested(content)?;
    let consumed = end + 2 * delimiter.len_utf8();
    let raw = input[..consumed].to_string();
    let node = if delimiter == '^' {
        Node::Superscript { children, raw }
    } else {
        Node::Subscript { children, raw }
    };
    Some(RuleMatch { node, consumed })
}

fn has_unescaped_whitespace(content: &str) -> bool {
    let mut escaped = false;
    for c in content.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c.is_whitespace() {
            return true;
        }
    }
    false
}
