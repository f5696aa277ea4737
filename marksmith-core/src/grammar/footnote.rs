//! Footnote definitions (`[^label]: text`) and references (`[^label]`).

use crate::ast::nodes::{LineSpan, Node};
use crate::grammar::RuleMatch;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFINITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\^([^\]\s]+)\]:[ \t]*").unwrap());
static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\^([^\]\s]+)\]").unwrap());

/// Labels compare case-insensitively.
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}

/// Matches the definition marker. The lexer fills in the body from the rest
/// of the line and any indented continuation lines.
pub fn tokenize_definition(input: &str) -> Option<RuleMatch> {
    let caps = DEFINITION.captures(input)?;
    let consumed = caps.get(0)?.end();
    Some(RuleMatch {
        node: Node::FootnoteDefinition {
            label: normalize_label(&caps[1]),
            children: Vec::new(),
            lines: LineSpan::default(),
        },
        consumed,
    })
}

pub fn tokenize_reference(input: &str) -> Option<RuleMatch> {
    let caps = REFERENCE.captures(input)?;
    let whole = caps.get(0)?;
    Some(RuleMatch {
        node: Node::FootnoteReference {
            label: normalize_label(&caps[1]),
            raw: whole.as_str().to_string(),
        },
        consumed: whole.end(),
    })
}
