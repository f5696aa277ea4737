//! Highlighted text: `==text==`.

use crate::ast::nodes::Node;
use crate::formats::markdown::LexContext;
use crate::grammar::RuleMatch;

/// Content must be non-empty, must not start or end with whitespace and ends
/// at the first closing `==`.
pub fn tokenize(input: &str, ctx: &mut LexContext) -> Option<RuleMatch> {
    let rest = input.strip_prefix("==")?;
    if rest.starts_with('=') {
        return None;
    }
    let end = rest.find("==")?;
    let content = &rest[..end];
    if content.is_empty()
        || content.starts_with(char::is_whitespace)
        || content.ends_with(char::is_whitespace)
    {
        return None;
    }

    let children = ctx.parse_nested(content)?;
    let consumed = end + 4;
    Some(RuleMatch {
        node: Node::Highlight {
            children,
            raw: input[..consumed].to_string(),
        },
        consumed,
    })
}
