//! Task list items: a bullet followed by `[ ]`, `[x]` or `[X]`.

use crate::ast::nodes::{LineSpan, Node};
use crate::grammar::RuleMatch;
use once_cell::sync::Lazy;
use regex::Regex;

static TASK_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([-*+])[ \t]+\[([ xX])\](?:[ \t]+|$)").unwrap());
static CHECKBOX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[ xX]\]").unwrap());

/// Offset of the bullet preceding the first checkbox-looking token.
pub fn probe(input: &str) -> Option<usize> {
    let checkbox = CHECKBOX.find(input)?.start();
    let bullet = input[..checkbox].rfind(|c: char| matches!(c, '-' | '*' | '+'))?;
    Some(bullet)
}

/// Consumes the bullet, the checkbox and the spacing before the label.
pub fn tokenize(input: &str) -> Option<RuleMatch> {
    let caps = TASK_ITEM.captures(input)?;
    let consumed = caps.get(0)?.end();
    Some(RuleMatch {
        node: Node::TaskItem {
            checked: &caps[2] != " ",
            children: Vec::new(),
            lines: LineSpan::default(),
        },
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_states() {
        for (line, checked) in [("- [ ] a", false), ("* [x] b", true), ("+ [X] c", true)] {
            let m = tokenize(line).unwrap();
            assert_eq!(m.consumed, 6, "{line}");
            assert!(matches!(m.node, Node::TaskItem { checked: c, .. } if c == checked));
        }
    }

    #[test]
    fn test_requires_separator_after_checkbox() {
        assert!(tokenize("- [x]label").is_none());
        assert!(tokenize("- [x]").is_some());
        assert!(tokenize("- [y] no").is_none());
    }

    #[test]
    fn test_probe_points_at_bullet() {
        assert_eq!(probe("  - [ ] a"), Some(2));
        assert_eq!(probe("plain"), None);
    }
}
