//! Inline (`$...$`) and block (`$$` fenced lines) math.

use crate::ast::nodes::{LineSpan, MathKind, Node};
use crate::formats::markdown::LexContext;
use crate::grammar::RuleMatch;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fence languages whose code blocks are typeset as display math.
pub const MATH_FENCE_LANGUAGES: [&str; 3] = ["math", "katex", "tex"];

pub const BLOCK_DELIMITER: &str = "$$";

static BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());
static INLINE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$\n]+?)\$").unwrap());

pub fn is_math_fence(language: &str) -> bool {
    MATH_FENCE_LANGUAGES
        .iter()
        .any(|fence| fence.eq_ignore_ascii_case(language))
}

pub fn is_block_delimiter(line: &str) -> bool {
    line.trim() == BLOCK_DELIMITER
}

pub fn probe_block(input: &str) -> Option<usize> {
    input.find(BLOCK_DELIMITER)
}

/// Recognizes the opening `$$` line. The lexer collects the body lines and
/// assigns the expression id once the closing delimiter is seen.
pub fn tokenize_block_open(input: &str) -> Option<RuleMatch> {
    let line = input.split('\n').next().unwrap_or_default();
    if !is_block_delimiter(line) {
        return None;
    }
    Some(RuleMatch {
        node: Node::MathBlock {
            id: 0,
            content: String::new(),
            fence: None,
            lines: LineSpan::default(),
        },
        consumed: line.len(),
    })
}

/// Body of a closed block, trimmed of surrounding whitespace.
pub fn block_content(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

pub fn tokenize_inline(input: &str, ctx: &mut LexContext) -> Option<RuleMatch> {
    let rest = input.strip_prefix('$')?;
    if rest.starts_with('$') {
        return None;
    }
    let end = rest.find(|c: char| c == '$' || c == '\n')?;
    if !rest[end..].starts_with('$') {
        return None;
    }
    let content = &rest[..end];
    if content.trim().is_empty() {
        return None;
    }
    // `$5 and $10` is currency, not math.
    if rest[end + 1..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let consumed = end + 2;
    Some(RuleMatch {
        node: Node::MathInline {
            id: ctx.allocate_math_id(),
            content: content.to_string(),
            raw: input[..consumed].to_string(),
        },
        consumed,
    })
}

/// A delimited expression found by scanning plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMath {
    pub kind: MathKind,
    pub content: String,
}

/// Find `$$...$$` and `$...$` expressions in text that never went through
/// the inline lexer (raw HTML blocks).
///
/// Block patterns are matched first; an inline candidate overlapping a block
/// match, or whose delimiter touches another `$`, is skipped.
pub fn scan_math(text: &str) -> Vec<ScannedMath> {
    let mut found = Vec::new();
    let mut taken = Vec::new();

    for caps in BLOCK_PATTERN.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        taken.push(whole.range());
        let content = body.as_str().trim();
        if !content.is_empty() {
            found.push(ScannedMath {
                kind: MathKind::Block,
                content: content.to_string(),
            });
        }
    }

    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(caps) = INLINE_PATTERN.captures_at(text, pos) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let (start, end) = (whole.start(), whole.end());
        let overlaps = taken.iter().any(|r| start < r.end && r.start < end);
        let touches_dollar =
            (start > 0 && bytes[start - 1] == b'$') || bytes.get(end) == Some(&b'$');
        if overlaps || touches_dollar || body.as_str().trim().is_empty() {
            pos = start + 1;
            continue;
        }
        found.push(ScannedMath {
            kind: MathKind::Inline,
            content: body.as_str().to_string(),
        });
        pos = end;
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_rejects_block_opener_and_empty() {
        let mut ctx = LexContext::default();
        assert!(tokenize_inline("$$x$$", &mut ctx).is_none());
        assert!(tokenize_inline("$ $", &mut ctx).is_none());
        assert!(tokenize_inline("$unterminated", &mut ctx).is_none());
        assert!(tokenize_inline("$5 and $10", &mut ctx).is_none());
    }

    #[test]
    fn test_inline_match_consumes_delimiters() {
        let mut ctx = LexContext::default();
        let m = tokenize_inline("$E = mc^2$ rest", &mut ctx).unwrap();
        assert_eq!(m.consumed, 10);
        match m.node {
            Node::MathInline { content, raw, .. } => {
                assert_eq!(content, "E = mc^2");
                assert_eq!(raw, "$E = mc^2$");
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_block_open_needs_own_line() {
        assert!(tokenize_block_open("$$").is_some());
        assert!(tokenize_block_open("  $$  ").is_some());
        assert!(tokenize_block_open("$$x").is_none());
    }

    #[test]
    fn test_block_content_trimmed() {
        let lines = vec!["".to_string(), "  a + b  ".to_string(), "".to_string()];
        assert_eq!(block_content(&lines), "a + b");
    }

    #[test]
    fn test_scan_prefers_block_delimiters() {
        let found = scan_math("<div>$$a^2$$ and $b$</div>");
        assert_eq!(
            found,
            vec![
                ScannedMath {
                    kind: MathKind::Block,
                    content: "a^2".to_string()
                },
                ScannedMath {
                    kind: MathKind::Inline,
                    content: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_scan_skips_inline_touching_block_delimiter() {
        let found = scan_math("$$x$ y");
        assert!(found.is_empty());
    }

    #[test]
    fn test_math_fence_languages() {
        assert!(is_math_fence("math"));
        assert!(is_math_fence("KaTeX"));
        assert!(!is_math_fence("latex"));
    }
}
