//! Markdown lexer
//!
//! Turns Markdown source into the document tree. Tokenization runs at two
//! levels: the block lexer (`block.rs`) splits lines into containers and
//! leaves, and the inline lexer (`inline.rs`) resolves each leaf's text. The
//! grammar rule set (`crate::grammar`) is consulted at both levels in its
//! declared order.
//!
//! # Element Mapping Table
//!
//! | Markdown                          | Node                       | Notes                                     |
//! |-----------------------------------|----------------------------|-------------------------------------------|
//! | `#`..`######`, setext underlines  | `heading`                  | Level 1-6                                 |
//! | Paragraph text                    | `paragraph`                | Lines joined with soft breaks             |
//! | `-`/`*`/`+`, `1.`/`1)`            | `list` + `list-item`       | Tight/loose detected, start number kept   |
//! | `- [ ]`, `- [x]`                  | `task-item`                | Grammar rule refining a bullet item       |
//! | ```` ``` ````, `~~~`, indent      | `code-block`               | First info word is the language           |
//! | ```` ```math ````/`katex`/`tex`   | `math-block`               | Remembers the fence language              |
//! | `$$` ... `$$` lines               | `math-block`               | Needs a closing line, else paragraph text |
//! | `>`                               | `block-quote`              |                                           |
//! | GFM pipe tables                   | `table` / `table-row` / `table-cell` | Alignment from the separator row |
//! | `***`, `---`, `___`               | `thematic-break`           |                                           |
//! | HTML block                        | `raw-html`                 | Passed through verbatim                   |
//! | `[^id]: text`                     | `footnote-definition`      | Indented continuation lines               |
//! | `*a*`, `**a**`, `~~a~~`           | `emphasis-run`             | Delimiter-run resolution                  |
//! | `` `code` ``                      | `code-span`                |                                           |
//! | `[text](url "title")`, `<url>`    | `link`                     | Bare `http(s)://` URLs too                |
//! | `![alt](url)`                     | `image`                    |                                           |
//! | `$x$`, `==x==`, `^x^`, `~x~`      | extension inline nodes     | See `crate::grammar`                      |
//!
//! # Failure Semantics
//!
//! Tokenization never fails. A construct that does not complete (unclosed
//! fence aside, which runs to the end of its container) is left as text.
//!
//! # Not Supported
//!
//! - Reference-style links and link reference definitions
//! - Setext headings spanning lazy continuation lines

pub mod block;
pub mod inline;
pub mod table;

use crate::ast::nodes::{Document, Node};
use std::borrow::Cow;

/// Nesting limit for inline constructs that parse their own contents.
pub const MAX_INLINE_DEPTH: usize = 32;

const TAB_STOP: usize = 4;

/// Per-document lexer state shared by the grammar rules.
#[derive(Debug, Default)]
pub struct LexContext {
    next_math_id: usize,
    depth: usize,
}

impl LexContext {
    /// Reserve the next math expression id. Ids are unique per document.
    pub fn allocate_math_id(&mut self) -> usize {
        let id = self.next_math_id;
        self.next_math_id += 1;
        id
    }

    /// Tokenize nested inline content, or `None` once the nesting limit is
    /// reached so the caller can decline its match.
    pub fn parse_nested(&mut self, text: &str) -> Option<Vec<Node>> {
        if self.depth >= MAX_INLINE_DEPTH {
            return None;
        }
        self.depth += 1;
        let nodes = inline::parse_inline(text, self);
        self.depth -= 1;
        Some(nodes)
    }
}

/// Tokenize Markdown into an unannotated document.
pub fn tokenize(markdown: &str) -> Document {
    let mut ctx = LexContext::default();
    let source = normalize_newlines(markdown);
    Document::new(block::parse_blocks(&source, &mut ctx))
}

/// CRLF and lone CR become LF.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Expand tabs in a line's leading whitespace to spaces (4-column stops).
pub fn expand_leading_tabs(line: &str) -> Cow<'_, str> {
    let indent_len = line.len() - line.trim_start_matches(|c| c == ' ' || c == '\t').len();
    if !line[..indent_len].contains('\t') {
        return Cow::Borrowed(line);
    }
    let mut expanded = String::with_capacity(line.len() + TAB_STOP);
    let mut column = 0;
    for c in line[..indent_len].chars() {
        if c == '\t' {
            let width = TAB_STOP - column % TAB_STOP;
            expanded.extend(std::iter::repeat(' ').take(width));
            column += width;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded.push_str(&line[indent_len..]);
    Cow::Owned(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_normalizes_crlf() {
        let document = tokenize("# Title\r\n\r\ntext\r\n");
        let kinds: Vec<&str> = document.children.iter().map(Node::node_type).collect();
        assert_eq!(kinds, vec!["heading", "paragraph"]);
        assert!(!document.is_annotated());
    }

    #[test]
    fn test_expand_leading_tabs() {
        assert_eq!(expand_leading_tabs("\tx"), "    x");
        assert_eq!(expand_leading_tabs("  \tx\ty"), "    x\ty");
        assert!(matches!(expand_leading_tabs("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_nested_respects_depth_limit() {
        let mut ctx = LexContext::default();
        ctx.depth = MAX_INLINE_DEPTH;
        assert!(ctx.parse_nested("x").is_none());
        ctx.depth = 0;
        assert_eq!(ctx.parse_nested("x"), Some(vec![Node::text("x")]));
    }

    #[test]
    fn test_math_ids_are_unique_across_blocks() {
        let document = tokenize("$a$\n\n$$\nb\n$$\n\n```math\nc\n```");
        let mut ids = Vec::new();
        for node in &document.children {
            match node {
                Node::MathBlock { id, .. } => ids.push(*id),
                Node::Paragraph { children, .. } => {
                    for child in children {
                        if let Node::MathInline { id, .. } = child {
                            ids.push(*id);
                        }
                    }
                }
                _ => {}
            }
        }
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
