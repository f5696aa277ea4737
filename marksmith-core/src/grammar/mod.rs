//! Grammar rule set: the extended syntaxes layered over baseline Markdown.
//!
//! Rules form a closed, ordered set dispatched through a single `match`. Each
//! rule owns one construct and is independent of the others. At a given
//! position the lexer tries the rules of the matching level in declaration
//! order and the first successful tokenizer wins.
//!
//! # Precedence
//!
//! Block level, checked at the start of every line after container markers:
//!
//! 1. fenced code, ATX headings and thematic breaks (baseline)
//! 2. [`BLOCK_RULES`] in order: block math, footnote definition, task list item
//! 3. list items, block quotes, HTML blocks, tables, paragraphs (baseline)
//!
//! The task list rule only ever refines a baseline bullet item.
//!
//! Inline level, at every position of a block's text:
//!
//! 1. backslash escapes and code spans (baseline)
//! 2. [`INLINE_RULES`] in order: footnote reference, video thumbnail, inline
//!    math, highlight, superscript, subscript, emoji
//! 3. autolinks and raw inline HTML, links and images, delimiter runs
//!    (`*`, `_`, `~~`), line breaks, plain text (baseline)
//!
//! `~~` is always a strikethrough delimiter: the subscript rule declines a
//! doubled tilde so the baseline run takes it.
//!
//! # Start probes
//!
//! `start_probe` is a cheap scan returning the earliest offset where a rule
//! could possibly match. The inline lexer caches probe results and only calls
//! `tokenize` at offsets a probe pointed at.

pub mod emoji;
pub mod footnote;
pub mod highlight;
pub mod math;
pub mod script;
pub mod task_list;
pub mod video;

use crate::ast::nodes::Node;
use crate::formats::markdown::LexContext;

/// Where a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Block,
    Inline,
}

/// One extended-syntax recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    BlockMath,
    FootnoteDefinition,
    TaskListItem,
    FootnoteReference,
    VideoThumbnail,
    InlineMath,
    Highlight,
    Superscript,
    Subscript,
    Emoji,
}

/// Block rules in priority order.
pub const BLOCK_RULES: [Rule; 3] = [Rule::BlockMath, Rule::FootnoteDefinition, Rule::TaskListItem];

/// Inline rules in priority order.
pub const INLINE_RULES: [Rule; 7] = [
    Rule::FootnoteReference,
    Rule::VideoThumbnail,
    Rule::InlineMath,
    Rule::Highlight,
    Rule::Superscript,
    Rule::Subscript,
    Rule::Emoji,
];

/// A successful tokenization: the constructed node and how much input it used.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub node: Node,
    pub consumed: usize,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::BlockMath => "block-math",
            Rule::FootnoteDefinition => "footnote-definition",
            Rule::TaskListItem => "task-list-item",
            Rule::FootnoteReference => "footnote-reference",
            Rule::VideoThumbnail => "video-thumbnail",
            Rule::InlineMath => "inline-math",
            Rule::Highlight => "highlight",
            Rule::Superscript => "superscript",
            Rule::Subscript => "subscript",
            Rule::Emoji => "emoji",
        }
    }

    pub fn level(self) -> RuleLevel {
        match self {
            Rule::BlockMath | Rule::FootnoteDefinition | Rule::TaskListItem => RuleLevel::Block,
            _ => RuleLevel::Inline,
        }
    }

    /// Earliest offset in `input` where this rule might match.
    pub fn start_probe(self, input: &str) -> Option<usize> {
        match self {
            Rule::BlockMath => math::probe_block(input),
            Rule::FootnoteDefinition | Rule::FootnoteReference => input.find("[^"),
            Rule::TaskListItem => task_list::probe(input),
            Rule::VideoThumbnail => input.find("@["),
            Rule::InlineMath => input.find('$'),
            Rule::Highlight => input.find("=="),
            Rule::Superscript => input.find('^'),
            Rule::Subscript => input.find('~'),
            Rule::Emoji => input.find(':'),
        }
    }

    /// Attempt a match at the very start of `input`.
    pub fn tokenize(self, input: &str, ctx: &mut LexContext) -> Option<RuleMatch> {
        match self {
            Rule::BlockMath => math::tokenize_block_open(input),
            Rule::FootnoteDefinition => footnote::tokenize_definition(input),
            Rule::TaskListItem => task_list::tokenize(input),
            Rule::FootnoteReference => footnote::tokenize_reference(input),
            Rule::VideoThumbnail => video::tokenize(input),
            Rule::InlineMath => math::tokenize_inline(input, ctx),
            Rule::Highlight => highlight::tokenize(input, ctx),
            Rule::Superscript => script::tokenize(input, '^', ctx),
            Rule::Subscript => script::tokenize(input, '~', ctx),
            Rule::Emoji => emoji::tokenize(input),
        }
    }
}
