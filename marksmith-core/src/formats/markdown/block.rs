//! Block structure: a line-by-line state machine over an explicit stack of
//! open containers.
//!
//! Each line first walks the open containers (block quotes, lists, list
//! items, footnote definitions) and consumes their markers. Whatever remains
//! either continues the open leaf (paragraph, code, HTML, math, table) or
//! opens new blocks. Containers that stop matching are closed into their
//! parent, so nesting depth costs heap, never call stack.

use super::inline::parse_inline;
use super::{expand_leading_tabs, table, LexContext};
use crate::ast::nodes::{Alignment, LineSpan, Node};
use crate::grammar::{math, Rule, BLOCK_RULES};
use once_cell::sync::Lazy;
use regex::Regex;

const CODE_INDENT: usize = 4;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "section", "source",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

static COMPLETE_TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:<[A-Za-z][A-Za-z0-9\-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:\-]*",
        r"(?:\s*=\s*(?:[^\s\x22'=<>`]+|'[^']*'|\x22[^\x22]*\x22))?)*\s*/?>",
        r"|</[A-Za-z][A-Za-z0-9\-]*\s*>)\s*$"
    ))
    .unwrap()
});

/// Parse normalized (LF-only) source into top-level block nodes.
pub fn parse_blocks(source: &str, ctx: &mut LexContext) -> Vec<Node> {
    let lines: Vec<String> = source
        .strip_suffix('\n')
        .unwrap_or(source)
        .split('\n')
        .map(|line| expand_leading_tabs(line).into_owned())
        .collect();
    BlockParser::new(&lines, ctx).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Bullet(char),
    Ordered(char),
}

#[derive(Debug)]
enum ContainerKind {
    Document,
    BlockQuote,
    List {
        marker: ListMarker,
        start: u64,
        tight: bool,
    },
    Item {
        content_indent: usize,
        task: Option<bool>,
    },
    Footnote {
        label: String,
    },
}

#[derive(Debug)]
struct Container {
    kind: ContainerKind,
    children: Vec<Node>,
    start: usize,
    last: usize,
    /// A blank line was seen since the last content line.
    blank_pending: bool,
}

#[derive(Debug, Clone, Copy)]
enum HtmlEnd {
    BlankLine,
    Contains(&'static str),
}

impl HtmlEnd {
    fn closes(self, line: &str) -> bool {
        match self {
            HtmlEnd::BlankLine => false,
            HtmlEnd::Contains(needle) => line.to_ascii_lowercase().contains(needle),
        }
    }
}

#[derive(Debug)]
enum Leaf {
    Paragraph {
        lines: Vec<String>,
    },
    FencedCode {
        fence: char,
        length: usize,
        indent: usize,
        info: String,
        lines: Vec<String>,
    },
    IndentedCode {
        lines: Vec<String>,
    },
    Html {
        end: HtmlEnd,
        lines: Vec<String>,
    },
    Math {
        opener: String,
        lines: Vec<String>,
        closed: bool,
    },
    Table {
        header: Vec<String>,
        alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug)]
struct OpenLeaf {
    leaf: Leaf,
    start: usize,
    last: usize,
}

/// What continuing the open leaf did with the current line.
enum Continuation {
    Consumed,
    Finished,
    /// The leaf does not take this line; it may still be closed later.
    Declined,
    Setext(u8),
    TableHeader(Vec<Alignment>),
}

enum BlockStart {
    Math,
    Footnote { label: String, consumed: usize },
    Task { checked: bool, consumed: usize },
}

struct ItemMarker {
    marker: ListMarker,
    number: u64,
    /// Bytes from the marker to the item content on this line.
    content_offset: usize,
    /// Columns continuation lines need, relative to the marker.
    content_indent: usize,
    empty: bool,
}

impl ItemMarker {
    fn can_interrupt_paragraph(&self) -> bool {
        !self.empty && (matches!(self.marker, ListMarker::Bullet(_)) || self.number == 1)
    }
}

struct BlockParser<'s, 'c> {
    source: &'s [String],
    ctx: &'c mut LexContext,
    stack: Vec<Container>,
    leaf: Option<OpenLeaf>,
    line: usize,
}

impl<'s, 'c> BlockParser<'s, 'c> {
    fn new(source: &'s [String], ctx: &'c mut LexContext) -> Self {
        Self {
            source,
            ctx,
            stack: vec![Container::new(ContainerKind::Document, 0)],
            leaf: None,
            line: 0,
        }
    }

    fn run(mut self) -> Vec<Node> {
        let source = self.source;
        for (number, line) in source.iter().enumerate() {
            self.line = number;
            self.process_line(line);
        }
        self.close_to(1);
        self.finalize_leaf();
        self.stack
            .pop()
            .map(|document| document.children)
            .unwrap_or_default()
    }

    fn process_line(&mut self, line: &'s str) {
        let blank = is_blank(line);
        let (mut matched, mut offset) = self.match_containers(line, blank);

        if matched == self.stack.len() && self.continue_leaf(&line[offset..], blank) {
            if !blank {
                self.touch();
            }
            return;
        }

        loop {
            let rest = &line[offset..];
            let indent = leading_spaces(rest);
            let body = &rest[indent..];
            if is_blank(body) {
                break;
            }
            let paragraph_open = self.paragraph_open();
            let interrupting = paragraph_open && matched == self.stack.len();

            if indent >= CODE_INDENT {
                if paragraph_open {
                    break;
                }
                self.close_to(matched);
                self.start_leaf(Leaf::IndentedCode {
                    lines: vec![rest[CODE_INDENT..].to_string()],
                });
                self.touch();
                return;
            }

            if let Some((fence, length, info)) = parse_fence_open(body) {
                self.close_to(matched);
                self.start_leaf(Leaf::FencedCode {
                    fence,
                    length,
                    indent,
                    info,
                    lines: Vec::new(),
                });
                self.touch();
                return;
            }

            if let Some((level, content)) = parse_atx_heading(body) {
                self.close_to(matched);
                self.prepare_block();
                let children = parse_inline(content, self.ctx);
                let lines = LineSpan::single(self.line);
                self.append(Node::Heading {
                    level,
                    children,
                    lines,
                });
                self.touch();
                return;
            }

            if is_thematic_break(body) {
                self.close_to(matched);
                self.prepare_block();
                let lines = LineSpan::single(self.line);
                self.append(Node::ThematicBreak { lines });
                self.touch();
                return;
            }

            let rule_start = self.block_rule(body);
            match rule_start {
                Some(BlockStart::Math) if self.math_block_closes(matched) => {
                    self.close_to(matched);
                    self.start_leaf(Leaf::Math {
                        opener: body.trim().to_string(),
                        lines: Vec::new(),
                        closed: false,
                    });
                    self.touch();
                    return;
                }
                Some(BlockStart::Footnote { label, consumed }) => {
                    self.close_to(matched);
                    self.prepare_block();
                    self.push_container(ContainerKind::Footnote { label });
                    offset += indent + consumed;
                    matched = self.stack.len();
                    continue;
                }
                _ => {}
            }

            if let Some(item) = parse_list_marker(body) {
                if !interrupting || item.can_interrupt_paragraph() {
                    let task = match rule_start {
                        Some(BlockStart::Task { checked, consumed })
                            if matches!(item.marker, ListMarker::Bullet(_)) =>
                        {
                            Some((checked, consumed))
                        }
                        _ => None,
                    };
                    self.close_to(matched);
                    self.finalize_leaf();
                    self.open_item(&item, indent, task.map(|(checked, _)| checked));
                    offset += indent + task.map_or(item.content_offset, |(_, consumed)| consumed);
                    matched = self.stack.len();
                    continue;
                }
            }

            if body.starts_with('>') {
                self.close_to(matched);
                self.prepare_block();
                self.push_container(ContainerKind::BlockQuote);
                offset += indent + 1;
                if line[offset..].starts_with(' ') {
                    offset += 1;
                }
                matched = self.stack.len();
                continue;
            }

            if let Some(end) = html_block_start(body, paragraph_open) {
                self.close_to(matched);
                self.start_leaf(Leaf::Html {
                    end,
                    lines: vec![rest.to_string()],
                });
                if end.closes(rest) {
                    self.finalize_leaf();
                }
                self.touch();
                return;
            }

            break;
        }

        let rest = &line[offset..];
        if is_blank(rest) {
            self.close_to(matched);
            self.finalize_leaf();
            if blank {
                for container in &mut self.stack {
                    container.blank_pending = true;
                }
            } else {
                self.touch();
            }
            return;
        }

        // Lazy continuation: unmatched containers stay open for paragraph text.
        if matched < self.stack.len() && self.paragraph_open() {
            self.push_paragraph_line(rest);
            self.touch();
            return;
        }

        self.close_to(matched);
        if self.paragraph_open() {
            self.push_paragraph_line(rest);
        } else {
            self.start_leaf(Leaf::Paragraph {
                lines: vec![rest.to_string()],
            });
        }
        self.touch();
    }

    /// Walk the open containers against `line`. Returns how many matched
    /// (the document always does) and the byte offset past their markers.
    fn match_containers(&self, line: &str, blank: bool) -> (usize, usize) {
        let mut offset = 0;
        let mut matched = 1;
        while matched < self.stack.len() {
            let rest = &line[offset..];
            let indent = leading_spaces_upto(rest, CODE_INDENT);
            let consumed = match &self.stack[matched].kind {
                ContainerKind::Document => Some(0),
                ContainerKind::BlockQuote => {
                    (indent <= 3 && rest[indent..].starts_with('>')).then(|| {
                        let after = indent + 1;
                        if rest[after..].starts_with(' ') {
                            after + 1
                        } else {
                            after
                        }
                    })
                }
                ContainerKind::List { marker, .. } => {
                    let item_continues = self.item_continues(matched + 1, rest, blank).is_some();
                    let sibling = !blank
                        && indent <= 3
                        && parse_list_marker(&rest[indent..])
                            .is_some_and(|item| item.marker == *marker);
                    (item_continues || sibling).then_some(0)
                }
                ContainerKind::Item { .. } => self.item_continues(matched, rest, blank),
                ContainerKind::Footnote { .. } => {
                    if blank {
                        Some(rest.len().min(CODE_INDENT))
                    } else {
                        (indent >= CODE_INDENT).then_some(CODE_INDENT)
                    }
                }
            };
            let Some(consumed) = consumed else {
                break;
            };
            offset += consumed;
            matched += 1;
        }
        (matched, offset)
    }

    fn item_continues(&self, index: usize, rest: &str, blank: bool) -> Option<usize> {
        let container = self.stack.get(index)?;
        let ContainerKind::Item { content_indent, .. } = container.kind else {
            return None;
        };
        if blank {
            // An item that is still empty ends at its first blank line.
            let is_tip = index + 1 == self.stack.len();
            if is_tip && container.children.is_empty() && self.leaf.is_none() {
                return None;
            }
            return Some(rest.len().min(content_indent));
        }
        (leading_spaces_upto(rest, content_indent) == content_indent).then_some(content_indent)
    }

    fn continue_leaf(&mut self, rest: &str, blank: bool) -> bool {
        let line = self.line;
        let Some(open) = self.leaf.as_mut() else {
            return false;
        };
        let outcome = match &mut open.leaf {
            Leaf::FencedCode {
                fence,
                length,
                indent,
                lines,
                ..
            } => {
                if is_closing_fence(rest, *fence, *length) {
                    Continuation::Finished
                } else {
                    lines.push(strip_indent(rest, *indent).to_string());
                    Continuation::Consumed
                }
            }
            Leaf::Math { lines, closed, .. } => {
                if math::is_block_delimiter(rest) {
                    *closed = true;
                    Continuation::Finished
                } else {
                    lines.push(rest.to_string());
                    Continuation::Consumed
                }
            }
            Leaf::Html { end, lines } => {
                if blank && matches!(end, HtmlEnd::BlankLine) {
                    Continuation::Declined
                } else {
                    lines.push(rest.to_string());
                    if end.closes(rest) {
                        Continuation::Finished
                    } else {
                        Continuation::Consumed
                    }
                }
            }
            Leaf::IndentedCode { lines } => {
                if blank {
                    lines.push(String::new());
                    return true;
                } else if leading_spaces(rest) >= CODE_INDENT {
                    lines.push(rest[CODE_INDENT..].to_string());
                    Continuation::Consumed
                } else {
                    Continuation::Declined
                }
            }
            Leaf::Table { rows, .. } => {
                if !blank && rest.contains('|') {
                    rows.push(table::split_cells(rest));
                    Continuation::Consumed
                } else {
                    Continuation::Declined
                }
            }
            Leaf::Paragraph { lines } => {
                if blank || leading_spaces(rest) > 3 {
                    Continuation::Declined
                } else if let Some(level) = setext_level(rest) {
                    Continuation::Setext(level)
                } else {
                    match (lines.len(), table::parse_delimiter_row(rest)) {
                        (1, Some(alignments))
                            if table::split_cells(&lines[0]).len() == alignments.len() =>
                        {
                            Continuation::TableHeader(alignments)
                        }
                        _ => Continuation::Declined,
                    }
                }
            }
        };

        match outcome {
            Continuation::Consumed => {
                open.last = line;
                true
            }
            Continuation::Finished => {
                open.last = line;
                self.finalize_leaf();
                true
            }
            Continuation::Declined => false,
            Continuation::Setext(level) => {
                open.last = line;
                self.finish_setext(level);
                true
            }
            Continuation::TableHeader(alignments) => {
                open.last = line;
                if let Leaf::Paragraph { lines } = &mut open.leaf {
                    let header = table::split_cells(&lines[0]);
                    open.leaf = Leaf::Table {
                        header,
                        alignments,
                        rows: Vec::new(),
                    };
                }
                true
            }
        }
    }

    fn block_rule(&mut self, body: &str) -> Option<BlockStart> {
        for rule in BLOCK_RULES {
            if rule.start_probe(body) != Some(0) {
                continue;
            }
            let Some(found) = rule.tokenize(body, self.ctx) else {
                continue;
            };
            let start = match (rule, found.node) {
                (Rule::BlockMath, _) => BlockStart::Math,
                (Rule::FootnoteDefinition, Node::FootnoteDefinition { label, .. }) => {
                    BlockStart::Footnote {
                        label,
                        consumed: found.consumed,
                    }
                }
                (Rule::TaskListItem, Node::TaskItem { checked, .. }) => BlockStart::Task {
                    checked,
                    consumed: found.consumed,
                },
                _ => continue,
            };
            return Some(start);
        }
        None
    }

    /// Whether a `$$` opener on the current line has a closing `$$` line
    /// inside the same containers. Without one it stays paragraph text.
    /// Containers past `matched` close before the block opens.
    fn math_block_closes(&self, matched: usize) -> bool {
        for next in &self.source[self.line + 1..] {
            let (depth, offset) = self.match_containers(next, is_blank(next));
            if depth < matched {
                return false;
            }
            if math::is_block_delimiter(&next[offset..]) {
                return true;
            }
        }
        false
    }

    fn open_item(&mut self, item: &ItemMarker, indent: usize, task: Option<bool>) {
        let same_list = matches!(
            self.tip().kind,
            ContainerKind::List { marker, .. } if marker == item.marker
        );
        if !same_list {
            if matches!(self.tip().kind, ContainerKind::List { .. }) {
                self.close_top();
            }
            self.note_block_start();
            self.push_container(ContainerKind::List {
                marker: item.marker,
                start: item.number,
                tight: true,
            });
        } else {
            self.note_block_start();
        }
        self.push_container(ContainerKind::Item {
            content_indent: indent + item.content_indent,
            task,
        });
    }

    fn tip(&self) -> &Container {
        &self.stack[self.stack.len() - 1]
    }

    fn paragraph_open(&self) -> bool {
        matches!(
            self.leaf,
            Some(OpenLeaf {
                leaf: Leaf::Paragraph { .. },
                ..
            })
        )
    }

    fn push_paragraph_line(&mut self, text: &str) {
        if let Some(OpenLeaf {
            leaf: Leaf::Paragraph { lines },
            last,
            ..
        }) = self.leaf.as_mut()
        {
            lines.push(text.to_string());
            *last = self.line;
        }
    }

    /// Close the open leaf and any list sitting at the tip before a
    /// non-item block starts there.
    fn prepare_block(&mut self) {
        self.finalize_leaf();
        if matches!(self.tip().kind, ContainerKind::List { .. }) {
            self.close_top();
        }
        self.note_block_start();
    }

    fn start_leaf(&mut self, leaf: Leaf) {
        self.prepare_block();
        self.leaf = Some(OpenLeaf {
            leaf,
            start: self.line,
            last: self.line,
        });
    }

    fn push_container(&mut self, kind: ContainerKind) {
        self.stack.push(Container::new(kind, self.line));
    }

    /// A block starting after a blank line inside a list makes it loose.
    fn note_block_start(&mut self) {
        let depth = self.stack.len();
        let tip = &self.stack[depth - 1];
        if !tip.blank_pending || tip.children.is_empty() {
            return;
        }
        let list = match tip.kind {
            ContainerKind::List { .. } => depth - 1,
            ContainerKind::Item { .. } if depth >= 2 => depth - 2,
            _ => return,
        };
        if let ContainerKind::List { tight, .. } = &mut self.stack[list].kind {
            *tight = false;
        }
    }

    /// Record a content line on every open container.
    fn touch(&mut self) {
        let line = self.line;
        for container in &mut self.stack {
            container.last = line;
            container.blank_pending = false;
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(tip) = self.stack.last_mut() {
            tip.children.push(node);
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth.max(1) {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        self.finalize_leaf();
        if self.stack.len() <= 1 {
            return;
        }
        let Some(container) = self.stack.pop() else {
            return;
        };
        let lines = LineSpan::new(container.start, container.last + 1);
        let children = container.children;
        let node = match container.kind {
            ContainerKind::Document => return,
            ContainerKind::BlockQuote => Node::BlockQuote { children, lines },
            ContainerKind::List {
                marker,
                start,
                tight,
            } => Node::List {
                ordered: matches!(marker, ListMarker::Ordered(_)),
                start,
                tight,
                items: children,
                lines,
            },
            ContainerKind::Item {
                task: Some(checked),
                ..
            } => Node::TaskItem {
                checked,
                children,
                lines,
            },
            ContainerKind::Item { task: None, .. } => Node::ListItem { children, lines },
            ContainerKind::Footnote { label } => Node::FootnoteDefinition {
                label,
                children,
                lines,
            },
        };
        self.append(node);
    }

    fn finalize_leaf(&mut self) {
        let Some(OpenLeaf { leaf, start, last }) = self.leaf.take() else {
            return;
        };
        let lines = LineSpan::new(start, last + 1);
        let node = match leaf {
            Leaf::Paragraph { lines: raw } => self.paragraph(&raw, lines),
            Leaf::FencedCode {
                info, lines: body, ..
            } => Some(self.fenced_code(&info, body, lines)),
            Leaf::IndentedCode { lines: mut body } => {
                while body.last().is_some_and(|line| is_blank(line)) {
                    body.pop();
                }
                Some(Node::CodeBlock {
                    language: None,
                    text: code_text(body),
                    lines,
                })
            }
            Leaf::Html { lines: body, .. } => Some(Node::RawHtml {
                html: body.join("\n"),
                lines,
            }),
            Leaf::Math {
                opener,
                lines: body,
                closed,
            } => {
                let content = math::block_content(&body);
                if closed && !content.is_empty() {
                    Some(Node::MathBlock {
                        id: self.ctx.allocate_math_id(),
                        content,
                        fence: None,
                        lines,
                    })
                } else {
                    let mut raw = vec![opener];
                    raw.extend(body);
                    if closed {
                        raw.push(math::BLOCK_DELIMITER.to_string());
                    }
                    self.paragraph(&raw, lines)
                }
            }
            Leaf::Table {
                header,
                alignments,
                rows,
            } => Some(table::build(header, alignments, rows, lines, self.ctx)),
        };
        if let Some(node) = node {
            self.append(node);
        }
    }

    fn paragraph(&mut self, raw: &[String], lines: LineSpan) -> Option<Node> {
        let text = paragraph_text(raw);
        if text.is_empty() {
            return None;
        }
        Some(Node::Paragraph {
            children: parse_inline(&text, self.ctx),
            lines,
        })
    }

    fn fenced_code(&mut self, info: &str, body: Vec<String>, lines: LineSpan) -> Node {
        let language = info.split_whitespace().next().map(str::to_string);
        match language {
            Some(fence) if math::is_math_fence(&fence) => Node::MathBlock {
                id: self.ctx.allocate_math_id(),
                content: math::block_content(&body),
                fence: Some(fence),
                lines,
            },
            language => Node::CodeBlock {
                language,
                text: code_text(body),
                lines,
            },
        }
    }

    fn finish_setext(&mut self, level: u8) {
        let Some(OpenLeaf {
            leaf: Leaf::Paragraph { lines: raw },
            start,
            last,
        }) = self.leaf.take()
        else {
            return;
        };
        let text = paragraph_text(&raw);
        let children = parse_inline(&text, self.ctx);
        self.append(Node::Heading {
            level,
            children,
            lines: LineSpan::new(start, last + 1),
        });
    }
}

impl Container {
    fn new(kind: ContainerKind, line: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            start: line,
            last: line,
            blank_pending: false,
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

fn leading_spaces(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b' ').count()
}

/// Leading spaces, counting no further than `limit`.
fn leading_spaces_upto(text: &str, limit: usize) -> usize {
    text.bytes().take_while(|&b| b == b' ').take(limit).count()
}

fn strip_indent(text: &str, indent: usize) -> &str {
    let spaces = leading_spaces(text).min(indent);
    &text[spaces..]
}

fn paragraph_text(raw: &[String]) -> String {
    raw.iter()
        .map(|line| line.trim_start())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn code_text(body: Vec<String>) -> String {
    if body.is_empty() {
        return String::new();
    }
    let mut text = body.join("\n");
    text.push('\n');
    text
}

fn parse_list_marker(body: &str) -> Option<ItemMarker> {
    let bytes = body.as_bytes();
    let (marker, number, width) = match *bytes.first()? {
        b @ (b'-' | b'*' | b'+') => (ListMarker::Bullet(b as char), 1, 1),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let delimiter = *bytes.get(digits)?;
            if delimiter != b'.' && delimiter != b')' {
                return None;
            }
            let number = body[..digits].parse().ok()?;
            (ListMarker::Ordered(delimiter as char), number, digits + 1)
        }
        _ => return None,
    };

    let after = &body[width..];
    if is_blank(after) {
        return Some(ItemMarker {
            marker,
            number,
            content_offset: body.len(),
            content_indent: width + 1,
            empty: true,
        });
    }
    if !after.starts_with(' ') {
        return None;
    }
    let spaces = match leading_spaces(after) {
        // Content indented further is an indented code block inside the item.
        n if n > CODE_INDENT => 1,
        n => n,
    };
    Some(ItemMarker {
        marker,
        number,
        content_offset: width + spaces,
        content_indent: width + spaces,
        empty: false,
    })
}

fn parse_fence_open(body: &str) -> Option<(char, usize, String)> {
    let fence = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = body.chars().take_while(|c| *c == fence).count();
    if length < 3 {
        return None;
    }
    let info = body[length..].trim();
    if fence == '`' && info.contains('`') {
        return None;
    }
    Some((fence, length, info.to_string()))
}

fn is_closing_fence(rest: &str, fence: char, length: usize) -> bool {
    let indent = leading_spaces(rest);
    if indent > 3 {
        return false;
    }
    let body = &rest[indent..];
    let run = body.chars().take_while(|c| *c == fence).count();
    run >= length && is_blank(&body[run..])
}

fn parse_atx_heading(body: &str) -> Option<(u8, &str)> {
    let level = body.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &body[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let mut content = rest.trim();
    let without_closing = content.trim_end_matches('#');
    if without_closing.is_empty() {
        content = "";
    } else if without_closing.ends_with(' ') || without_closing.ends_with('\t') {
        content = without_closing.trim_end();
    }
    Some((level as u8, content))
}

fn is_thematic_break(body: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for c in body.chars() {
        match c {
            ' ' | '\t' => {}
            '-' | '*' | '_' if marker.is_none() || marker == Some(c) => {
                marker = Some(c);
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

fn setext_level(rest: &str) -> Option<u8> {
    let body = rest.trim();
    let first = body.chars().next()?;
    if !body.chars().all(|c| c == first) {
        return None;
    }
    match first {
        '=' => Some(1),
        '-' => Some(2),
        _ => None,
    }
}

/// End condition of an HTML block starting on this line, if one starts.
fn html_block_start(body: &str, paragraph_open: bool) -> Option<HtmlEnd> {
    if !body.starts_with('<') {
        return None;
    }
    if body.starts_with("<!--") {
        return Some(HtmlEnd::Contains("-->"));
    }
    if body.starts_with("<?") {
        return Some(HtmlEnd::Contains("?>"));
    }
    if body.starts_with("<![CDATA[") {
        return Some(HtmlEnd::Contains("]]>"));
    }
    if body.starts_with("<!") && body[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        return Some(HtmlEnd::Contains(">"));
    }

    let (closing, name) = tag_name(body)?;
    if !closing {
        let raw_end = match name.as_str() {
            "script" => Some("</script>"),
            "pre" => Some("</pre>"),
            "style" => Some("</style>"),
            "textarea" => Some("</textarea>"),
            _ => None,
        };
        if let Some(needle) = raw_end {
            return Some(HtmlEnd::Contains(needle));
        }
    }
    if BLOCK_TAGS.contains(&name.as_str()) {
        return Some(HtmlEnd::BlankLine);
    }
    if !paragraph_open && COMPLETE_TAG_LINE.is_match(body) {
        return Some(HtmlEnd::BlankLine);
    }
    None
}

/// `(is_closing, lowercase name)` of a tag at the start of `body`.
fn tag_name(body: &str) -> Option<(bool, String)> {
    let rest = body.strip_prefix('<')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let length = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .count();
    let after = &rest[length..];
    let boundary = after.is_empty()
        || after.starts_with(|c: char| c.is_whitespace() || c == '>')
        || after.starts_with("/>");
    boundary.then(|| (closing, rest[..length].to_ascii_lowercase()))
}
