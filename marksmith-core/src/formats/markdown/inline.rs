//! Inline tokenization of a block's text content.
//!
//! One left-to-right pass builds a list of pieces (finished nodes and pending
//! delimiter runs); emphasis is resolved afterwards over that list with a
//! delimiter stack, so nesting of `*`/`_`/`~~` never recurses.

use super::LexContext;
use crate::ast::events::Event;
use crate::ast::nodes::{EmphasisKind, Node};
use crate::common::tree_walk::TreeEvents;
use crate::grammar::{Rule, INLINE_RULES};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static URI_AUTOLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*)>").unwrap());
static EMAIL_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*)>")
        .unwrap()
});
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s<]*[^\s<.,:;!?'\x22)\]*_~]").unwrap());
static INLINE_HTML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"<[A-Za-z][A-Za-z0-9\-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:\-]*(?:\s*=\s*(?:[^\s\x22'=<>`]+|'[^']*'|\x22[^\x22]*\x22))?)*\s*/?>",
        r"|</[A-Za-z][A-Za-z0-9\-]*\s*>",
        r"|<!--(?s:.*?)-->",
        r"|<\?(?s:.*?)\?>",
        r"|<!\[CDATA\[(?s:.*?)\]\]>",
        r"|<![A-Za-z][^>]*>",
        r")"
    ))
    .unwrap()
});

/// Tokenize inline content into nodes.
pub fn parse_inline(text: &str, ctx: &mut LexContext) -> Vec<Node> {
    InlineLexer::new(text, ctx).run()
}

#[derive(Debug, Clone, Copy)]
struct Delimiter {
    ch: char,
    count: usize,
    original: usize,
    can_open: bool,
    can_close: bool,
}

impl Delimiter {
    fn literal(&self) -> Node {
        Node::text(self.ch.to_string().repeat(self.count))
    }
}

enum Piece {
    Node(Node),
    Delim(Delimiter),
}

/// Cached result of a rule's start probe, as an absolute offset.
#[derive(Debug, Clone, Copy)]
enum Probe {
    Unknown,
    At(usize),
    Exhausted,
}

struct InlineLexer<'t, 'c> {
    text: &'t str,
    pos: usize,
    ctx: &'c mut LexContext,
    pieces: Vec<Piece>,
    buffer: String,
    probes: [Probe; INLINE_RULES.len()],
    /// Offset of each `[` → offset of its matching `]`, built on first use.
    brackets: Option<HashMap<usize, usize>>,
}

impl<'t, 'c> InlineLexer<'t, 'c> {
    fn new(text: &'t str, ctx: &'c mut LexContext) -> Self {
        Self {
            text,
            pos: 0,
            ctx,
            pieces: Vec::new(),
            buffer: String::new(),
            probes: [Probe::Unknown; INLINE_RULES.len()],
            brackets: None,
        }
    }

    fn run(mut self) -> Vec<Node> {
        let text = self.text;
        while self.pos < text.len() {
            let rest = &text[self.pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };
            if self.escape(rest) || self.code_span(rest) || self.extension(rest) {
                continue;
            }
            if self.baseline(rest, c) {
                continue;
            }
            self.buffer.push(c);
            self.pos += c.len_utf8();
        }
        self.flush();
        resolve_emphasis(self.pieces)
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if let Some(Piece::Node(Node::Text { text: previous })) = self.pieces.last_mut() {
            previous.push_str(&text);
        } else {
            self.pieces.push(Piece::Node(Node::Text { text }));
        }
    }

    fn emit(&mut self, node: Node) {
        self.flush();
        self.pieces.push(Piece::Node(node));
    }

    fn previous_char(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    fn skip_spaces(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start_matches(' ').len();
    }

    fn escape(&mut self, rest: &str) -> bool {
        let mut chars = rest.chars();
        if chars.next() != Some('\\') {
            return false;
        }
        match chars.next() {
            Some('\n') => {
                self.emit(Node::HardBreak);
                self.pos += 2;
                self.skip_spaces();
                true
            }
            Some(c) if c.is_ascii_punctuation() => {
                // Kept as an entity so the serializer does not read `\&copy;` as `&copy;`.
                if c == '&' {
                    self.buffer.push_str("&amp;");
                } else {
                    self.buffer.push(c);
                }
                self.pos += 2;
                true
            }
            _ => false,
        }
    }

    fn code_span(&mut self, rest: &str) -> bool {
        if !rest.starts_with('`') {
            return false;
        }
        let run = backtick_run(rest);
        let mut search = run;
        while let Some(found) = rest[search..].find('`') {
            let start = search + found;
            let closing = backtick_run(&rest[start..]);
            if closing == run {
                let code = normalize_code_span(&rest[run..start]);
                self.emit(Node::CodeSpan { code });
                self.pos += start + closing;
                return true;
            }
            search = start + closing;
        }
        self.buffer.push_str(&rest[..run]);
        self.pos += run;
        true
    }

    fn extension(&mut self, rest: &str) -> bool {
        for (slot, rule) in INLINE_RULES.iter().enumerate() {
            if !self.probe_hits(slot, *rule) {
                continue;
            }
            if let Some(found) = rule.tokenize(rest, self.ctx) {
                self.emit(found.node);
                self.pos += found.consumed.max(1);
                return true;
            }
        }
        false
    }

    fn probe_hits(&mut self, slot: usize, rule: Rule) -> bool {
        match self.probes[slot] {
            Probe::Exhausted => false,
            Probe::At(at) if at >= self.pos => at == self.pos,
            _ => {
                let next = rule
                    .start_probe(&self.text[self.pos..])
                    .map(|offset| self.pos + offset);
                self.probes[slot] = next.map_or(Probe::Exhausted, Probe::At);
                next == Some(self.pos)
            }
        }
    }

    fn baseline(&mut self, rest: &str, c: char) -> bool {
        match c {
            '<' => self.autolink(rest) || self.inline_html(rest),
            'h' => self.bare_url(rest),
            '!' if rest[1..].starts_with('[') => self.image(rest),
            '[' => self.link(rest),
            '*' | '_' => self.delimiter_run(rest, c),
            '~' if rest.starts_with("~~") => self.delimiter_run(rest, c),
            '\n' => self.line_break(),
            _ => false,
        }
    }

    fn autolink(&mut self, rest: &str) -> bool {
        let (url, label) = if let Some(caps) = URI_AUTOLINK.captures(rest) {
            (caps[1].to_string(), caps[1].to_string())
        } else if let Some(caps) = EMAIL_AUTOLINK.captures(rest) {
            (format!("mailto:{}", &caps[1]), caps[1].to_string())
        } else {
            return false;
        };
        // `<` + label + `>`
        let consumed = label.len() + 2;
        self.emit(Node::Link {
            url,
            title: None,
            children: vec![Node::text(label)],
        });
        self.pos += consumed;
        true
    }

    fn inline_html(&mut self, rest: &str) -> bool {
        let Some(found) = INLINE_HTML.find(rest) else {
            return false;
        };
        self.emit(Node::InlineHtml {
            html: found.as_str().to_string(),
        });
        self.pos += found.end();
        true
    }

    fn bare_url(&mut self, rest: &str) -> bool {
        if self.previous_char().is_some_and(char::is_alphanumeric) {
            return false;
        }
        let Some(found) = BARE_URL.find(rest) else {
            return false;
        };
        let url = found.as_str().to_string();
        self.emit(Node::Link {
            url: url.clone(),
            title: None,
            children: vec![Node::text(url)],
        });
        self.pos += found.end();
        true
    }

    /// Inner text of the `[...]` group opening at absolute offset `open`,
    /// and the length of the group including both brackets.
    fn bracketed(&mut self, open: usize) -> Option<(&'t str, usize)> {
        let text = self.text;
        let close = *self
            .brackets
            .get_or_insert_with(|| pair_brackets(text))
            .get(&open)?;
        Some((&text[open + 1..close], close + 1 - open))
    }

    fn link(&mut self, rest: &str) -> bool {
        let Some((label, after)) = self.bracketed(self.pos) else {
            return false;
        };
        let Some(target) = destination(&rest[after..]) else {
            return false;
        };
        let Some(children) = self.ctx.parse_nested(label) else {
            return false;
        };
        self.emit(Node::Link {
            url: target.url,
            title: target.title,
            children,
        });
        self.pos += after + target.consumed;
        true
    }

    fn image(&mut self, rest: &str) -> bool {
        let Some((label, after)) = self.bracketed(self.pos + 1) else {
            return false;
        };
        let Some(target) = destination(&rest[1 + after..]) else {
            return false;
        };
        let alt = match self.ctx.parse_nested(label) {
            Some(nodes) => plain_text(&nodes),
            None => label.to_string(),
        };
        self.emit(Node::Image {
            url: target.url,
            title: target.title,
            alt,
        });
        self.pos += 1 + after + target.consumed;
        true
    }

    fn delimiter_run(&mut self, rest: &str, ch: char) -> bool {
        let count = rest.chars().take_while(|&c| c == ch).count();
        if ch == '~' && count != 2 {
            self.buffer.push_str(&rest[..count]);
            self.pos += count;
            return true;
        }

        let before = self.previous_char().unwrap_or(' ');
        let after = rest[count..].chars().next().unwrap_or(' ');
        let left_flanking = !after.is_whitespace()
            && (!is_punctuation(after) || before.is_whitespace() || is_punctuation(before));
        let right_flanking = !before.is_whitespace()
            && (!is_punctuation(before) || after.is_whitespace() || is_punctuation(after));
        let (can_open, can_close) = if ch == '_' {
            (
                left_flanking && (!right_flanking || is_punctuation(before)),
                right_flanking && (!left_flanking || is_punctuation(after)),
            )
        } else {
            (left_flanking, right_flanking)
        };

        self.flush();
        self.pieces.push(Piece::Delim(Delimiter {
            ch,
            count,
            original: count,
            can_open,
            can_close,
        }));
        self.pos += count;
        true
    }

    fn line_break(&mut self) -> bool {
        let hard = self.buffer.ends_with("  ");
        let kept = self.buffer.trim_end_matches(' ').len();
        self.buffer.truncate(kept);
        self.emit(if hard { Node::HardBreak } else { Node::SoftBreak });
        self.pos += 1;
        self.skip_spaces();
        true
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control())
}

fn backtick_run(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b'`').count()
}

fn normalize_code_span(raw: &str) -> String {
    let code = raw.replace('\n', " ");
    if code.len() >= 2 && code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty() {
        code[1..code.len() - 1].to_string()
    } else {
        code
    }
}

/// Matches every unescaped `[` with its balancing `]` in one pass.
fn pair_brackets(text: &str) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => open.push(index),
            ']' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, index);
                }
            }
            _ => {}
        }
    }
    pairs
}

struct Target {
    url: String,
    title: Option<String>,
    consumed: usize,
}

/// Parses `(url "title")` at the start of `text`.
fn destination(text: &str) -> Option<Target> {
    let inner = text.strip_prefix('(')?;
    let mut pos = skip_whitespace(inner, 0);

    let url = if inner[pos..].starts_with('<') {
        let close = inner[pos + 1..].find(|c: char| c == '>' || c == '<' || c == '\n')?;
        if !inner[pos + 1 + close..].starts_with('>') {
            return None;
        }
        let url = &inner[pos + 1..pos + 1 + close];
        pos += close + 2;
        url
    } else {
        let start = pos;
        let mut end = inner.len();
        let mut parens = 0usize;
        let mut escaped = false;
        for (offset, c) in inner[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '(' => parens += 1,
                ')' if parens == 0 => {
                    end = start + offset;
                    break;
                }
                ')' => parens -= 1,
                c if c.is_whitespace() || c.is_control() => {
                    end = start + offset;
                    break;
                }
                _ => {}
            }
        }
        pos = end;
        &inner[start..end]
    };

    let before_title = pos;
    pos = skip_whitespace(inner, pos);
    let mut title = None;
    if pos > before_title {
        if let Some(close) = match inner[pos..].chars().next() {
            Some('"') => Some('"'),
            Some('\'') => Some('\''),
            Some('(') => Some(')'),
            _ => None,
        } {
            let body = &inner[pos + 1..];
            let end = find_unescaped(body, close)?;
            title = Some(unescape(&body[..end]));
            pos = skip_whitespace(inner, pos + 1 + end + 1);
        }
    }

    if !inner[pos..].starts_with(')') {
        return None;
    }
    Some(Target {
        url: unescape(url),
        title,
        consumed: 1 + pos + 1,
    })
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + rest.len() - rest.trim_start().len()
}

fn find_unescaped(text: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(index);
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Text content of inline nodes, used for image alt text.
fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for event in TreeEvents::new(nodes) {
        if let Event::Enter(node) = event {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::CodeSpan { code } => out.push_str(code),
                Node::Emoji { glyph, .. } => out.push_str(glyph),
                Node::MathInline { raw, .. } => out.push_str(raw),
                Node::SoftBreak | Node::HardBreak => out.push(' '),
                _ => {}
            }
        }
    }
    out
}

fn resolve_emphasis(pieces: Vec<Piece>) -> Vec<Node> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    // Per closer class, the prefix of `out` known to hold no usable opener.
    let mut openers_bottom = [0usize; CLOSER_CLASSES];
    for piece in pieces {
        let mut closer = match piece {
            Piece::Delim(delimiter) => delimiter,
            other => {
                out.push(other);
                continue;
            }
        };

        if closer.can_close {
            while closer.count > 0 {
                let class = closer_class(&closer);
                let Some(at) = find_opener(&out, &closer, openers_bottom[class]) else {
                    openers_bottom[class] = out.len();
                    break;
                };
                let Piece::Delim(opener) = &mut out[at] else {
                    break;
                };
                let used = if closer.ch == '~' || (opener.count >= 2 && closer.count >= 2) {
                    2
                } else {
                    1
                };
                opener.count -= used;
                let opener_spent = opener.count == 0;
                closer.count -= used;

                let children = into_nodes(out.drain(at + 1..));
                if opener_spent {
                    out.pop();
                }
                for bottom in &mut openers_bottom {
                    *bottom = (*bottom).min(out.len());
                }
                let kind = match (closer.ch, used) {
                    ('~', _) => EmphasisKind::Strikethrough,
                    (_, 2) => EmphasisKind::Strong,
                    _ => EmphasisKind::Emphasis,
                };
                out.push(Piece::Node(Node::EmphasisRun { kind, children }));
            }
        }

        if closer.count > 0 {
            if closer.can_open {
                out.push(Piece::Delim(closer));
            } else {
                out.push(Piece::Node(closer.literal()));
            }
        }
    }
    into_nodes(out.into_iter())
}

const CLOSER_CLASSES: usize = 3 * 2 * 3;

/// Closers in one class accept exactly the same openers.
fn closer_class(closer: &Delimiter) -> usize {
    let ch = match closer.ch {
        '*' => 0,
        '_' => 1,
        _ => 2,
    };
    (ch * 2 + usize::from(closer.can_open)) * 3 + closer.original % 3
}

fn find_opener(out: &[Piece], closer: &Delimiter, bottom: usize) -> Option<usize> {
    let bottom = bottom.min(out.len());
    out[bottom..]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, piece)| match piece {
            Piece::Delim(opener)
                if opener.ch == closer.ch
                    && opener.can_open
                    && opener.count > 0
                    && compatible(opener, closer) =>
            {
                Some(bottom + index)
            }
            _ => None,
        })
}

/// Both-flanking runs may not pair when their lengths sum to a multiple of
/// three, unless both lengths are.
fn compatible(opener: &Delimiter, closer: &Delimiter) -> bool {
    if opener.ch == '~' {
        return opener.count == 2 && closer.count == 2;
    }
    let both_flanking = opener.can_close || closer.can_open;
    !(both_flanking
        && (opener.original + closer.original) % 3 == 0
        && !(opener.original % 3 == 0 && closer.original % 3 == 0))
}

fn into_nodes(pieces: impl Iterator<Item = Piece>) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    for piece in pieces {
        let node = match piece {
            Piece::Node(node) => node,
            Piece::Delim(delimiter) => delimiter.literal(),
        };
        if let Node::Text { text } = &node {
            if let Some(Node::Text { text: previous }) = nodes.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        nodes.push(node);
    }
    nodes
}
