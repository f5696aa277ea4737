//! Core data structures for the document tree.

use serde::Serialize;

/// Range of source lines (0-based, end exclusive) a block node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }
}

/// Alignment of a table column, taken from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    None,
}

/// The three delimiter-run kinds of the baseline grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisKind {
    Emphasis,
    Strong,
    Strikethrough,
}

/// One syntactic unit of a document, block or inline.
///
/// Children are exclusively owned. Block nodes record the source lines they
/// came from; nodes produced by inline grammar rules keep the matched `raw`
/// source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Heading {
        level: u8,
        children: Vec<Node>,
        lines: LineSpan,
    },
    Paragraph {
        children: Vec<Node>,
        lines: LineSpan,
    },
    List {
        ordered: bool,
        start: u64,
        tight: bool,
        items: Vec<Node>,
        lines: LineSpan,
    },
    ListItem {
        children: Vec<Node>,
        lines: LineSpan,
    },
    TaskItem {
        checked: bool,
        children: Vec<Node>,
        lines: LineSpan,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
        lines: LineSpan,
    },
    BlockQuote {
        children: Vec<Node>,
        lines: LineSpan,
    },
    Table {
        alignments: Vec<Alignment>,
        rows: Vec<Node>,
        lines: LineSpan,
    },
    TableRow {
        header: bool,
        cells: Vec<Node>,
    },
    TableCell {
        header: bool,
        align: Alignment,
        children: Vec<Node>,
    },
    ThematicBreak {
        lines: LineSpan,
    },
    RawHtml {
        html: String,
        lines: LineSpan,
    },
    FootnoteDefinition {
        label: String,
        children: Vec<Node>,
        lines: LineSpan,
    },
    MathBlock {
        id: usize,
        content: String,
        /// Fence language when the block came from a ```math/katex/tex fence.
        fence: Option<String>,
        lines: LineSpan,
    },
    Text {
        text: String,
    },
    SoftBreak,
    HardBreak,
    EmphasisRun {
        kind: EmphasisKind,
        children: Vec<Node>,
    },
    CodeSpan {
        code: String,
    },
    InlineHtml {
        html: String,
    },
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    FootnoteReference {
        label: String,
        raw: String,
    },
    Subscript {
        children: Vec<Node>,
        raw: String,
    },
    Superscript {
        children: Vec<Node>,
        raw: String,
    },
    Highlight {
        children: Vec<Node>,
        raw: String,
    },
    MathInline {
        id: usize,
        content: String,
        raw: String,
    },
    Emoji {
        name: String,
        glyph: String,
        raw: String,
    },
    VideoThumbnail {
        video_id: String,
        url: String,
        raw: String,
    },
}

impl Node {
    /// Kebab-case type tag, identical to the serialized `type` field.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Heading { .. } => "heading",
            Node::Paragraph { .. } => "paragraph",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "list-item",
            Node::TaskItem { .. } => "task-item",
            Node::CodeBlock { .. } => "code-block",
            Node::BlockQuote { .. } => "block-quote",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "table-row",
            Node::TableCell { .. } => "table-cell",
            Node::ThematicBreak { .. } => "thematic-break",
            Node::RawHtml { .. } => "raw-html",
            Node::FootnoteDefinition { .. } => "footnote-definition",
            Node::MathBlock { .. } => "math-block",
            Node::Text { .. } => "text",
            Node::SoftBreak => "soft-break",
            Node::HardBreak => "hard-break",
            Node::EmphasisRun { .. } => "emphasis-run",
            Node::CodeSpan { .. } => "code-span",
            Node::InlineHtml { .. } => "inline-html",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
            Node::FootnoteReference { .. } => "footnote-reference",
            Node::Subscript { .. } => "subscript",
            Node::Superscript { .. } => "superscript",
            Node::Highlight { .. } => "highlight",
            Node::MathInline { .. } => "math-inline",
            Node::Emoji { .. } => "emoji",
            Node::VideoThumbnail { .. } => "video-thumbnail",
        }
    }

    /// Owned child nodes, in source order. Leaves return an empty slice.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children, .. }
            | Node::ListItem { children, .. }
            | Node::TaskItem { children, .. }
            | Node::BlockQuote { children, .. }
            | Node::TableCell { children, .. }
            | Node::FootnoteDefinition { children, .. }
            | Node::EmphasisRun { children, .. }
            | Node::Link { children, .. }
            | Node::Subscript { children, .. }
            | Node::Superscript { children, .. }
            | Node::Highlight { children, .. } => children,
            Node::List { items, .. } => items,
            Node::Table { rows, .. } => rows,
            Node::TableRow { cells, .. } => cells,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children, .. }
            | Node::ListItem { children, .. }
            | Node::TaskItem { children, .. }
            | Node::BlockQuote { children, .. }
            | Node::TableCell { children, .. }
            | Node::FootnoteDefinition { children, .. }
            | Node::EmphasisRun { children, .. }
            | Node::Link { children, .. }
            | Node::Subscript { children, .. }
            | Node::Superscript { children, .. }
            | Node::Highlight { children, .. } => Some(children),
            Node::List { items, .. } => Some(items),
            Node::Table { rows, .. } => Some(rows),
            Node::TableRow { cells, .. } => Some(cells),
            _ => None,
        }
    }

    /// Detach and return this node's children, leaving it childless.
    pub fn take_children(&mut self) -> Vec<Node> {
        self.children_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Heading { .. }
                | Node::Paragraph { .. }
                | Node::List { .. }
                | Node::ListItem { .. }
                | Node::TaskItem { .. }
                | Node::CodeBlock { .. }
                | Node::BlockQuote { .. }
                | Node::Table { .. }
                | Node::TableRow { .. }
                | Node::TableCell { .. }
                | Node::ThematicBreak { .. }
                | Node::RawHtml { .. }
                | Node::FootnoteDefinition { .. }
                | Node::MathBlock { .. }
        )
    }

    /// Source lines for block nodes.
    pub fn lines(&self) -> Option<LineSpan> {
        match self {
            Node::Heading { lines, .. }
            | Node::Paragraph { lines, .. }
            | Node::List { lines, .. }
            | Node::ListItem { lines, .. }
            | Node::TaskItem { lines, .. }
            | Node::CodeBlock { lines, .. }
            | Node::BlockQuote { lines, .. }
            | Node::Table { lines, .. }
            | Node::ThematicBreak { lines }
            | Node::RawHtml { lines, .. }
            | Node::FootnoteDefinition { lines, .. }
            | Node::MathBlock { lines, .. } => Some(*lines),
            _ => None,
        }
    }

    /// Matched source text for nodes produced by inline grammar rules.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Node::FootnoteReference { raw, .. }
            | Node::Subscript { raw, .. }
            | Node::Superscript { raw, .. }
            | Node::Highlight { raw, .. }
            | Node::MathInline { raw, .. }
            | Node::Emoji { raw, .. }
            | Node::VideoThumbnail { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }
}

/// Whether a math expression is typeset inline or in display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathKind {
    Inline,
    Block,
}

/// How the substitution pass finds an expression in rendered HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum MathAnchor {
    /// The renderer emitted an exact placeholder for the node with this id.
    Placeholder { id: usize },
    /// The expression only exists as delimited text (e.g. inside raw HTML).
    Literal,
}

/// A math expression awaiting formatting after HTML generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MathExpression {
    pub kind: MathKind,
    pub content: String,
    pub from_code_block: bool,
    /// Fence language of code-block math, used for the failure fallback.
    pub fence: Option<String>,
    pub anchor: MathAnchor,
}

/// A diagram code block, located by its child-index path from the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramBlock {
    pub content: String,
    pub path: Vec<usize>,
}

/// Cross-cutting facts extracted by the tree annotator.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metadata {
    pub code_languages: Vec<String>,
    pub diagram_blocks: Vec<DiagramBlock>,
    pub math_expressions: Vec<MathExpression>,
    pub render_steps: Vec<String>,
}

/// Root of the document tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
    /// Present once the document went through the annotator.
    pub metadata: Option<Metadata>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            metadata: None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.metadata.is_some()
    }
}

impl Drop for Document {
    // Tear down iteratively so deeply nested documents cannot exhaust the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.extend(node.take_children());
        }
    }
}
