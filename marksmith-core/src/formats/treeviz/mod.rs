//! Treeviz formatter for document trees
//!
//! A visual, line based rendering of the tree used by `inspect`. Each node
//! is one line:
//!
//! `<prefix><connector> <icon> <label>` (label truncated to 30 characters)
//!
//! Example:
//!
//! ```text
//! ⧉ Document (3 nodes)
//! ├─ § h1
//! │ └─ ◦ Title
//! ├─ ¶ Some text with $x$
//! │ ├─ ◦ Some text with
//! │ └─ √ x
//! └─ ☰ 1 items
//!   └─ ☑ [x]
//!     └─ ¶ done
//!       └─ ◦ done
//! ```
//!
//! Icons
//!     Blocks: heading §, paragraph ¶, list ☰, list-item •, task-item ☑/☐,
//!         code-block 𝒱, block-quote ❝, table ▦, table-row ─, table-cell ▢,
//!         thematic-break ―, raw-html ⟨⟩, footnote-definition ³, math-block √
//!     Inlines: text ◦, soft-break ↵, hard-break ⏎, emphasis 𝐼, strong 𝐁,
//!         strikethrough ∼, code-span ƒ, inline-html ⟨⟩, link ⊕, image ▣,
//!         footnote-reference †, subscript ₓ, superscript ˣ, highlight ▮,
//!         math-inline √, emoji ☺, video-thumbnail ▶

use crate::ast::events::Event;
use crate::ast::nodes::{Document, EmphasisKind, Node};
use crate::common::tree_walk::TreeEvents;

const LABEL_WIDTH: usize = 30;

pub fn get_icon(node: &Node) -> &'static str {
    match node {
        Node::Heading { .. } => "§",
        Node::Paragraph { .. } => "¶",
        Node::List { .. } => "☰",
        Node::ListItem { .. } => "•",
        Node::TaskItem { checked: true, .. } => "☑",
        Node::TaskItem { checked: false, .. } => "☐",
        Node::CodeBlock { .. } => "𝒱",
        Node::BlockQuote { .. } => "❝",
        Node::Table { .. } => "▦",
        Node::TableRow { .. } => "─",
        Node::TableCell { .. } => "▢",
        Node::ThematicBreak { .. } => "―",
        Node::RawHtml { .. } | Node::InlineHtml { .. } => "⟨⟩",
        Node::FootnoteDefinition { .. } => "³",
        Node::MathBlock { .. } | Node::MathInline { .. } => "√",
        Node::Text { .. } => "◦",
        Node::SoftBreak => "↵",
        Node::HardBreak => "⏎",
        Node::EmphasisRun { kind, .. } => match kind {
            EmphasisKind::Emphasis => "𝐼",
            EmphasisKind::Strong => "𝐁",
            EmphasisKind::Strikethrough => "∼",
        },
        Node::CodeSpan { .. } => "ƒ",
        Node::Link { .. } => "⊕",
        Node::Image { .. } => "▣",
        Node::FootnoteReference { .. } => "†",
        Node::Subscript { .. } => "ₓ",
        Node::Superscript { .. } => "ˣ",
        Node::Highlight { .. } => "▮",
        Node::Emoji { .. } => "☺",
        Node::VideoThumbnail { .. } => "▶",
    }
}

fn display_label(node: &Node) -> String {
    let label = match node {
        Node::Heading { level, .. } => format!("h{level}"),
        Node::Paragraph { children, .. } => plain_text(children),
        Node::List {
            ordered,
            start,
            tight,
            items,
            ..
        } => {
            let mut label = format!("{} items", items.len());
            if *ordered {
                label.push_str(&format!(", from {start}"));
            }
            if !*tight {
                label.push_str(", loose");
            }
            label
        }
        Node::ListItem { .. } => String::new(),
        Node::TaskItem { checked, .. } => if *checked { "[x]" } else { "[ ]" }.to_string(),
        Node::CodeBlock { language, .. } => language.clone().unwrap_or_else(|| "code".into()),
        Node::BlockQuote { .. } => String::new(),
        Node::Table { alignments, rows, .. } => {
            format!("{} columns, {} rows", alignments.len(), rows.len())
        }
        Node::TableRow { header, .. } => if *header { "header" } else { "" }.to_string(),
        Node::TableCell { children, .. } => plain_text(children),
        Node::ThematicBreak { .. } | Node::SoftBreak | Node::HardBreak => String::new(),
        Node::RawHtml { html, .. } => html.clone(),
        Node::FootnoteDefinition { label, .. } => label.clone(),
        Node::MathBlock { content, .. } | Node::MathInline { content, .. } => content.clone(),
        Node::Text { text } => text.clone(),
        Node::EmphasisRun { children, .. }
        | Node::Subscript { children, .. }
        | Node::Superscript { children, .. }
        | Node::Highlight { children, .. } => plain_text(children),
        Node::CodeSpan { code } => code.clone(),
        Node::InlineHtml { html } => html.clone(),
        Node::Link { url, .. } | Node::Image { url, .. } => url.clone(),
        Node::FootnoteReference { label, .. } => label.clone(),
        Node::Emoji { name, glyph, .. } => format!("{glyph} {name}"),
        Node::VideoThumbnail { video_id, .. } => video_id.clone(),
    };
    truncate(&label.replace('\n', " "))
}

/// Concatenated text of inline children, one level deep.
fn plain_text(children: &[Node]) -> String {
    children
        .iter()
        .map(|child| match child {
            Node::Text { text } => text.as_str(),
            Node::CodeSpan { code } => code.as_str(),
            Node::SoftBreak | Node::HardBreak => " ",
            Node::MathInline { raw, .. } => raw.as_str(),
            _ => "",
        })
        .collect()
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        return label.to_string();
    }
    let mut short: String = label.chars().take(LABEL_WIDTH - 1).collect();
    short.push('…');
    short
}

/// Render the tree as treeviz text
pub fn to_treeviz(doc: &Document) -> String {
    let mut output = format!("⧉ Document ({} nodes)\n", doc.children.len());
    // (prefix for the children, remaining siblings after the current node)
    let mut frames: Vec<(String, usize)> = vec![(String::new(), doc.children.len())];

    for event in TreeEvents::new(&doc.children) {
        match event {
            Event::Enter(node) => {
                let Some((prefix, remaining)) = frames.last_mut() else {
                    break;
                };
                *remaining = remaining.saturating_sub(1);
                let is_last = *remaining == 0;
                let connector = if is_last { "└─" } else { "├─" };
                let label = display_label(node);
                let line = if label.is_empty() {
                    format!("{prefix}{connector} {}\n", get_icon(node))
                } else {
                    format!("{prefix}{connector} {} {label}\n", get_icon(node))
                };
                output.push_str(&line);
                let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
                frames.push((child_prefix, node.children().len()));
            }
            Event::Exit(_) => {
                frames.pop();
            }
        }
    }
    output
}
