//! HTML serialization (document tree → HTML fragment)
//!
//! Pipeline: annotated Document → events → HTML string. The tree is walked
//! once through the iterative event stream; a parent stack supplies the
//! context some elements need (tight list paragraphs, task checkboxes).
//! Footnote definitions are pulled out of the flow and emitted as a
//! numbered section after the body.

use crate::ast::events::Event;
use crate::ast::nodes::{Alignment, Document, EmphasisKind, MathAnchor, Node};
use crate::common::escape::{escape_html, escape_text, escape_url};
use crate::common::tree_walk::TreeEvents;
use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::registry::LanguageRegistry;
use crate::transforms::annotate::DIAGRAM_LANGUAGE;
use crate::transforms::math::Placeholders;
use std::collections::{HashMap, HashSet};

/// Collaborators consulted while serializing
#[derive(Clone, Copy)]
pub struct HtmlOptions<'a> {
    pub highlighter: &'a dyn Highlighter,
    pub registry: &'a LanguageRegistry,
}

/// Serialize an annotated document to an HTML fragment
///
/// Math nodes become the placeholders of [`Placeholders::for_document`] for
/// the substitution pass.
pub fn serialize_to_html(doc: &Document, options: HtmlOptions<'_>) -> Result<String, RenderError> {
    let metadata = doc.metadata.as_ref().ok_or(RenderError::NotAnnotated)?;
    let math_ids = metadata
        .math_expressions
        .iter()
        .filter_map(|expression| match expression.anchor {
            MathAnchor::Placeholder { id } => Some(id),
            MathAnchor::Literal => None,
        })
        .collect();

    let mut writer = HtmlWriter {
        out: String::new(),
        options,
        math_ids,
        placeholders: Placeholders::for_document(doc),
        footnotes: FootnoteIndex::build(&doc.children),
        references_seen: HashMap::new(),
        diagrams: 0,
        pending_checkbox: None,
        in_table_body: false,
    };
    writer.write_nodes(&doc.children)?;
    writer.write_footnotes()?;
    Ok(writer.out)
}

/// Footnote numbering in order of first reference.
struct FootnoteIndex<'a> {
    definitions: HashMap<&'a str, &'a Node>,
    numbers: HashMap<&'a str, usize>,
    order: Vec<&'a str>,
    reference_counts: HashMap<&'a str, usize>,
}

impl<'a> FootnoteIndex<'a> {
    fn build(roots: &'a [Node]) -> Self {
        let mut definitions = HashMap::new();
        let mut references = Vec::new();
        for event in TreeEvents::new(roots) {
            let Event::Enter(node) = event else {
                continue;
            };
            match node {
                Node::FootnoteDefinition { label, .. } => {
                    definitions.entry(label.as_str()).or_insert(node);
                }
                Node::FootnoteReference { label, .. } => references.push(label.as_str()),
                _ => {}
            }
        }

        let mut index = FootnoteIndex {
            definitions,
            numbers: HashMap::new(),
            order: Vec::new(),
            reference_counts: HashMap::new(),
        };
        for label in references {
            if !index.definitions.contains_key(label) {
                continue;
            }
            *index.reference_counts.entry(label).or_insert(0) += 1;
            if !index.numbers.contains_key(label) {
                index.order.push(label);
                index.numbers.insert(label, index.order.len());
            }
        }
        index
    }
}

struct HtmlWriter<'a> {
    out: String,
    options: HtmlOptions<'a>,
    math_ids: HashSet<usize>,
    placeholders: Placeholders,
    footnotes: FootnoteIndex<'a>,
    references_seen: HashMap<&'a str, usize>,
    diagrams: usize,
    /// Checked state of a task item whose checkbox is not written yet.
    pending_checkbox: Option<bool>,
    in_table_body: bool,
}

impl<'a> HtmlWriter<'a> {
    fn write_nodes(&mut self, roots: &'a [Node]) -> Result<(), RenderError> {
        let mut parents: Vec<&'a Node> = Vec::new();
        let mut skipping = 0usize;

        for event in TreeEvents::new(roots) {
            match event {
                Event::Enter(node) => {
                    if skipping > 0 || matches!(node, Node::FootnoteDefinition { .. }) {
                        skipping += 1;
                        continue;
                    }
                    self.enter(node, &parents)?;
                    parents.push(node);
                }
                Event::Exit(node) => {
                    if skipping > 0 {
                        skipping -= 1;
                        continue;
                    }
                    parents.pop();
                    self.exit(node, &parents);
                }
            }
        }
        Ok(())
    }

    fn enter(&mut self, node: &'a Node, parents: &[&'a Node]) -> Result<(), RenderError> {
        if let Some(checked) = self.pending_checkbox.take() {
            if matches!(node, Node::Paragraph { .. }) {
                self.open_paragraph(parents);
                self.out.push_str(&checkbox(checked));
                return Ok(());
            }
            self.out.push_str(&checkbox(checked));
        }

        match node {
            Node::Heading { level, .. } => {
                if !(1..=6).contains(level) {
                    return Err(RenderError::InvalidTree(format!(
                        "heading level {level} is outside 1..=6"
                    )));
                }
                self.cr();
                self.out.push_str(&format!("<h{level}>"));
            }
            Node::Paragraph { .. } => self.open_paragraph(parents),
            Node::List {
                ordered,
                start,
                items,
                ..
            } => {
                self.cr();
                if *ordered {
                    if *start == 1 {
                        self.out.push_str("<ol>");
                    } else {
                        self.out.push_str(&format!("<ol start=\"{start}\">"));
                    }
                } else if items.iter().any(|item| matches!(item, Node::TaskItem { .. })) {
                    self.out.push_str("<ul class=\"contains-task-list\">");
                } else {
                    self.out.push_str("<ul>");
                }
                self.cr();
            }
            Node::ListItem { .. } => {
                self.cr();
                self.out.push_str("<li>");
            }
            Node::TaskItem { checked, .. } => {
                self.cr();
                self.out.push_str("<li class=\"task-list-item\">");
                self.pending_checkbox = Some(*checked);
            }
            Node::CodeBlock { language, text, .. } => {
                self.cr();
                self.write_code_block(language.as_deref(), text);
                self.cr();
            }
            Node::BlockQuote { .. } => {
                self.cr();
                self.out.push_str("<blockquote>");
                self.cr();
            }
            Node::Table { .. } => {
                self.cr();
                self.out.push_str("<table>");
                self.cr();
                self.in_table_body = false;
            }
            Node::TableRow { header, .. } => {
                if *header {
                    self.out.push_str("<thead>\n");
                } else if !self.in_table_body {
                    self.out.push_str("<tbody>\n");
                    self.in_table_body = true;
                }
                self.out.push_str("<tr>\n");
            }
            Node::TableCell { header, align, .. } => {
                let tag = if *header { "th" } else { "td" };
                match align_style(*align) {
                    Some(style) => self
                        .out
                        .push_str(&format!("<{tag} style=\"text-align: {style}\">")),
                    None => self.out.push_str(&format!("<{tag}>")),
                }
            }
            Node::ThematicBreak { .. } => {
                self.cr();
                self.out.push_str("<hr />");
                self.cr();
            }
            Node::RawHtml { html, .. } => {
                self.cr();
                self.out.push_str(html);
                self.cr();
            }
            Node::MathBlock { id, .. } => {
                self.check_math_id(*id)?;
                self.cr();
                self.out.push_str(&self.placeholders.placeholder(*id));
                self.cr();
            }
            Node::MathInline { id, .. } => {
                self.check_math_id(*id)?;
                self.out.push_str(&self.placeholders.placeholder(*id));
            }
            Node::FootnoteDefinition { .. } => {}
            Node::Text { text } => self.out.push_str(&escape_text(text)),
            Node::SoftBreak => self.out.push('\n'),
            Node::HardBreak => self.out.push_str("<br />\n"),
            Node::EmphasisRun { kind, .. } => {
                self.out.push('<');
                self.out.push_str(emphasis_tag(*kind));
                self.out.push('>');
            }
            Node::CodeSpan { code } => {
                self.out.push_str("<code>");
                self.out.push_str(&escape_html(code));
                self.out.push_str("</code>");
            }
            Node::InlineHtml { html } => self.out.push_str(html),
            Node::Link { url, title, .. } => {
                self.out.push_str(&format!("<a href=\"{}\"", escape_url(url)));
                if let Some(title) = title {
                    self.out
                        .push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                self.out.push('>');
            }
            Node::Image { url, title, alt } => {
                self.out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    escape_url(url),
                    escape_html(alt)
                ));
                if let Some(title) = title {
                    self.out
                        .push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                self.out.push_str(" />");
            }
            Node::FootnoteReference { label, raw } => self.write_reference(label, raw),
            Node::Subscript { .. } => self.out.push_str("<sub>"),
            Node::Superscript { .. } => self.out.push_str("<sup>"),
            Node::Highlight { .. } => self.out.push_str("<mark>"),
            Node::Emoji { glyph, .. } => self.out.push_str(glyph),
            Node::VideoThumbnail { video_id, .. } => {
                let id = escape_html(video_id);
                self.out.push_str(&format!(
                    "<a href=\"https://www.youtube.com/watch?v={id}\" class=\"youtube-thumbnail\">\
                     <img src=\"https://img.youtube.com/vi/{id}/hqdefault.jpg\" alt=\"YouTube video {id}\" />\
                     </a>"
                ));
            }
        }
        Ok(())
    }

    fn exit(&mut self, node: &'a Node, parents: &[&'a Node]) {
        match node {
            Node::Heading { level, .. } => {
                self.out.push_str(&format!("</h{level}>"));
                self.cr();
            }
            Node::Paragraph { .. } => {
                if !in_tight_item(parents) {
                    self.out.push_str("</p>");
                    self.cr();
                }
            }
            Node::List { ordered, .. } => {
                self.cr();
                self.out.push_str(if *ordered { "</ol>" } else { "</ul>" });
                self.cr();
            }
            Node::ListItem { .. } | Node::TaskItem { .. } => {
                if let Some(checked) = self.pending_checkbox.take() {
                    self.out.push_str(&checkbox(checked));
                }
                self.out.push_str("</li>");
                self.cr();
            }
            Node::BlockQuote { .. } => {
                self.cr();
                self.out.push_str("</blockquote>");
                self.cr();
            }
            Node::Table { .. } => {
                if self.in_table_body {
                    self.out.push_str("</tbody>\n");
                    self.in_table_body = false;
                }
                self.out.push_str("</table>");
                self.cr();
            }
            Node::TableRow { header, .. } => {
                self.out.push_str("</tr>\n");
                if *header {
                    self.out.push_str("</thead>\n");
                }
            }
            Node::TableCell { header, .. } => {
                self.out
                    .push_str(if *header { "</th>\n" } else { "</td>\n" });
            }
            Node::EmphasisRun { kind, .. } => {
                self.out.push_str("</");
                self.out.push_str(emphasis_tag(*kind));
                self.out.push('>');
            }
            Node::Link { .. } => self.out.push_str("</a>"),
            Node::Subscript { .. } => self.out.push_str("</sub>"),
            Node::Superscript { .. } => self.out.push_str("</sup>"),
            Node::Highlight { .. } => self.out.push_str("</mark>"),
            _ => {}
        }
    }

    fn open_paragraph(&mut self, parents: &[&'a Node]) {
        if !in_tight_item(parents) {
            self.cr();
            self.out.push_str("<p>");
        }
    }

    fn write_code_block(&mut self, language: Option<&str>, text: &str) {
        let Some(language) = language else {
            self.out.push_str("<pre><code>");
            self.out.push_str(&escape_html(text));
            self.out.push_str("</code></pre>");
            return;
        };

        if language.eq_ignore_ascii_case(DIAGRAM_LANGUAGE) {
            self.out.push_str(&format!(
                "<div class=\"mermaid\" id=\"mermaid-{}\">{}</div>",
                self.diagrams,
                escape_html(text)
            ));
            self.diagrams += 1;
            return;
        }

        let class = escape_html(language);
        let token = self.options.registry.resolve(language);
        match self.options.highlighter.highlight(text, &token) {
            Ok(Some(highlighted)) => {
                self.out.push_str(&format!(
                    "<pre class=\"highlight\"><code class=\"language-{class}\">{highlighted}</code></pre>"
                ));
                return;
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %error, "highlighting failed, emitting plain code");
            }
        }
        self.out.push_str(&format!(
            "<pre><code class=\"language-{class}\">{}</code></pre>",
            escape_html(text)
        ));
    }

    fn write_reference(&mut self, label: &'a str, raw: &str) {
        let Some(&number) = self.footnotes.numbers.get(label) else {
            self.out.push_str(&escape_text(raw));
            return;
        };
        let seen = self.references_seen.entry(label).or_insert(0);
        *seen += 1;
        let id = reference_id(number, *seen);
        self.out.push_str(&format!(
            "<sup class=\"footnote-ref\"><a href=\"#fn-{number}\" id=\"{id}\">{number}</a></sup>"
        ));
    }

    fn write_footnotes(&mut self) -> Result<(), RenderError> {
        if self.footnotes.order.is_empty() {
            return Ok(());
        }
        self.cr();
        self.out
            .push_str("<section class=\"footnotes\">\n<ol>\n");

        let order = self.footnotes.order.clone();
        for label in order {
            let number = self.footnotes.numbers[label];
            let count = self.footnotes.reference_counts[label];
            let definition = self.footnotes.definitions[label];

            let outer = std::mem::take(&mut self.out);
            self.write_nodes(definition.children())?;
            self.cr();
            let body = std::mem::replace(&mut self.out, outer);

            let backrefs = (1..=count)
                .map(|k| {
                    format!(
                        "<a href=\"#{}\" class=\"footnote-backref\">↩</a>",
                        reference_id(number, k)
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");

            self.out.push_str(&format!("<li id=\"fn-{number}\">\n"));
            match body.strip_suffix("</p>\n") {
                Some(head) => {
                    self.out.push_str(head);
                    self.out.push_str(&format!(" {backrefs}</p>\n"));
                }
                None => {
                    self.out.push_str(&body);
                    self.out.push_str(&format!("<p>{backrefs}</p>\n"));
                }
            }
            self.out.push_str("</li>\n");
        }

        self.out.push_str("</ol>\n</section>\n");
        Ok(())
    }

    fn check_math_id(&self, id: usize) -> Result<(), RenderError> {
        if self.math_ids.contains(&id) {
            Ok(())
        } else {
            Err(RenderError::InvalidTree(format!(
                "math node {id} has no extracted expression"
            )))
        }
    }

    /// Start a new line unless already at one.
    fn cr(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

fn in_tight_item(parents: &[&Node]) -> bool {
    match parents {
        [.., Node::List { tight, .. }, Node::ListItem { .. } | Node::TaskItem { .. }] => *tight,
        _ => false,
    }
}

fn checkbox(checked: bool) -> String {
    format!(
        "<input type=\"checkbox\" class=\"task-list-item-checkbox\" disabled=\"\"{} /> ",
        if checked { " checked=\"\"" } else { "" }
    )
}

fn reference_id(number: usize, occurrence: usize) -> String {
    if occurrence <= 1 {
        format!("fnref-{number}")
    } else {
        format!("fnref-{number}-{occurrence}")
    }
}

fn emphasis_tag(kind: EmphasisKind) -> &'static str {
    match kind {
        EmphasisKind::Emphasis => "em",
        EmphasisKind::Strong => "strong",
        EmphasisKind::Strikethrough => "del",
    }
}

fn align_style(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
        Alignment::None => None,
    }
}
