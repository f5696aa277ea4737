//! Tree annotator
//!
//! A single pre-order pass over a freshly tokenized document that records
//! the facts later stages need without walking the tree again:
//!
//! - distinct code block languages, lowercased, in first-seen order, without
//!   the diagram language
//! - diagram (`mermaid`) code blocks with their content and child-index path
//! - math expressions in document order: math nodes carry their lexer id as
//!   a placeholder anchor, math written inside raw HTML blocks is found by a
//!   text scan and anchored literally
//!
//! Annotating an already annotated document replaces its metadata.

use crate::ast::events::Event;
use crate::ast::nodes::{
    DiagramBlock, Document, MathAnchor, MathExpression, MathKind, Metadata, Node,
};
use crate::common::tree_walk::TreeEvents;
use crate::grammar::math::scan_math;

/// Fence language of diagram blocks rendered client-side.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

pub fn annotate(document: &mut Document) {
    let metadata = collect(&document.children);
    tracing::debug!(
        languages = metadata.code_languages.len(),
        diagrams = metadata.diagram_blocks.len(),
        math = metadata.math_expressions.len(),
        "annotated document"
    );
    document.metadata = Some(metadata);
}

fn collect(children: &[Node]) -> Metadata {
    let mut metadata = Metadata::default();
    let mut events = TreeEvents::new(children);

    while let Some(event) = events.next() {
        let Event::Enter(node) = event else {
            continue;
        };
        match node {
            Node::CodeBlock {
                language: Some(language),
                text,
                ..
            } => {
                let language = language.to_lowercase();
                if language == DIAGRAM_LANGUAGE {
                    metadata.diagram_blocks.push(DiagramBlock {
                        content: text.clone(),
                        path: events.path(),
                    });
                } else if !metadata.code_languages.contains(&language) {
                    metadata.code_languages.push(language);
                }
            }
            Node::MathBlock {
                id, content, fence, ..
            } => metadata.math_expressions.push(MathExpression {
                kind: MathKind::Block,
                content: content.clone(),
                from_code_block: fence.is_some(),
                fence: fence.clone(),
                anchor: MathAnchor::Placeholder { id: *id },
            }),
            Node::MathInline { id, content, .. } => {
                metadata.math_expressions.push(MathExpression {
                    kind: MathKind::Inline,
                    content: content.clone(),
                    from_code_block: false,
                    fence: None,
                    anchor: MathAnchor::Placeholder { id: *id },
                })
            }
            Node::RawHtml { html, .. } => {
                metadata
                    .math_expressions
                    .extend(scan_math(html).into_iter().map(|found| MathExpression {
                        kind: found.kind,
                        content: found.content,
                        from_code_block: false,
                        fence: None,
                        anchor: MathAnchor::Literal,
                    }))
            }
            _ => {}
        }
    }

    metadata.render_steps.push("annotate".to_string());
    metadata
}
