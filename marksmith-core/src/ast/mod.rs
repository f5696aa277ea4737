//! Document tree for parsed Markdown.
//!
//! The tree is the boundary between the two halves of the pipeline: the lexer
//! builds it, the annotator attaches [`nodes::Metadata`] to it, and the HTML
//! serializer walks it. Nothing mutates a tree once it has been annotated.

pub mod events;
pub mod nodes;

pub use events::Event;
pub use nodes::{
    Alignment, DiagramBlock, Document, EmphasisKind, LineSpan, MathAnchor, MathExpression,
    MathKind, Metadata, Node,
};
