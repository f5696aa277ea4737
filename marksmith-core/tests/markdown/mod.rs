//! Parsing through the public pipeline: preprocess, tokenize, annotate

mod blocks;
mod inline;

use marksmith_core::ast::Event;
use marksmith_core::common::tree_walk::TreeEvents;
use marksmith_core::{Document, Node, Renderer};

pub fn parse(source: &str) -> Document {
    Renderer::default().parse(source)
}

/// Every node of the document in pre-order.
pub fn all_nodes(doc: &Document) -> Vec<&Node> {
    TreeEvents::new(&doc.children)
        .filter_map(|event| match event {
            Event::Enter(node) => Some(node),
            Event::Exit(_) => None,
        })
        .collect()
}

pub fn top_level_types(doc: &Document) -> Vec<&'static str> {
    doc.children.iter().map(Node::node_type).collect()
}
