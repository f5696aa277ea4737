//! Defines the flat event stream representation of a document tree.

use crate::ast::nodes::Node;

/// A single step of a pre-order walk over the tree.
///
/// Every node produces an `Enter` followed, after all of its children, by the
/// matching `Exit`. Leaves produce the pair back to back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    Enter(&'a Node),
    Exit(&'a Node),
}

impl<'a> Event<'a> {
    pub fn node(&self) -> &'a Node {
        match self {
            Event::Enter(node) | Event::Exit(node) => node,
        }
    }
}
