//! Converts the nested document tree into a flat event stream.
//!
//! # The High-Level Concept
//!
//! Traversing the nested structure in pre-order lets us emit a sequence of
//! enter/exit events that mirror the nesting exactly. Consumers (the
//! annotator, the HTML serializer, the tree printer) keep whatever parent
//! stack they need instead of recursing, so the depth of a document is
//! bounded by memory rather than by the call stack.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Push a root frame holding the top-level children
//!
//! 2. **Entering Nodes:**
//!    - Take the next sibling from the top frame
//!    - Emit `Enter` and push a frame over that node's children
//!
//! 3. **Exiting Nodes:**
//!    - When a frame runs out of siblings, pop it
//!    - Emit `Exit` for the node that owned the frame
//!
//! 4. **Completion:**
//!    - Popping the root frame ends the stream

use crate::ast::events::Event;
use crate::ast::nodes::Node;

struct Frame<'a> {
    owner: Option<&'a Node>,
    siblings: &'a [Node],
    next: usize,
}

/// Lazy pre-order event iterator over a slice of sibling nodes.
pub struct TreeEvents<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> TreeEvents<'a> {
    pub fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: vec![Frame {
                owner: None,
                siblings: roots,
                next: 0,
            }],
        }
    }

    /// Child-index path of the most recently entered node.
    ///
    /// Only meaningful directly after an `Enter` event.
    pub fn path(&self) -> Vec<usize> {
        let open = self.stack.len().saturating_sub(1);
        self.stack[..open]
            .iter()
            .map(|frame| frame.next.saturating_sub(1))
            .collect()
    }

    /// Number of open ancestors of the next event's node.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }
}

impl<'a> Iterator for TreeEvents<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let frame = self.stack.last_mut()?;
        if frame.next < frame.siblings.len() {
            let node = &frame.siblings[frame.next];
            frame.next += 1;
            self.stack.push(Frame {
                owner: Some(node),
                siblings: node.children(),
                next: 0,
            });
            return Some(Event::Enter(node));
        }

        let finished = self.stack.pop()?;
        finished.owner.map(Event::Exit)
    }
}

/// Converts a slice of sibling nodes to a flat vector of events.
pub fn tree_to_events(roots: &[Node]) -> Vec<Event<'_>> {
    TreeEvents::new(roots).collect()
}
