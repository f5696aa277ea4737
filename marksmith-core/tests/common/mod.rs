//! DOM helpers: rendered HTML is parsed with html5ever so tests can assert
//! on structure instead of exact strings.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

pub fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// All elements named `tag`, in document order.
pub fn elements(dom: &RcDom, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![dom.document.clone()];
    while let Some(handle) = stack.pop() {
        if tag_name(&handle).as_deref() == Some(tag) {
            found.push(handle.clone());
        }
        stack.extend(handle.children.borrow().iter().rev().cloned());
    }
    found
}

pub fn attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attribute| &*attribute.name.local == name)
            .map(|attribute| attribute.value.to_string()),
        _ => None,
    }
}

pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { contents } = &node.data {
            text.push_str(&contents.borrow());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    text
}

/// Deepest nesting of `tag` elements inside each other.
pub fn max_nesting(dom: &RcDom, tag: &str) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(dom.document.clone(), 0usize)];
    while let Some((handle, depth)) = stack.pop() {
        let depth = if tag_name(&handle).as_deref() == Some(tag) {
            depth + 1
        } else {
            depth
        };
        deepest = deepest.max(depth);
        for child in handle.children.borrow().iter() {
            stack.push((child.clone(), depth));
        }
    }
    deepest
}
