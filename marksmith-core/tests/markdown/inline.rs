use super::{all_nodes, parse};
use marksmith_core::ast::{EmphasisKind, MathKind};
use marksmith_core::{Node, Renderer};
use std::collections::HashSet;
use std::time::{Duration, Instant};

#[test]
fn test_math_ids_unique_across_blocks() {
    let doc = parse("# $a$\n\n| $b$ |\n|-----|\n| $c$ |\n\n- $d$\n\n$$\ne\n$$\n");
    let ids: Vec<usize> = all_nodes(&doc)
        .into_iter()
        .filter_map(|node| match node {
            Node::MathInline { id, .. } | Node::MathBlock { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 5);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 5);

    let metadata = doc.metadata.as_ref().unwrap();
    let kinds: Vec<_> = metadata.math_expressions.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MathKind::Inline,
            MathKind::Inline,
            MathKind::Inline,
            MathKind::Inline,
            MathKind::Block
        ]
    );
}

#[test]
fn test_escaped_and_currency_dollars_are_not_math() {
    let doc = parse(r"costs \$5 or $6 and $7");
    assert!(doc.metadata.as_ref().unwrap().math_expressions.is_empty());
}

#[test]
fn test_strikethrough_and_subscript_side_by_side() {
    let doc = parse("~~old~~ CO~2~");
    let nodes = all_nodes(&doc);
    assert!(nodes.iter().any(|node| matches!(
        node,
        Node::EmphasisRun {
            kind: EmphasisKind::Strikethrough,
            ..
        }
    )));
    assert!(nodes
        .iter()
        .any(|node| matches!(node, Node::Subscript { raw, .. } if raw == "~2~")));
}

#[test]
fn test_extension_nodes_keep_raw_source() {
    let doc = parse("==mark== x^2^ :tada: [^n]\n\n[^n]: note");
    let raws: Vec<&str> = all_nodes(&doc)
        .into_iter()
        .filter_map(Node::raw)
        .collect();
    assert_eq!(raws, vec!["==mark==", "^2^", ":tada:", "[^n]"]);
}

#[test]
fn test_video_is_not_a_plain_link() {
    let doc = parse("@[youtube-thumbnail](https://youtu.be/abc123)");
    let nodes = all_nodes(&doc);
    assert!(nodes
        .iter()
        .any(|node| matches!(node, Node::VideoThumbnail { video_id, .. } if video_id == "abc123")));
    assert!(!nodes.iter().any(|node| matches!(node, Node::Link { .. })));
}

#[test]
fn test_inline_content_inside_containers() {
    let doc = parse("> - **bold** in a quoted list");
    let nodes = all_nodes(&doc);
    let types: Vec<_> = nodes.iter().map(|node| node.node_type()).collect();
    assert_eq!(
        &types[..5],
        &["block-quote", "list", "list-item", "paragraph", "emphasis-run"]
    );
}

/// Inputs that used to rescan the rest of the line for every delimiter.
#[test]
fn test_long_delimiter_runs_render_quickly() {
    let renderer = Renderer::default();
    for source in [
        "[".repeat(50_000),
        "a* ".repeat(50_000),
        "_a ".repeat(25_000) + &"a*".repeat(25_000),
    ] {
        let started = Instant::now();
        let html = renderer.render(&source);
        assert!(html.starts_with("<p>"));
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "{} bytes took {:?}",
            source.len(),
            started.elapsed()
        );
    }
}
