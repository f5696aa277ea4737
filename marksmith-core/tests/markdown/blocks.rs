use super::{all_nodes, parse, top_level_types};
use marksmith_core::ast::{MathAnchor, MathKind};
use marksmith_core::formats::to_treeviz;
use marksmith_core::{Node, Renderer};
use std::time::{Duration, Instant};

#[test]
fn test_crlf_input() {
    let doc = parse("# Title\r\n\r\nfirst\r\nsecond\r\n");
    assert_eq!(top_level_types(&doc), vec!["heading", "paragraph"]);
    let texts: Vec<_> = all_nodes(&doc)
        .into_iter()
        .filter_map(|node| match node {
            Node::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Title", "first", "second"]);
}

#[test]
fn test_metadata_after_parse() {
    let source = "```Rust\nfn a() {}\n```\n\n```mermaid\ngraph TD\n```\n\n```rust\nlet b;\n```\n\n$$\nx^2\n$$\n";
    let doc = parse(source);
    let metadata = doc.metadata.as_ref().expect("parse annotates");

    assert_eq!(metadata.code_languages, vec!["rust"]);
    assert_eq!(metadata.diagram_blocks.len(), 1);
    assert_eq!(metadata.diagram_blocks[0].path, vec![1]);
    assert_eq!(metadata.diagram_blocks[0].content, "graph TD\n");

    assert_eq!(metadata.math_expressions.len(), 1);
    let math = &metadata.math_expressions[0];
    assert_eq!(math.kind, MathKind::Block);
    assert_eq!(math.content, "x^2");
    assert!(matches!(math.anchor, MathAnchor::Placeholder { .. }));

    assert_eq!(
        metadata.render_steps,
        vec!["preprocess", "tokenize", "annotate"]
    );
}

#[test]
fn test_split_single_line_math_becomes_block() {
    let doc = parse("$$ E = mc^2 $$");
    assert_eq!(top_level_types(&doc), vec!["math-block"]);
}

#[test]
fn test_round_bullet_task_becomes_task_item() {
    let doc = parse("• [x] shipped");
    let tasks: Vec<_> = all_nodes(&doc)
        .into_iter()
        .filter_map(|node| match node {
            Node::TaskItem { checked, .. } => Some(*checked),
            _ => None,
        })
        .collect();
    assert_eq!(tasks, vec![true]);
}

#[test]
fn test_deep_block_quotes() {
    let source = format!("{}bottom", "> ".repeat(20_000));
    let doc = parse(&source);
    let quotes = all_nodes(&doc)
        .into_iter()
        .filter(|node| matches!(node, Node::BlockQuote { .. }))
        .count();
    assert_eq!(quotes, 20_000);

    let html = Renderer::default().render_document(&doc).unwrap();
    assert!(html.contains("bottom"));
}

#[test]
fn test_deep_nested_lists() {
    let source: String = (0..1_500)
        .map(|level| format!("{}- item\n\n", "  ".repeat(level)))
        .collect();
    let started = Instant::now();
    let doc = parse(&source);
    let lists = all_nodes(&doc)
        .into_iter()
        .filter(|node| matches!(node, Node::List { .. }))
        .count();
    assert_eq!(lists, 1_500);
    assert!(Renderer::default().render_document(&doc).is_ok());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_tree_serializes_to_json() {
    let doc = parse("## Two\n\n- [ ] todo");
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["children"][0]["type"], "heading");
    assert_eq!(json["children"][0]["level"], 2);
    assert_eq!(json["children"][1]["items"][0]["type"], "task-item");
    assert_eq!(json["children"][1]["items"][0]["checked"], false);
    assert_eq!(json["metadata"]["render_steps"][2], "annotate");
}

#[test]
fn test_treeviz_outline() {
    let doc = parse("# Heading\n\n> quoted");
    let outline = to_treeviz(&doc);
    let lines: Vec<_> = outline.lines().collect();
    assert_eq!(lines[0], "⧉ Document (2 nodes)");
    assert!(lines.iter().any(|line| line.contains("Heading")));
    assert!(lines.iter().any(|line| line.starts_with("└─")));
}
