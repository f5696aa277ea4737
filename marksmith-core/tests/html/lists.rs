//! Headings and lists

use crate::common::{attr, elements, max_nesting, parse_html, text_content};
use marksmith_core::render;

#[test]
fn test_all_heading_levels_once() {
    let html = render("# H1\n## H2\n### H3\n#### H4\n##### H5\n###### H6");
    for level in 1..=6 {
        let open = format!("<h{level}>");
        assert_eq!(html.matches(&open).count(), 1, "{open} in {html}");
    }
}

#[test]
fn test_seven_hashes_is_a_paragraph() {
    assert_eq!(render("####### H7"), "<p>####### H7</p>\n");
}

#[test]
fn test_task_list_checked_states() {
    let dom = parse_html(&render("- [x] Done\n- [ ] Todo"));
    let items = elements(&dom, "li");
    assert_eq!(items.len(), 2);
    assert_eq!(text_content(&items[0]).trim(), "Done");
    assert_eq!(text_content(&items[1]).trim(), "Todo");

    let boxes = elements(&dom, "input");
    assert_eq!(boxes.len(), 2);
    assert_eq!(attr(&boxes[0], "type").as_deref(), Some("checkbox"));
    assert!(attr(&boxes[0], "checked").is_some());
    assert!(attr(&boxes[1], "checked").is_none());
    assert!(boxes.iter().all(|b| attr(b, "disabled").is_some()));
}

#[test]
fn test_task_bullet_variants_are_normalized() {
    let dom = parse_html(&render("• [x] round\n\n-[ ] tight"));
    assert_eq!(elements(&dom, "input").len(), 2);
}

#[test]
fn test_uppercase_checkbox() {
    let dom = parse_html(&render("* [X] yes"));
    let boxes = elements(&dom, "input");
    assert!(attr(&boxes[0], "checked").is_some());
}

#[test]
fn test_five_levels_of_nesting() {
    let source = "- a\n  - b\n    - c\n      - d\n        - e\n";
    let dom = parse_html(&render(source));
    assert_eq!(max_nesting(&dom, "ul"), 5);
    assert_eq!(elements(&dom, "li").len(), 5);
}

#[test]
fn test_ordered_list_start() {
    let html = render("3. three\n4. four");
    assert!(html.contains("<ol start=\"3\">"));
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn test_loose_list_wraps_paragraphs() {
    let dom = parse_html(&render("- one\n\n- two"));
    assert_eq!(elements(&dom, "p").len(), 2);
}

#[test]
fn test_list_inside_block_quote() {
    let dom = parse_html(&render("> - a\n> - b"));
    let quote = &elements(&dom, "blockquote")[0];
    assert_eq!(text_content(quote).split_whitespace().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(elements(&dom, "li").len(), 2);
}
