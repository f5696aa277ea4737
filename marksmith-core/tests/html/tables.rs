//! Table alignment

use crate::common::{attr, elements, parse_html, tag_name, text_content};
use marksmith_core::render;

#[test]
fn test_alignment_applies_to_every_row() {
    let source = "| L | C | R |\n|:---|:---:|---:|\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |";
    let dom = parse_html(&render(source));
    let rows = elements(&dom, "tr");
    assert_eq!(rows.len(), 3);

    for row in &rows {
        let cells: Vec<_> = row
            .children
            .borrow()
            .iter()
            .filter(|child| tag_name(child).is_some())
            .cloned()
            .collect();
        let styles: Vec<_> = cells.iter().map(|cell| attr(cell, "style")).collect();
        assert_eq!(
            styles,
            vec![
                Some("text-align: left".to_string()),
                Some("text-align: center".to_string()),
                Some("text-align: right".to_string()),
            ]
        );
    }
}

#[test]
fn test_header_and_body_sections() {
    let dom = parse_html(&render("| a | b |\n|---|---|\n| 1 | 2 |"));
    assert_eq!(elements(&dom, "thead").len(), 1);
    assert_eq!(elements(&dom, "tbody").len(), 1);
    let headers: Vec<_> = elements(&dom, "th").iter().map(text_content).collect();
    assert_eq!(headers, vec!["a", "b"]);
    assert!(elements(&dom, "td").iter().all(|td| attr(td, "style").is_none()));
}

#[test]
fn test_short_rows_are_padded() {
    let dom = parse_html(&render("| a | b | c |\n|---|---|---|\n| 1 |"));
    assert_eq!(elements(&dom, "td").len(), 3);
}

#[test]
fn test_inline_content_in_cells() {
    let html = render("| x |\n|---|\n| **bold** `c\\|d` |");
    assert!(html.contains("<td><strong>bold</strong> <code>c|d</code></td>"));
}

#[test]
fn test_header_only_table() {
    let dom = parse_html(&render("| a |\n|---|"));
    assert_eq!(elements(&dom, "th").len(), 1);
    assert!(elements(&dom, "tbody").is_empty());
}
