//! GFM pipe tables.

use super::inline::parse_inline;
use super::LexContext;
use crate::ast::nodes::{Alignment, LineSpan, Node};

/// Alignments of a separator row such as `| :--- | :---: | ---: |`.
///
/// The row must contain a pipe and every cell must be dashes with optional
/// leading/trailing colons.
pub fn parse_delimiter_row(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') {
        return None;
    }
    split_cells(line)
        .iter()
        .map(|cell| {
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
                return None;
            }
            Some(match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect::<Option<Vec<_>>>()
        .filter(|alignments| !alignments.is_empty())
}

/// Split a row into trimmed cell texts. Outer pipes are optional and `\|`
/// is a literal pipe.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut row = line.trim();
    row = row.strip_prefix('|').unwrap_or(row);
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Build the table node. Body rows are padded or truncated to the header's
/// column count.
pub fn build(
    header: Vec<String>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    lines: LineSpan,
    ctx: &mut LexContext,
) -> Node {
    let columns = alignments.len();
    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    table_rows.push(row(header, &alignments, true, ctx));
    for mut cells in rows {
        cells.resize(columns, String::new());
        table_rows.push(row(cells, &alignments, false, ctx));
    }
    Node::Table {
        alignments,
        rows: table_rows,
        lines,
    }
}

fn row(cells: Vec<String>, alignments: &[Alignment], header: bool, ctx: &mut LexContext) -> Node {
    let cells = cells
        .into_iter()
        .zip(alignments)
        .map(|(text, align)| Node::TableCell {
            header,
            align: *align,
            children: parse_inline(&text, ctx),
        })
        .collect();
    Node::TableRow { header, cells }
}
