//! Tabular summary renderer.
//!
//! Builds a box-drawn table from a list of uniform mapping nodes (e.g.
//! grouped timing statistics). Columns are the union of keys in first-seen
//! order; rows missing a key show a dash. Anything that is not a mapping
//! degrades to its plain rendering on its own line.

use console::measure_text_width;
use log::warn;
use vardump_core::{AbstractNode, Children, TypeTag};

use crate::context::RenderContext;
use crate::literal::{EXCLUDED_MARKER, RECURSION_MARKER, literal};
use crate::plain;

/// Render the children of a sequence node as a table. Non-sequence input
/// degrades to the plain renderer.
#[must_use]
pub fn render_node(node: &AbstractNode) -> String {
    match &node.children {
        Children::Entries(entries) => {
            let rows: Vec<&AbstractNode> = entries.iter().map(|(_, n)| n).collect();
            render_rows(&rows)
        }
        _ => {
            warn!("table renderer: input is not a sequence, degrading to plain");
            plain::render(node, &RenderContext::default())
        }
    }
}

/// Render a list of mapping nodes as a table.
#[must_use]
pub fn render_rows(rows: &[&AbstractNode]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    // Column union, first-seen order.
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row_keys(row) {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }
    if columns.is_empty() {
        // No mapping rows at all: one plain line per row.
        let ctx = RenderContext::default();
        return rows
            .iter()
            .map(|row| plain::render(row, &ctx))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        grid.push(
            columns
                .iter()
                .map(|column| cell_value(row, column).map_or_else(|| "-".to_owned(), |n| cell_text(n)))
                .collect(),
        );
    }

    // Display width, not char count: wide (CJK, emoji) cells must not
    // break the borders.
    let mut widths: Vec<usize> = columns.iter().map(|c| measure_text_width(c)).collect();
    for cells in &grid {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(measure_text_width(cell));
        }
    }

    let mut out = String::new();
    rule(&mut out, &widths, '╭', '┬', '╮');
    line(&mut out, &columns, &widths);
    rule(&mut out, &widths, '├', '┼', '┤');
    for cells in &grid {
        line(&mut out, cells, &widths);
    }
    rule(&mut out, &widths, '╰', '┴', '╯');
    out
}

fn row_keys(row: &AbstractNode) -> Vec<String> {
    match &row.children {
        Children::Entries(entries) => entries.iter().map(|(k, _)| k.to_string()).collect(),
        Children::Properties(props) => props.iter().map(|p| p.name.clone()).collect(),
        Children::None => Vec::new(),
    }
}

fn cell_value<'a>(row: &'a AbstractNode, column: &str) -> Option<&'a AbstractNode> {
    match &row.children {
        Children::Entries(entries) => entries
            .iter()
            .find(|(k, _)| k.to_string() == column)
            .map(|(_, n)| n),
        Children::Properties(props) => props
            .iter()
            .find(|p| p.name == column)
            .map(|p| &p.node),
        Children::None => None,
    }
}

/// One-line cell content: unquoted scalar literal, fixed markers, or a
/// composite summary.
fn cell_text(node: &AbstractNode) -> String {
    if node.is_recursion {
        return RECURSION_MARKER.to_owned();
    }
    if node.is_excluded {
        return EXCLUDED_MARKER.to_owned();
    }
    let ctx = RenderContext::default().with_quoting(false).with_truncate_at(Some(40));
    if let Some(text) = literal(node, &ctx) {
        return text;
    }
    match node.tag {
        TypeTag::Arr => format!("array({})", node.children.len()),
        TypeTag::Obj => node.label.clone().unwrap_or_else(|| "object".to_owned()),
        TypeTag::Resource => format!("resource({})", node.label.as_deref().unwrap_or("unknown")),
        TypeTag::Callable => node
            .callable
            .as_ref()
            .map_or_else(|| "callable".to_owned(), |c| match &c.owner {
                Some(owner) => format!("{owner}::{}", c.name),
                None => c.name.clone(),
            }),
        _ => "-".to_owned(),
    }
}

fn rule(out: &mut String, widths: &[usize], left: char, mid: char, right: char) {
    out.push(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push(mid);
        }
        out.push_str(&"─".repeat(width + 2));
    }
    out.push(right);
    out.push('\n');
}

fn line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('│');
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(measure_text_width(cell));
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(padding + 1));
        out.push('│');
    }
    out.push('\n');
}
