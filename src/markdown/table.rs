//! HTML tables to GitHub Flavored Markdown.
//!
//! The first row (the `<thead>` row when present) becomes the header.
//! Cell content is rendered inline, so emphasis, code and links survive;
//! pipes inside cells are escaped.

use crate::dom::{self, NodeRef};
use crate::error::Result;

use super::InlineFormatter;

/// Render a `<table>` element as a GFM table.
///
/// Returns an empty string when the table has no cells. Rows of nested
/// tables are not part of the outer table.
///
/// # Example Output
///
/// ```text
/// | Header A | Header B |
/// | -------- | -------- |
/// | Cell 1   | Cell 2   |
/// ```
pub fn render_table(formatter: &InlineFormatter, table: &NodeRef, depth: usize) -> Result<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut alignments: Vec<Alignment> = Vec::new();

    for tr in dom::query_within(table, "tr")? {
        if !belongs_to(&tr, table) {
            continue;
        }

        let mut row = Vec::new();
        for (i, cell) in dom::element_children(&tr).iter().enumerate() {
            if !dom::is_one_of_tags(cell, &["td", "th"]) {
                continue;
            }
            let text = formatter.render_line(cell, depth + 2, false)?;
            row.push(text.trim().replace('|', "\\|"));

            let align = cell.attr("align").map_or(Alignment::None, |a| Alignment::parse(&a));
            if i >= alignments.len() {
                alignments.push(align);
            } else if alignments[i] == Alignment::None {
                alignments[i] = align;
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Ok(String::new());
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut col_widths: Vec<usize> = vec![3; col_count];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }
    alignments.resize(col_count, Alignment::None);

    let mut output = String::new();
    for (row_idx, row) in rows.iter().enumerate() {
        output.push('|');
        for (col_idx, width) in col_widths.iter().enumerate() {
            let cell = row.get(col_idx).map_or("", String::as_str);
            output.push(' ');
            output.push_str(&pad_cell(cell, *width, alignments[col_idx]));
            output.push_str(" |");
        }
        output.push('\n');

        if row_idx == 0 {
            output.push('|');
            for (col_idx, width) in col_widths.iter().enumerate() {
                output.push_str(&format_separator(*width, alignments[col_idx]));
                output.push('|');
            }
            output.push('\n');
        }
    }

    Ok(output)
}

/// True when the nearest table ancestor of `tr` is `table`.
fn belongs_to(tr: &NodeRef, table: &NodeRef) -> bool {
    tr.ancestors(None)
        .iter()
        .find(|a| dom::is_one_of_tags(a, &["table"]))
        .is_some_and(|a| a.id == table.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }
}

fn format_separator(width: usize, align: Alignment) -> String {
    let dashes = width.max(3);
    match align {
        Alignment::Left => format!(" :{} ", "-".repeat(dashes - 1)),
        Alignment::Center => format!(" :{}: ", "-".repeat(dashes - 2)),
        Alignment::Right => format!(" {}: ", "-".repeat(dashes - 1)),
        Alignment::None => format!(" {} ", "-".repeat(dashes)),
    }
}

fn pad_cell(text: &str, width: usize, align: Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let padding = width - len;
    match align {
        Alignment::Right => format!("{}{text}", " ".repeat(padding)),
        Alignment::Center => {
            let left = padding / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(padding - left))
        }
        Alignment::None | Alignment::Left => format!("{text}{}", " ".repeat(padding)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    fn table(html: &str) -> String {
        let doc = dom::parse(html);
        let node = dom::query_all(&doc, "table").unwrap()[0];
        let options = Options::default();
        render_table(&InlineFormatter::new(&options), &node, 0).unwrap()
    }

    #[test]
    fn test_header_and_body_rows() {
        let html = "<table><thead><tr><th>Name</th><th>Age</th></tr></thead>\
                    <tbody><tr><td>Ann</td><td>31</td></tr></tbody></table>";
        assert_eq!(table(html), "| Name | Age |\n| ---- | --- |\n| Ann  | 31  |\n");
    }

    #[test]
    fn test_cells_keep_inline_formatting_and_escape_pipes() {
        let html = "<table><tr><td><b>a|b</b></td></tr></table>";
        assert_eq!(table(html), "| **a\\|b** |\n| -------- |\n");
    }

    #[test]
    fn test_alignment_from_attribute() {
        let html = r#"<table><tr><th align="right">N</th></tr><tr><td>7</td></tr></table>"#;
        assert_eq!(table(html), "|   N |\n| --: |\n|   7 |\n");
    }

    #[test]
    fn test_nested_table_rows_stay_out() {
        let html = "<table><tr><td>outer</td></tr><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>";
        let out = table(html);
        assert!(out.starts_with("| outer |"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(table("<table></table>"), "");
    }
}
