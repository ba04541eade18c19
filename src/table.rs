//! Plain-text table rendering for `report --table` and `preview`.

use std::fmt::Write as _;

use crate::dataset::Dataset;

/// Renders headers and rows as aligned columns separated by two spaces.
/// Numeric cells are right-aligned, everything else left-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(clean_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths, false));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&rule, &widths, false));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths, true));
    }
    output
}

pub fn render_dataset(dataset: &Dataset) -> String {
    render_table(&dataset.headers(), &dataset.display_rows())
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_line(cells: &[String], widths: &[usize], align_numbers: bool) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let cell = clean_cell(cell);
            if align_numbers && is_numeric(&cell) {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn clean_cell(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}
