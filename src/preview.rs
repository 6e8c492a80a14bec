//! Terminal preview of a rendered grid.
//!
//! Draws the grid with box-drawing characters. Merged cells span their
//! columns, cell alignment is honoured, bold cells are printed bold, and a
//! row whose cells carry a bottom border is followed by a double rule:
//!
//! ```text
//! ┌─────────┬──────┬──────┐
//! │         │ 2023 │ 2024 │
//! ├─────────┼──────┼──────┤
//! │ Revenue │   NA │   NA │
//! ╞═════════╪══════╪══════╡
//! │ EBITDA  │   NA │   NA │
//! └─────────┴──────┴──────┘
//! ```

use owo_colors::OwoColorize;

use crate::grid::{Alignment, Cell, Edge, Grid};

/// Render a grid to a string for printing to a terminal.
pub fn render_grid(grid: &Grid) -> String {
    if grid.rows() == 0 || grid.cols() == 0 {
        return String::new();
    }

    let widths = column_widths(grid);
    let mut out = String::new();

    out.push_str(&rule(&widths, ['┌', '┬', '┐'], '─'));
    for row in 0..grid.rows() {
        render_row(grid, row, &widths, &mut out);
        if row + 1 < grid.rows() {
            if has_separator(grid, row) {
                out.push_str(&rule(&widths, ['╞', '╪', '╡'], '═'));
            } else {
                out.push_str(&rule(&widths, ['├', '┼', '┤'], '─'));
            }
        }
    }
    out.push_str(&rule(&widths, ['└', '┴', '┘'], '─'));
    out
}

fn text_width(text: &str) -> usize {
    text.lines().map(|l| l.chars().count()).max().unwrap_or(0)
}

/// Width of a run of `span` columns starting at `col`, counting the
/// padding and divider that a merge swallows.
fn span_width(widths: &[usize], col: usize, span: usize) -> usize {
    widths[col..col + span].iter().sum::<usize>() + 3 * (span - 1)
}

fn column_widths(grid: &Grid) -> Vec<usize> {
    let mut widths = vec![1; grid.cols()];

    for row in 0..grid.rows() {
        for (col, cell) in grid.visible_cells(row) {
            if cell.span() == 1 {
                widths[col] = widths[col].max(text_width(cell.text()));
            }
        }
    }

    // widen the last column of a merge until its text fits
    for row in 0..grid.rows() {
        for (col, cell) in grid.visible_cells(row) {
            let span = cell.span();
            if span > 1 {
                let available = span_width(&widths, col, span);
                let needed = text_width(cell.text());
                if needed > available {
                    widths[col + span - 1] += needed - available;
                }
            }
        }
    }
    widths
}

fn rule(widths: &[usize], [left, mid, right]: [char; 3], fill: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.extend(std::iter::repeat_n(fill, width + 2));
    }
    line.push(right);
    format!("{}\n", line.dimmed())
}

fn has_separator(grid: &Grid, row: usize) -> bool {
    grid.visible_cells(row)
        .any(|(_, cell)| cell.border(Edge::Bottom).is_some())
}

fn render_row(grid: &Grid, row: usize, widths: &[usize], out: &mut String) {
    let height = grid
        .visible_cells(row)
        .map(|(_, cell)| cell.text().lines().count())
        .max()
        .unwrap_or(0)
        .max(1);

    for line in 0..height {
        out.push_str(&"│".dimmed().to_string());
        for (col, cell) in grid.visible_cells(row) {
            let width = span_width(widths, col, cell.span());
            let text = cell.text().lines().nth(line).unwrap_or("");
            out.push(' ');
            out.push_str(&styled(cell, &pad(text, width, cell.alignment())));
            out.push(' ');
            out.push_str(&"│".dimmed().to_string());
        }
        out.push('\n');
    }
}

fn pad(text: &str, width: usize, alignment: Option<Alignment>) -> String {
    let gap = width.saturating_sub(text.chars().count());
    match alignment {
        Some(Alignment::Right) => format!("{}{}", " ".repeat(gap), text),
        Some(Alignment::Center) => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
        _ => format!("{}{}", text, " ".repeat(gap)),
    }
}

fn styled(cell: &Cell, padded: &str) -> String {
    if cell.is_bold() {
        padded.bold().to_string()
    } else {
        padded.to_string()
    }
}
