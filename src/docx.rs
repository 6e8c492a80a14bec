//! Word-processing (`.docx`) output for rendered documents.
//!
//! Merged cells become `gridSpan` cells, font sizes are written in
//! half-points and widths in twips. Tables carry no borders of their own;
//! only the borders set on grid cells are written. Border `space` has no
//! counterpart in the writer and is dropped.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use docx_rs::{
    AlignmentType, BorderType, Docx, Paragraph, Run, Table, TableBorders, TableCell,
    TableCellBorder, TableCellBorderPosition, TableCellBorders, TableRow, VAlignType, WidthType,
};
use thiserror::Error;
use tracing::info;

use crate::grid::{
    Alignment, BorderSpec, BorderStyle, Cell, Document, Edge, Grid, VerticalAlignment,
};

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("failed to build document: {0}")]
    Pack(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl Document {
    /// Serialize the document into `.docx` bytes.
    pub fn to_docx_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut docx = Docx::new();
        for (i, grid) in self.tables().iter().enumerate() {
            if i > 0 {
                // adjacent tables would otherwise be joined into one
                docx = docx.add_paragraph(Paragraph::new());
            }
            docx = docx.add_table(build_table(grid));
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| DocxError::Pack(e.to_string()))?;
        Ok(buf.into_inner())
    }

    /// Write the document to `path` in one step, after it has been fully
    /// serialized.
    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        let bytes = self.to_docx_bytes()?;
        std::fs::write(path, &bytes).map_err(|source| DocxError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}

/// Width of grid columns whose cells carry no width, in twips (0.75 in).
const DEFAULT_COLUMN_WIDTH: usize = 1080;

fn build_table(grid: &Grid) -> Table {
    let rows = (0..grid.rows())
        .map(|row| TableRow::new(row_cells(grid, row)))
        .collect();
    Table::new(rows)
        .set_grid(column_widths(grid))
        .set_borders(TableBorders::with_empty())
}

/// Widest unmerged cell width set in each column.
fn column_widths(grid: &Grid) -> Vec<usize> {
    let mut widths: Vec<Option<usize>> = vec![None; grid.cols()];
    for row in 0..grid.rows() {
        for (col, cell) in grid.visible_cells(row) {
            if let (1, Some(width)) = (cell.span(), cell.width()) {
                let width = twips(width);
                widths[col] = Some(widths[col].map_or(width, |w| w.max(width)));
            }
        }
    }
    widths
        .into_iter()
        .map(|w| w.unwrap_or(DEFAULT_COLUMN_WIDTH))
        .collect()
}

fn row_cells(grid: &Grid, row: usize) -> Vec<TableCell> {
    grid.visible_cells(row).map(|(_, cell)| build_cell(cell)).collect()
}

fn build_cell(cell: &Cell) -> TableCell {
    let mut out = TableCell::new();

    // a cell needs at least one paragraph to be valid
    let lines: Vec<&str> = if cell.text().is_empty() {
        vec![""]
    } else {
        cell.text().split('\n').collect()
    };
    for line in lines {
        out = out.add_paragraph(build_paragraph(cell, line));
    }

    if cell.span() > 1 {
        out = out.grid_span(cell.span());
    }
    if let Some(valign) = cell.vertical_alignment() {
        out = out.vertical_align(vertical_alignment(valign));
    }
    if let Some(width) = cell.width() {
        out = out.width(twips(width), WidthType::Dxa);
    }
    let borders = cell
        .borders()
        .iter()
        .fold(TableCellBorders::with_empty(), |acc, (edge, spec)| {
            acc.set(border(*edge, spec))
        });
    out.set_borders(borders)
}

fn build_paragraph(cell: &Cell, text: &str) -> Paragraph {
    let mut paragraph = Paragraph::new();
    if !text.is_empty() {
        let mut run = Run::new().add_text(text);
        if let Some(size) = cell.font_size() {
            run = run.size(half_points(size));
        }
        if cell.is_bold() {
            run = run.bold();
        }
        paragraph = paragraph.add_run(run);
    }
    if let Some(alignment) = cell.alignment() {
        paragraph = paragraph.align(paragraph_alignment(alignment));
    }
    paragraph
}

fn border(edge: Edge, spec: &BorderSpec) -> TableCellBorder {
    let position = match edge {
        Edge::Start => TableCellBorderPosition::Left,
        Edge::Top => TableCellBorderPosition::Top,
        Edge::End => TableCellBorderPosition::Right,
        Edge::Bottom => TableCellBorderPosition::Bottom,
        Edge::InsideH => TableCellBorderPosition::InsideH,
        Edge::InsideV => TableCellBorderPosition::InsideV,
    };
    let border_type = match spec.style {
        BorderStyle::Single => BorderType::Single,
        BorderStyle::Double => BorderType::Double,
        BorderStyle::Dotted => BorderType::Dotted,
        BorderStyle::Dashed => BorderType::Dashed,
        BorderStyle::Thick => BorderType::Thick,
    };
    TableCellBorder::new(position)
        .border_type(border_type)
        .size(spec.size as usize)
        .color(spec.color.trim_start_matches('#'))
}

fn paragraph_alignment(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

fn vertical_alignment(alignment: VerticalAlignment) -> VAlignType {
    match alignment {
        VerticalAlignment::Top => VAlignType::Top,
        VerticalAlignment::Center => VAlignType::Center,
        VerticalAlignment::Bottom => VAlignType::Bottom,
    }
}

fn half_points(points: u32) -> usize {
    points as usize * 2
}

fn twips(inches: f32) -> usize {
    (inches * 1440.0).round().max(0.0) as usize
}
