//! In-memory document model for rendered tables.
//!
//! A [`Document`] owns one or more [`Grid`]s. A grid is a fixed
//! `rows × cols` array of [`Cell`]s that the layout planner addresses by
//! `(row, col)`, formats in place, and merges horizontally. The `docx` and
//! `preview` modules read grids back out; nothing here knows about either
//! output format.

use serde::Deserialize;
use thiserror::Error;

/// Horizontal paragraph alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

/// Cell edge a border is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Top,
    End,
    Bottom,
    InsideH,
    InsideV,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
}

/// Border line description. `size` is in eighths of a point and `space`
/// in points, as the document format stores them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderSpec {
    pub style: BorderStyle,
    pub size: u32,
    pub color: String,
    #[serde(default)]
    pub space: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} table")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cannot merge ({from_row}, {from_col}) with ({to_row}, {to_col}): {reason}")]
    InvalidMerge {
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        reason: &'static str,
    },
}

/// A single table cell with its text and formatting.
///
/// A cell absorbed by a merge reports `is_covered()`; its content is
/// ignored by every renderer. The merge origin carries the `span`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    text: String,
    alignment: Option<Alignment>,
    vertical_alignment: Option<VerticalAlignment>,
    font_size: Option<u32>,
    bold: bool,
    width: Option<f32>,
    borders: Vec<(Edge, BorderSpec)>,
    span: usize,
    covered: bool,
}

impl Cell {
    fn new() -> Self {
        Self {
            text: String::new(),
            alignment: None,
            vertical_alignment: None,
            font_size: None,
            bold: false,
            width: None,
            borders: Vec::new(),
            span: 1,
            covered: false,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) -> &mut Self {
        self.vertical_alignment = Some(alignment);
        self
    }

    /// Font size in points.
    pub fn set_font_size(&mut self, points: u32) -> &mut Self {
        self.font_size = Some(points);
        self
    }

    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.bold = bold;
        self
    }

    /// Preferred cell width in inches.
    pub fn set_width(&mut self, inches: f32) -> &mut Self {
        self.width = Some(inches);
        self
    }

    /// Set the border on one edge, replacing any border already there.
    pub fn set_border(&mut self, edge: Edge, spec: BorderSpec) -> &mut Self {
        match self.borders.iter_mut().find(|(e, _)| *e == edge) {
            Some(existing) => existing.1 = spec,
            None => {
                self.borders.push((edge, spec));
                self.borders.sort_by_key(|(e, _)| *e);
            }
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn vertical_alignment(&self) -> Option<VerticalAlignment> {
        self.vertical_alignment
    }

    pub fn font_size(&self) -> Option<u32> {
        self.font_size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn border(&self, edge: Edge) -> Option<&BorderSpec> {
        self.borders.iter().find(|(e, _)| *e == edge).map(|(_, b)| b)
    }

    pub fn borders(&self) -> &[(Edge, BorderSpec)] {
        &self.borders
    }

    /// Number of grid columns this cell occupies.
    pub fn span(&self) -> usize {
        self.span
    }

    pub fn is_covered(&self) -> bool {
        self.covered
    }

    /// True if nothing has been written to the cell.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.borders.is_empty()
    }
}

/// A rectangular table of addressable, mergeable cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::new(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&mut self.cells[idx])
    }

    /// Merge the cells from `from` through `to` (inclusive) into one cell
    /// anchored at `from`.
    ///
    /// Only merges within a single row, left to right, are supported. A
    /// merge may extend an existing merge anchored at `from`, but may not
    /// swallow part of another one. Text already in absorbed cells is
    /// appended to the anchor, one paragraph per cell.
    pub fn merge(&mut self, from: (usize, usize), to: (usize, usize)) -> Result<(), GridError> {
        let (row, first) = from;
        let (to_row, last) = to;
        let invalid = |reason| GridError::InvalidMerge {
            from_row: row,
            from_col: first,
            to_row,
            to_col: last,
            reason,
        };

        self.index(row, first)?;
        self.index(to_row, last)?;
        if row != to_row {
            return Err(invalid("only cells in the same row can be merged"));
        }
        if last < first {
            return Err(invalid("merge must run left to right"));
        }
        if self.cell(row, first)?.covered {
            return Err(invalid("anchor cell is already part of another merge"));
        }

        let anchor_end = first + self.cell(row, first)?.span;
        for col in anchor_end..=last {
            let cell = self.cell(row, col)?;
            if cell.covered || cell.span > 1 {
                return Err(invalid("target range overlaps another merge"));
            }
        }

        let mut absorbed = Vec::new();
        for col in anchor_end..=last {
            let cell = self.cell_mut(row, col)?;
            cell.covered = true;
            if !cell.text.is_empty() {
                absorbed.push(std::mem::take(&mut cell.text));
            }
        }

        let anchor = self.cell_mut(row, first)?;
        anchor.span = anchor.span.max(last - first + 1);
        for text in absorbed {
            if !anchor.text.is_empty() {
                anchor.text.push('\n');
            }
            anchor.text.push_str(&text);
        }
        Ok(())
    }

    /// Iterate over one row's cells, skipping cells covered by a merge.
    pub fn visible_cells(&self, row: usize) -> impl Iterator<Item = (usize, &Cell)> {
        let start = row.min(self.rows) * self.cols;
        let end = if row < self.rows { start + self.cols } else { start };
        self.cells[start..end]
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.covered)
    }
}

/// A document holding rendered tables, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    tables: Vec<Grid>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty `rows × cols` table and return it for filling.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Grid {
        self.tables.push(Grid::new(rows, cols));
        let last = self.tables.len() - 1;
        &mut self.tables[last]
    }

    pub fn tables(&self) -> &[Grid] {
        &self.tables
    }
}
