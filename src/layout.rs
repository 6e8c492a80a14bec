//! Grid layout planner.
//!
//! Maps a [`Table`] of blocks onto one flat document grid. The grid has a
//! series-name column on the left and header rows on top; block content
//! regions are laid out after them, side by side or stacked:
//!
//! ```text
//! horizontal (stack_axis = 1)          vertical (stack_axis = 0)
//!
//!        | heading A | heading B |            | a1 | a2 | b3 |
//!        | a1  | a2  | b1 b2 b3  |     r1 (A) | .. | .. |    |
//!     r1 | ..  | ..  | .. .. ..  |     r2 (A) | .. | .. |    |
//!     r2 | ..  | ..  | .. .. ..  |     r1 (B) | .. | .. | .. |
//! ```
//!
//! Cells are visited in block order, then row order, then column order.
//! Cells outside every block's region (narrower or shallower blocks) are
//! left blank.

use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::{Document, Grid, GridError};
use crate::model::{Block, Column, Series, Table};
use crate::style::StyleConfig;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("table layout failed: {0}")]
    Grid(#[from] GridError),
}

/// Dimensions of the rendered grid, headers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

/// Compute the grid dimensions for a table.
///
/// Vertical stacking: one header row plus every block's rows, one label
/// column plus the widest block. Horizontal stacking: two header rows
/// (headings, column names) plus the deepest block, one label column plus
/// every block's columns.
pub fn grid_size(table: &Table) -> GridSize {
    let heights = table.blocks().iter().map(Block::height);
    let widths = table.blocks().iter().map(Block::width);

    if table.is_horizontal() {
        GridSize {
            rows: 2 + heights.max().unwrap_or(0),
            cols: 1 + widths.sum::<usize>(),
        }
    } else {
        GridSize {
            rows: 1 + heights.sum::<usize>(),
            cols: 1 + widths.max().unwrap_or(0),
        }
    }
}

/// Identifies one content cell for a [`ValueSource`].
#[derive(Debug, Clone, Copy)]
pub struct CellKey<'a> {
    pub block_index: usize,
    pub row_index: usize,
    pub column_index: usize,
    pub block: &'a Block,
    pub series: &'a Series,
    pub column: &'a Column,
}

/// Supplies the display text of content cells.
pub trait ValueSource {
    fn value(&self, key: &CellKey<'_>) -> String;
}

impl<F> ValueSource for F
where
    F: Fn(&CellKey<'_>) -> String,
{
    fn value(&self, key: &CellKey<'_>) -> String {
        self(key)
    }
}

/// Fills every content cell with the same marker text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder(pub String);

impl Default for Placeholder {
    fn default() -> Self {
        Placeholder("NA".to_string())
    }
}

impl ValueSource for Placeholder {
    fn value(&self, _key: &CellKey<'_>) -> String {
        self.0.clone()
    }
}

/// Add a table for `table` to `document` and fill it.
///
/// On error the document may hold a partially filled table; callers must
/// not save it.
pub fn render(
    table: &Table,
    style: &StyleConfig,
    values: &dyn ValueSource,
    document: &mut Document,
) -> Result<(), LayoutError> {
    let size = grid_size(table);
    debug!(
        rows = size.rows,
        cols = size.cols,
        blocks = table.blocks().len(),
        horizontal = table.is_horizontal(),
        "allocating table grid"
    );

    let planner = Planner {
        table,
        style,
        values,
    };
    let grid = document.add_table(size.rows, size.cols);

    if table.is_horizontal() {
        planner.render_headings(grid)?;
    }
    planner.render_column_names(grid)?;
    planner.render_series_names(grid)?;
    planner.render_content(grid)?;
    Ok(())
}

struct Planner<'a> {
    table: &'a Table,
    style: &'a StyleConfig,
    values: &'a dyn ValueSource,
}

impl<'a> Planner<'a> {
    /// Rows above the first content row.
    fn header_rows(&self) -> usize {
        if self.table.is_horizontal() { 2 } else { 1 }
    }

    fn separates_blocks(&self) -> bool {
        self.table.block_separation() && !self.table.is_horizontal()
    }

    fn separate(&self, grid: &mut Grid, row: usize, col: usize) -> Result<(), GridError> {
        grid.cell_mut(row, col)?
            .set_border(self.style.separator_edge, self.style.separator.clone());
        Ok(())
    }

    /// Row 0 in horizontal mode: one merged heading cell per block.
    fn render_headings(&self, grid: &mut Grid) -> Result<(), GridError> {
        let mut col = 1;
        for block in self.table.blocks() {
            let last = col + block.width() - 1;
            if last > col {
                grid.merge((0, col), (0, last))?;
            }
            self.style.heading.apply(grid.cell_mut(0, col)?, &block.heading);
            debug!(heading = %block.heading, first = col, last, "placed block heading");
            col = last + 1;
        }
        Ok(())
    }

    /// Column-name header row.
    ///
    /// Side by side, every block's names are written in block order. When
    /// stacked, blocks share one header row as wide as the widest block;
    /// each position takes its name from the first block reaching it.
    fn render_column_names(&self, grid: &mut Grid) -> Result<(), GridError> {
        let row = self.header_rows() - 1;
        let names: Vec<&str> = if self.table.is_horizontal() {
            self.table.column_names().collect()
        } else {
            self.shared_column_names()
        };

        for (i, name) in names.into_iter().enumerate() {
            self.style.column_name.apply(grid.cell_mut(row, i + 1)?, name);
        }
        Ok(())
    }

    /// Header names for stacked blocks, one per position up to the widest
    /// block. Concatenating every block's names would not fit: the grid is
    /// only `1 + max(width)` columns wide.
    fn shared_column_names(&self) -> Vec<&'a str> {
        let blocks = self.table.blocks();
        let width = blocks.iter().map(Block::width).max().unwrap_or(0);
        let names: Vec<&str> = (0..width)
            .filter_map(|i| blocks.iter().find_map(|b| b.columns.get(i)))
            .map(|c| c.name.as_str())
            .collect();

        let disagree = blocks
            .iter()
            .any(|b| b.column_names().zip(&names).any(|(own, shared)| own != *shared));
        if disagree {
            warn!("stacked blocks have different column names; the header shows the first block's name for each position");
        }
        names
    }

    /// Series names down column 0.
    ///
    /// Side by side, blocks share their rows, so only the first block's
    /// names are written.
    fn render_series_names(&self, grid: &mut Grid) -> Result<(), GridError> {
        let start = self.header_rows();
        let blocks = self.table.blocks();

        if self.table.is_horizontal() {
            if let Some((first, rest)) = blocks.split_first() {
                if rest
                    .iter()
                    .any(|b| !b.series_names().eq(first.series_names()))
                {
                    warn!(
                        "side-by-side blocks have different rows; only the rows of '{}' are labelled",
                        first.heading
                    );
                }
            }
        }

        let mut filled = 0;
        for block in blocks {
            for series in &block.rows {
                let cell = grid.cell_mut(start + filled, 0)?;
                self.style.series_name.apply(cell, &series.report_name);
                cell.set_width(self.style.series_name_width);
                filled += 1;
            }
            if self.separates_blocks() {
                self.separate(grid, start + filled - 1, 0)?;
            }
            if self.table.is_horizontal() {
                break;
            }
        }
        Ok(())
    }

    /// Content region of every block, filled from the value source.
    fn render_content(&self, grid: &mut Grid) -> Result<(), GridError> {
        let start = self.header_rows();
        let mut row_offset = 0;
        let mut col_offset = 0;

        for (block_index, block) in self.table.blocks().iter().enumerate() {
            let first_row = start + row_offset;
            let first_col = 1 + col_offset;
            debug!(
                heading = %block.heading,
                rows = ?(first_row..first_row + block.height()),
                cols = ?(first_col..first_col + block.width()),
                "placing block content"
            );

            for (row_index, series) in block.rows.iter().enumerate() {
                for (column_index, column) in block.columns.iter().enumerate() {
                    let key = CellKey {
                        block_index,
                        row_index,
                        column_index,
                        block,
                        series,
                        column,
                    };
                    let text = self.values.value(&key);
                    let cell = grid.cell_mut(first_row + row_index, first_col + column_index)?;
                    self.style.content.apply(cell, &text);
                }
            }

            if self.separates_blocks() {
                self.separate(
                    grid,
                    first_row + block.height() - 1,
                    first_col + block.width() - 1,
                )?;
            }

            if self.table.is_horizontal() {
                col_offset += block.width();
            } else {
                row_offset += block.height();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Alignment, BorderStyle, Edge, VerticalAlignment};
    use crate::model::StackAxis;

    fn block(heading: &str, rows: usize, cols: usize) -> Block {
        Block::new(
            heading,
            (0..cols).map(|c| Column::new(format!("{}-c{}", heading, c))).collect(),
            (0..rows).map(|r| Series::new(format!("{}-r{}", heading, r))).collect(),
        )
    }

    fn two_blocks(axis: StackAxis, separation: bool) -> Table {
        Table::new(vec![block("A", 2, 2), block("B", 3, 4)], separation, axis).unwrap()
    }

    fn render_one(table: &Table) -> Grid {
        let mut doc = Document::new();
        render(table, &StyleConfig::default(), &Placeholder::default(), &mut doc).unwrap();
        doc.tables()[0].clone()
    }

    fn text(grid: &Grid, row: usize, col: usize) -> &str {
        grid.cell(row, col).unwrap().text()
    }

    #[test]
    fn test_vertical_grid_size() {
        let size = grid_size(&two_blocks(StackAxis::Vertical, false));
        assert_eq!(size, GridSize { rows: 6, cols: 5 });
    }

    #[test]
    fn test_horizontal_grid_size() {
        let size = grid_size(&two_blocks(StackAxis::Horizontal, false));
        assert_eq!(size, GridSize { rows: 5, cols: 7 });
    }

    #[test]
    fn test_rendered_grid_matches_size() {
        for axis in [StackAxis::Vertical, StackAxis::Horizontal] {
            let table = two_blocks(axis, true);
            let grid = render_one(&table);
            let size = grid_size(&table);
            assert_eq!((grid.rows(), grid.cols()), (size.rows, size.cols));
        }
    }

    #[test]
    fn test_horizontal_headings_are_merged() {
        let grid = render_one(&two_blocks(StackAxis::Horizontal, false));

        let a = grid.cell(0, 1).unwrap();
        assert_eq!(a.text(), "A");
        assert_eq!(a.span(), 2);
        assert_eq!(a.alignment(), Some(Alignment::Center));
        assert_eq!(a.font_size(), Some(12));
        assert!(grid.cell(0, 2).unwrap().is_covered());

        let b = grid.cell(0, 3).unwrap();
        assert_eq!(b.text(), "B");
        assert_eq!(b.span(), 4);
        for col in 4..=6 {
            assert!(grid.cell(0, col).unwrap().is_covered());
        }
        assert!(grid.cell(0, 0).unwrap().is_blank());
    }

    #[test]
    fn test_single_column_heading_is_not_merged() {
        let table = Table::new(
            vec![block("A", 1, 1), block("B", 1, 2)],
            false,
            StackAxis::Horizontal,
        )
        .unwrap();
        let grid = render_one(&table);
        assert_eq!(grid.cell(0, 1).unwrap().span(), 1);
        assert_eq!(text(&grid, 0, 2), "B");
        assert_eq!(grid.cell(0, 2).unwrap().span(), 2);
    }

    #[test]
    fn test_horizontal_column_names_concatenate() {
        let grid = render_one(&two_blocks(StackAxis::Horizontal, false));
        let names: Vec<_> = (1..7).map(|c| text(&grid, 1, c)).collect();
        assert_eq!(names, vec!["A-c0", "A-c1", "B-c0", "B-c1", "B-c2", "B-c3"]);

        let cell = grid.cell(1, 1).unwrap();
        assert_eq!(cell.font_size(), Some(10));
        assert_eq!(cell.vertical_alignment(), Some(VerticalAlignment::Center));
    }

    #[test]
    fn test_vertical_header_is_shared() {
        let table = two_blocks(StackAxis::Vertical, false);
        // six names in total, but only four header positions
        assert_eq!(table.column_names().count(), 6);

        let grid = render_one(&table);
        assert_eq!(grid.cols(), 5);
        let names: Vec<_> = (1..5).map(|c| text(&grid, 0, c)).collect();
        assert_eq!(names, vec!["A-c0", "A-c1", "B-c2", "B-c3"]);
        assert!(grid.cell(0, 0).unwrap().is_blank());
    }

    #[test]
    fn test_vertical_series_names_in_block_order() {
        let grid = render_one(&two_blocks(StackAxis::Vertical, false));
        let labels: Vec<_> = (1..6).map(|r| text(&grid, r, 0)).collect();
        assert_eq!(labels, vec!["A-r0", "A-r1", "B-r0", "B-r1", "B-r2"]);

        let cell = grid.cell(1, 0).unwrap();
        assert!(cell.is_bold());
        assert_eq!(cell.font_size(), Some(9));
        assert_eq!(cell.width(), Some(1.0));
    }

    #[test]
    fn test_horizontal_series_names_from_first_block_only() {
        let grid = render_one(&two_blocks(StackAxis::Horizontal, false));
        assert_eq!(text(&grid, 2, 0), "A-r0");
        assert_eq!(text(&grid, 3, 0), "A-r1");
        assert!(grid.cell(4, 0).unwrap().is_blank());
        for row in 0..grid.rows() {
            assert!(!text(&grid, row, 0).starts_with("B-"));
        }
    }

    #[test]
    fn test_vertical_content_placement() {
        let grid = render_one(&two_blocks(StackAxis::Vertical, false));

        for row in 1..3 {
            for col in 1..3 {
                assert_eq!(text(&grid, row, col), "NA");
            }
            // block A is two columns wide
            assert!(grid.cell(row, 3).unwrap().is_blank());
            assert!(grid.cell(row, 4).unwrap().is_blank());
        }
        for row in 3..6 {
            for col in 1..5 {
                assert_eq!(text(&grid, row, col), "NA");
            }
        }

        let cell = grid.cell(1, 1).unwrap();
        assert_eq!(cell.alignment(), Some(Alignment::Right));
        assert_eq!(cell.vertical_alignment(), Some(VerticalAlignment::Center));
        assert_eq!(cell.font_size(), Some(9));
    }

    #[test]
    fn test_horizontal_content_placement() {
        let grid = render_one(&two_blocks(StackAxis::Horizontal, false));

        for row in 2..4 {
            for col in 1..7 {
                assert_eq!(text(&grid, row, col), "NA");
            }
        }
        // block A has two rows, block B three
        assert!(grid.cell(4, 1).unwrap().is_blank());
        assert!(grid.cell(4, 2).unwrap().is_blank());
        for col in 3..7 {
            assert_eq!(text(&grid, 4, col), "NA");
        }
    }

    #[test]
    fn test_vertical_separation_after_every_block() {
        let grid = render_one(&two_blocks(StackAxis::Vertical, true));

        let bordered: Vec<_> = (0..grid.rows())
            .filter(|&r| grid.cell(r, 0).unwrap().border(Edge::Bottom).is_some())
            .collect();
        assert_eq!(bordered, vec![2, 5]);

        let border = grid.cell(5, 0).unwrap().border(Edge::Bottom).unwrap();
        assert_eq!(border.style, BorderStyle::Double);
        assert_eq!(border.size, 1);
        assert_eq!(border.space, 2);

        // last content cell of each block
        assert!(grid.cell(2, 2).unwrap().border(Edge::Bottom).is_some());
        assert!(grid.cell(5, 4).unwrap().border(Edge::Bottom).is_some());
        assert!(grid.cell(2, 1).unwrap().border(Edge::Bottom).is_none());
    }

    #[test]
    fn test_horizontal_ignores_separation() {
        let grid = render_one(&two_blocks(StackAxis::Horizontal, true));
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                assert!(grid.cell(row, col).unwrap().borders().is_empty());
            }
        }
    }

    #[test]
    fn test_no_separation_when_disabled() {
        let grid = render_one(&two_blocks(StackAxis::Vertical, false));
        assert!(grid.cell(2, 0).unwrap().borders().is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let table = two_blocks(StackAxis::Horizontal, true);
        assert_eq!(render_one(&table), render_one(&table));

        let table = two_blocks(StackAxis::Vertical, true);
        assert_eq!(render_one(&table), render_one(&table));
    }

    #[test]
    fn test_value_source_is_keyed_by_block_row_column() {
        fn keyed(key: &CellKey<'_>) -> String {
            format!(
                "{}:{}:{}/{}",
                key.block_index, key.row_index, key.column_index, key.column.name
            )
        }

        let table = two_blocks(StackAxis::Vertical, false);
        let mut doc = Document::new();
        render(&table, &StyleConfig::default(), &keyed, &mut doc).unwrap();
        let grid = &doc.tables()[0];

        assert_eq!(text(grid, 1, 1), "0:0:0/A-c0");
        assert_eq!(text(grid, 2, 2), "0:1:1/A-c1");
        assert_eq!(text(grid, 5, 4), "1:2:3/B-c3");
    }

    #[test]
    fn test_custom_placeholder_and_style() {
        let table = two_blocks(StackAxis::Horizontal, false);
        let mut style = StyleConfig::default();
        style.content.font_size = 7;
        style.content.alignment = Some(Alignment::Center);

        let mut doc = Document::new();
        render(&table, &style, &Placeholder("-".to_string()), &mut doc).unwrap();
        let cell = doc.tables()[0].cell(2, 1).unwrap();
        assert_eq!(cell.text(), "-");
        assert_eq!(cell.font_size(), Some(7));
        assert_eq!(cell.alignment(), Some(Alignment::Center));
    }

    #[test]
    fn test_single_block_vertical() {
        let table = Table::new(vec![block("Only", 1, 1)], true, StackAxis::Vertical).unwrap();
        let grid = render_one(&table);
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        assert_eq!(text(&grid, 0, 1), "Only-c0");
        assert_eq!(text(&grid, 1, 0), "Only-r0");
        assert_eq!(text(&grid, 1, 1), "NA");
    }
}
