pub mod config;
pub mod docx;
pub mod error_fmt;
pub mod grid;
pub mod layout;
pub mod model;
pub mod preview;
pub mod style;

// Re-export commonly used types for convenience
pub use config::{ConfigError, TableConfig};
pub use docx::DocxError;
pub use grid::{Cell, Document, Grid, GridError};
pub use layout::{CellKey, GridSize, LayoutError, Placeholder, ValueSource, grid_size, render};
pub use model::{Block, Column, Series, StackAxis, Table};
pub use style::StyleConfig;

/// Render a table into a fresh document holding exactly one table.
pub fn render_document(
    table: &Table,
    style: &StyleConfig,
    values: &dyn ValueSource,
) -> Result<Document, LayoutError> {
    let mut document = Document::new();
    render(table, style, values, &mut document)?;
    Ok(document)
}
