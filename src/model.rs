//! Block-structured table description.
//!
//! A [`Table`] is an ordered list of [`Block`]s stacked along a
//! [`StackAxis`]. Every block is a heading plus a `rows × columns`
//! rectangle. Values are built once from configuration and only read
//! afterwards.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::ConfigError;

/// A named column of a block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named data row. Layout only reads `report_name`; any other fields
/// from the row descriptor are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Series {
    pub report_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Series {
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            report_name: report_name.into(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub heading: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Series>,
}

impl Block {
    pub fn new(heading: impl Into<String>, columns: Vec<Column>, rows: Vec<Series>) -> Self {
        Self {
            heading: heading.into(),
            columns,
            rows,
        }
    }

    /// Number of columns in the block's content region.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows in the block's content region.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|s| s.report_name.as_str())
    }
}

/// Direction in which blocks are concatenated.
///
/// Configuration files spell this as an integer: `0` stacks blocks
/// vertically, `1` places them side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum StackAxis {
    #[default]
    Vertical,
    Horizontal,
}

impl TryFrom<u8> for StackAxis {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StackAxis::Vertical),
            1 => Ok(StackAxis::Horizontal),
            other => Err(format!(
                "invalid stack_axis {}, must be 0 (vertical) or 1 (horizontal)",
                other
            )),
        }
    }
}

/// A validated table: at least one block, and no block with zero rows or
/// zero columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    blocks: Vec<Block>,
    block_separation: bool,
    stack_axis: StackAxis,
}

impl Table {
    pub fn new(
        blocks: Vec<Block>,
        block_separation: bool,
        stack_axis: StackAxis,
    ) -> Result<Self, ConfigError> {
        if blocks.is_empty() {
            return Err(ConfigError::NoBlocks);
        }
        for (index, block) in blocks.iter().enumerate() {
            if block.rows.is_empty() {
                return Err(ConfigError::EmptyRows {
                    index,
                    heading: block.heading.clone(),
                });
            }
            if block.columns.is_empty() {
                return Err(ConfigError::EmptyColumns {
                    index,
                    heading: block.heading.clone(),
                });
            }
        }
        Ok(Self {
            blocks,
            block_separation,
            stack_axis,
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_separation(&self) -> bool {
        self.block_separation
    }

    pub fn stack_axis(&self) -> StackAxis {
        self.stack_axis
    }

    pub fn is_horizontal(&self) -> bool {
        self.stack_axis == StackAxis::Horizontal
    }

    /// Column names of all blocks, in block order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().flat_map(|b| b.column_names())
    }
}
