//! Table configuration file.
//!
//! A configuration file (YAML) describes the blocks of one table, how they
//! are stacked, and optionally overrides the presentation style:
//!
//! ```yaml
//! block_separation: true
//! stack_axis: 0
//! blocks:
//!   - heading: Income
//!     columns:
//!       - name: '2023'
//!       - name: '2024'
//!     rows:
//!       - report_name: Revenue
//!       - report_name: EBITDA
//! style:
//!   heading:
//!     font_size: 14
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::model::{Block, Column, Series, StackAxis, Table};
use crate::style::{StyleConfig, StyleOverrides};

/// Errors that can occur when loading or validating a table configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("table has no blocks")]
    NoBlocks,

    #[error("block {index} ('{heading}') has no rows")]
    EmptyRows { index: usize, heading: String },

    #[error("block {index} ('{heading}') has no columns")]
    EmptyColumns { index: usize, heading: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    pub heading: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Series>,
}

/// Raw contents of a configuration file, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub block_separation: bool,
    pub stack_axis: StackAxis,
    pub blocks: Vec<BlockConfig>,
    #[serde(default)]
    pub style: StyleOverrides,
}

impl TableConfig {
    /// Load a configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded table config");
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Validate the blocks and build the table and its style.
    pub fn into_table(self) -> Result<(Table, StyleConfig), ConfigError> {
        let blocks = self
            .blocks
            .into_iter()
            .map(|b| Block::new(b.heading, b.columns, b.rows))
            .collect();
        let table = Table::new(blocks, self.block_separation, self.stack_axis)?;
        Ok((table, self.style.resolve()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_BLOCKS: &str = "\
block_separation: true
stack_axis: 1
blocks:
  - heading: Income
    columns:
      - name: '2023'
      - name: '2024'
    rows:
      - report_name: Revenue
        loc: income.revenue
      - report_name: EBITDA
  - heading: Growth
    columns:
      - name: YoY
    rows:
      - report_name: Revenue
      - report_name: EBITDA
";

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.yaml");
        std::fs::write(&path, TWO_BLOCKS).unwrap();

        let config = TableConfig::load(&path).unwrap();
        assert!(config.block_separation);
        assert_eq!(config.stack_axis, StackAxis::Horizontal);
        assert_eq!(config.blocks.len(), 2);
        assert_eq!(config.blocks[0].columns[1].name, "2024");
        assert_eq!(config.blocks[1].rows[0].report_name, "Revenue");
    }

    #[test]
    fn test_row_extension_fields_are_kept() {
        let config = TableConfig::from_yaml(TWO_BLOCKS).unwrap();
        let revenue = &config.blocks[0].rows[0];
        assert_eq!(
            revenue.extra.get("loc"),
            Some(&serde_yaml::Value::String("income.revenue".to_string()))
        );
        assert!(config.blocks[0].rows[1].extra.is_empty());
    }

    #[test]
    fn test_into_table_uses_default_style() {
        let (table, style) = TableConfig::from_yaml(TWO_BLOCKS).unwrap().into_table().unwrap();
        assert!(table.is_horizontal());
        assert_eq!(table.blocks().len(), 2);
        assert_eq!(style, StyleConfig::default());
    }

    #[test]
    fn test_style_section_overrides_defaults() {
        let yaml = format!("{}style:\n  content:\n    font_size: 8\n", TWO_BLOCKS);
        let (_, style) = TableConfig::from_yaml(&yaml).unwrap().into_table().unwrap();
        assert_eq!(style.content.font_size, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = TableConfig::load(&temp_dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_missing_required_field() {
        let err = TableConfig::from_yaml("stack_axis: 0\nblocks: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_stack_axis() {
        let err = TableConfig::from_yaml("block_separation: false\nstack_axis: 2\nblocks: []\n")
            .unwrap_err();
        assert!(err.to_string().contains("stack_axis"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let yaml = format!("{}output: out.docx\n", TWO_BLOCKS);
        let err = TableConfig::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_block_list_is_rejected_before_layout() {
        let config =
            TableConfig::from_yaml("block_separation: false\nstack_axis: 0\nblocks: []\n").unwrap();
        assert!(matches!(config.into_table(), Err(ConfigError::NoBlocks)));
    }

    #[test]
    fn test_bundled_sample_config_is_valid() {
        let config = TableConfig::from_yaml(include_str!("../table.yaml")).unwrap();
        let (table, _) = config.into_table().unwrap();
        assert!(table.is_horizontal());
        assert_eq!(table.blocks().len(), 2);
    }

    #[test]
    fn test_block_with_empty_rows_is_rejected() {
        let yaml = "\
block_separation: false
stack_axis: 0
blocks:
  - heading: Empty
    columns:
      - name: A
    rows: []
";
        let err = TableConfig::from_yaml(yaml).unwrap().into_table().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRows { index: 0, .. }));
    }
}
