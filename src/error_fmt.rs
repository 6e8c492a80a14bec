use std::fmt;

use owo_colors::OwoColorize;

use crate::config::ConfigError;
use crate::docx::DocxError;
use crate::layout::LayoutError;

/// Application error with context for actionable error messages.
#[derive(Debug)]
pub enum AppError {
    /// Config could not be loaded or validated
    Config { path: String, source: ConfigError },
    /// Grid layout failed
    Layout(LayoutError),
    /// Document could not be written
    Save { path: String, source: DocxError },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config { path, source } => write!(f, "{}", format_config_error(source, path)),
            AppError::Layout(source) => write!(f, "{}", format_layout_error(source)),
            AppError::Save { path, source } => write!(f, "{}", format_save_error(source, path)),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LayoutError> for AppError {
    fn from(e: LayoutError) -> Self {
        AppError::Layout(e)
    }
}

/// Extension trait to add config path context to config results.
pub trait ConfigResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> ConfigResultExt<T> for Result<T, ConfigError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Config {
            path: path.to_string(),
            source: e,
        })
    }
}

/// Extension trait to add output path context to save results.
pub trait SaveResultExt<T> {
    fn with_output(self, path: &str) -> Result<T, AppError>;
}

impl<T> SaveResultExt<T> for Result<T, DocxError> {
    fn with_output(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Save {
            path: path.to_string(),
            source: e,
        })
    }
}

// ============================================================================
// Formatting functions (internal implementation)
// ============================================================================

fn error_prefix() -> String {
    format!("{}: ", "error".red().bold())
}

fn format_config_error(error: &ConfigError, path: &str) -> String {
    let mut out = error_prefix();

    match error {
        ConfigError::Io(io_err) => {
            out.push_str(&format!("failed to read config {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", io_err.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    1. Check the path and file permissions\n");
            out.push_str(&format!(
                "    2. Pass the config explicitly: {}\n",
                "blocktable render path/to/table.yaml".cyan()
            ));
        }
        ConfigError::Parse(yaml_err) => {
            out.push_str(&format!("invalid YAML in {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", yaml_err.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    The config needs {}, {} (0 or 1) and {}\n",
                "block_separation".cyan(),
                "stack_axis".cyan(),
                "blocks".cyan()
            ));
        }
        ConfigError::NoBlocks => {
            out.push_str(&format!("no blocks defined in {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", "A table needs at least one block to lay out.".dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!("    Add a block under {}:\n", "blocks".cyan()));
            out.push('\n');
            out.push_str(&format!("      {}\n", "- heading: Income".dimmed()));
            out.push_str(&format!("      {}\n", "  columns: [{name: '2024'}]".dimmed()));
            out.push_str(&format!("      {}\n", "  rows: [{report_name: Revenue}]".dimmed()));
        }
        ConfigError::EmptyRows { index, heading } => {
            out.push_str(&format!(
                "block {} ('{}') has no rows\n",
                index,
                heading.yellow()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Add at least one {} entry to the block's {} in {}\n",
                "report_name".cyan(),
                "rows".cyan(),
                path.cyan()
            ));
        }
        ConfigError::EmptyColumns { index, heading } => {
            out.push_str(&format!(
                "block {} ('{}') has no columns\n",
                index,
                heading.yellow()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Add at least one {} entry to the block's {} in {}\n",
                "name".cyan(),
                "columns".cyan(),
                path.cyan()
            ));
        }
    }

    out
}

fn format_layout_error(error: &LayoutError) -> String {
    let mut out = error_prefix();
    out.push_str(&format!("{}\n", error));
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        "The table was not saved. This is a bug in the layout planner.".dimmed()
    ));
    out
}

fn format_save_error(error: &DocxError, path: &str) -> String {
    let mut out = error_prefix();
    out.push_str(&format!("failed to save {}\n", path.cyan()));
    out.push('\n');
    out.push_str(&format!("  {}\n", error.to_string().dimmed()));
    if matches!(error, DocxError::Write { .. }) {
        out.push('\n');
        out.push_str(&format!("  {}:\n", "To fix this".bold()));
        out.push_str("    1. Make sure the output directory exists and is writable\n");
        out.push_str(&format!(
            "    2. Choose another output: {}\n",
            "blocktable render -o other.docx".cyan()
        ));
    }
    out
}
