use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use blocktable::error_fmt::{AppError, ConfigResultExt, SaveResultExt};
use blocktable::{Placeholder, StackAxis, StyleConfig, Table, TableConfig, grid_size, preview};

#[derive(Parser)]
#[command(name = "blocktable")]
#[command(about = "Render block-structured report tables into documents")]
struct Cli {
    /// Log layout decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a table config into a .docx document
    Render {
        /// Table config file
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// Output document path
        #[arg(long, short, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Validate a table config and report the grid it lays out
    Check {
        /// Table config file
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Print the rendered table to the terminal
    Preview {
        /// Table config file
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

const DEFAULT_CONFIG: &str = "table.yaml";
const DEFAULT_OUTPUT: &str = "table.docx";
const LOG_ENV: &str = "BLOCKTABLE_LOG";

fn init_logging(verbose: bool) {
    let default = if verbose { "blocktable=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render { config, output } => render_table(&config, &output),
        Commands::Check { config } => check_table(&config),
        Commands::Preview { config } => preview_table(&config),
    };

    if let Err(e) = result {
        eprint!("{}", e);
        std::process::exit(1);
    }
}

fn load_table(config: &Path) -> Result<(Table, StyleConfig), AppError> {
    let path_str = config.display().to_string();
    TableConfig::load(config)
        .and_then(TableConfig::into_table)
        .with_path(&path_str)
}

fn render_table(config: &Path, output: &Path) -> Result<(), AppError> {
    let (table, style) = load_table(config)?;
    let document = blocktable::render_document(&table, &style, &Placeholder::default())?;
    document
        .save(output)
        .with_output(&output.display().to_string())?;

    println!(
        "{} {}",
        "wrote".bright_green().bold(),
        output.display().to_string().cyan()
    );
    Ok(())
}

fn check_table(config: &Path) -> Result<(), AppError> {
    let (table, _) = load_table(config)?;
    let size = grid_size(&table);
    let axis = match table.stack_axis() {
        StackAxis::Vertical => "vertical",
        StackAxis::Horizontal => "horizontal",
    };

    println!(
        "ok: {} blocks stacked {}, grid {}x{}",
        table.blocks().len(),
        axis,
        size.rows,
        size.cols
    );
    Ok(())
}

fn preview_table(config: &Path) -> Result<(), AppError> {
    let (table, style) = load_table(config)?;
    let document = blocktable::render_document(&table, &style, &Placeholder::default())?;
    for grid in document.tables() {
        print!("{}", preview::render_grid(grid));
    }
    Ok(())
}
