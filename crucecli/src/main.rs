use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cruce_core::{MergeConfig, MergeOptions, extract_clean_dataset, merge_datasets};
use cruce_core::{reader, writer};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "crucecli")]
#[command(about = "Clean sales exports and cross them against vendor price lists", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the clean dataset from a sales export
    Clean {
        /// Path to the sales export (xlsx/xls/ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the cleaned sheet to this xlsx file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Cross a sales export against one or more vendor price lists
    Merge {
        /// Path to the sales export
        #[arg(value_name = "SALES")]
        sales: PathBuf,

        /// Paths to vendor price-list files
        #[arg(value_name = "VENDOR", num_args = 1.., required = true)]
        vendors: Vec<PathBuf>,

        /// Write the enriched workbook to this xlsx file
        #[arg(short, long, value_name = "FILE", required = true)]
        output: PathBuf,

        /// Absolute tolerance for the unit-vs-total price heuristic
        #[arg(short, long, value_name = "N")]
        tolerance: Option<f64>,

        /// Path to configuration file (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Clean { file, output } => run_clean(&cli.format, &file, output.as_deref()),
        Command::Merge {
            sales,
            vendors,
            output,
            tolerance,
            config,
        } => run_merge(
            &cli.format,
            &sales,
            &vendors,
            &output,
            tolerance,
            config.as_deref(),
        ),
    }
}

fn run_clean(
    format: &OutputFormat,
    file: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let grid = reader::read_grid(file)?;
    let dataset = extract_clean_dataset(&grid)
        .with_context(|| format!("Failed to clean file: {}", file.display()))?;

    if let Some(output_path) = output {
        writer::write_clean(output_path, &dataset)?;
    }

    match format {
        OutputFormat::Human => formatter::print_clean_summary(file, &dataset, output),
        OutputFormat::Json => formatter::print_clean_json(&dataset)?,
    }

    Ok(())
}

fn run_merge(
    format: &OutputFormat,
    sales: &std::path::Path,
    vendors: &[PathBuf],
    output: &std::path::Path,
    tolerance: Option<f64>,
    config: Option<&std::path::Path>,
) -> Result<()> {
    // Tolerance precedence: CLI flag, then config file, then default
    let config = if let Some(config_path) = config {
        MergeConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        MergeConfig::default()
    };
    let mut options: MergeOptions = config.to_options();
    if let Some(tolerance) = tolerance {
        options.unit_price_tolerance = tolerance;
    }

    let sales_grid = reader::read_grid(sales)?;
    let vendor_grids = vendors
        .iter()
        .map(reader::read_grid)
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_datasets(&sales_grid, &vendor_grids, &options)
        .with_context(|| format!("Failed to merge {}", sales.display()))?;

    writer::write_merge(output, &merged)?;

    match format {
        OutputFormat::Human => formatter::print_merge_summary(sales, vendors, &merged, output),
        OutputFormat::Json => formatter::print_merge_json(&merged)?,
    }

    Ok(())
}
