//! Perfchart CLI: build chart data from static CSV files.
//!
//! Commands:
//! - `build`: load the configured instruments, transform, and write JSON or CSV
//! - `summary`: print the latest smoothed value per instrument and the quarter ticks
//! - `init-config`: write the default TOML config

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use perfchart_core::axis::{format_percent, quarter_label, quarter_ticks};
use perfchart_core::data::{AlignmentPolicy, RowPolicy};
use perfchart_runner::{
    export_csv, export_json, export_records_json, run_chart, run_chart_or_empty, save_artifacts,
    ChartConfig, ChartResult,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "perfchart",
    about = "Perfchart CLI: smoothed percentage-change performance of tracked instruments"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the combined chart series and write it out.
    Build {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output shape.
        #[arg(long, value_enum, default_value_t = OutputFormat::Records)]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also save manifest.json, series.json, and series.csv under this directory.
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,

        /// Log load failures and emit an empty chart instead of failing.
        #[arg(long, default_value_t = false)]
        empty_on_error: bool,
    },
    /// Print the latest smoothed value per instrument.
    Summary {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Write the default config as TOML.
    InitConfig {
        /// Destination file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Config source plus per-run overrides.
#[derive(Args)]
struct ChartArgs {
    /// Path to a TOML config file. Defaults to the built-in four-instrument chart.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `{SYMBOL}_historical.csv` files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Rolling-average window.
    #[arg(long)]
    window: Option<usize>,

    /// Chart misaligned instruments by index instead of rejecting them.
    #[arg(long, default_value_t = false)]
    legacy: bool,

    /// Skip malformed CSV rows instead of failing the instrument.
    #[arg(long, default_value_t = false)]
    skip_malformed: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full result with instrument metadata and schema version.
    Json,
    /// `[{date, SYM: value, ...}]` records.
    Records,
    /// `date,SYM...` table.
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            chart,
            format,
            output,
            artifacts_dir,
            empty_on_error,
        } => {
            let config = chart.resolve()?;
            init_tracing(&config.logging.level);
            run_build(&config, format, output, artifacts_dir, empty_on_error)
        }
        Commands::Summary { chart } => {
            let config = chart.resolve()?;
            init_tracing(&config.logging.level);
            run_summary(&config)
        }
        Commands::InitConfig { output, force } => {
            init_tracing("info");
            run_init_config(output, force)
        }
    }
}

impl ChartArgs {
    fn resolve(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::from_file(path)?,
            None => ChartConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        if self.legacy {
            config.alignment = AlignmentPolicy::Legacy;
        }
        if self.skip_malformed {
            config.row_policy = RowPolicy::Skip;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Logs go to stderr so stdout stays clean for piped output.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_build(
    config: &ChartConfig,
    format: OutputFormat,
    output: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
    empty_on_error: bool,
) -> Result<()> {
    let result = if empty_on_error {
        run_chart_or_empty(config)
    } else {
        run_chart(config)?
    };

    let rendered = match format {
        OutputFormat::Json => export_json(&result)?,
        OutputFormat::Records => export_records_json(&result.series)?,
        OutputFormat::Csv => export_csv(&result.series)?,
    };
    write_output(output.as_deref(), &rendered)?;
    tracing::info!(points = result.series.len(), empty = result.is_empty(), "chart written");

    if let Some(dir) = artifacts_dir {
        let run_dir = save_artifacts(&result, &dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_summary(config: &ChartConfig) -> Result<()> {
    let result = run_chart_or_empty(config);
    print_summary(&result);
    Ok(())
}

fn print_summary(result: &ChartResult) {
    let series = &result.series;
    println!(
        "{}-Day Rolling Average Performance (% Change)",
        series.window
    );

    let dates = series.dates();
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => println!("{first} → {last} ({} points)\n", dates.len()),
        _ => {
            println!("No data available.");
            return;
        }
    }

    for instrument in &result.instruments {
        let latest = series
            .latest(&instrument.symbol)
            .map(format_percent)
            .unwrap_or_else(|| "n/a".into());
        println!(
            "  {:<6} {:<14} {:>10}",
            instrument.symbol,
            instrument.display_name(),
            latest
        );
    }

    let ticks: Vec<String> = quarter_ticks(&dates).into_iter().map(quarter_label).collect();
    if !ticks.is_empty() {
        println!("\nQuarters: {}", ticks.join(", "));
    }
    for warning in &result.warnings {
        println!("WARNING: {warning}");
    }
}

fn run_init_config(output: Option<PathBuf>, force: bool) -> Result<()> {
    let text = ChartConfig::default().to_toml()?;
    if let Some(path) = &output {
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
    }
    write_output(output.as_deref(), &text)
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
