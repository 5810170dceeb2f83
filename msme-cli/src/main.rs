//! MSME CLI — headless portfolio reports and exports.
//!
//! Commands:
//! - `report` — analyze a CSV and print a JSON or Markdown report
//! - `export` — write the first N rows back out as CSV, untouched
//! - `validate` — check a CSV against the portfolio schema
//! - `config` — print the effective analyzer configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use msme_core::data::{default_export_name, export_to_path, required_columns};
use msme_core::reporting::{export_json, quick_summary};
use msme_core::{AnalyzerConfig, Dataset, MarkdownReportGenerator, ReportDocument, Session};

#[derive(Parser)]
#[command(
    name = "msme",
    version,
    about = "MSME CLI — loan portfolio KPIs from a CSV upload"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a portfolio CSV and print the report.
    Report {
        /// Portfolio CSV file.
        csv: PathBuf,

        /// Analyze only the first N rows (clamped to the slider bounds).
        #[arg(long)]
        rows: Option<usize>,

        /// Analyzer config (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,

        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Export the in-scope rows as CSV, exactly as ingested.
    Export {
        /// Portfolio CSV file.
        csv: PathBuf,

        /// Export only the first N rows (clamped to the slider bounds).
        #[arg(long)]
        rows: Option<usize>,

        /// Destination file. Defaults to msme_portfolio_YYYYMMDD_HHMMSS.csv.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a CSV against the portfolio schema and summarize what was read.
    Validate {
        /// Portfolio CSV file.
        csv: PathBuf,
    },
    /// Print the effective analyzer configuration (defaults merged with --config).
    Config {
        /// Analyzer config (TOML) to validate and merge over the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            csv,
            rows,
            config,
            format,
            output,
        } => run_report(&csv, rows, config.as_deref(), format, output.as_deref()),
        Commands::Export { csv, rows, output } => run_export(&csv, rows, output),
        Commands::Validate { csv } => run_validate(&csv),
        Commands::Config { config } => {
            print!("{}", render_config(config.as_deref())?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_session(csv: &Path, rows: Option<usize>, config: AnalyzerConfig) -> Result<Session> {
    let dataset = Dataset::from_path(csv)
        .with_context(|| format!("failed to load portfolio {}", csv.display()))?;
    let mut session = Session::new(dataset, config);
    if let Some(requested) = rows {
        let applied = session.set_row_limit(requested);
        if applied != requested {
            warn!(requested, applied, "row limit clamped to slider bounds");
        }
    }
    Ok(session)
}

fn run_report(
    csv: &Path,
    rows: Option<usize>,
    config_path: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let config = AnalyzerConfig::load_or_default(config_path).context("failed to load analyzer config")?;
    let session = open_session(csv, rows, config)?;
    let doc = ReportDocument::new(
        &session.snapshot(),
        session.report(),
        chrono::Local::now().naive_local(),
    );

    let rendered = match format {
        Format::Json => export_json(&doc)?,
        Format::Markdown => MarkdownReportGenerator.generate(&doc),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
            println!("{}", doc.scope_line());
            for line in quick_summary(&doc.report) {
                println!("  {line}");
            }
            println!("Report saved to: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_export(csv: &Path, rows: Option<usize>, output: Option<PathBuf>) -> Result<()> {
    let session = open_session(csv, rows, AnalyzerConfig::default())?;
    let path = output.unwrap_or_else(|| {
        PathBuf::from(default_export_name(chrono::Local::now().naive_local()))
    });
    let snapshot = session.snapshot();
    export_to_path(&snapshot, &path)?;
    println!(
        "Exported {} of {} rows to: {}",
        snapshot.len(),
        snapshot.available(),
        path.display()
    );
    Ok(())
}

fn run_validate(csv: &Path) -> Result<()> {
    let dataset = Dataset::from_path(csv).with_context(|| {
        format!(
            "{} is not a valid portfolio (required columns: {})",
            csv.display(),
            required_columns().join(", ")
        )
    })?;

    println!("File: {}", csv.display());
    println!("Rows: {}", dataset.len());
    let session = Session::new(dataset, AnalyzerConfig::default());
    println!("Fingerprint: {}", session.snapshot().fingerprint().short());

    let dataset = session.dataset();
    if dataset.unknown_columns().is_empty() {
        println!("Extra columns: none");
    } else {
        println!("Extra columns (ignored): {}", dataset.unknown_columns().join(", "));
    }

    if dataset.issues().is_empty() {
        println!("Unreadable cells: none");
    } else {
        println!("Unreadable cells (treated as missing):");
        println!("  {:<20} {:>8}", "Column", "Cells");
        println!("  {}", "-".repeat(29));
        for (column, count) in dataset.issues().iter() {
            println!("  {column:<20} {count:>8}");
        }
    }
    Ok(())
}

fn render_config(config_path: Option<&Path>) -> Result<String> {
    let config = AnalyzerConfig::load_or_default(config_path).context("failed to load analyzer config")?;
    Ok(config.to_toml_string()?)
}
