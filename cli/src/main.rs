use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use schema_refsync_core::{change_references_with, RunError, SyncOptions, SyncReport};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "schema-refsync")]
#[command(about = "Copy $ref pointers from a base JSON Schema into a derived schema by shared $defs names")]
#[command(version)]
struct Cli {
    /// Derived schema file (rewritten in place)
    derived: PathBuf,

    /// Base schema file supplying the authoritative $ref values
    base: PathBuf,

    /// Report updates without writing the derived file
    #[arg(long)]
    dry_run: bool,

    /// Indentation width for the rewritten file [default: 2]
    #[arg(long)]
    indent: Option<usize>,

    /// JSON file with sync options (kebab-case keys); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON summary of the run (collected refs and updates) to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// How pipeline failures are printed on stderr
    #[arg(long, value_enum, default_value_t = ErrorFormat::Text)]
    error_format: ErrorFormat,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ErrorFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the update lines
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(err) => match err.downcast_ref::<RunError>() {
            Some(run_err) => {
                match cli.error_format {
                    ErrorFormat::Text => eprintln!("{run_err}"),
                    ErrorFormat::Json => eprintln!("{}", run_err.to_json()),
                }
                ExitCode::from(run_err.exit_code())
            }
            None => {
                match cli.error_format {
                    ErrorFormat::Text => eprintln!("Error: {err:#}"),
                    ErrorFormat::Json => {
                        eprintln!("{}", serde_json::json!({ "message": format!("{err:#}") }))
                    }
                }
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli) -> Result<SyncReport> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => SyncOptions::default(),
    };
    if cli.dry_run {
        options.dry_run = true;
    }
    if let Some(indent) = cli.indent {
        options.indent = indent;
    }

    // Each notice is printed as the walk makes it, ahead of the write.
    let report = change_references_with(&cli.derived, &cli.base, &options, |update| {
        println!("{update}");
    })?;

    if options.dry_run {
        eprintln!(
            "Dry run: {} reference(s) would be updated in {}",
            report.updates.len(),
            cli.derived.display()
        );
    }

    if let Some(path) = &cli.report {
        write_report(&report, path)?;
    }

    Ok(report)
}

fn load_options(path: &Path) -> Result<SyncOptions> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config from: {}", path.display()))
}

fn write_report(report: &SyncReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("Failed to write report JSON")?;
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush report file")?;
    Ok(())
}
