mod config;
mod engine;
mod lookup;
mod models;
mod parser;
mod progress;
mod rules;
mod types;

use std::io::{stderr, stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::ExportConfig;
use crate::engine::ExportEngine;
use crate::lookup::YahooLookup;
use crate::models::ExportResult;
use crate::progress::TracingProgress;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Convert a Revolut invest or crypto CSV export into a Ghostfolio activity import.
#[derive(Parser)]
#[command(name = "revolut-export")]
struct Cli {
    /// Revolut CSV export
    input: PathBuf,

    /// Output file for the Ghostfolio JSON (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ghostfolio account id (default: GHOSTFOLIO_ACCOUNT_ID)
    #[arg(short, long)]
    account_id: Option<String>,

    /// Log level written to stderr: error, warn, info, debug, trace
    #[arg(short, long, default_value = "error")]
    log_level: String
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let config = ExportConfig::resolve(cli.account_id)?;
    let contents = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("Unable to read export at path: {}", cli.input.display()))?;

    let lookup = Arc::new(YahooLookup::new(LOOKUP_TIMEOUT)?);
    let engine = ExportEngine::new(config, lookup, TracingProgress);

    let export = engine.process_file_contents(&contents).await?;

    write_export(&export, cli.output.as_deref())?;

    info!("Wrote [{}] activities", export.activities.len());

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The export may be written to stdout, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_export(export: &ExportResult, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Unable to create output at path: {}", path.display()))?;
            let mut output = BufWriter::new(file);

            serde_json::to_writer_pretty(&mut output, export)?;
            output.flush()?;
        }
        None => {
            let mut output = BufWriter::new(stdout().lock());

            serde_json::to_writer_pretty(&mut output, export)?;
            writeln!(output)?;
            output.flush()?;
        }
    }

    Ok(())
}
