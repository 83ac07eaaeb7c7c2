//! Command-line entry point for the `.lys` editor core.
//!
//! # Responsibility
//! - Import one `.lys` file, optionally sort its lyric lines, and write the
//!   result as `.lys` text or as the JSON document model.
//! - Layer command-line flags over `LYS_*` environment configuration.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lys_core::config::LoggingConfig;
use lys_core::{init_logging, EditorConfig, EditorService, SortLinesRequest};
use std::fs;
use std::path::PathBuf;

const CLI_DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "lys", version, about = "Normalize and sort .lys timed-lyrics files")]
struct Cli {
    /// Input `.lys` file.
    input: PathBuf,

    /// Sort lyric lines by the start time of their first token.
    #[arg(long)]
    sort: bool,

    /// Print the parsed document as JSON instead of `.lys` text.
    #[arg(long)]
    json: bool,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let raw = fs::read(&cli.input)
        .with_context(|| format!("failed to read `{}`", cli.input.display()))?;
    let rendered = render(&cli, config, &raw)?;

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn build_config(cli: &Cli) -> EditorConfig {
    build_config_with(cli, |key| std::env::var(key).ok())
}

fn build_config_with(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> EditorConfig {
    let base = EditorConfig {
        logging: LoggingConfig {
            level: CLI_DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        },
        ..EditorConfig::default()
    };
    let mut config = base.with_overrides(lookup);
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.log_dir = Some(dir.clone());
    }
    config
}

fn render(cli: &Cli, config: EditorConfig, raw: &[u8]) -> Result<String> {
    let mut service = EditorService::new(config);
    let mut document = service.import(raw);

    if cli.sort {
        document = service
            .sort_lines(&SortLinesRequest {
                document_id: document.id,
                base_version: document.version,
            })
            .context("failed to sort lines")?;
    }
    info!(
        "event=cli_render module=cli status=ok doc_id={} version={} json={}",
        document.id, document.version, cli.json
    );

    if cli.json {
        serde_json::to_string_pretty(&document).context("failed to encode document as JSON")
    } else {
        service
            .export(document.id)
            .context("failed to export document")
    }
}
