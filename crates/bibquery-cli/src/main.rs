//! `bibquery`: translate an Ovid search strategy file for another database.
//!
//! Reads one strategy line per input line and writes one translated line per
//! input line. Per-line warnings go to a separate file, or after a
//! `Warnings:` line when no warnings file is given.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use bibquery::SourceDialect;
use bibquery_translator::{
    DialectTables, LineTranslator, TargetDatabase, TranslationReport, TranslatorConfig,
};

/// Translate Ovid search strategies into other bibliographic databases.
#[derive(Parser, Debug)]
#[command(name = "bibquery", version, about, long_about = None)]
struct Cli {
    /// Strategy file, one search line per line
    input: PathBuf,

    /// Target database (WoS, Cochrane, Scopus, Proquest, PubMed, EBSCO)
    #[arg(short, long, value_parser = parse_database)]
    to: TargetDatabase,

    /// Source query language
    #[arg(long, default_value = "ovid", value_parser = parse_dialect)]
    from: SourceDialect,

    /// Write translations here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write per-line warnings here instead of after the translations
    #[arg(short, long)]
    warnings: Option<PathBuf>,

    /// JSON file replacing the built-in dialect tables
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Translate lines on all cores
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_database(s: &str) -> Result<TargetDatabase, String> {
    s.parse().map_err(|_| {
        let accepted: Vec<&str> = TargetDatabase::ALL.iter().map(|db| db.name()).collect();
        format!("expected one of {}", accepted.join(", "))
    })
}

fn parse_dialect(s: &str) -> Result<SourceDialect, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays usable for translations
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bibquery={0},bibquery_translator={0}", log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let tables = match &cli.tables {
        Some(path) => load_tables(path)?,
        None => DialectTables::default(),
    };
    let config = TranslatorConfig::builder()
        .with_tables(tables)
        .with_source_dialect(cli.from)
        .with_parallel(cli.parallel)
        .build();
    let translator = LineTranslator::with_config(config);

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read strategy file {}", cli.input.display()))?;
    debug!(input = %cli.input.display(), database = %cli.to, "translating");

    let report = translator.translate_text(&text, cli.to);
    summarize(&report);

    match &cli.warnings {
        Some(path) => {
            write_output(cli.output.as_deref(), &report.render_output())?;
            fs::write(path, report.render_warnings())
                .with_context(|| format!("failed to write warnings to {}", path.display()))?;
        }
        None => {
            let combined = format!("{}Warnings:\n{}", report.render_output(), report.render_warnings());
            write_output(cli.output.as_deref(), &combined)?;
        }
    }

    Ok(())
}

fn load_tables(path: &Path) -> Result<DialectTables> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read dialect tables {}", path.display()))?;
    let tables = serde_json::from_str(&json)
        .with_context(|| format!("invalid dialect tables in {}", path.display()))?;
    info!(path = %path.display(), "loaded dialect tables");
    Ok(tables)
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("failed to write translations to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write translations to stdout")
        }
    }
}

fn summarize(report: &TranslationReport) {
    let failures = report.failures().count();
    if failures > 0 {
        warn!(failures, lines = report.len(), "some lines could not be translated");
    }
    info!(
        lines = report.len(),
        diagnostics = report.diagnostic_count(),
        database = %report.database,
        "translation finished"
    );
}
