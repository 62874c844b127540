//! CLI entry point for drawdb-sql

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drawdb_sql::config::ConvertConfig;
use drawdb_sql::model::Diagram;
use drawdb_sql::{Diagnostic, Dialect};

#[derive(Parser)]
#[command(name = "drawdb-sql")]
#[command(about = "Convert SQL DDL between dialects through the DrawDB diagram model")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file: SQL, or diagram JSON for `export` (overrides config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, stdout when omitted (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dialect of the input SQL
    #[arg(long)]
    from: Option<Dialect>,

    /// Dialect of the generated SQL
    #[arg(long)]
    to: Option<Dialect>,

    /// Fail when any diagnostic is produced
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert SQL from one dialect to another
    Convert,
    /// Import SQL and print the diagram as JSON
    Import,
    /// Export a diagram JSON file as SQL
    Export,
    /// Inspect schema (show parsed tables for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = match &cli.config {
        Some(path) => ConvertConfig::from_file(path)?,
        None => ConvertConfig::load(None)?,
    };

    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(input) = cli.input {
        config.input_file = input;
    }
    if let Some(output) = cli.output {
        config.output_file = Some(output);
    }
    if let Some(from) = cli.from {
        config.source_dialect = from;
    }
    if let Some(to) = cli.to {
        config.target_dialect = to;
    }
    if cli.strict {
        config.strict = true;
    }

    config.validate()?;

    match cli.command.unwrap_or(Commands::Convert) {
        Commands::Convert => {
            let report = match drawdb_sql::convert(&config) {
                Err(drawdb_sql::Error::Strict { diagnostics }) => {
                    report_diagnostics(&diagnostics);
                    anyhow::bail!("{} diagnostics in strict mode", diagnostics.len());
                }
                other => other?,
            };
            report_diagnostics(&report.diagnostics);
            if config.output_file.is_none() {
                print!("{}", report.sql);
            }
            info!(
                "Converted {} tables and {} relationships",
                report.tables, report.relationships
            );
        }
        Commands::Import => {
            let sql = std::fs::read_to_string(&config.input_file)?;
            let outcome =
                drawdb_sql::import_sql(&sql, config.source_dialect, config.model_dialect())?;
            report_diagnostics(&outcome.diagnostics);
            check_strict(&config, &outcome.diagnostics)?;
            write_output(&config, &outcome.diagram.to_json()?)?;
        }
        Commands::Export => {
            let json = std::fs::read_to_string(&config.input_file)?;
            let diagram = Diagram::from_json(&json)
                .with_context(|| format!("Invalid diagram JSON in {:?}", config.input_file))?;
            let outcome = drawdb_sql::export_sql(&diagram, config.target_dialect);
            report_diagnostics(&outcome.diagnostics);
            check_strict(&config, &outcome.diagnostics)?;
            write_output(&config, &outcome.sql)?;
        }
        Commands::Inspect => inspect_schema(&config)?,
    }

    Ok(())
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        warn!("{}", diagnostic);
    }
}

fn check_strict(config: &ConvertConfig, diagnostics: &[Diagnostic]) -> Result<()> {
    if config.strict && !diagnostics.is_empty() {
        anyhow::bail!("{} diagnostics in strict mode", diagnostics.len());
    }
    Ok(())
}

fn write_output(config: &ConvertConfig, text: &str) -> Result<()> {
    match config.output_file.as_deref() {
        Some(path) => write_file(path, text),
        None => {
            println!("{}", text.trim_end());
            Ok(())
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn inspect_schema(config: &ConvertConfig) -> Result<()> {
    let sql = std::fs::read_to_string(&config.input_file)?;
    let outcome = drawdb_sql::import_sql(&sql, config.source_dialect, config.model_dialect())?;
    let diagram = &outcome.diagram;

    println!("Parsed {} tables:\n", diagram.tables.len());
    for table in diagram.tables.values() {
        println!("Table: {}", table.name);
        if let Some(comment) = &table.comment {
            println!("  Comment: {}", comment);
        }
        println!("  Columns:");
        for field in &table.fields {
            let nullable = if field.not_null { "NOT NULL" } else { "NULL" };
            let primary = if field.primary { " PRIMARY KEY" } else { "" };
            let increment = if field.increment { " INCREMENT" } else { "" };
            println!(
                "    - {} {} {}{}{}",
                field.name,
                field.type_display(),
                nullable,
                primary,
                increment
            );
        }
        if !table.indices.is_empty() {
            println!("  Indexes:");
            for index in &table.indices {
                let unique = if index.unique { "UNIQUE " } else { "" };
                let name = index.name.as_deref().unwrap_or("(unnamed)");
                println!("    - {}INDEX {} ({:?})", unique, name, index.fields);
            }
        }
        println!();
    }

    if !diagram.relationships.is_empty() {
        println!("Relationships:");
        for rel in &diagram.relationships {
            let start = diagram.table(rel.start_table_id);
            let end = diagram.table(rel.end_table_id);
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };
            let start_field = start.field(rel.start_field_id).map_or("?", |f| f.name.as_str());
            let end_field = end.field(rel.end_field_id).map_or("?", |f| f.name.as_str());
            println!(
                "  - {}: {}.{} -> {}.{} ({:?}, on update {}, on delete {})",
                rel.name,
                start.name,
                start_field,
                end.name,
                end_field,
                rel.cardinality,
                rel.update_constraint,
                rel.delete_constraint
            );
        }
        println!();
    }

    for item in &diagram.enums {
        println!("Enum: {} {:?}", item.name, item.values);
    }

    if !outcome.diagnostics.is_empty() {
        println!("Diagnostics:");
        for diagnostic in &outcome.diagnostics {
            println!("  - [{:?}] {}", diagnostic.kind(), diagnostic);
        }
    }

    Ok(())
}
