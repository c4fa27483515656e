// src/main.rs
mod config;
mod db;
mod dump;
mod error;
mod export;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::DumpConfig;
use dump::walker::WalkOptions;
use dump::writer::DumpWriter;
use export::exporter::ReportExporter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dump table data as TRUNCATE + INSERT statements", long_about = None)]
struct Args {
    /// Property, YAML or JSON file with the dump settings
    config: PathBuf,
    #[arg(long)]
    output_file: Option<PathBuf>,
    #[arg(long)]
    db_type: Option<String>,
    #[arg(long)]
    connection_string: Option<String>,
    /// Also write a run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long, default_value = "json")]
    report_format: String,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut DumpConfig, args: &Args) {
    if let Some(output_file) = &args.output_file {
        config.output_file = output_file.clone();
    }
    if let Some(db_type) = &args.db_type {
        config.db.db_type = Some(db_type.clone());
    }
    if let Some(connection_string) = &args.connection_string {
        config.db.url = Some(connection_string.clone());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = DumpConfig::load(&args.config)
        .with_context(|| format!("config: unable to load {}", args.config.display()))?;
    apply_overrides(&mut config, &args);
    let kind = config.validate().context("config")?;
    let options = WalkOptions::from(&config);

    println!("--- Database Data Dump ---");
    println!("Database Type: {}", kind.label());
    println!("Connection: {}", config.redacted_target());
    println!(
        "Catalog/Schema Filter: {}/{}",
        options.catalog.as_deref().unwrap_or("*"),
        options.schema.as_deref().unwrap_or("default")
    );
    if !options.tables_to_skip.is_empty() {
        println!("Tables To Skip: {}", options.tables_to_skip.join(","));
    }
    println!("Upper-case Table Names: {}", options.tables_to_upper);
    println!("Output: {}", config.output_file.display());
    println!("--------------------------");

    let accessor = db::connect(&config).await.context("connect")?;

    let mut out = DumpWriter::create(&config.output_file)
        .with_context(|| format!("output: unable to create {}", config.output_file.display()))?;
    let mut report = dump::run(accessor.as_ref(), &options, &mut out)
        .await
        .context("dump")?;
    let written = out.bytes_written();
    out.finish()
        .with_context(|| format!("output: unable to flush {}", config.output_file.display()))?;
    report.output_file = Some(config.output_file.display().to_string());
    info!("-- Dump file saved in: {} ({} bytes)", config.output_file.display(), written);

    if let Some(report_path) = &args.report {
        ReportExporter
            .export_report_to_file(&report, report_path, &args.report_format)
            .with_context(|| format!("report: unable to write {}", report_path.display()))?;
    }

    println!("--------------------------");
    println!(
        "Tables dumped: {}, rows: {}, skipped: {}, failed: {}",
        report.tables.len(),
        report.total_rows(),
        report.skipped.len(),
        report.errors.len()
    );
    if report.empty_catalog {
        println!("No tables matched the catalog/schema filters.");
    }
    if !report.is_success() {
        for failure in &report.errors {
            eprintln!("{}: {}", failure.table, failure.message);
        }
        bail!("{} table(s) could not be dumped", report.errors.len());
    }
    println!("Process completed successfully!");
    Ok(())
}
