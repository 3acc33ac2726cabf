pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod importer;
pub mod io_utils;
pub mod models;
pub mod parser;
pub mod prepare;
pub mod preview;
pub mod registry;
pub mod schema;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, UploadArgs},
    config::ImportConfig,
    importer::Importer,
    parser::ParsedDataset,
    preview::ColumnReport,
    registry::{Dataset, Registry},
    store::MemoryStore,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("survey_import", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let registry = Registry::standard();
    match cli.command {
        Commands::Targets(args) => handle_targets(&registry, &args),
        Commands::Preview(args) => handle_preview(&registry, &args),
        Commands::Import(args) => handle_import(&registry, &args),
    }
}

fn handle_targets(registry: &Registry, args: &cli::TargetsArgs) -> Result<()> {
    match &args.target {
        Some(key) => {
            let dataset = registry.get(key)?;
            println!("{} ({})", dataset.label, dataset.key);
            println!("{}", dataset.description);
            println!();
            preview::expected_columns_table(dataset).print();
        }
        None => preview::targets_table(registry).print(),
    }
    Ok(())
}

fn load_config(upload: &UploadArgs) -> Result<ImportConfig> {
    match &upload.config {
        Some(path) => ImportConfig::load(path),
        None => Ok(ImportConfig::default()),
    }
}

fn load_upload<'r>(
    registry: &'r Registry,
    upload: &UploadArgs,
    config: &ImportConfig,
) -> Result<(&'r Dataset, ParsedDataset)> {
    let dataset = registry.get(&upload.target)?;
    info!(
        "Reading '{}' for target '{}'",
        upload.input.display(),
        dataset.key
    );
    let bytes = io_utils::read_upload(&upload.input)?;
    let parsed = parser::parse_csv(&bytes, &config.parse_options(upload.delimiter))
        .with_context(|| format!("Parsing upload {:?}", upload.input))?;
    debug!(
        "Columns in upload: {:?} (delimiter '{}')",
        parsed.columns,
        io_utils::printable_delimiter(parsed.delimiter)
    );
    Ok((dataset, parsed))
}

fn handle_preview(registry: &Registry, args: &cli::PreviewArgs) -> Result<()> {
    let config = load_config(&args.upload)?;
    let (dataset, parsed) = load_upload(registry, &args.upload, &config)?;
    let report = ColumnReport::analyze(dataset, &parsed);

    println!("Target: {} ({})", dataset.label, dataset.key);
    println!("Data rows: {}", report.row_count);
    println!(
        "Delimiter: '{}'",
        io_utils::printable_delimiter(parsed.delimiter)
    );
    println!();
    if report.recognized.is_empty() {
        println!("No columns match this target.");
    } else {
        report.recognized_table().print();
    }
    if !report.unused.is_empty() {
        println!();
        println!("Ignored columns: {}", report.unused.join(", "));
    }
    println!();
    preview::preview_table(&parsed, args.rows.unwrap_or(config.preview_rows)).print();
    println!();
    if report.can_import() {
        println!("Ready to import {} row(s).", report.row_count);
    } else {
        println!(
            "Cannot import: required columns are missing: {}",
            report.missing_labels(dataset)
        );
    }
    Ok(())
}

fn handle_import(registry: &Registry, args: &cli::ImportArgs) -> Result<()> {
    let mut config = load_config(&args.upload)?;
    if let Some(max_errors) = args.max_errors {
        config.max_errors_reported = max_errors;
    }
    let (dataset, parsed) = load_upload(registry, &args.upload, &config)?;

    let report = ColumnReport::analyze(dataset, &parsed);
    if !report.missing.is_empty() {
        bail!(
            "Required columns are missing: {}",
            report.missing_labels(dataset)
        );
    }

    let mut store = MemoryStore::load(&args.store)?;
    let summary = Importer::new(dataset, &config).import_rows(&mut store, &parsed.rows);
    if args.dry_run {
        info!("Dry run; store {:?} left unchanged", args.store);
    } else {
        store.save(&args.store)?;
        debug!("Store written to {:?}", args.store);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Rows: {}  Created: {}  Skipped: {}  Failed: {}",
            summary.total_rows, summary.created, summary.skipped, summary.failed
        );
        println!("{}", preview::outcome_message(&summary, dataset));
        if !summary.errors.is_empty() {
            println!();
            preview::error_table(&summary, &parsed).print();
            if summary.truncated_errors() > 0 {
                println!(
                    "... and {} more failed row(s) not shown",
                    summary.truncated_errors()
                );
            }
        }
    }

    if args.strict && summary.failed > 0 {
        bail!("{} row(s) failed to import", summary.failed);
    }
    Ok(())
}
