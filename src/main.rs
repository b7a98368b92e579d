// src/main.rs
mod export;
mod extractors;
mod storage;
mod utils;

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use extractors::{ChangelogExtractor, ExtractorConfig};
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the changelog table extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a saved HTML copy of the changelog page
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the export document
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Filename prefix for the export document
    #[arg(short, long, default_value = "cachetur-changelog")]
    prefix: String,

    /// Selector map JSON file overriding the built-in page layout
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the anchor heading marker text
    #[arg(long)]
    marker: Option<String>,

    /// Override the source page URL recorded in the export
    #[arg(long)]
    source_url: Option<String>,

    /// Debug mode - additionally save the raw HTML of the changelog region
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    // 3. Build the selector map: config file first, then flag overrides
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(marker) = &args.marker {
        config.anchor_marker = marker.clone();
    }
    if let Some(source_url) = &args.source_url {
        config.source_url = source_url.clone();
    }

    // 4. Read the input document
    let html = fs::read_to_string(&args.input)?;
    tracing::info!("Read {} bytes from {}", html.len(), args.input.display());

    // 5. Initialize storage and the extractor
    let storage = StorageManager::new(&args.output_dir)?;
    let extractor = ChangelogExtractor::new(config)?;

    let filename = export::export_filename(&args.prefix);

    // 6. Optional debug dump of the region the extractor walks
    if args.debug {
        match extractor.region_html(&html) {
            Ok(fragments) => {
                let debug_path = storage.debug_path(&filename);
                if let Err(e) = utils::html_debug::save_region_debug(&fragments, &debug_path) {
                    tracing::warn!("Failed to save region debug HTML: {}", e);
                }
            }
            Err(e) => tracing::warn!("Skipping region debug dump: {}", e),
        }
    }

    // 7. Extract the changelog tables
    let tables = extractor.extract(&html)?;

    if tables.is_empty() {
        tracing::error!("Anchor heading found but no qualifying tables followed it");
        return Err(AppError::NoData(
            "heading found but no changelog tables with entries followed it".to_string(),
        ));
    }

    // 8. Assemble and save the export document
    let source = extractor.config().source_url.clone();
    let doc = export::assemble(tables, &source);

    let path = storage.save_export(&doc, &filename)?;

    tracing::info!(
        "Successfully extracted {} changelog entries from {} tables into {}",
        doc.total_entries,
        doc.total_tables,
        path.display()
    );

    Ok(())
}
