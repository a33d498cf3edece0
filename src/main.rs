//! # News Transform
//!
//! The transform stage of a news-article ETL pipeline. It takes raw scraped
//! article tables (one file per news site), and produces normalized,
//! deduplicated, content-addressed tables ready for warehousing.
//!
//! ## Usage
//!
//! ```sh
//! news_transform eldeber_.csv lostiempos_.csv -j ./json
//! ```
//!
//! ## Architecture
//!
//! Each source file runs through the same ordered stages:
//! 1. **Enrich**: Tag the source, derive the host, recover missing titles
//! 2. **Normalize**: Delete newlines and tabs from title, body and category
//! 3. **Identify**: Hash the URL into a `uid` and key the table by it
//! 4. **Metrics & Dedup**: Count content words, drop duplicate titles and incomplete rows
//! 5. **Output**: Write `clean_<file>` and, optionally, load-ready JSON
//!
//! Source files are cleaned concurrently; rows within a file are processed
//! in order on a blocking worker.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod transform;
mod utils;

use cli::Cli;
use config::TransformConfig;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_transform starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Load config ----
    let config = match &args.config {
        Some(path) => TransformConfig::load(path)?,
        None => TransformConfig::default(),
    }
    .merge_cli(&args);
    config.validate()?;
    info!(
        language = %config.language,
        stopwords_dir = ?config.stopwords_dir,
        stage_order = ?config.stage_order,
        concurrency = config.concurrency,
        "Configuration ready"
    );

    // Early check: the JSON export dir must be writable before any work starts
    if let Some(dir) = &config.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    // Without stopwords there are no token counts; nothing runs.
    let transformer = match pipeline::build_transformer(&config) {
        Ok(t) => t,
        Err(e) => {
            let e = e.in_stage("startup", config.language.clone());
            error!(error = %e, "Cannot start transform");
            return Err(e.into());
        }
    };

    // ---- Clean every source file ----
    let total_files = args.inputs.len();
    let results = pipeline::clean_files(args.inputs.clone(), Arc::new(config), transformer).await;

    let mut failed = Vec::new();
    let mut rows_kept = 0usize;
    for (input, result) in results {
        match result {
            Ok(summary) => {
                debug!(
                    input = %summary.input.display(),
                    output = %summary.output.display(),
                    json_output = ?summary.json_output,
                    newspaper_uid = %summary.newspaper_uid,
                    "Source file done"
                );
                rows_kept += summary.report.rows_kept;
            }
            Err(e) => failed.push(format!("{}: {e}", input.display())),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        files = total_files,
        failed = failed.len(),
        rows_kept,
        "Execution complete"
    );

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} source files failed:\n{}", failed.len(), total_files, failed.join("\n")).into())
    }
}
