//! File-level runner: one scraped source file in, one clean table out.
//!
//! Several source files can be cleaned at once. Each file is isolated: a
//! failure in one is logged and reported without stopping the others.
//!
//! Both outputs are rendered before either is written, and each is written
//! atomically, so no truncated file is ever left behind. The clean table is
//! committed first. If the JSON export then fails to write, the complete
//! clean table stays on disk and the file is still reported as failed.

use crate::config::TransformConfig;
use crate::error::{Result, TransformError};
use crate::outputs::{json, table};
use crate::transform::metrics::Tokenizer;
use crate::transform::stopwords::StopwordSet;
use crate::transform::{TransformReport, Transformer, enrich};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// What a successful file run produced.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    pub newspaper_uid: String,
    pub report: TransformReport,
}

/// Load the stopword list and build the shared transformer.
///
/// Fails when the stopword list for the configured language is missing.
#[instrument(level = "info", skip_all, fields(language = %config.language))]
pub fn build_transformer(config: &TransformConfig) -> Result<Arc<Transformer>> {
    let stopwords = StopwordSet::resolve(config.stopwords_dir.as_deref(), &config.language)?;
    info!(language = stopwords.language(), words = stopwords.len(), "Stopwords ready");
    let tokenizer = Tokenizer::new(Arc::new(stopwords));
    Ok(Arc::new(Transformer::new(tokenizer, config.stage_order)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Clean a single source file.
///
/// # Errors
///
/// Any error is wrapped with the stage it happened in and the file name.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub async fn clean_file(
    input: &Path,
    config: &TransformConfig,
    transformer: Arc<Transformer>,
) -> Result<FileSummary> {
    let name = display_name(input);

    let newspaper_uid = match &config.newspaper_uid {
        Some(uid) => uid.clone(),
        None => enrich::newspaper_uid_from_path(input).map_err(|e| e.in_stage("identify source", &name))?,
    };

    let raw = table::read_articles(input)
        .await
        .map_err(|e| e.in_stage("read", &name))?;

    let uid = newspaper_uid.clone();
    let output = tokio::task::spawn_blocking(move || transformer.run(raw, &uid))
        .await
        .map_err(|e| TransformError::from(e).in_stage("transform", &name))?;

    let export = config
        .json_output_dir
        .as_deref()
        .map(|dir| json::JsonExport::render_today(dir, &newspaper_uid, &output.articles))
        .transpose()
        .map_err(|e| e.in_stage("export", &name))?;
    if let Some(export) = &export {
        debug!(path = %export.path().display(), "JSON export rendered");
    }

    let output_path = table::clean_output_path(input, &config.output_prefix);
    table::write_clean_articles(&output_path, &output.articles)
        .await
        .map_err(|e| e.in_stage("write", &name))?;

    let json_output = match export {
        Some(export) => Some(export.write().await.map_err(|e| e.in_stage("export", &name))?),
        None => None,
    };

    info!(
        %newspaper_uid,
        output = %output_path.display(),
        rows_read = output.report.rows_read,
        rows_kept = output.report.rows_kept,
        duplicates_removed = output.report.duplicates_removed,
        incomplete_dropped = output.report.incomplete_dropped,
        missing_url = output.report.missing_url,
        "Cleaned source file"
    );

    Ok(FileSummary {
        input: input.to_path_buf(),
        output: output_path,
        json_output,
        newspaper_uid,
        report: output.report,
    })
}

/// Clean several source files, at most `config.concurrency` at a time.
///
/// Results come back in input order, one per file.
#[instrument(level = "info", skip_all, fields(files = inputs.len(), concurrency = config.concurrency))]
pub async fn clean_files(
    inputs: Vec<PathBuf>,
    config: Arc<TransformConfig>,
    transformer: Arc<Transformer>,
) -> Vec<(PathBuf, Result<FileSummary>)> {
    let mut results: Vec<(usize, PathBuf, Result<FileSummary>)> = stream::iter(inputs.into_iter().enumerate())
        .map(|(i, input)| {
            let config = Arc::clone(&config);
            let transformer = Arc::clone(&transformer);
            async move {
                let result = clean_file(&input, &config, transformer).await;
                if let Err(e) = &result {
                    error!(input = %input.display(), error = %e, "Cleaning failed; continuing with other sources");
                }
                (i, input, result)
            }
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(i, _, _)| *i);
    results.into_iter().map(|(_, input, result)| (input, result)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::StageOrder;

    const RAW: &str = "url,title,body,category\n\
        https://www.eldeber.com.bo/pais/el-gato-corre,El gato corre,El gato corre rápido 2024!,País\n\
        https://www.eldeber.com.bo/pais/otra-nota,,\"Cuerpo\nen dos líneas\",País\n\
        https://www.eldeber.com.bo/pais/repetida,El gato corre,Otra,País\n\
        https://www.eldeber.com.bo/pais/sin-cuerpo,Sin cuerpo,,País\n";

    fn config() -> TransformConfig {
        TransformConfig::default()
    }

    #[tokio::test]
    async fn test_clean_file_writes_clean_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("eldeber_.csv");
        std::fs::write(&input, RAW).unwrap();

        let config = config();
        let transformer = build_transformer(&config).unwrap();
        let summary = clean_file(&input, &config, transformer).await.unwrap();

        assert_eq!(summary.newspaper_uid, "eldeber");
        assert_eq!(summary.output, dir.path().join("clean_eldeber_.csv"));
        assert_eq!(summary.report.rows_read, 4);
        assert_eq!(summary.report.rows_kept, 2);
        assert!(summary.json_output.is_none());

        let written = std::fs::read_to_string(&summary.output).unwrap();
        assert!(written.starts_with("uid,url,title,"));
        assert!(written.contains("otra nota"));
        assert!(written.contains("Cuerpoen dos líneas"));
        assert!(!written.contains("Sin cuerpo"));
    }

    #[tokio::test]
    async fn test_clean_file_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("opinion_.csv");
        std::fs::write(&input, RAW).unwrap();

        let config = config();
        let transformer = build_transformer(&config).unwrap();
        let first = clean_file(&input, &config, Arc::clone(&transformer)).await.unwrap();
        let a = std::fs::read(&first.output).unwrap();
        let second = clean_file(&input, &config, transformer).await.unwrap();
        let b = std::fs::read(&second.output).unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_clean_file_exports_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("larazon_.csv");
        std::fs::write(&input, RAW).unwrap();

        let config = TransformConfig {
            json_output_dir: Some(dir.path().join("json")),
            ..config()
        };
        let transformer = build_transformer(&config).unwrap();
        let summary = clean_file(&input, &config, transformer).await.unwrap();

        let json_path = summary.json_output.unwrap();
        assert!(json_path.ends_with("larazon.json"));
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    }

    #[tokio::test]
    async fn test_failed_export_keeps_complete_clean_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("larazon_.csv");
        std::fs::write(&input, RAW).unwrap();
        let blocker = dir.path().join("json");
        std::fs::write(&blocker, "not a directory").unwrap();

        let config = TransformConfig {
            json_output_dir: Some(blocker.clone()),
            ..config()
        };
        let transformer = build_transformer(&config).unwrap();
        let err = clean_file(&input, &config, transformer).await.unwrap_err();

        assert!(err.to_string().contains("export"));
        let written = std::fs::read_to_string(dir.path().join("clean_larazon_.csv")).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(!table_partial_exists(dir.path()));
        assert!(blocker.is_file());
    }

    fn table_partial_exists(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().ends_with(".partial"))
    }

    #[tokio::test]
    async fn test_unreadable_input_reports_stage_and_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("jornada_.csv");

        let config = config();
        let transformer = build_transformer(&config).unwrap();
        let err = clean_file(&input, &config, transformer).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("read"));
        assert!(msg.contains("jornada_.csv"));
        assert!(!dir.path().join("clean_jornada_.csv").exists());
    }

    #[tokio::test]
    async fn test_clean_files_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("eldeber_.csv");
        std::fs::write(&good, RAW).unwrap();
        let missing = dir.path().join("lostiempos_.csv");

        let config = Arc::new(TransformConfig {
            stage_order: StageOrder::DedupThenDrop,
            concurrency: 2,
            ..config()
        });
        let transformer = build_transformer(&config).unwrap();
        let results = clean_files(vec![missing.clone(), good.clone()], config, transformer).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, missing);
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, good);
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn test_missing_stopwords_is_fatal() {
        let config = TransformConfig {
            language: "klingon".to_string(),
            ..config()
        };
        let err = build_transformer(&config).unwrap_err();
        assert!(matches!(err, TransformError::StopwordsUnavailable { .. }));
    }
}
