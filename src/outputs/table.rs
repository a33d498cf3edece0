//! Delimited-file reading and writing for article tables.
//!
//! # Missing Values
//!
//! Scraped files mark missing cells in several ways. A cell that is empty or
//! exactly one of the usual NA markers (`NA`, `NaN`, `null`, `None`, ...) is
//! read as missing.
//!
//! # Output Layout
//!
//! ```text
//! uid,url,title,body,category,host,newspaper_uid,n_tokens_title,n_tokens_body
//! ```
//!
//! Output is written to a temporary sibling and renamed into place, so a
//! failed run never leaves a partial file behind.

use crate::error::{Result, TransformError};
use crate::models::{CleanArticle, RawArticleRow};
use crate::utils::write_atomic;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Default prefix for cleaned output file names.
pub const CLEAN_PREFIX: &str = "clean_";

pub fn is_na_marker(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|c| !is_na_marker(c))
}

/// Parse delimited text with a header row into raw article rows.
///
/// Columns other than `url`, `title`, `body` and `category` are ignored; any
/// of those four may be absent from the header.
pub fn parse_articles(bytes: &[u8]) -> std::result::Result<Vec<RawArticleRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    reader
        .deserialize::<RawArticleRow>()
        .map(|row| {
            row.map(|r| RawArticleRow {
                url: present(r.url),
                title: present(r.title),
                body: present(r.body),
                category: present(r.category),
            })
        })
        .collect()
}

/// Read a scraped source file.
///
/// # Errors
///
/// [`TransformError::Io`] when the file cannot be read and
/// [`TransformError::Csv`] when it is not valid delimited text.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_articles(path: &Path) -> Result<Vec<RawArticleRow>> {
    info!("Reading file");
    let bytes = fs::read(path).await.map_err(|e| TransformError::io(path, e))?;
    let rows = parse_articles(&bytes).map_err(|e| TransformError::csv(path, e))?;
    info!(rows = rows.len(), "Read raw rows");
    Ok(rows)
}

/// Render clean articles as delimited text with a header row.
pub fn render_articles(articles: &[CleanArticle]) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());
    for article in articles {
        writer.serialize(article)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write clean articles to `path`, replacing any previous file atomically.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = articles.len()))]
pub async fn write_clean_articles(path: &Path, articles: &[CleanArticle]) -> Result<()> {
    let bytes = render_articles(articles).map_err(|e| TransformError::csv(path, e))?;
    write_atomic(path, &bytes).await?;
    info!("Saved clean data");
    Ok(())
}

/// `<dir>/<prefix><file name>` for an input path.
pub fn clean_output_path(input: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{file_name}"))
}
