//! JSON export of load-ready articles.
//!
//! The load collaborator persists one row per `id` (the article uid) and
//! stamps each row with the day it was stored. This module writes exactly
//! that shape so the load step can insert without reshaping.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── eldeber.json
//!     ├── lostiempos.json
//!     └── opinion.json
//! ```

use crate::error::{Result, TransformError};
use crate::models::{CleanArticle, StoredArticle};
use crate::utils::write_atomic;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Convert clean articles into stored rows dated `date`.
pub fn to_stored(articles: &[CleanArticle], date: NaiveDate) -> Vec<StoredArticle> {
    articles
        .iter()
        .map(|a| StoredArticle::from_clean(a, date))
        .collect()
}

/// Load-ready JSON for one source, rendered and waiting to be written.
///
/// Rendering is split from writing so a serialization failure surfaces
/// before anything else of the run is committed to disk.
#[derive(Debug)]
pub struct JsonExport {
    path: PathBuf,
    bytes: Vec<u8>,
    rows: usize,
}

impl JsonExport {
    /// Render the articles of one source dated `date`, targeting
    /// `{json_output_dir}/{date}/{newspaper_uid}.json`.
    pub fn render(
        json_output_dir: &Path,
        newspaper_uid: &str,
        articles: &[CleanArticle],
        date: NaiveDate,
    ) -> Result<Self> {
        let bytes = serde_json::to_vec(&to_stored(articles, date))?;
        let path = json_output_dir
            .join(date.to_string())
            .join(format!("{newspaper_uid}.json"));
        Ok(Self {
            path,
            bytes,
            rows: articles.len(),
        })
    }

    /// Render dated today.
    pub fn render_today(json_output_dir: &Path, newspaper_uid: &str, articles: &[CleanArticle]) -> Result<Self> {
        Self::render(json_output_dir, newspaper_uid, articles, Local::now().date_naive())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the date directory and write the file atomically.
    ///
    /// # Returns
    ///
    /// The path written.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn write(self) -> Result<PathBuf> {
        if let Some(full_json_dir) = self.path.parent() {
            info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
            if let Err(e) = fs::create_dir_all(full_json_dir).await {
                error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
                return Err(TransformError::io(full_json_dir, e));
            }
        }

        write_atomic(&self.path, &self.bytes).await?;
        info!(path = %self.path.display(), rows = self.rows, "Wrote load-ready JSON");
        Ok(self.path)
    }
}
