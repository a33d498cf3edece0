//! Run configuration.
//!
//! Settings come from an optional YAML file, then command-line flags on top.
//! Every field has a default, so a run needs neither.
//!
//! ```yaml
//! language: spanish
//! stopwords_dir: /usr/share/nltk_data/corpora/stopwords
//! output_prefix: clean_
//! stage_order: drop_then_dedup
//! concurrency: 4
//! json_output_dir: ./json
//! ```

use crate::cli::Cli;
use crate::error::{Result, TransformError};
use crate::outputs::table::CLEAN_PREFIX;
use crate::transform::StageOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Stopword language; names the file under `stopwords_dir`.
    pub language: String,
    /// Directory of stopword lists. Unset means the lists built into the binary.
    pub stopwords_dir: Option<PathBuf>,
    /// Prefix added to the input file name for the cleaned table.
    pub output_prefix: String,
    pub stage_order: StageOrder,
    /// Source files cleaned at the same time.
    pub concurrency: usize,
    /// Use this newspaper uid instead of deriving it from the file name.
    pub newspaper_uid: Option<String>,
    pub json_output_dir: Option<PathBuf>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            language: "spanish".to_string(),
            stopwords_dir: None,
            output_prefix: CLEAN_PREFIX.to_string(),
            stage_order: StageOrder::default(),
            concurrency: 4,
            newspaper_uid: None,
            json_output_dir: None,
        }
    }
}

impl TransformConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TransformError::Config(e.to_string()))
    }

    /// Load and parse a YAML configuration file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| TransformError::io(path, e))?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Overlay command-line flags onto this configuration.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(language) = &cli.language {
            self.language = language.clone();
        }
        if cli.stopwords_dir.is_some() {
            self.stopwords_dir = cli.stopwords_dir.clone();
        }
        if let Some(prefix) = &cli.output_prefix {
            self.output_prefix = prefix.clone();
        }
        if cli.legacy_order {
            self.stage_order = StageOrder::DedupThenDrop;
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        if cli.newspaper_uid.is_some() {
            self.newspaper_uid = cli.newspaper_uid.clone();
        }
        if cli.json_output_dir.is_some() {
            self.json_output_dir = cli.json_output_dir.clone();
        }
        self
    }

    /// Reject settings that would make a run unsafe.
    pub fn validate(&self) -> Result<()> {
        if self.output_prefix.is_empty() {
            return Err(TransformError::Config(
                "output_prefix must not be empty; it would overwrite the input file".to_string(),
            ));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(TransformError::Config(format!(
                "output_prefix '{}' must not contain path separators",
                self.output_prefix
            )));
        }
        if self.concurrency == 0 {
            return Err(TransformError::Config("concurrency must be at least 1".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(TransformError::Config("language must not be empty".to_string()));
        }
        if matches!(&self.newspaper_uid, Some(uid) if uid.is_empty()) {
            return Err(TransformError::Config("newspaper_uid must not be empty".to_string()));
        }
        Ok(())
    }
}
