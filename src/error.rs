//! Error types for the transform run.
//!
//! Only resource and I/O failures become errors. Bad rows never do: they are
//! repaired or excluded inside the stage that meets them and show up in the
//! [`TransformReport`](crate::transform::TransformReport) counts instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a transform run.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed delimited file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("stopword list for '{language}' is unavailable in {location}")]
    StopwordsUnavailable { language: String, location: String },

    #[error("cannot derive a newspaper uid from file name {0}")]
    InvalidFileName(PathBuf),

    #[error("transform worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{stage} stage failed for {file}: {source}")]
    Stage {
        stage: &'static str,
        file: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error with the stage and file it happened in.
    pub fn in_stage(self, stage: &'static str, file: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            file: file.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
