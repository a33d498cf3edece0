//! Stopword sets for one natural language.
//!
//! A list is one word per line. The Spanish list is compiled into the binary;
//! a directory laid out like the NLTK stopwords corpus (`<dir>/spanish`) can
//! replace it or add languages. The set is loaded once at startup and shared
//! read-only between workers. A missing or empty list is fatal: token counts
//! cannot be computed without it.

use crate::error::{Result, TransformError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Stopword lists compiled into the binary, by language.
const BUNDLED: &[(&str, &str)] = &[("spanish", include_str!("../../resources/stopwords/spanish"))];

/// Read-only set of lowercase stopwords.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    language: String,
    words: HashSet<String>,
}

impl StopwordSet {
    /// Build a set from explicit words. Words are lowercased and trimmed.
    pub fn from_words<I, S>(language: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            language: language.into(),
            words,
        }
    }

    /// The list compiled into the binary for `language`, if there is one.
    pub fn bundled(language: &str) -> Option<Self> {
        BUNDLED
            .iter()
            .find(|(name, _)| *name == language)
            .map(|(name, contents)| Self::from_words(*name, contents.lines()))
    }

    /// Resolve the list for `language`: from `dir` when one is configured,
    /// otherwise from the lists compiled into the binary.
    ///
    /// # Errors
    ///
    /// [`TransformError::StopwordsUnavailable`] when the configured directory
    /// has no usable list, or no list is bundled for `language`.
    pub fn resolve(dir: Option<&Path>, language: &str) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir, language),
            None => {
                let set = Self::bundled(language).ok_or_else(|| TransformError::StopwordsUnavailable {
                    language: language.to_string(),
                    location: "bundled lists".to_string(),
                })?;
                info!(language, words = set.len(), "Using bundled stopwords");
                Ok(set)
            }
        }
    }

    /// Load the list for `language` from `dir`.
    ///
    /// Looks for `<dir>/<language>` first, then `<dir>/<language>.txt`.
    ///
    /// # Errors
    ///
    /// [`TransformError::StopwordsUnavailable`] when neither file can be read
    /// or the list holds no words.
    #[instrument(level = "info", skip_all, fields(dir = %dir.display(), %language))]
    pub fn load(dir: &Path, language: &str) -> Result<Self> {
        let candidates: [PathBuf; 2] = [dir.join(language), dir.join(format!("{language}.txt"))];

        for path in &candidates {
            match std::fs::read_to_string(path) {
                Ok(contents) => {
                    let set = Self::from_words(language, contents.lines());
                    if set.is_empty() {
                        break;
                    }
                    info!(path = %path.display(), words = set.len(), "Loaded stopwords");
                    return Ok(set);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "Stopword candidate not readable"),
            }
        }

        Err(TransformError::StopwordsUnavailable {
            language: language.to_string(),
            location: candidates[0].display().to_string(),
        })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
