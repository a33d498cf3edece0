//! Token metrics, duplicate removal and the completeness check.
//!
//! Token counting runs per field:
//! 1. split the text into word tokens
//! 2. keep purely alphabetic tokens (numbers and punctuation go)
//! 3. lowercase
//! 4. drop stopwords
//! 5. count what is left
//!
//! A missing field gets no count, which later excludes the row.

use crate::models::{CleanArticle, IndexedArticle, IndexedTable};
use crate::transform::stopwords::StopwordSet;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, instrument};

// Letters, marks and digits, with hyphens, apostrophes and dots allowed
// between them so "bien-estar" or "O'Connor" stay single tokens.
static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{M}\p{N}_]+(?:[-'’.][\p{L}\p{M}\p{N}_]+)*").expect("valid word regex")
});

/// Counts content words against one language's stopword set.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: Arc<StopwordSet>,
}

impl Tokenizer {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    /// Split text into word tokens. Punctuation between words is discarded.
    pub fn word_tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        WORD.find_iter(text).map(|m| m.as_str())
    }

    /// Lowercased alphabetic tokens that are not stopwords.
    pub fn content_words(&self, text: &str) -> Vec<String> {
        self.word_tokens(text)
            .filter(|token| token.chars().all(char::is_alphabetic))
            .map(str::to_lowercase)
            .filter(|word| !self.stopwords.contains(word))
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        self.content_words(text).len()
    }
}

/// Set `n_tokens_title` and `n_tokens_body` on every row with the matching
/// text present.
#[instrument(level = "info", skip_all)]
pub fn tokenize_counts(table: IndexedTable, tokenizer: &Tokenizer) -> IndexedTable {
    info!(rows = table.len(), "Adding token count columns n_tokens_title, n_tokens_body");
    table.map_records(|mut row| {
        row.n_tokens_title = row.title.as_deref().map(|t| tokenizer.count(t));
        row.n_tokens_body = row.body.as_deref().map(|b| tokenizer.count(b));
        row
    })
}

/// Rows that carry a title for duplicate detection.
pub trait Titled {
    fn title_key(&self) -> Option<&str>;
}

impl Titled for IndexedArticle {
    fn title_key(&self) -> Option<&str> {
        self.record.title.as_deref()
    }
}

impl Titled for CleanArticle {
    fn title_key(&self) -> Option<&str> {
        Some(&self.title)
    }
}

/// Keep the first row for each title, in original order. Missing titles
/// count as one shared title. Returns the survivors and how many went.
#[instrument(level = "info", skip_all)]
pub fn remove_duplicate_titles<T: Titled>(rows: Vec<T>) -> (Vec<T>, usize) {
    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .unique_by(|row| row.title_key().map(str::to_owned))
        .collect();
    let removed = before - kept.len();
    info!(removed, kept = kept.len(), "Removed duplicate entries");
    (kept, removed)
}

/// Drop every row with a missing field. Returns the complete rows and how
/// many were dropped.
#[instrument(level = "info", skip_all)]
pub fn drop_incomplete(rows: Vec<IndexedArticle>) -> (Vec<CleanArticle>, usize) {
    let before = rows.len();
    let kept: Vec<CleanArticle> = rows
        .into_iter()
        .filter_map(|row| CleanArticle::try_from(row).ok())
        .collect();
    let dropped = before - kept.len();
    info!(dropped, kept = kept.len(), "Dropped rows with missing values");
    (kept, dropped)
}
