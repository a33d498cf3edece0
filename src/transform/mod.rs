//! The transform stage: raw scraped rows in, clean content-addressed rows out.
//!
//! Each submodule owns one step, and every step is a plain function from
//! table to table so it can be tested on its own.
//!
//! # Stages
//!
//! | Stage | Module | Contract |
//! |-------|--------|----------|
//! | Enricher | [`enrich`] | `newspaper_uid`, `host`, recovered titles |
//! | Normalizer | [`normalize`] | no `\n`, `\r`, `\t` in text fields; trimmed titles |
//! | Identifier | [`identify`] | `uid` assigned, then table addressed by `uid` |
//! | Metrics & Dedup | [`metrics`] | token counts, unique titles, complete rows only |
//!
//! Bad rows never fail the run. They are repaired or excluded, and the
//! exclusions are counted in [`TransformReport`].

pub mod enrich;
pub mod identify;
pub mod metrics;
pub mod normalize;
pub mod stopwords;

use crate::models::{ArticleRecord, ArticleTable, CleanArticle, RawArticleRow};
use metrics::Tokenizer;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// When incomplete rows are dropped relative to duplicate removal.
///
/// Dropping first means a complete article is never shadowed by an earlier
/// duplicate that is itself about to be dropped. The legacy order removes
/// duplicates first and reproduces historical outputs exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOrder {
    #[default]
    DropThenDedup,
    DedupThenDrop,
}

/// Row counts for one run of the transform stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub rows_read: usize,
    pub missing_url: usize,
    pub duplicates_removed: usize,
    pub incomplete_dropped: usize,
    pub rows_kept: usize,
}

/// The clean rows of a run, in original order, plus its counts.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub articles: Vec<CleanArticle>,
    pub report: TransformReport,
}

/// Runs every transform step, in order, over one source's rows.
#[derive(Debug, Clone)]
pub struct Transformer {
    tokenizer: Tokenizer,
    order: StageOrder,
}

impl Transformer {
    pub fn new(tokenizer: Tokenizer, order: StageOrder) -> Self {
        Self { tokenizer, order }
    }

    /// Transform the rows of one source file tagged `newspaper_uid`.
    ///
    /// Rows without a URL have no identity and are counted, then skipped.
    #[instrument(level = "info", skip(self, raw), fields(rows = raw.len(), order = ?self.order))]
    pub fn run(&self, raw: Vec<RawArticleRow>, newspaper_uid: &str) -> TransformOutput {
        info!("Starting cleaning process");
        let rows_read = raw.len();
        let records: Vec<ArticleRecord> = raw.into_iter().filter_map(ArticleRecord::from_raw).collect();
        let missing_url = rows_read - records.len();

        let table = ArticleTable::new(records);
        let table = enrich::enrich(table, newspaper_uid);
        let table = normalize::normalize_text(table);
        let table = identify::assign_uids(table);
        let table = identify::index_by_uid(table);
        let table = metrics::tokenize_counts(table, &self.tokenizer);

        let (articles, duplicates_removed, incomplete_dropped) = match self.order {
            StageOrder::DropThenDedup => {
                let (complete, dropped) = metrics::drop_incomplete(table.rows);
                let (unique, removed) = metrics::remove_duplicate_titles(complete);
                (unique, removed, dropped)
            }
            StageOrder::DedupThenDrop => {
                let (unique, removed) = metrics::remove_duplicate_titles(table.rows);
                let (complete, dropped) = metrics::drop_incomplete(unique);
                (complete, removed, dropped)
            }
        };

        let report = TransformReport {
            rows_read,
            missing_url,
            duplicates_removed,
            incomplete_dropped,
            rows_kept: articles.len(),
        };
        info!(?report, "Cleaning process finished");
        TransformOutput { articles, report }
    }
}
