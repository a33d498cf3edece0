//! Free-text normalization for `title`, `body` and `category`.
//!
//! Newlines, carriage returns and tabs are deleted outright (not replaced by
//! a space). Titles are also trimmed. Every function here is idempotent.

use crate::models::{ArticleRecord, ArticleTable};
use tracing::{info, instrument};

const CONTROL_CHARS: [char; 3] = ['\n', '\r', '\t'];

/// Delete every `\n`, `\r` and `\t`.
pub fn strip_control(s: &str) -> String {
    s.replace(CONTROL_CHARS, "")
}

/// [`strip_control`], then trim surrounding whitespace.
pub fn normalize_title(s: &str) -> String {
    strip_control(s).trim().to_string()
}

fn normalize_record(mut row: ArticleRecord) -> ArticleRecord {
    row.title = row.title.as_deref().map(normalize_title);
    row.body = row.body.as_deref().map(strip_control);
    row.category = row.category.as_deref().map(strip_control);
    row
}

/// Normalize the text fields of every row. Missing values stay missing so
/// the final completeness check can drop them.
#[instrument(level = "info", skip_all)]
pub fn normalize_text(table: ArticleTable) -> ArticleTable {
    info!(rows = table.len(), "Removing extra lines from title, body and category");
    table.map_rows(normalize_record)
}
