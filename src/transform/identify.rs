//! Content identifier: a stable `uid` per article, derived from its URL.
//!
//! The uid is the lowercase hex SHA-256 digest of the URL's UTF-8 bytes, so
//! the same URL always maps to the same uid across runs and machines. That
//! is what makes re-ingesting a source file safe.
//!
//! Two distinct URLs sharing a digest is treated as impossible; collisions
//! are not detected.
//!
//! The uid identifies a URL, not a row. A source file listing the same URL
//! twice under different titles survives title dedup with two rows sharing
//! one uid. Input URLs are assumed unique per file; this is an accepted risk
//! and nothing here merges or rejects such rows.
//!
//! Switching the table to uid addressing happens in two steps:
//! 1. [`assign_uids`]: every row gets a `uid` field; rows stay positional.
//! 2. [`index_by_uid`]: the uid becomes the addressing key.

use crate::models::{ArticleTable, IndexedArticle, IndexedTable, Uid};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

/// Hash a URL into its content identifier.
pub fn content_uid(url: &str) -> Uid {
    let digest = Sha256::digest(url.as_bytes());
    Uid::from_hex(hex::encode(digest))
}

/// Step one: derive and store a `uid` on every row.
#[instrument(level = "info", skip_all)]
pub fn assign_uids(table: ArticleTable) -> ArticleTable {
    info!(rows = table.len(), "Generating uids for each row");
    table.map_rows(|mut row| {
        row.uid = Some(content_uid(&row.url));
        row
    })
}

/// Step two: address the table by `uid`.
///
/// Every row must already carry a uid (see [`assign_uids`]). A row that does
/// not is hashed here rather than lost.
#[instrument(level = "info", skip_all)]
pub fn index_by_uid(table: ArticleTable) -> IndexedTable {
    let rows = table
        .rows
        .into_iter()
        .map(|mut record| {
            let uid = match &record.uid {
                Some(uid) => uid.clone(),
                None => {
                    warn!(url = %record.url, "Row reached indexing without a uid");
                    let uid = content_uid(&record.url);
                    record.uid = Some(uid.clone());
                    uid
                }
            };
            IndexedArticle { uid, record }
        })
        .collect::<Vec<_>>();

    info!(rows = rows.len(), "Table indexed by uid");
    IndexedTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    #[test]
    fn test_content_uid_is_deterministic() {
        let url = "https://www.opinion.com.bo/articulo/pais/alza-precios/2025";
        assert_eq!(content_uid(url), content_uid(url));
    }

    #[test]
    fn test_content_uid_is_hex_sha256() {
        let uid = content_uid("");
        assert_eq!(
            uid.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_uid_differs_per_url() {
        assert_ne!(content_uid("https://a.com/1"), content_uid("https://a.com/2"));
    }

    #[test]
    fn test_assign_then_index() {
        let table = ArticleTable::new(vec![
            ArticleRecord::new("https://a.com/1"),
            ArticleRecord::new("https://a.com/2"),
        ]);

        let assigned = assign_uids(table);
        assert!(assigned.rows.iter().all(|r| r.uid.is_some()));

        let indexed = index_by_uid(assigned);
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed.rows[0].uid, content_uid("https://a.com/1"));
        assert_eq!(indexed.rows[0].record.uid.as_ref(), Some(&indexed.rows[0].uid));
        assert_eq!(indexed.rows[1].uid, content_uid("https://a.com/2"));
    }

    #[test]
    fn test_repeated_url_shares_uid() {
        let mut first = ArticleRecord::new("https://a.com/1");
        first.title = Some("Primera".to_string());
        let mut second = ArticleRecord::new("https://a.com/1");
        second.title = Some("Segunda".to_string());

        let indexed = index_by_uid(assign_uids(ArticleTable::new(vec![first, second])));

        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed.rows[0].uid, indexed.rows[1].uid);
    }
}
