//! Data models for scraped articles as they move through the transform stage.
//!
//! This module defines the row and table types used throughout the application:
//! - [`RawArticleRow`]: One row of a scraped source file, as read from disk
//! - [`ArticleRecord`]: The working row every transform step reads and rewrites
//! - [`ArticleTable`]: Rows in original file order (positional addressing)
//! - [`IndexedTable`]: Rows addressed by their content [`Uid`]
//! - [`CleanArticle`]: A complete row, ready to be written out
//! - [`StoredArticle`]: The row shape the load collaborator persists
//!
//! Missing values are `None` everywhere. A field that is `None` once every
//! step has run excludes its row from the output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw article as scraped from a news site.
///
/// Only the columns the transform stage reads are kept; any other column in
/// the source file is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticleRow {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Content identifier of an article: lowercase hex digest of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the working table.
///
/// `url` is the only field a row cannot exist without. Derived fields
/// (`host`, `newspaper_uid`, `uid`, token counts) start out as `None` and are
/// filled in by the stage that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub url: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub host: Option<String>,
    pub newspaper_uid: Option<String>,
    pub uid: Option<Uid>,
    pub n_tokens_title: Option<usize>,
    pub n_tokens_body: Option<usize>,
}

impl ArticleRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            body: None,
            category: None,
            host: None,
            newspaper_uid: None,
            uid: None,
            n_tokens_title: None,
            n_tokens_body: None,
        }
    }

    /// Lift a raw row into a working record. Rows without a URL have no
    /// identity and return `None`.
    pub fn from_raw(raw: RawArticleRow) -> Option<Self> {
        let url = raw.url?;
        Some(Self {
            title: raw.title,
            body: raw.body,
            category: raw.category,
            ..Self::new(url)
        })
    }
}

/// Rows in their original order. This is the table shape before the
/// content identifier becomes the addressing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleTable {
    pub rows: Vec<ArticleRecord>,
}

impl ArticleTable {
    pub fn new(rows: Vec<ArticleRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Apply a pure per-row mapping to every row.
    pub fn map_rows(self, f: impl FnMut(ArticleRecord) -> ArticleRecord) -> Self {
        Self {
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}

/// A row addressed by its content identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedArticle {
    pub uid: Uid,
    pub record: ArticleRecord,
}

/// Rows addressed by `uid`. Row order is still the original file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedTable {
    pub rows: Vec<IndexedArticle>,
}

impl IndexedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn map_records(self, mut f: impl FnMut(ArticleRecord) -> ArticleRecord) -> Self {
        Self {
            rows: self
                .rows
                .into_iter()
                .map(|IndexedArticle { uid, record }| IndexedArticle {
                    uid,
                    record: f(record),
                })
                .collect(),
        }
    }
}

/// A fully populated row. Field order matches the output file columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanArticle {
    pub uid: Uid,
    pub url: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub host: String,
    pub newspaper_uid: String,
    pub n_tokens_title: usize,
    pub n_tokens_body: usize,
}

impl TryFrom<IndexedArticle> for CleanArticle {
    type Error = IndexedArticle;

    /// Fails, handing the row back, when any field is still missing.
    fn try_from(row: IndexedArticle) -> Result<Self, Self::Error> {
        let IndexedArticle { uid, record } = row;
        match (
            record.title,
            record.body,
            record.category,
            record.host,
            record.newspaper_uid,
            record.n_tokens_title,
            record.n_tokens_body,
        ) {
            (
                Some(title),
                Some(body),
                Some(category),
                Some(host),
                Some(newspaper_uid),
                Some(n_tokens_title),
                Some(n_tokens_body),
            ) => Ok(CleanArticle {
                uid,
                url: record.url,
                title,
                body,
                category,
                host,
                newspaper_uid,
                n_tokens_title,
                n_tokens_body,
            }),
            (title, body, category, host, newspaper_uid, n_tokens_title, n_tokens_body) => {
                Err(IndexedArticle {
                    uid,
                    record: ArticleRecord {
                        url: record.url,
                        title,
                        body,
                        category,
                        host,
                        newspaper_uid,
                        uid: record.uid,
                        n_tokens_title,
                        n_tokens_body,
                    },
                })
            }
        }
    }
}

/// The row the load collaborator persists: one per `id`, `url` unique,
/// `date` stamped at export time rather than carried from the transform.
#[derive(Debug, Clone, Serialize)]
pub struct StoredArticle {
    pub id: String,
    pub category: String,
    pub body: String,
    pub host: String,
    pub title: String,
    pub newspaper_uid: String,
    pub n_tokens_body: usize,
    pub n_tokens_title: usize,
    pub url: String,
    pub date: NaiveDate,
}

impl StoredArticle {
    pub fn from_clean(article: &CleanArticle, date: NaiveDate) -> Self {
        Self {
            id: article.uid.as_str().to_string(),
            category: article.category.clone(),
            body: article.body.clone(),
            host: article.host.clone(),
            title: article.title.clone(),
            newspaper_uid: article.newspaper_uid.clone(),
            n_tokens_body: article.n_tokens_body,
            n_tokens_title: article.n_tokens_title,
            url: article.url.clone(),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_row() -> IndexedArticle {
        IndexedArticle {
            uid: Uid::from_hex("ab".repeat(32)),
            record: ArticleRecord {
                title: Some("Titulo".to_string()),
                body: Some("Cuerpo".to_string()),
                category: Some("Nacional".to_string()),
                host: Some("www.eldeber.com.bo".to_string()),
                newspaper_uid: Some("eldeber".to_string()),
                uid: Some(Uid::from_hex("ab".repeat(32))),
                n_tokens_title: Some(1),
                n_tokens_body: Some(1),
                ..ArticleRecord::new("https://www.eldeber.com.bo/nacional/titulo")
            },
        }
    }

    #[test]
    fn test_from_raw_requires_url() {
        let raw = RawArticleRow {
            url: None,
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert!(ArticleRecord::from_raw(raw).is_none());
    }

    #[test]
    fn test_from_raw_keeps_text_fields() {
        let raw = RawArticleRow {
            url: Some("https://a.com/x".to_string()),
            title: None,
            body: Some("b".to_string()),
            category: Some("c".to_string()),
        };
        let record = ArticleRecord::from_raw(raw).unwrap();
        assert_eq!(record.url, "https://a.com/x");
        assert_eq!(record.title, None);
        assert_eq!(record.body.as_deref(), Some("b"));
        assert!(record.uid.is_none());
    }

    #[test]
    fn test_clean_article_from_complete_row() {
        let clean = CleanArticle::try_from(complete_row()).unwrap();
        assert_eq!(clean.title, "Titulo");
        assert_eq!(clean.host, "www.eldeber.com.bo");
        assert_eq!(clean.uid.as_str().len(), 64);
    }

    #[test]
    fn test_clean_article_rejects_missing_body() {
        let mut row = complete_row();
        row.record.body = None;
        let rejected = CleanArticle::try_from(row).unwrap_err();
        assert_eq!(rejected.record.body, None);
    }

    #[test]
    fn test_clean_article_rejects_missing_token_count() {
        let mut row = complete_row();
        row.record.n_tokens_title = None;
        assert!(CleanArticle::try_from(row).is_err());
    }

    #[test]
    fn test_stored_article_uses_uid_as_id() {
        let clean = CleanArticle::try_from(complete_row()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let stored = StoredArticle::from_clean(&clean, date);
        assert_eq!(stored.id, clean.uid.to_string());

        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("\"date\":\"2025-05-06\""));
    }
}
