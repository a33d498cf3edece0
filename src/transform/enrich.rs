//! Identity and context enrichment.
//!
//! Tags every row with the news source it came from, derives the host from
//! the article URL, and recovers missing titles from the URL slug.
//!
//! # Title Recovery
//!
//! Scraped rows sometimes lack a headline. The last path segment of most
//! news URLs is a hyphenated slug of the headline, so
//! `https://site.com/news/este-es-el-titulo` yields `"este es el titulo"`.
//! This is a lossy heuristic, not a parser: accents, casing and punctuation
//! dropped by the slug are not restored, and a query string stays attached to
//! the segment.

use crate::error::{Result, TransformError};
use crate::models::{ArticleRecord, ArticleTable};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

static LAST_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<slug>[^/]+)$").expect("valid slug regex"));

/// Derive the newspaper uid from a source file name.
///
/// The first `_`-delimited token of the file name (not the full path) names
/// the source: `eldeber_2025-05-06.csv` → `eldeber`. A name without `_` is
/// used whole.
///
/// # Errors
///
/// Returns [`TransformError::InvalidFileName`] when the path has no file name
/// or the leading token is empty.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn newspaper_uid_from_path(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TransformError::InvalidFileName(path.to_path_buf()))?;

    let uid = file_name.split('_').next().unwrap_or_default();
    if uid.is_empty() {
        return Err(TransformError::InvalidFileName(path.to_path_buf()));
    }

    info!(newspaper_uid = %uid, "Newspaper uid detected");
    Ok(uid.to_string())
}

/// Network location of a URL, exactly as written: host, plus `:port` when one
/// is written out, user-info removed.
///
/// Case and non-ASCII hosts are kept as they appear in the URL; a default
/// port spelled out (`:443`) stays. Parsing only decides whether the URL is
/// usable. Returns an empty string for anything that does not parse as an
/// absolute URL with a host. A bad URL degrades its own row, never the batch.
pub fn host_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match (written_authority(url), parsed.host_str()) {
            (_, None) => String::new(),
            // Lenient spellings such as `https:/site.com` parse but have no `://`.
            ("", Some(host)) => host.to_string(),
            (authority, Some(_)) => authority.to_string(),
        },
        Err(e) => {
            debug!(%url, error = %e, "Unparsable URL; host left empty");
            String::new()
        }
    }
}

/// Authority section of `url` without user-info: the text after `://` up to
/// the first `/`, `?` or `#`.
fn written_authority(url: &str) -> &str {
    let Some((_, rest)) = url.trim().split_once("://") else {
        return "";
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    }
}

/// Candidate title from the final path segment of a URL, hyphens as spaces.
///
/// Returns `None` when the URL ends in `/` and there is no segment to use.
pub fn title_from_url(url: &str) -> Option<String> {
    LAST_SEGMENT
        .captures(url)
        .and_then(|caps| caps.name("slug"))
        .map(|slug| slug.as_str().split('-').collect::<Vec<_>>().join(" "))
}

fn with_newspaper_uid(newspaper_uid: &str) -> impl FnMut(ArticleRecord) -> ArticleRecord + '_ {
    move |mut row| {
        row.newspaper_uid = Some(newspaper_uid.to_string());
        row
    }
}

fn with_host(mut row: ArticleRecord) -> ArticleRecord {
    row.host = Some(host_of(&row.url));
    row
}

fn with_recovered_title(mut row: ArticleRecord) -> ArticleRecord {
    if row.title.is_none() {
        row.title = title_from_url(&row.url);
    }
    row
}

/// Set `newspaper_uid` on every row.
#[instrument(level = "info", skip(table))]
pub fn add_newspaper_uid(table: ArticleTable, newspaper_uid: &str) -> ArticleTable {
    info!(rows = table.len(), "Filling newspaper_uid column");
    table.map_rows(with_newspaper_uid(newspaper_uid))
}

/// Set `host` on every row from its URL.
#[instrument(level = "info", skip_all)]
pub fn extract_host(table: ArticleTable) -> ArticleTable {
    info!(rows = table.len(), "Extracting host from urls");
    table.map_rows(with_host)
}

/// Fill rows whose title is missing with a title recovered from the URL.
#[instrument(level = "info", skip_all)]
pub fn fill_missing_titles(table: ArticleTable) -> ArticleTable {
    let missing = table.rows.iter().filter(|r| r.title.is_none()).count();
    info!(missing, "Filling missing titles");
    table.map_rows(with_recovered_title)
}

/// Run the whole enricher: source tag, host, title recovery.
pub fn enrich(table: ArticleTable, newspaper_uid: &str) -> ArticleTable {
    let table = add_newspaper_uid(table, newspaper_uid);
    let table = extract_host(table);
    fill_missing_titles(table)
}
