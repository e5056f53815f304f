//! # Company Website Crawler
//!
//! Gathers the raw material for the question-answering pass: every seed URL is
//! crawled a small, fixed number of levels deep, restricted to its own host,
//! and the visible text of each page is accumulated into one corpus per
//! company.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: depth, HTTP identity, boilerplate tags and dedup policy
//! - `HttpFetcher`: the `PageSource` that talks to real websites
//! - `Crawler`: the level-by-level traversal and per-company aggregation
//! - `CorpusStore`: reads and writes `<company>.txt` corpus files
//!
//! Pages are fetched at most once per run. A page that fails to load simply
//! contributes nothing.

mod aggregator;
mod config;
mod content_extraction;
mod error;
mod fetcher;
mod links;
pub mod storage;

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

pub use aggregator::{CrawlOutcome, CrawlStats, Crawler, VisitedSet};
pub use config::{CrawlerConfig, CrawlerConfigBuilder, DedupPolicy, DEFAULT_USER_AGENT};
pub use content_extraction::extract_visible_text;
pub use error::CrawlError;
pub use fetcher::{HttpFetcher, PageSource};
pub use links::{extract_links, is_valid_link};
pub use storage::{CorpusStore, StorageError};

/// Key used when a seed's hostname has no second label.
pub const UNKNOWN_COMPANY: &str = "unknown";

/// Name under which all content reached from one seed is grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the company from a URL: the second label of its hostname, so
    /// `https://www.gm.com/x` becomes `gm`.
    ///
    /// Hostnames with a single label, and URLs without a host, map to
    /// [`UNKNOWN_COMPANY`].
    pub fn from_url(url: &str) -> Self {
        let host = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string));

        let name = host
            .as_deref()
            .and_then(|host| host.split('.').nth(1))
            .filter(|label| !label.is_empty())
            .unwrap_or(UNKNOWN_COMPANY);

        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text accumulated for one company, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    text: String,
    sources: Vec<String>,
}

impl Corpus {
    /// Append the text of one page under a delimiter naming its URL.
    pub fn push_page(&mut self, url: &str, content: &str) {
        self.text
            .push_str(&format!("\n\n--- Content from {} ---\n\n{}", url, content));
        self.sources.push(url.to_string());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// URLs that contributed content, in the order they were appended.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
