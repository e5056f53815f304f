//! # Crawler Configuration Module
//!
//! Options for the company crawler: traversal depth, HTTP identity and
//! timeout, which elements count as boilerplate, optional pacing between
//! fetches and how the visited set is shared between seeds. Built with a
//! builder, like the rest of the configuration in this crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser-like identification sent with every page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// How the visited set is scoped across seeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// One visited set for the whole run. A page reached from two seeds only
    /// lands in the corpus of the first seed that reached it.
    #[default]
    Global,

    /// A fresh visited set per seed. Every seed's corpus is complete, at the
    /// cost of refetching pages shared between seeds.
    PerSeed,
}

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Number of levels to fetch, the seed itself being level 0
    pub max_depth: u32,

    /// Timeout for each page request
    pub timeout: Duration,

    /// User agent to use for requests
    pub user_agent: String,

    /// Element names dropped before text extraction
    pub exclude_tags: Vec<String>,

    /// Minimum spacing between page fetches in milliseconds (0 disables pacing)
    pub rate_limit_ms: u64,

    /// Visited-set scope
    pub dedup: DedupPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            exclude_tags: default_exclude_tags(),
            rate_limit_ms: 0,
            dedup: DedupPolicy::Global,
        }
    }
}

pub(crate) fn default_exclude_tags() -> Vec<String> {
    ["script", "style", "head", "meta", "nav", "footer"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the number of levels to fetch
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the element names stripped before text extraction
    pub fn exclude_tags(mut self, exclude_tags: Vec<String>) -> Self {
        self.config.exclude_tags = exclude_tags;
        self
    }

    /// Set the minimum spacing between fetches in milliseconds
    pub fn rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.config.rate_limit_ms = rate_limit_ms;
        self
    }

    /// Set the visited-set scope
    pub fn dedup(mut self, dedup: DedupPolicy) -> Self {
        self.config.dedup = dedup;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the rate limit as a Duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_strip_boilerplate_tags() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.dedup, DedupPolicy::Global);
        for tag in ["script", "style", "head", "meta", "nav", "footer"] {
            assert!(config.exclude_tags.iter().any(|t| t == tag), "missing {tag}");
        }
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlerConfig::builder()
            .max_depth(1)
            .rate_limit_ms(250)
            .user_agent("test-agent")
            .dedup(DedupPolicy::PerSeed)
            .build();

        assert_eq!(config.max_depth, 1);
        assert_eq!(config.rate_limit(), Duration::from_millis(250));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.dedup, DedupPolicy::PerSeed);
    }
}
