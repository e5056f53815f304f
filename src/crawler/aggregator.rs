//! Depth-bounded, per-company crawl aggregation.
//!
//! Each seed is crawled level by level: every URL of the current frontier is
//! fetched at most once, its text is appended to the seed's company corpus and,
//! except on the last level, its sublinks form the next frontier. Seeds are
//! processed sequentially, in input order.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, info_span, instrument, warn, Instrument};
use url::Url;

use crate::crawler::config::{CrawlerConfig, DedupPolicy};
use crate::crawler::error::CrawlError;
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::crawler::{CompanyId, Corpus};
use crate::pacer::{GovernorPacer, Pacer};

/// URLs already fetched during a crawl.
///
/// Owned by whoever drives the traversal and passed down explicitly.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` as visited. Returns `true` the first time a URL is seen.
    pub fn mark(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Counters collected over one crawl run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched with non-empty text
    pub pages_with_content: usize,
    /// Pages fetched that produced no text
    pub pages_empty: usize,
    /// Frontier entries skipped because they were already visited
    pub pages_skipped: usize,
    /// Seeds that could not be processed at all
    pub seeds_failed: usize,
}

impl CrawlStats {
    /// Total number of fetch attempts.
    pub fn pages_fetched(&self) -> usize {
        self.pages_with_content + self.pages_empty
    }
}

/// Result of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Accumulated text per company. Companies without any content are absent.
    pub corpora: HashMap<CompanyId, Corpus>,
    pub stats: CrawlStats,
}

/// Crawls seeds through a `PageSource` and groups page text by company.
pub struct Crawler<S, P = GovernorPacer> {
    source: S,
    pacer: P,
    config: CrawlerConfig,
}

impl Crawler<HttpFetcher, GovernorPacer> {
    /// Crawler that fetches over HTTP with the settings of `config`.
    pub fn from_config(config: CrawlerConfig) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<S: PageSource> Crawler<S, GovernorPacer> {
    /// Create a crawler whose fetch pacing follows `config.rate_limit_ms`.
    pub fn new(source: S, config: CrawlerConfig) -> Self {
        let pacer = GovernorPacer::with_period(config.rate_limit());
        Self::with_pacer(source, pacer, config)
    }
}

impl<S: PageSource, P: Pacer> Crawler<S, P> {
    /// Create a crawler with an explicit fetch pacer.
    pub fn with_pacer(source: S, pacer: P, config: CrawlerConfig) -> Self {
        Self {
            source,
            pacer,
            config,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl every seed and return the per-company corpora.
    ///
    /// A seed that cannot be processed is logged and skipped; the remaining
    /// seeds are still crawled.
    #[instrument(skip(self, seeds), fields(seeds = seeds.len(), max_depth = self.config.max_depth))]
    pub async fn crawl(&self, seeds: &[String]) -> CrawlOutcome {
        let mut outcome = CrawlOutcome::default();
        let mut visited = VisitedSet::new();

        for seed in seeds {
            if self.config.dedup == DedupPolicy::PerSeed {
                visited = VisitedSet::new();
            }

            info!("Scraping {}...", seed);
            let result = self
                .crawl_seed(seed, &mut visited, &mut outcome)
                .instrument(info_span!("crawl_seed", seed = %seed))
                .await;

            if let Err(e) = result {
                warn!("Error processing {}: {}", seed, e);
                outcome.stats.seeds_failed += 1;
            }
        }

        info!(
            companies = outcome.corpora.len(),
            fetched = outcome.stats.pages_fetched(),
            skipped = outcome.stats.pages_skipped,
            "Crawl finished"
        );
        outcome
    }

    /// Breadth-first traversal of one seed, `max_depth` levels deep.
    async fn crawl_seed(
        &self,
        seed: &str,
        visited: &mut VisitedSet,
        outcome: &mut CrawlOutcome,
    ) -> Result<(), CrawlError> {
        Url::parse(seed)?;
        let company = CompanyId::from_url(seed);
        let max_depth = self.config.max_depth;

        let mut frontier = vec![seed.to_string()];
        for depth in 0..max_depth {
            let mut next_frontier = Vec::new();

            for url in &frontier {
                if !visited.mark(url) {
                    outcome.stats.pages_skipped += 1;
                    continue;
                }

                self.pacer.ready().await;
                let content = self.source.fetch_text(url).await;
                if content.is_empty() {
                    outcome.stats.pages_empty += 1;
                    info!("No content found for {}.", url);
                } else {
                    outcome.stats.pages_with_content += 1;
                    outcome
                        .corpora
                        .entry(company.clone())
                        .or_default()
                        .push_page(url, &content);
                    info!("Successfully scraped content from {}.", url);
                }

                if depth + 1 < max_depth {
                    let sublinks = self.source.discover_sublinks(url).await;
                    debug!("Queueing {} sublinks from {}", sublinks.len(), url);
                    next_frontier.extend(sublinks);
                }
            }

            frontier = next_frontier;
        }

        Ok(())
    }
}
