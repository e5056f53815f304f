//! Page retrieval for the crawler module
//!
//! `PageSource` is the seam between the traversal and the network. The HTTP
//! implementation never fails outward: errors are logged and reported as empty
//! text or an empty link set.

use std::collections::BTreeSet;
use std::future::Future;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::crawler::config::CrawlerConfig;
use crate::crawler::content_extraction::extract_visible_text;
use crate::crawler::error::CrawlError;
use crate::crawler::links::extract_links;

/// Source of page text and outgoing links.
pub trait PageSource {
    /// Visible text of `url`, or an empty string if it could not be fetched.
    fn fetch_text(&self, url: &str) -> impl Future<Output = String> + Send;

    /// In-scope absolute links found on `url`, empty if it could not be fetched.
    fn discover_sublinks(&self, url: &str) -> impl Future<Output = BTreeSet<String>> + Send;
}

impl<S: PageSource + Sync> PageSource for &S {
    fn fetch_text(&self, url: &str) -> impl Future<Output = String> + Send {
        (**self).fetch_text(url)
    }

    fn discover_sublinks(&self, url: &str) -> impl Future<Output = BTreeSet<String>> + Send {
        (**self).discover_sublinks(url)
    }
}

/// `PageSource` backed by plain HTTP GET requests.
///
/// Text and links are fetched independently; nothing is cached between the two.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    exclude_tags: Vec<String>,
}

impl HttpFetcher {
    /// Create a fetcher using the timeout, user agent and exclusions of `config`.
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            exclude_tags: config.exclude_tags.clone(),
        })
    }

    /// GET `url` and return the body of a successful response.
    async fn get_html(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

impl PageSource for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_text(&self, url: &str) -> String {
        match self.get_html(url).await {
            Ok(html) => {
                let text = extract_visible_text(&html, &self.exclude_tags);
                debug!("Extracted {} bytes of text from {}", text.len(), url);
                text
            }
            Err(e) => {
                warn!("Error scraping {}: {}", url, e);
                String::new()
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn discover_sublinks(&self, url: &str) -> BTreeSet<String> {
        let links = match self.get_html(url).await {
            Ok(html) => extract_links(&html, url),
            Err(e) => Err(e),
        };

        match links {
            Ok(links) => {
                debug!("Found {} sublinks on {}", links.len(), url);
                links
            }
            Err(e) => {
                warn!("Error finding sublinks on {}: {}", url, e);
                BTreeSet::new()
            }
        }
    }
}
