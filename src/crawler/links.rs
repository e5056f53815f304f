//! Link scoping and extraction for the crawler module

use std::collections::BTreeSet;

use scraper::{Html, Selector};
use url::Url;

use crate::crawler::error::CrawlError;

const NON_NAVIGATIONAL_PREFIXES: [&str; 2] = ["mailto:", "javascript:"];

/// Decide whether `candidate` should be followed from a page on `base`.
///
/// A link is in scope when it uses `http`/`https`, points at exactly the same
/// host (and port) as `base` and is not a `mailto:` or `javascript:` link.
/// Subdomains are treated as different sites.
pub fn is_valid_link(candidate: &str, base: &str) -> bool {
    if NON_NAVIGATIONAL_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
    {
        return false;
    }

    let (Ok(link), Ok(base)) = (Url::parse(candidate), Url::parse(base)) else {
        return false;
    };

    matches!(link.scheme(), "http" | "https")
        && link.host_str().is_some()
        && link.host_str() == base.host_str()
        && link.port_or_known_default() == base.port_or_known_default()
}

/// Extract every in-scope link of a page as absolute URLs.
///
/// `href` values are resolved against `page_url`; references that fail to
/// resolve are dropped.
pub fn extract_links(html: &str, page_url: &str) -> Result<BTreeSet<String>, CrawlError> {
    let base = Url::parse(page_url)?;
    let selector = Selector::parse("a[href]")
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse link selector: {}", e)))?;

    let document = Html::parse_document(html);
    let links = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(String::from)
        .filter(|link| is_valid_link(link, page_url))
        .collect();

    Ok(links)
}
