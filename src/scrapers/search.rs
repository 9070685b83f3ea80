//! Search-engine scraper for programming examples.
//!
//! A single query combines `site:` restrictions for the reference domains with
//! a language and method name. Only one result, at a fixed position in the
//! list of `https://` links, is ever visited.
//!
//! # URL Pattern
//!
//! ```text
//! https://www.google.com/search?q=site%3Aweb.dev+site%3Astackoverflow.com+site%3Afreecodecamp.org+python+for+loop
//! ```
//!
//! Result anchors are usually redirect links (`/url?q=<target>&sa=…`); those
//! are unwrapped to the target before fetching.

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::models::{Article, SkippedLink};
use crate::scrapers::page::{fetch_html, paragraph_text};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Build the search URL for a language/method pair.
pub fn search_url(
    base: &str,
    domains: &[String],
    language: &str,
    method: &str,
) -> Result<Url, Box<dyn Error>> {
    let mut terms: Vec<String> = domains.iter().map(|d| format!("site:{d}")).collect();
    terms.push(language.to_string());
    terms.push(method.to_string());

    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("q", &terms.join(" "));
    Ok(url)
}

/// Every anchor `href` containing `https://`, in document order.
pub fn select_result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("https://"))
        .map(str::to_string)
        .collect()
}

/// Turn a result `href` into an absolute URL to fetch.
///
/// Redirect links carry the destination in their `q` (or `url`) parameter;
/// anything else relative is resolved against the search page.
pub fn resolve_result_href(search_page: &Url, href: &str) -> Result<Url, Box<dyn Error>> {
    let joined = search_page.join(href)?;
    if joined.path() == "/url" {
        let target = joined
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned());
        if let Some(target) = target {
            return Ok(Url::parse(&target)?);
        }
    }
    Ok(joined)
}

/// Search for `language` + `method` and fetch the result at `result_index`.
///
/// Returns the fetched page as an [`Article`] titled `"<language> <method>"`,
/// or a [`SkippedLink`] when the search page, the selected result, or its
/// fetch fails. No other result is tried.
#[instrument(level = "info", skip(client, domains))]
pub async fn fetch_example(
    client: &Client,
    base: &str,
    domains: &[String],
    language: &str,
    method: &str,
    result_index: usize,
) -> Result<Article, SkippedLink> {
    let query_url = search_url(base, domains, language, method)
        .map_err(|e| SkippedLink::new(base, e))?;

    let html = fetch_html(client, query_url.as_str()).await.map_err(|e| {
        warn!(url = %query_url, error = %e, "Search request failed");
        SkippedLink::new(query_url.as_str(), e)
    })?;

    let links = select_result_links(&html);
    info!(count = links.len(), "Indexed search results");

    let Some(href) = links.into_iter().nth(result_index) else {
        warn!(result_index, "Search returned too few results");
        return Err(SkippedLink::new(
            query_url.as_str(),
            format!("no search result at position {result_index}"),
        ));
    };

    let target = resolve_result_href(&query_url, &href).map_err(|e| SkippedLink::new(&href, e))?;
    debug!(%href, %target, "Visiting selected result");

    match fetch_html(client, target.as_str()).await {
        Ok(page) => Ok(Article {
            title: format!("{language} {method}"),
            href: target.to_string(),
            paragraph: paragraph_text(&page),
        }),
        Err(e) => {
            warn!(%target, error = %e, "Result fetch failed; skipping");
            Err(SkippedLink::new(target.as_str(), e))
        }
    }
}
