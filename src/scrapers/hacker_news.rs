//! Hacker News front page scraper.
//!
//! The front page mixes external story links with internal navigation
//! (`item?id=` comment threads, `from?site=`, `user?id=`, …). Only anchors
//! whose target contains `https://` and is not an `item?id=` link are kept,
//! which leaves the outbound story links in page order.

use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

use crate::models::{Article, Collection, SkippedLink};
use crate::scrapers::page::{fetch_html, paragraph_text};
use crate::utils::collapse_whitespace;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// A front-page link before its target has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryLink {
    pub title: String,
    pub href: String,
}

fn is_story_href(href: &str) -> bool {
    !href.starts_with("item?id=") && href.contains("https://")
}

/// Pick at most `limit` story links out of a front page, in document order.
pub fn select_story_links(html: &str, limit: usize) -> Vec<StoryLink> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            is_story_href(href).then(|| StoryLink {
                title: collapse_whitespace(&a.text().collect::<String>()),
                href: href.to_string(),
            })
        })
        .take(limit)
        .collect()
}

/// Fetch the front page at `url` and index its story links.
#[instrument(level = "info", skip(client))]
pub async fn index_stories(
    client: &Client,
    url: &str,
    limit: usize,
) -> Result<Vec<StoryLink>, Box<dyn Error>> {
    let html = fetch_html(client, url).await?;
    let links = select_story_links(&html, limit);
    info!(count = links.len(), source = url, "Indexed Hacker News stories");
    debug!(links = ?links, "Hacker News links");
    Ok(links)
}

/// Fetch every story one after another.
///
/// A link that fails to fetch is recorded in [`Collection::skipped`] and the
/// batch carries on; it is never retried.
#[instrument(level = "info", skip_all, fields(count = links.len()))]
pub async fn collect_articles(client: &Client, links: Vec<StoryLink>) -> Collection {
    let outcomes: Vec<Result<Article, SkippedLink>> = stream::iter(links)
        .then(|link| async move {
            match fetch_html(client, &link.href).await {
                Ok(html) => {
                    let paragraph = paragraph_text(&html);
                    debug!(href = %link.href, chars = paragraph.chars().count(), "Fetched story");
                    Ok(Article {
                        title: link.title,
                        href: link.href,
                        paragraph,
                    })
                }
                Err(e) => {
                    warn!(href = %link.href, error = %e, "Story fetch failed; skipping");
                    Err(SkippedLink::new(link.href, e))
                }
            }
        })
        .collect()
        .await;

    let mut collection = Collection::default();
    for outcome in outcomes {
        match outcome {
            Ok(article) => collection.push_ok(article),
            Err(skipped) => collection.push_skip(skipped),
        }
    }

    info!(
        fetched = collection.articles.len(),
        skipped = collection.skipped.len(),
        "Fetched Hacker News story contents"
    );
    collection
}
