//! Subreddit listing scraper.
//!
//! Reddit builds its listing client-side, so the page is rendered through a
//! [`PageRenderer`] and post titles are read from the `h3` headings.

use std::error::Error;
use tracing::{info, instrument};
use url::Url;

use crate::browser::PageRenderer;
use crate::utils::collapse_whitespace;

/// CSS selector for post titles on a rendered listing.
pub const TITLE_SELECTOR: &str = "h3";

/// `<base>/r/<subreddit>`
pub fn subreddit_url(base: &str, subreddit: &str) -> Result<Url, Box<dyn Error>> {
    let url = format!(
        "{}/r/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(subreddit)
    );
    Ok(Url::parse(&url)?)
}

/// Render a subreddit listing and return its non-empty post titles in page order.
#[instrument(level = "info", skip(renderer))]
pub async fn fetch_post_titles<R>(
    renderer: &R,
    base: &str,
    subreddit: &str,
) -> Result<Vec<String>, Box<dyn Error>>
where
    R: PageRenderer,
{
    let url = subreddit_url(base, subreddit)?;
    let fragments = renderer.render(&url).await?;
    let total = fragments.len();

    let titles: Vec<String> = fragments
        .iter()
        .map(|t| collapse_whitespace(t))
        .filter(|t| !t.is_empty())
        .collect();

    info!(
        headings = total,
        titles = titles.len(),
        "Extracted subreddit post titles"
    );
    Ok(titles)
}
