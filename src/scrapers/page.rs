//! Shared page fetching and text extraction.

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::ScrapingConfig;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Build the HTTP client shared by every scraper and the model client.
pub fn build_http_client(config: &ScrapingConfig) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// GET `url` and return the body as text.
///
/// Non-success statuses are errors, so an error page never gets mistaken
/// for article content.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}

/// Text of every `<p>` element in document order, joined by single spaces.
///
/// Text inside a paragraph is kept as the page has it; only the separator
/// between paragraphs is normalized.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
