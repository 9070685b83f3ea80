//! Browser rendering for pages that only show content after JavaScript runs.
//!
//! [`PageRenderer`] is the capability the scrapers depend on: given a URL,
//! return the visible text of the elements of interest. [`WebDriverRenderer`]
//! implements it on top of a WebDriver service (geckodriver by default) via
//! `fantoccini`; tests swap in a canned renderer.

use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, json};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Render a page and return text fragments from it.
pub trait PageRenderer {
    async fn render(&self, url: &Url) -> Result<Vec<String>, Box<dyn Error>>;
}

/// Renders through a fresh WebDriver session per call.
///
/// The session is always closed before `render` returns, whether the page
/// loaded or not.
pub struct WebDriverRenderer {
    webdriver_url: String,
    selector: String,
    wait: Duration,
    headless: bool,
}

impl WebDriverRenderer {
    /// `selector` picks the elements whose text is returned (e.g. `h3`).
    pub fn new(webdriver_url: &str, selector: &str, wait: Duration, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            selector: selector.to_string(),
            wait,
            headless,
        }
    }

    async fn connect(&self) -> Result<Client, Box<dyn Error>> {
        let mut caps = Map::new();
        if self.headless {
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless", "--disable-gpu"] }),
            );
        }

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.webdriver_url)
            .await?;
        Ok(client)
    }

    async fn extract(&self, client: &Client, url: &Url) -> Result<Vec<String>, Box<dyn Error>> {
        client.goto(url.as_str()).await?;
        sleep(self.wait).await;

        let elements = client.find_all(Locator::Css(&self.selector)).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await?);
        }
        Ok(texts)
    }
}

impl fmt::Debug for WebDriverRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverRenderer")
            .field("webdriver_url", &self.webdriver_url)
            .field("selector", &self.selector)
            .field("wait", &self.wait)
            .finish()
    }
}

impl PageRenderer for WebDriverRenderer {
    #[instrument(level = "info", skip(self), fields(%url, webdriver = %self.webdriver_url))]
    async fn render(&self, url: &Url) -> Result<Vec<String>, Box<dyn Error>> {
        let client = self.connect().await?;
        debug!("WebDriver session opened");

        let result = self.extract(&client, url).await;

        if let Err(e) = client.close().await {
            warn!(error = %e, "Failed to close WebDriver session");
        }

        if let Ok(texts) = &result {
            info!(count = texts.len(), selector = %self.selector, "Rendered page");
        }
        result
    }
}
