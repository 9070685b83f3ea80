//! Source scrapers feeding the script pipelines.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: Pick candidate links (or titles) out of a listing page
//! 2. **Fetching**: Pull text from each candidate, recording failures instead of raising them
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hacker_news`] | HTML scraping | First ten external `https://` story links |
//! | Google Search | [`search`] | HTML scraping | `site:` restricted query; one result visited |
//! | Reddit | [`reddit`] | WebDriver rendering | `h3` post titles from a subreddit listing |
//!
//! Shared HTTP and paragraph extraction helpers live in [`page`].

pub mod hacker_news;
pub mod page;
pub mod reddit;
pub mod search;
