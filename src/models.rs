//! Data models for scraped sources and pipeline results.
//!
//! - [`Article`]: A page scraped from a link, ready to be turned into a script
//! - [`SkippedLink`]: A link that could not be scraped, with the reason
//! - [`Collection`]: What a collector hands back: articles plus skips
//! - [`PipelineReport`]: What a pipeline run produced on disk

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A scraped page, keyed by the link it was found under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The anchor text of the link (or the search pair for programming examples).
    pub title: String,
    /// The absolute URL that was fetched.
    pub href: String,
    /// Text of every `<p>` element on the page, joined by single spaces.
    pub paragraph: String,
}

impl Article {
    /// Cut the paragraph text down to at most `limit` characters.
    ///
    /// The stored text is always a prefix of the original.
    pub fn truncate(&mut self, limit: usize) {
        if let Some((idx, _)) = self.paragraph.char_indices().nth(limit) {
            self.paragraph.truncate(idx);
        }
    }
}

/// A link the collector gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLink {
    pub href: String,
    pub reason: String,
}

impl SkippedLink {
    pub fn new(href: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            href: href.into(),
            reason: reason.to_string(),
        }
    }
}

/// Per-item outcome of a best-effort scrape over a batch of links.
#[derive(Debug, Default)]
pub struct Collection {
    pub articles: Vec<Article>,
    pub skipped: Vec<SkippedLink>,
}

impl Collection {
    pub fn push_ok(&mut self, article: Article) {
        self.articles.push(article);
    }

    pub fn push_skip(&mut self, skipped: SkippedLink) {
        self.skipped.push(skipped);
    }
}

/// The three pipelines the binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Tech,
    Programming,
    History,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineKind::Tech => "tech",
            PipelineKind::Programming => "programming",
            PipelineKind::History => "history",
        };
        f.write_str(name)
    }
}

/// Summary of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub pipeline: PipelineKind,
    /// Script files written, in the order they were produced.
    pub scripts: Vec<PathBuf>,
    /// Items dropped along the way.
    pub skipped: Vec<SkippedLink>,
}

impl PipelineReport {
    pub fn new(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            scripts: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Fold another report of the same pipeline into this one.
    pub fn absorb(&mut self, other: PipelineReport) {
        self.scripts.extend(other.scripts);
        self.skipped.extend(other.skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(paragraph: &str) -> Article {
        Article {
            title: "Test".to_string(),
            href: "https://example.com".to_string(),
            paragraph: paragraph.to_string(),
        }
    }

    #[test]
    fn test_truncate_long_paragraph() {
        let original = "x".repeat(5000);
        let mut a = article(&original);
        a.truncate(4096);
        assert_eq!(a.paragraph.chars().count(), 4096);
        assert!(original.starts_with(&a.paragraph));
    }

    #[test]
    fn test_truncate_short_paragraph_untouched() {
        let mut a = article("short text");
        a.truncate(4096);
        assert_eq!(a.paragraph, "short text");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let original = "é".repeat(10);
        let mut a = article(&original);
        a.truncate(4);
        assert_eq!(a.paragraph, "éééé");
    }

    #[test]
    fn test_skipped_link_from_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let skipped = SkippedLink::new("https://example.com", err);
        assert_eq!(skipped.href, "https://example.com");
        assert_eq!(skipped.reason, "boom");
    }

    #[test]
    fn test_report_absorb() {
        let mut a = PipelineReport::new(PipelineKind::History);
        a.scripts.push(PathBuf::from("one.txt"));
        let mut b = PipelineReport::new(PipelineKind::History);
        b.scripts.push(PathBuf::from("two.txt"));
        b.skipped.push(SkippedLink::new("r/x", "empty"));
        a.absorb(b);
        assert_eq!(a.scripts.len(), 2);
        assert_eq!(a.skipped.len(), 1);
    }

    #[test]
    fn test_pipeline_kind_display() {
        assert_eq!(PipelineKind::Tech.to_string(), "tech");
        assert_eq!(
            serde_json::to_string(&PipelineKind::Programming).unwrap(),
            "\"programming\""
        );
    }
}
