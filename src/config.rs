//! Runtime configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults (the values the pipelines were tuned with)
//! 2. An optional YAML file passed with `--config`
//! 3. Environment variables (`OPENAI_SECRET_KEY`, `OPENAI_API_BASE`,
//!    `OPENAI_MODEL`, `WEBDRIVER_URL`)
//!
//! CLI flags are applied on top of that in `main`.
//!
//! # Example
//!
//! ```yaml
//! llm:
//!   model: gpt-4o-mini
//! pacing:
//!   inter_call_delay_secs: 5
//! topics:
//!   history_subreddits: [ushistory, uscivilwar]
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::models::PipelineKind;

/// Environment variable holding the chat-completion API key.
pub const API_KEY_ENV: &str = "OPENAI_SECRET_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub scraping: ScrapingConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
    pub topics: TopicsConfig,
}

/// Chat-completion endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended.
    pub api_base: String,
    pub model: String,
    /// Never read from the YAML file, only from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Extra attempts after a failed model call. `0` disables retrying.
    pub max_retries: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    pub hacker_news_url: String,
    pub search_url: String,
    /// Domains the programming search is restricted to with `site:` terms.
    pub search_domains: Vec<String>,
    pub reddit_url: String,
    pub webdriver_url: String,
    /// Run the WebDriver browser without a window.
    pub headless_browser: bool,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// How many front-page links the tech collector keeps.
    pub max_links: usize,
    /// Characters of page text kept per tech article.
    pub article_char_limit: usize,
    /// Zero-based position of the search result the programming collector visits.
    pub result_index: usize,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            hacker_news_url: "https://news.ycombinator.com/".to_string(),
            search_url: "https://www.google.com/search".to_string(),
            search_domains: vec![
                "web.dev".to_string(),
                "stackoverflow.com".to_string(),
                "freecodecamp.org".to_string(),
            ],
            reddit_url: "https://www.reddit.com".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            headless_browser: true,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            request_timeout_secs: 30,
            max_links: 10,
            article_char_limit: 4096,
            result_index: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each model call.
    pub inter_call_delay_secs: u64,
    /// Time given to the browser to render the subreddit listing.
    pub render_wait_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_call_delay_secs: 2,
            render_wait_secs: 5,
        }
    }
}

impl PacingConfig {
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_secs(self.inter_call_delay_secs)
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub tech_dir: PathBuf,
    pub programming_dir: PathBuf,
    pub history_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tech_dir: PathBuf::from("tech_video_scripts"),
            programming_dir: PathBuf::from("programming_video_scripts"),
            history_dir: PathBuf::from("history_video_scripts"),
        }
    }
}

impl OutputConfig {
    /// Directory a pipeline writes its scripts into.
    pub fn dir_for(&self, pipeline: PipelineKind) -> &Path {
        match pipeline {
            PipelineKind::Tech => &self.tech_dir,
            PipelineKind::Programming => &self.programming_dir,
            PipelineKind::History => &self.history_dir,
        }
    }

    /// Re-anchor relative output directories under `root`.
    pub fn rooted_at(&mut self, root: &Path) {
        for dir in [
            &mut self.tech_dir,
            &mut self.programming_dir,
            &mut self.history_dir,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    pub programming_languages: Vec<String>,
    pub programming_methods: Vec<String>,
    pub history_subreddits: Vec<String>,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            programming_languages: owned(&["python", "javascript", "c++", "ansible", "bash"]),
            programming_methods: owned(&[
                "list comprehension",
                "for loop",
                "while loop",
                "if statement",
                "function",
                "class",
                "object",
                "dictionary",
                "list",
                "tuple",
                "set",
            ]),
            history_subreddits: owned(&[
                "worldhistory",
                "anthropology",
                "archaeology",
                "ushistory",
                "americanhistory",
                "uscivilwar",
                "mesoamerica",
                "uspresidentialhistory",
                "historyoftheamericas",
                "historyoftexas",
            ]),
        }
    }
}

impl TopicsConfig {
    /// Language/method pair used when the CLI names neither: the first
    /// language and the fourth method (falling back to the first).
    pub fn programming_pair(
        &self,
        language: Option<&str>,
        method: Option<&str>,
    ) -> Result<(String, String), Box<dyn Error>> {
        let language = match language {
            Some(l) => l.to_string(),
            None => self
                .programming_languages
                .first()
                .cloned()
                .ok_or("no programming languages configured")?,
        };
        let method = match method {
            Some(m) => m.to_string(),
            None => self
                .programming_methods
                .get(3)
                .or_else(|| self.programming_methods.first())
                .cloned()
                .ok_or("no programming methods configured")?,
        };
        Ok((language, method))
    }

    /// Subreddit used when the CLI names none: the first configured one.
    pub fn subreddit(&self, requested: Option<&str>) -> Result<String, Box<dyn Error>> {
        match requested {
            Some(s) => Ok(s.trim_start_matches("r/").to_string()),
            None => Ok(self
                .history_subreddits
                .first()
                .cloned()
                .ok_or("no history subreddits configured")?),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. Missing sections and fields fall back to defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Box<dyn Error>> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build the effective configuration: defaults, then `path` if given,
    /// then the process environment.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let mut config = match path {
            Some(p) => {
                let raw = tokio::fs::read_to_string(p).await?;
                let parsed = Self::from_yaml_str(&raw)?;
                info!(path = %p.display(), "Loaded configuration file");
                parsed
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        debug!(?config, "Effective configuration");
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = non_empty("OPENAI_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = non_empty("WEBDRIVER_URL") {
            self.scraping.webdriver_url = url;
        }
    }
}
