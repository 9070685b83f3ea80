//! The three script pipelines.
//!
//! Each pipeline runs strictly in sequence: scrape, prompt, write, pause,
//! next item. Scraping failures are collected into the [`PipelineReport`];
//! a failed model call or file write ends the run with an error.

use chrono::{Local, NaiveDate};
use itertools::iproduct;
use reqwest::Client;
use std::error::Error;
use std::path::Path;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::api::AskAsync;
use crate::browser::PageRenderer;
use crate::config::AppConfig;
use crate::models::{PipelineKind, PipelineReport, SkippedLink};
use crate::outputs::scripts::script_path;
use crate::prompts;
use crate::scrapers::{hacker_news, reddit, search};
use crate::summary::generate_summary;

/// Everything a pipeline needs from the outside world.
pub struct PipelineContext<'a, A> {
    pub http: &'a Client,
    pub ask: &'a A,
    pub config: &'a AppConfig,
    /// Fixed date for script file names. `None` stamps each file with the
    /// local date at the moment it is written.
    pub date: Option<NaiveDate>,
}

impl<A> PipelineContext<'_, A>
where
    A: AskAsync<Response = String>,
{
    fn script_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Generate one script, record its path, then pause.
    async fn write_one(
        &self,
        report: &mut PipelineReport,
        title: &str,
        prompt: &str,
        directory: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let date = self.script_date();
        generate_summary(self.ask, title, prompt, directory, date).await?;
        report.scripts.push(script_path(directory, title, date));
        sleep(self.config.pacing.inter_call_delay()).await;
        Ok(())
    }
}

/// Hacker News front page → one script per story.
#[instrument(level = "info", skip_all)]
pub async fn run_tech<A>(ctx: &PipelineContext<'_, A>) -> Result<PipelineReport, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
{
    let scraping = &ctx.config.scraping;
    let mut report = PipelineReport::new(PipelineKind::Tech);

    let links =
        hacker_news::index_stories(ctx.http, &scraping.hacker_news_url, scraping.max_links)
            .await?;
    let collection = hacker_news::collect_articles(ctx.http, links).await;
    report.skipped.extend(collection.skipped);

    let total = collection.articles.len();
    for (i, mut article) in collection.articles.into_iter().enumerate() {
        article.truncate(scraping.article_char_limit);
        info!(index = i + 1, total, title = %article.title, "Writing tech script");

        let prompt = prompts::tech_article(&article.title, &article.paragraph);
        ctx.write_one(&mut report, &article.title, &prompt, &ctx.config.output.tech_dir)
            .await?;
    }

    Ok(report)
}

/// One language/method pair → at most one script.
#[instrument(level = "info", skip(ctx))]
pub async fn run_programming<A>(
    ctx: &PipelineContext<'_, A>,
    language: &str,
    method: &str,
) -> Result<PipelineReport, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
{
    let scraping = &ctx.config.scraping;
    let mut report = PipelineReport::new(PipelineKind::Programming);

    match search::fetch_example(
        ctx.http,
        &scraping.search_url,
        &scraping.search_domains,
        language,
        method,
        scraping.result_index,
    )
    .await
    {
        Ok(article) => {
            ctx.write_one(
                &mut report,
                &article.title,
                &article.paragraph,
                &ctx.config.output.programming_dir,
            )
            .await?;
        }
        Err(skipped) => report.skipped.push(skipped),
    }

    Ok(report)
}

/// Every configured language × method pair, in list order.
#[instrument(level = "info", skip_all)]
pub async fn run_programming_all<A>(
    ctx: &PipelineContext<'_, A>,
) -> Result<PipelineReport, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
{
    let topics = &ctx.config.topics;
    let mut report = PipelineReport::new(PipelineKind::Programming);

    for (language, method) in iproduct!(&topics.programming_languages, &topics.programming_methods)
    {
        report.absorb(run_programming(ctx, language, method).await?);
    }
    Ok(report)
}

/// Subreddit listing → one script per post title.
///
/// A listing that cannot be rendered is recorded as skipped.
#[instrument(level = "info", skip(ctx, renderer))]
pub async fn run_history<A, R>(
    ctx: &PipelineContext<'_, A>,
    renderer: &R,
    subreddit: &str,
) -> Result<PipelineReport, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
    R: PageRenderer,
{
    let mut report = PipelineReport::new(PipelineKind::History);

    let titles =
        match reddit::fetch_post_titles(renderer, &ctx.config.scraping.reddit_url, subreddit).await
        {
            Ok(titles) => titles,
            Err(e) => {
                warn!(%subreddit, error = %e, "Could not render subreddit; skipping");
                report
                    .skipped
                    .push(SkippedLink::new(format!("r/{subreddit}"), e));
                return Ok(report);
            }
        };

    for title in &titles {
        let prompt = prompts::history_post(subreddit, title);
        ctx.write_one(&mut report, title, &prompt, &ctx.config.output.history_dir)
            .await?;
    }

    info!(?titles, "Processed subreddit posts");
    Ok(report)
}

/// Walk `subreddits` in order, one listing each.
#[instrument(level = "info", skip(ctx, renderer))]
pub async fn run_history_all<A, R>(
    ctx: &PipelineContext<'_, A>,
    renderer: &R,
    subreddits: &[String],
) -> Result<PipelineReport, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
    R: PageRenderer,
{
    let mut report = PipelineReport::new(PipelineKind::History);
    for subreddit in subreddits {
        report.absorb(run_history(ctx, renderer, subreddit).await?);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::reddit::tests::CannedRenderer;
    use crate::summary::tests::{CannedAsk, FailingAsk};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Config pointing at `server_uri` with all output under `tmp` and no pauses.
    fn test_config(server_uri: &str, tmp: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.pacing.inter_call_delay_secs = 0;
        config.scraping.hacker_news_url = format!("{server_uri}/");
        config.scraping.search_url = format!("{server_uri}/search");
        config.scraping.reddit_url = server_uri.to_string();
        config.output.rooted_at(tmp.path());
        for dir in [
            &config.output.tech_dir,
            &config.output.programming_dir,
            &config.output.history_dir,
        ] {
            std::fs::create_dir_all(dir).unwrap();
        }
        config
    }

    async fn mount_html(server: &MockServer, route: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn front_page(uri: &str) -> String {
        format!(
            r#"<html><body>
            <a href="{uri}/one?via=https://news">First Story</a>
            <a href="item?id=1">comments</a>
            <a href="{uri}/broken?via=https://news">Broken Story</a>
            <a href="{uri}/long?via=https://news">Long Story</a>
            </body></html>"#
        )
    }

    #[tokio::test]
    async fn test_run_tech_writes_scripts_and_skips_failures() {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount_html(&server, "/", 200, front_page(&uri)).await;
        mount_html(&server, "/one", 200, "<p>Short body.</p>".to_string()).await;
        mount_html(&server, "/broken", 500, String::new()).await;
        mount_html(&server, "/long", 200, format!("<p>{}</p>", "x".repeat(5000))).await;

        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(&uri, &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("SCRIPT");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };

        let report = run_tech(&ctx).await.unwrap();

        assert_eq!(report.scripts.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].href.contains("/broken"));

        let first = config.output.tech_dir.join("First Story 2024-01-01.txt");
        assert_eq!(std::fs::read_to_string(first).unwrap(), "SCRIPT");
        assert!(config.output.tech_dir.join("Long Story 2024-01-01.txt").exists());

        let prompts = ask.prompts.borrow();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Here is the title: First Story."));
        let expected_tail = format!("unrelated information: {}", "x".repeat(4096));
        assert!(prompts[1].ends_with(&expected_tail));
        assert!(!prompts[1].contains(&"x".repeat(4097)));
    }

    #[tokio::test]
    async fn test_run_tech_model_failure_aborts() {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount_html(&server, "/", 200, front_page(&uri)).await;
        mount_html(&server, "/one", 200, "<p>Body.</p>".to_string()).await;
        mount_html(&server, "/broken", 500, String::new()).await;
        mount_html(&server, "/long", 200, "<p>Body.</p>".to_string()).await;

        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(&uri, &tmp);
        let http = Client::new();
        let ctx = PipelineContext {
            http: &http,
            ask: &FailingAsk,
            config: &config,
            date: Some(jan_first()),
        };

        let err = run_tech(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(std::fs::read_dir(&config.output.tech_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_programming_forwards_raw_text() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let results: String = (0..6)
            .map(|i| format!(r#"<a href="{uri}/result/{i}?r=https://x">r{i}</a>"#))
            .collect();
        mount_html(&server, "/search", 200, results).await;
        let body = "y".repeat(6000);
        mount_html(&server, "/result/3", 200, format!("<p>{body}</p>")).await;

        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(&uri, &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("CODE SCRIPT");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };

        let report = run_programming(&ctx, "python", "if statement").await.unwrap();

        assert_eq!(report.scripts.len(), 1);
        assert!(report.skipped.is_empty());
        let written = config
            .output
            .programming_dir
            .join("python if statement 2024-01-01.txt");
        assert_eq!(std::fs::read_to_string(written).unwrap(), "CODE SCRIPT");
        assert_eq!(ask.prompts.borrow().as_slice(), [body]);
    }

    #[tokio::test]
    async fn test_run_programming_all_covers_every_pair() {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount_html(&server, "/search", 200, "<html></html>".to_string()).await;

        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(&uri, &tmp);
        config.topics.programming_languages = vec!["rust".to_string(), "go".to_string()];
        config.topics.programming_methods =
            vec!["match".to_string(), "loop".to_string(), "trait".to_string()];
        let http = Client::new();
        let ask = CannedAsk::replying("unused");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };

        let report = run_programming_all(&ctx).await.unwrap();
        assert!(report.scripts.is_empty());
        assert_eq!(report.skipped.len(), 6);
        assert!(ask.prompts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_run_history_prompts_per_title() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config("https://www.reddit.com", &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("HISTORY");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };
        let renderer = CannedRenderer::with(&["", "Who built Cahokia?", "The 1918 flu / pandemic"]);

        let report = run_history(&ctx, &renderer, "americanhistory").await.unwrap();

        assert_eq!(report.scripts.len(), 2);
        let dir = &config.output.history_dir;
        assert!(dir.join("Who built Cahokia_ 2024-01-01.txt").exists());
        assert!(dir.join("The 1918 flu _ pandemic 2024-01-01.txt").exists());

        let prompts = ask.prompts.borrow();
        assert!(prompts[0].contains("r/americanhistory"));
        assert!(prompts[0].ends_with("Here is the title: Who built Cahokia?."));
    }

    #[tokio::test]
    async fn test_run_history_render_failure_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config("https://www.reddit.com", &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("HISTORY");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };
        let renderer = CannedRenderer {
            fail: true,
            ..CannedRenderer::default()
        };

        let report = run_history(&ctx, &renderer, "ushistory").await.unwrap();
        assert!(report.scripts.is_empty());
        assert_eq!(report.skipped[0].href, "r/ushistory");
    }

    #[tokio::test]
    async fn test_run_history_all_visits_each_subreddit() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config("https://www.reddit.com", &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("HISTORY");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };
        let renderer = CannedRenderer::with(&["A title"]);
        let subreddits = vec!["ushistory".to_string(), "uscivilwar".to_string()];

        let report = run_history_all(&ctx, &renderer, &subreddits).await.unwrap();

        // Same title on the same day: the second write replaces the first.
        assert_eq!(report.scripts.len(), 2);
        assert_eq!(
            std::fs::read_dir(&config.output.history_dir).unwrap().count(),
            1
        );
        assert_eq!(
            renderer.visited.borrow().as_slice(),
            [
                "https://www.reddit.com/r/ushistory".to_string(),
                "https://www.reddit.com/r/uscivilwar".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_unset_date_stamps_today() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config("https://www.reddit.com", &tmp);
        let http = Client::new();
        let ask = CannedAsk::replying("HISTORY");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: None,
        };
        let renderer = CannedRenderer::with(&["Cahokia"]);

        let before = Local::now().date_naive();
        let report = run_history(&ctx, &renderer, "ushistory").await.unwrap();
        let after = Local::now().date_naive();

        let dir = &config.output.history_dir;
        let stamped = |d: NaiveDate| dir.join(format!("Cahokia {}.txt", d.format("%Y-%m-%d")));
        assert_eq!(report.scripts.len(), 1);
        assert!(report.scripts[0] == stamped(before) || report.scripts[0] == stamped(after));
        assert!(report.scripts[0].exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_after_every_model_call() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config("https://www.reddit.com", &tmp);
        config.pacing.inter_call_delay_secs = 2;
        let http = Client::new();
        let ask = CannedAsk::replying("HISTORY");
        let ctx = PipelineContext {
            http: &http,
            ask: &ask,
            config: &config,
            date: Some(jan_first()),
        };
        let renderer = CannedRenderer::with(&["One", "Two", "Three"]);

        let start = tokio::time::Instant::now();
        let report = run_history(&ctx, &renderer, "ushistory").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(report.scripts.len(), 3);
        assert_eq!(ask.prompts.borrow().len(), 3);
        assert!(elapsed >= std::time::Duration::from_secs(6), "{elapsed:?}");
        assert!(elapsed < std::time::Duration::from_secs(8), "{elapsed:?}");
    }
}
