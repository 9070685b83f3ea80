//! # Awful Video Scripts
//!
//! Scrapes text from the web and turns it into one minute video scripts with
//! an OpenAI-compatible LLM, one plain-text file per script.
//!
//! ## Pipelines
//!
//! - **tech**: Hacker News front page stories → `tech_video_scripts/`
//! - **programming**: a `site:`-restricted search result for a language and
//!   method → `programming_video_scripts/`
//! - **history**: subreddit post titles rendered through WebDriver →
//!   `history_video_scripts/`
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_SECRET_KEY=sk-... awful_video_scripts
//! awful_video_scripts programming -l python -m "list comprehension"
//! awful_video_scripts history --subreddit ushistory
//! ```
//!
//! Every step runs in sequence with a fixed pause after each model call.
//! Pages that fail to scrape are skipped and counted; a failed model call or
//! file write stops the run.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod browser;
mod cli;
mod config;
mod models;
mod outputs;
mod pipelines;
mod prompts;
mod scrapers;
mod summary;
mod utils;

use api::build_script_writer;
use browser::WebDriverRenderer;
use cli::{Cli, Command};
use config::AppConfig;
use pipelines::PipelineContext;
use scrapers::page::build_http_client;
use scrapers::reddit::TITLE_SELECTOR;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("video script run starting up");

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref()).await?;
    if let Some(root) = &args.output_root {
        config.output.rooted_at(root);
    }
    if let Some(delay) = args.delay_secs {
        config.pacing.inter_call_delay_secs = delay;
    }
    if config.llm.api_key.is_none() {
        warn!(
            "{} is not set; the first model call will fail",
            config::API_KEY_ENV
        );
    }

    let command = args.command();
    let kind = command.kind();
    let output_dir = config.output.dir_for(kind);

    if args.create_dirs {
        if let Err(e) = ensure_writable_dir(output_dir).await {
            error!(
                path = %output_dir.display(),
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    } else if !output_dir.is_dir() {
        warn!(
            path = %output_dir.display(),
            "Output directory does not exist; pass --create-dirs to create it"
        );
    }

    let http = build_http_client(&config.scraping)?;
    let writer = build_script_writer(http.clone(), &config.llm);
    let ctx = PipelineContext {
        http: &http,
        ask: &writer,
        config: &config,
        date: None,
    };
    info!(pipeline = %kind, date = %Local::now().date_naive(), "Running pipeline");

    let outcome = match command {
        Command::Tech => pipelines::run_tech(&ctx).await,
        Command::Programming {
            all_pairs: true, ..
        } => pipelines::run_programming_all(&ctx).await,
        Command::Programming {
            language, method, ..
        } => {
            let (language, method) = config
                .topics
                .programming_pair(language.as_deref(), method.as_deref())?;
            pipelines::run_programming(&ctx, &language, &method).await
        }
        Command::History { subreddit, all_subreddits } => {
            let renderer = WebDriverRenderer::new(
                &config.scraping.webdriver_url,
                TITLE_SELECTOR,
                config.pacing.render_wait(),
                config.scraping.headless_browser,
            );
            if all_subreddits {
                pipelines::run_history_all(&ctx, &renderer, &config.topics.history_subreddits)
                    .await
            } else {
                let subreddit = config.topics.subreddit(subreddit.as_deref())?;
                pipelines::run_history(&ctx, &renderer, &subreddit).await
            }
        }
    };

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            error!(pipeline = %kind, error = %e, "Pipeline aborted");
            return Err(e);
        }
    };

    for skipped in &report.skipped {
        debug!(href = %skipped.href, reason = %skipped.reason, "Skipped item");
    }

    let elapsed = start_time.elapsed();
    info!(
        pipeline = %report.pipeline,
        scripts = report.scripts.len(),
        skipped = report.skipped.len(),
        ?elapsed,
        secs = elapsed.as_secs(),
        "Execution complete"
    );

    Ok(())
}
