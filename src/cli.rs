//! Command-line interface definitions.
//!
//! Picks which pipeline runs and overrides a few configuration values.
//! Running the binary with no subcommand runs the tech pipeline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::PipelineKind;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Tech scripts from the Hacker News front page
/// awful_video_scripts
///
/// # One programming example, written under ./out/programming_video_scripts
/// awful_video_scripts -o ./out programming -l javascript -m "for loop"
///
/// # Every history subreddit in the config file
/// awful_video_scripts -c config.yaml history --all-subreddits
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the relative script directories are placed under
    #[arg(short, long, global = true)]
    pub output_root: Option<PathBuf>,

    /// Create the output directory if it is missing
    #[arg(long, global = true)]
    pub create_dirs: bool,

    /// Seconds to pause after each model call
    #[arg(long, global = true)]
    pub delay_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scripts from the Hacker News front page
    Tech,
    /// A script from a programming reference page found by search
    Programming {
        /// Language to search for (default: first configured language)
        #[arg(short, long)]
        language: Option<String>,
        /// Method or construct to search for (default: fourth configured method)
        #[arg(short, long)]
        method: Option<String>,
        /// Run every configured language × method pair
        #[arg(long, conflicts_with_all = ["language", "method"])]
        all_pairs: bool,
    },
    /// Scripts from subreddit post titles, rendered through WebDriver
    History {
        /// Subreddit to read (default: first configured subreddit)
        #[arg(short, long)]
        subreddit: Option<String>,
        /// Read every configured subreddit in order
        #[arg(long, conflicts_with = "subreddit")]
        all_subreddits: bool,
    },
}

impl Command {
    pub fn kind(&self) -> PipelineKind {
        match self {
            Command::Tech => PipelineKind::Tech,
            Command::Programming { .. } => PipelineKind::Programming,
            Command::History { .. } => PipelineKind::History,
        }
    }
}

impl Cli {
    /// The subcommand to run, defaulting to `tech`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tech)
    }
}
