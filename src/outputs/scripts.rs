//! Script file naming and persistence.
//!
//! Titles come straight off scraped pages, so they are passed through
//! [`sanitize_title`] before being used as a file name. The resulting path is
//! always a direct child of the target directory.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::utils::{collapse_whitespace, truncate_chars};

/// Longest title (in characters) kept in a file name.
pub const MAX_TITLE_CHARS: usize = 150;

static FORBIDDEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).unwrap());

/// Turn an arbitrary title into a single, portable file name component.
///
/// - Path separators, Windows-reserved characters and control characters become `_`
/// - Whitespace runs collapse to one space
/// - Leading/trailing whitespace and dots are trimmed (no `.`/`..`, no hidden files)
/// - An empty result becomes `untitled`
/// - The result is capped at [`MAX_TITLE_CHARS`] characters
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_title("Foo"), "Foo");
/// assert_eq!(sanitize_title("../etc/passwd"), "_etc_passwd");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let collapsed = collapse_whitespace(title);
    let replaced = FORBIDDEN.replace_all(&collapsed, "_");
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let capped = truncate_chars(trimmed, MAX_TITLE_CHARS).trim_end();

    if capped.is_empty() {
        "untitled".to_string()
    } else {
        capped.to_string()
    }
}

/// Compute `<directory>/<sanitized title> <YYYY-MM-DD>.txt`.
pub fn script_path(directory: &Path, title: &str, date: NaiveDate) -> PathBuf {
    directory.join(format!(
        "{} {}.txt",
        sanitize_title(title),
        date.format("%Y-%m-%d")
    ))
}

/// Write `script` to its computed path, replacing any earlier file.
///
/// The directory is not created here; it must already exist.
#[instrument(level = "info", skip(script), fields(directory = %directory.display()))]
pub async fn write_script(
    directory: &Path,
    title: &str,
    date: NaiveDate,
    script: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = script_path(directory, title, date);
    fs::write(&path, script).await?;
    info!(path = %path.display(), bytes = script.len(), "Wrote video script");
    Ok(path)
}
