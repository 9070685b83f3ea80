//! The summary generator: the shared last step of every pipeline.
//!
//! Sends one prompt to the model and persists the reply as a script file.
//! Errors from the model call or the write are returned untouched; callers
//! decide whether a failure ends their run.

use chrono::NaiveDate;
use std::error::Error;
use std::path::Path;
use tracing::{error, info, instrument};

use crate::api::AskAsync;
use crate::outputs::scripts::write_script;

/// Ask the model for a script and write it to
/// `<directory>/<title> <YYYY-MM-DD>.txt`.
///
/// Returns the model's text exactly as received. Nothing is written when the
/// model call fails.
#[instrument(level = "info", skip(ask, prompt), fields(directory = %directory.display(), prompt_chars = prompt.chars().count()))]
pub async fn generate_summary<A>(
    ask: &A,
    title: &str,
    prompt: &str,
    directory: &Path,
    date: NaiveDate,
) -> Result<String, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
{
    let script = ask.ask(prompt).await.inspect_err(|e| {
        error!(error = %e, "Model call failed; no script written");
    })?;

    let path = write_script(directory, title, date, &script).await?;
    info!(path = %path.display(), "Summary for {} written", title);
    Ok(script)
}
