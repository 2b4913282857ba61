//! Open an issue in the browser.

use super::load_or_prompt;
use crate::config::CliOverrides;
use crate::error::{JrqueryError, Result};
use anyhow::Context;
use std::process::Command;
use tracing::info;

/// Execute the open command.
///
/// # Errors
///
/// Returns an error if the key is malformed, configuration is missing, or
/// the platform opener cannot be started.
pub fn execute(key: &str, dry_run: bool, overrides: &CliOverrides) -> Result<()> {
    validate_key(key)?;
    let config = load_or_prompt(overrides)?;
    let url = config.browse_url(key);

    if dry_run {
        println!("{url}");
        return Ok(());
    }

    let (program, args) = opener();
    info!(%url, program, "Opening issue");
    let status = Command::new(program)
        .args(args)
        .arg(&url)
        .status()
        .with_context(|| format!("failed to run {program} for {url}"))?;

    if !status.success() {
        return Err(anyhow::anyhow!("{program} exited with {status}").into());
    }
    Ok(())
}

/// Issue keys look like `OPS-42`; anything else would end up in the URL path.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(JrqueryError::validation(
            "open",
            format!("'{key}' is not an issue key"),
        ))
    }
}

#[cfg(target_os = "macos")]
const fn opener() -> (&'static str, &'static [&'static str]) {
    ("open", &[])
}

#[cfg(target_os = "windows")]
const fn opener() -> (&'static str, &'static [&'static str]) {
    ("cmd", &["/C", "start", ""])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const fn opener() -> (&'static str, &'static [&'static str]) {
    ("xdg-open", &[])
}
