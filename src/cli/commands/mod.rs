//! Command implementations.
//!
//! Each module exposes an `execute` entry point called from `main` once the
//! action has been picked from the flags.

pub mod completions;
pub mod list;
pub mod open;
pub mod search;

use crate::client::{HttpSearchService, IssueClient};
use crate::config::{self, CliOverrides, Config};
use crate::error::{JrqueryError, Result};
use crate::format::TextFormatOptions;
use std::io::{self, IsTerminal};
use tracing::{debug, info};

/// Load configuration (prompting on first run) and build a service client.
///
/// # Errors
///
/// Returns [`JrqueryError::InvalidConfiguration`] if credentials are missing
/// and stdin is not interactive, or any error from prompting and validation.
pub fn connect(overrides: &CliOverrides) -> Result<(Config, IssueClient<HttpSearchService>)> {
    let config = load_or_prompt(overrides)?;
    debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Connecting");
    let client = IssueClient::new(HttpSearchService::new(&config)?);
    Ok((config, client))
}

/// Load configuration, asking for it interactively when it is incomplete.
///
/// # Errors
///
/// Same as [`connect`].
pub fn load_or_prompt(overrides: &CliOverrides) -> Result<Config> {
    match config::load_config(overrides) {
        Err(JrqueryError::InvalidConfiguration { reason }) if io::stdin().is_terminal() => {
            info!(%reason, "Configuration incomplete, prompting");
            prompt_and_save(overrides)
        }
        other => other,
    }
}

/// Prompt, check the credentials against the service, then persist them.
fn prompt_and_save(overrides: &CliOverrides) -> Result<Config> {
    let path = config::config_path(overrides)?;
    eprintln!("Configuration file not found or incomplete: {}", path.display());

    let mut input = io::stdin().lock();
    let mut config = config::prompt_config(&mut input, &mut io::stderr())?;

    let client = IssueClient::new(HttpSearchService::new(&config)?);
    let user = client.current_user()?;
    eprintln!("Configuration validated for user: {}", user.display_name);

    config::save_config(&config, &path)?;
    eprintln!("Configuration successfully saved to {}", path.display());

    if let Some(timeout) = overrides.timeout_secs {
        config.timeout_secs = timeout;
    }
    Ok(config)
}

/// Text options for stdout: color per `--no-color`/`NO_COLOR`, width only on a TTY.
#[must_use]
pub fn text_options(overrides: &CliOverrides) -> TextFormatOptions {
    let max_width = if io::stdout().is_terminal() {
        Some(crate::format::terminal_width())
    } else {
        None
    };
    TextFormatOptions {
        use_color: config::should_use_color(overrides),
        max_width,
    }
}

/// Pretty JSON to stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
