//! Shell completions generation.
//!
//! # Usage
//!
//! ```bash
//! jrquery --completions bash > ~/.local/share/bash-completion/completions/jrquery
//! jrquery --completions zsh > ~/.zsh/completions/_jrquery
//! jrquery --completions fish > ~/.config/fish/completions/jrquery.fish
//! ```

use crate::cli::Cli;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

const BIN_NAME: &str = "jrquery";

/// Write the completion script for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn execute(shell: Shell) -> Result<()> {
    info!(?shell, "Generating shell completions");
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}
