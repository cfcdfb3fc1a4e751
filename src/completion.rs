//! Shell completion scripts for proclog.
//!
//! Scripts are generated with `clap_complete` from the [`Cli`] definition.

use crate::cli::Cli;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate a completion script for the specified shell.
pub fn generate_completion_script(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "proclog", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print a completion script to stdout.
pub fn print_completion_script(shell: Shell) -> Result<()> {
    let script = generate_completion_script(shell);
    std::io::stdout().write_all(script.as_bytes())?;
    Ok(())
}
