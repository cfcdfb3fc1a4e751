//! CLI command handlers for proclog.
//!
//! # Commands
//!
//! - [`run`] - Monitor a process (the default when no subcommand is given)
//! - [`config`] - Show or initialize the config file

mod config;
mod run;

pub use config::config_command;
pub use run::{resolve_options, run_command, RunArgs};
