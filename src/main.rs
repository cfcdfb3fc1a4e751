//! proclog CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::Parser;
use proclog::cli::{Cli, Commands};
use proclog::commands::{config_command, run_command, RunArgs};
use proclog::completion::print_completion_script;
use proclog::logging::init_logger;
use proclog::output::print_error;

fn main() {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Config { init }) => config_command(*init),
        Some(Commands::Completions { shell }) => print_completion_script(*shell),
        None => run_command(RunArgs::from(&cli)),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
