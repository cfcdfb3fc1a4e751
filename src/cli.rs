//! Command-line definition.
//!
//! Lives in the library so completion scripts are generated from the same
//! definition the binary parses.

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "proclog")]
#[command(
    version,
    about = "Sample a process's CPU, memory and handle usage into a CSV log until it exits",
    after_help = "EXAMPLES:
    # Launch a program and sample it every second
    proclog --interval 1 ./my-app

    # Pass arguments through to the program
    proclog -i 0.5 ./server --port 8080

    # Attach to a process that is already running
    proclog --pid 4242 --interval 2

    # Write logs somewhere other than the current directory
    proclog -i 1 --log-dir /var/tmp/profiles ./my-app

    # Missing path or interval are asked for interactively
    proclog

OUTPUT:
    One file per session named 'log YYYY-MM-DD HH-MM-SS.csv' with the header
    date;time;cpu_usage;mem_wm;mem_privacy;handles
    cpu_usage is normalized over all logical CPUs (0-100)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Executable to launch and monitor (asked for when omitted)
    #[arg(value_name = "PROGRAM", value_hint = ValueHint::ExecutablePath, conflicts_with = "pid")]
    pub program: Option<PathBuf>,

    /// Arguments passed to the program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Attach to a running process instead of launching one
    #[arg(short, long, value_name = "PID")]
    pub pid: Option<u32>,

    /// Seconds between samples (overrides the config file)
    #[arg(short, long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Directory for the log file (overrides the config file) [default: .]
    #[arg(short = 'd', long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub log_dir: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Show the effective configuration
    #[command(after_help = "CONFIG FILE:
    ~/.config/proclog/config.toml

    interval = 1.0          # seconds between samples
    log_dir = \"/some/dir\"   # where log files are created")]
    Config {
        /// Create the config file with commented defaults if it does not exist
        #[arg(long)]
        init: bool,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
