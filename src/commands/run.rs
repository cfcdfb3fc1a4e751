//! Run command handler.
//!
//! Resolves the session inputs and monitors the target until it exits.

use std::path::PathBuf;

use log::debug;

use crate::cli::Cli;
use crate::config::{load_config, parse_interval, Config};
use crate::error::{ProclogError, Result};
use crate::output::print_done;
use crate::prompt::ask;
use crate::session::{Session, SessionOptions, Target};

const PATH_QUESTION: &str = "Enter path to file:";
const INTERVAL_QUESTION: &str = "Enter interval (second):";

/// Session inputs as given on the command line. Anything unset is taken
/// from the config file or asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    pub program: Option<PathBuf>,
    pub args: Vec<String>,
    pub pid: Option<u32>,
    pub interval: Option<f64>,
    pub log_dir: Option<PathBuf>,
}

impl From<&Cli> for RunArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            program: cli.program.clone(),
            args: cli.args.clone(),
            pid: cli.pid,
            interval: cli.interval,
            log_dir: cli.log_dir.clone(),
        }
    }
}

/// Merge command-line arguments, config and interactive answers.
///
/// Precedence is flag, then config file, then `ask`. The executable is asked
/// for before the interval. The log directory falls back to `.`.
pub fn resolve_options<F>(args: RunArgs, config: &Config, mut ask: F) -> Result<SessionOptions>
where
    F: FnMut(&str) -> Result<String>,
{
    let target = match (args.pid, args.program) {
        (Some(pid), _) => Target::Attach { pid },
        (None, Some(path)) => Target::Launch {
            path,
            args: args.args,
        },
        (None, None) => {
            let answer = ask(PATH_QUESTION)?;
            if answer.is_empty() {
                return Err(ProclogError::InvalidInput(
                    "no executable path given".to_string(),
                ));
            }
            Target::Launch {
                path: PathBuf::from(answer),
                args: args.args,
            }
        }
    };

    let interval = match args.interval.or(config.interval) {
        Some(secs) => secs,
        None => parse_interval(&ask(INTERVAL_QUESTION)?)?,
    };

    let log_dir = args
        .log_dir
        .or_else(|| config.log_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(SessionOptions {
        target,
        interval,
        log_dir,
    })
}

/// Monitor a process and print the completion line once it exits.
///
/// # Returns
///
/// * `Ok(())` after the target exited and every sample was logged
/// * `Err(ProclogError)` on invalid input, a log name conflict or a write failure
pub fn run_command(args: RunArgs) -> Result<()> {
    let config = load_config()?;
    let options = resolve_options(args, &config, ask)?;
    debug!("resolved session options: {:?}", options);

    let report = Session::start(&options)?.run()?;
    print_done(&report);
    Ok(())
}
