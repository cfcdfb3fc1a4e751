use crate::config::Config;
use crate::session::SessionReport;
use std::path::Path;

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// The single line printed when the monitored process has exited.
pub fn completion_message(report: &SessionReport) -> String {
    format!(
        "{GREEN}{BOLD}done{RESET} pid {} exited, {} samples written to {BOLD}{}{RESET}",
        report.pid,
        report.records_written,
        report.log_path.display()
    )
}

pub fn print_done(report: &SessionReport) {
    println!("{}", completion_message(report));
}

/// Render the effective configuration for `proclog config`.
pub fn format_config(path: &Path, exists: bool, config: &Config) -> String {
    let mut out = format!("{CYAN}Config file:{RESET} {}", path.display());
    if !exists {
        out.push_str(&format!(
            " {GRAY}(not found, using defaults; create it with `proclog config --init`){RESET}"
        ));
    }

    let interval = match config.interval {
        Some(secs) => format!("{}", secs),
        None => format!("{DIM}unset (asked on startup){RESET}"),
    };
    let log_dir = match &config.log_dir {
        Some(dir) => dir.display().to_string(),
        None => format!("{DIM}unset (current directory){RESET}"),
    };

    out.push_str(&format!("\n  {BOLD}interval{RESET} = {}", interval));
    out.push_str(&format!("\n  {BOLD}log_dir{RESET}  = {}", log_dir));
    out
}

pub fn print_config(path: &Path, exists: bool, config: &Config) {
    println!("{}", format_config(path, exists, config));
}

pub fn print_config_created(path: &Path) {
    println!("{YELLOW}Created{RESET} {}", path.display());
}
