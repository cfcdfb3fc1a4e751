use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

use crate::output::{BOLD, CYAN, DIM, GREEN, RED, RESET, YELLOW};

/// Initialize the stderr logger.
///
/// Defaults to `warn` so a normal session prints nothing but the completion
/// line. `--verbose` raises it to `debug`; `RUST_LOG` overrides both.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = Env::default().filter_or("RUST_LOG", default_filter);

    let _ = Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{} {}", level_label(record.level()), record.args()))
        .try_init();
}

fn level_label(level: Level) -> String {
    match level {
        Level::Error => format!("{RED}{BOLD}ERROR{RESET}"),
        Level::Warn => format!("{YELLOW}{BOLD}WARN {RESET}"),
        Level::Info => format!("{GREEN}INFO {RESET}"),
        Level::Debug => format!("{CYAN}DEBUG{RESET}"),
        Level::Trace => format!("{DIM}TRACE{RESET}"),
    }
}
