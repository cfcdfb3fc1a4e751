use crate::error::{ProclogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "proclog";

const CONFIG_FILENAME: &str = "config.toml";

// ============================================================================
// Configuration
// ============================================================================

/// User defaults for a monitoring session.
///
/// Every field is optional. Command-line flags take precedence, and anything
/// still unset after that is asked for interactively (interval) or falls back
/// to the current directory (log directory).
///
/// # Example
///
/// ```toml
/// # Seconds between samples
/// interval = 0.5
///
/// # Where log files are written
/// log_dir = "/var/tmp/proclog"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sampling interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,

    /// Directory for new log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Default config file content with comments explaining each option.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r#"# proclog configuration
# Command-line flags override the values below.

# Sampling interval in seconds (positive number).
# When unset, proclog asks for it on startup.
# interval = 1.0

# Directory where "log <date> <time>.csv" files are created.
# Defaults to the current working directory. The directory must exist.
# log_dir = "/path/to/logs"
"#;

// ============================================================================
// Validation
// ============================================================================

/// Check that `secs` is a usable sampling interval.
///
/// # Errors
///
/// [`ProclogError::InvalidInput`] for zero, negative, non-finite or
/// unrepresentably large values.
pub fn validate_interval(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ProclogError::InvalidInput(format!(
            "interval must be a positive number of seconds, got {}",
            secs
        )));
    }

    Duration::try_from_secs_f64(secs).map_err(|e| {
        ProclogError::InvalidInput(format!(
            "interval of {} seconds is out of range: {}",
            secs, e
        ))
    })
}

/// Parse an interval typed by the user, e.g. `"0.5"`.
pub fn parse_interval(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let secs: f64 = trimmed.parse().map_err(|_| {
        ProclogError::InvalidInput(format!("'{}' is not a number of seconds", trimmed))
    })?;
    validate_interval(secs)?;
    Ok(secs)
}

/// Validate a loaded configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.interval {
        validate_interval(interval).map_err(|e| ProclogError::Config(e.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

/// Get the proclog config directory path (~/.config/proclog/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProclogError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (~/.config/proclog/config.toml).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/proclog/config.toml`.
///
/// A missing file is not an error and yields the defaults. Nothing is
/// written to disk.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load and validate the configuration at `path`.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid TOML
/// - A value fails validation (e.g. a non-positive interval)
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| {
        ProclogError::Config(format!("Failed to parse config file at {:?}: {}", path, e))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Write the commented default config to `path` unless a file already exists.
///
/// Returns whether a new file was created.
pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG_WITH_COMMENTS)?;
    Ok(true)
}

/// Create `~/.config/proclog/config.toml` with commented defaults if missing.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let path = config_path()?;
    let created = init_config_at(&path)?;
    Ok((path, created))
}
