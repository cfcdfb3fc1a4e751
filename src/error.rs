use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProclogError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Log file already exists: {0}")]
    FileCreationConflict(PathBuf),

    #[error("Failed to launch {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log record to {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to sample process: {0}")]
    Sample(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProclogError>;
