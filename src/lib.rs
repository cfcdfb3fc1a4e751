pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod log_file;
pub mod logging;
pub mod output;
pub mod process;
pub mod prompt;
pub mod session;

pub use error::{ProclogError, Result};
pub use log_file::LogFile;
pub use process::{ProcessHandle, ProcessMonitor, Sample, SampleError};
pub use session::{Probe, Session, SessionOptions, SessionReport, State, Target};
