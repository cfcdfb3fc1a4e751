//! The monitoring session: a small state machine that checks liveness,
//! samples and logs until the target exits.
//!
//! ```text
//! Starting -> CheckAlive -> Sampling -> CheckAlive -> ... -> Done
//! ```
//!
//! There is no timer. [`Probe::sample`] blocks for the sampling interval and
//! that is what paces the loop.

use std::path::{Path, PathBuf};

use chrono::{Local, SubsecRound};
use log::{debug, info};
use sysinfo::System;

use crate::config::validate_interval;
use crate::error::{ProclogError, Result};
use crate::log_file::LogFile;
use crate::process::{ProcessHandle, ProcessMonitor, Sample, SampleError};

/// Source of liveness and samples for one process.
pub trait Probe {
    fn pid(&self) -> u32;

    /// Whether the process is still running.
    fn is_alive(&mut self) -> bool;

    /// Takes one reading. Expected to block for the sampling interval.
    fn sample(&mut self) -> std::result::Result<Sample, SampleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Starting,
    CheckAlive,
    Sampling,
    Done,
}

/// What to monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Launch an executable with arguments.
    Launch { path: PathBuf, args: Vec<String> },
    /// Attach to an existing process.
    Attach { pid: u32 },
}

/// Fully resolved inputs for [`Session::start`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub target: Target,
    /// Sampling interval in seconds.
    pub interval: f64,
    pub log_dir: PathBuf,
}

/// Summary returned once the target has exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub pid: u32,
    pub log_path: PathBuf,
    pub records_written: u64,
    pub ticks_skipped: u64,
}

pub struct Session<P: Probe> {
    probe: P,
    log: LogFile,
    state: State,
    records_written: u64,
    ticks_skipped: u64,
}

impl Session<ProcessMonitor> {
    /// Validates the inputs, acquires the target and creates the log file.
    ///
    /// A child launched here is killed again if the log file cannot be
    /// created, so a failed start never leaves an unmonitored process behind.
    pub fn start(options: &SessionOptions) -> Result<Self> {
        let interval = validate_interval(options.interval)?;
        let started_at = Local::now().naive_local().trunc_subsecs(0);

        let mut system = System::new();
        let handle = match &options.target {
            Target::Launch { path, args } => ProcessHandle::launch(path, args)?,
            Target::Attach { pid } => ProcessHandle::attach(*pid, &mut system)?,
        };

        let log = match LogFile::create(&options.log_dir, started_at) {
            Ok(log) => log,
            Err(e) => {
                handle.abandon();
                return Err(e);
            }
        };

        info!(
            "monitoring pid {} every {:?}, logging to {}",
            handle.pid(),
            interval,
            log.path().display()
        );

        Ok(Self::new(
            ProcessMonitor::with_system(system, handle, interval),
            log,
        ))
    }
}

impl<P: Probe> Session<P> {
    pub fn new(probe: P, log: LogFile) -> Self {
        Self {
            probe,
            log,
            state: State::Starting,
            records_written: 0,
            ticks_skipped: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Performs one transition and returns the new state.
    ///
    /// # Errors
    ///
    /// - [`ProclogError::LogWrite`] if a record could not be persisted
    /// - [`ProclogError::Sample`] if a metric query failed for a reason other
    ///   than the process exiting
    pub fn step(&mut self) -> Result<State> {
        self.state = match self.state {
            State::Starting => State::CheckAlive,
            State::CheckAlive => {
                if self.probe.is_alive() {
                    State::Sampling
                } else {
                    State::Done
                }
            }
            State::Sampling => {
                match self.probe.sample() {
                    Ok(sample) => {
                        self.log.append(&sample)?;
                        self.records_written += 1;
                    }
                    Err(SampleError::ProcessGone(pid)) => {
                        debug!("pid {} vanished mid-tick, skipping", pid);
                        self.ticks_skipped += 1;
                    }
                    Err(SampleError::Unavailable(msg)) => {
                        return Err(ProclogError::Sample(msg));
                    }
                }
                State::CheckAlive
            }
            State::Done => State::Done,
        };
        Ok(self.state)
    }

    /// Runs until the target exits and returns the report.
    ///
    /// The probe, and with it the process handle, is released on return.
    pub fn run(mut self) -> Result<SessionReport> {
        while self.step()? != State::Done {}

        let report = SessionReport {
            pid: self.probe.pid(),
            log_path: self.log.path().to_path_buf(),
            records_written: self.records_written,
            ticks_skipped: self.ticks_skipped,
        };
        info!(
            "pid {} exited: {} records, {} skipped ticks",
            report.pid, report.records_written, report.ticks_skipped
        );
        Ok(report)
    }
}
