//! Process resource sampling using sysinfo.
//!
//! Provides CPU, memory and handle readings for the monitored process.

use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime, SubsecRound};
use log::trace;
use sysinfo::{CpuRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use thiserror::Error;

use super::handle::{is_defunct, ProcessHandle};
use super::platform;
use crate::session::Probe;

/// One resource-usage reading of the monitored process.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Local collection time, truncated to whole seconds
    pub timestamp: NaiveDateTime,
    /// CPU usage since the previous reading, normalized to 0.0 - 100.0 over all logical CPUs
    pub cpu_percent: f64,
    /// Resident memory in bytes
    pub resident_memory: u64,
    /// Memory owned exclusively by the process, in bytes
    pub private_memory: u64,
    /// Open file descriptors (Linux) or handles (Windows)
    pub handle_count: u64,
}

/// Why a tick produced no sample.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The process exited between the liveness check and the metric queries.
    #[error("process {0} is gone")]
    ProcessGone(u32),

    #[error("{0}")]
    Unavailable(String),
}

/// Scales a percentage of one core down to a share of the whole host.
///
/// The result is clamped to 0.0 - 100.0 and rounded to two decimals.
pub fn normalize_cpu(per_core_percent: f64, logical_cpus: usize) -> f64 {
    if !per_core_percent.is_finite() {
        return 0.0;
    }
    let share = per_core_percent / logical_cpus.max(1) as f64;
    (share.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

/// CPU usage for `cpu_time` consumed over `elapsed` wall-clock time,
/// normalized over `logical_cpus`.
pub fn cpu_percent_between(cpu_time: Duration, elapsed: Duration, logical_cpus: usize) -> f64 {
    if elapsed.is_zero() {
        return 0.0;
    }
    let per_core = cpu_time.as_secs_f64() / elapsed.as_secs_f64() * 100.0;
    normalize_cpu(per_core, logical_cpus)
}

/// Accumulated CPU time of the target at a point in wall-clock time.
#[derive(Debug, Clone, Copy)]
struct CpuMark {
    cpu_time_ms: u64,
    at: Instant,
}

/// Samples resource usage for a single process.
///
/// Wraps `sysinfo::System` and owns the [`ProcessHandle`]. CPU usage is the
/// growth of the process's accumulated CPU time between two marks, so
/// [`Probe::sample`] sleeps for the interval before reading and that sleep
/// paces the session.
pub struct ProcessMonitor {
    system: System,
    handle: ProcessHandle,
    pid: Pid,
    interval: Duration,
    logical_cpus: usize,
    last_mark: CpuMark,
}

impl ProcessMonitor {
    /// Creates a monitor and takes the CPU baseline for the first sample.
    pub fn new(handle: ProcessHandle, interval: Duration) -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );
        Self::with_system(system, handle, interval)
    }

    /// Like [`ProcessMonitor::new`], reusing a `System` that was already
    /// used to resolve the target.
    ///
    /// A launched child starts from zero CPU time at its launch instant, so
    /// the first sample covers everything since process start. An attached
    /// process is measured from the moment the monitor is built.
    pub fn with_system(mut system: System, handle: ProcessHandle, interval: Duration) -> Self {
        if system.cpus().is_empty() {
            system.refresh_cpu_list(CpuRefreshKind::nothing());
        }
        let logical_cpus = system.cpus().len().max(1);
        let pid = Pid::from_u32(handle.pid());

        let last_mark = match handle.started() {
            Some(started) => CpuMark {
                cpu_time_ms: 0,
                at: started,
            },
            None => {
                system.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu(),
                );
                CpuMark {
                    cpu_time_ms: system
                        .process(pid)
                        .map(|process| process.accumulated_cpu_time())
                        .unwrap_or(0),
                    at: Instant::now(),
                }
            }
        };

        Self {
            system,
            handle,
            pid,
            interval,
            logical_cpus,
            last_mark,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn logical_cpus(&self) -> usize {
        self.logical_cpus
    }
}

impl Probe for ProcessMonitor {
    fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    fn is_alive(&mut self) -> bool {
        self.handle.is_alive(&mut self.system)
    }

    fn sample(&mut self) -> Result<Sample, SampleError> {
        thread::sleep(self.interval);

        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let now = Instant::now();

        let pid = self.pid.as_u32();
        let process = self
            .system
            .process(self.pid)
            .filter(|process| !is_defunct(process.status()))
            .ok_or(SampleError::ProcessGone(pid))?;

        let mark = CpuMark {
            cpu_time_ms: process.accumulated_cpu_time(),
            at: now,
        };
        let cpu_time =
            Duration::from_millis(mark.cpu_time_ms.saturating_sub(self.last_mark.cpu_time_ms));
        let elapsed = mark.at.saturating_duration_since(self.last_mark.at);

        let sample = Sample {
            timestamp: Local::now().naive_local().trunc_subsecs(0),
            cpu_percent: cpu_percent_between(cpu_time, elapsed, self.logical_cpus),
            resident_memory: process.memory(),
            private_memory: platform::private_memory(process)?,
            handle_count: platform::handle_count(process)?,
        };
        self.last_mark = mark;

        trace!(
            "pid {} used {:?} cpu in {:?} -> {:?}",
            pid, cpu_time, elapsed, sample
        );
        Ok(sample)
    }
}
