//! Process ownership and resource sampling.
//!
//! [`ProcessHandle`] owns the monitored process (launched or attached) and
//! answers liveness queries. [`ProcessMonitor`] turns it into [`Sample`]s.

mod handle;
mod monitor;
#[cfg(not(target_os = "linux"))]
mod portable;
#[cfg(target_os = "linux")]
mod procfs;

pub use handle::ProcessHandle;
pub use monitor::{cpu_percent_between, normalize_cpu, ProcessMonitor, Sample, SampleError};

#[cfg(not(target_os = "linux"))]
use portable as platform;
#[cfg(target_os = "linux")]
use procfs as platform;
