//! Linux-specific metrics read straight from /proc.
//!
//! `sysinfo` has no notion of private memory, and its open-file count would
//! hide the difference between "process gone" and "permission denied", so
//! both are read here.

use std::fs;
use std::io;

use sysinfo::Process;

use super::SampleError;

/// Bytes mapped privately by the process (`Private_Clean + Private_Dirty`).
pub fn private_memory(process: &Process) -> Result<u64, SampleError> {
    let pid = process.pid().as_u32();
    let path = format!("/proc/{}/smaps_rollup", pid);
    let content = fs::read_to_string(&path).map_err(|e| map_io_error(pid, &path, e))?;

    // An exiting process has already released its address space.
    parse_private_kib(&content)
        .map(|kib| kib * 1024)
        .ok_or(SampleError::ProcessGone(pid))
}

/// Number of open file descriptors, one entry per fd in `/proc/<pid>/fd`.
pub fn handle_count(process: &Process) -> Result<u64, SampleError> {
    let pid = process.pid().as_u32();
    let path = format!("/proc/{}/fd", pid);
    let entries = fs::read_dir(&path).map_err(|e| map_io_error(pid, &path, e))?;

    Ok(entries.filter_map(|entry| entry.ok()).count() as u64)
}

/// Sums the `Private_*` lines of an smaps file, in KiB.
///
/// Returns `None` when no such line is present.
fn parse_private_kib(smaps: &str) -> Option<u64> {
    let mut total = None;
    for line in smaps.lines() {
        let Some(rest) = line
            .strip_prefix("Private_Clean:")
            .or_else(|| line.strip_prefix("Private_Dirty:"))
        else {
            continue;
        };

        // Format: "Private_Dirty:      1234 kB"
        let kib = rest
            .split_whitespace()
            .next()
            .and_then(|value| value.parse::<u64>().ok())?;
        total = Some(total.unwrap_or(0) + kib);
    }
    total
}

fn map_io_error(pid: u32, path: &str, error: io::Error) -> SampleError {
    // ESRCH shows up when the task is torn down mid-read.
    if error.kind() == io::ErrorKind::NotFound || error.raw_os_error() == Some(3) {
        SampleError::ProcessGone(pid)
    } else {
        SampleError::Unavailable(format!("cannot read {}: {}", path, error))
    }
}
