//! Metrics from `sysinfo` on targets without /proc.
//!
//! On Windows `virtual_memory()` is the private commit charge and
//! `open_files()` is the process handle count. Other targets report the
//! closest values `sysinfo` offers.

use sysinfo::Process;

use super::SampleError;

pub fn private_memory(process: &Process) -> Result<u64, SampleError> {
    Ok(process.virtual_memory())
}

pub fn handle_count(process: &Process) -> Result<u64, SampleError> {
    process.open_files().map(|count| count as u64).ok_or_else(|| {
        SampleError::Unavailable(format!(
            "open handle count unavailable for pid {}",
            process.pid()
        ))
    })
}
