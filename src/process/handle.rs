//! Ownership of the monitored process.

use std::path::Path;
use std::process::{Child, Command};
use std::time::Instant;

use log::{debug, warn};
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};

use crate::error::{ProclogError, Result};

/// The process being monitored.
///
/// A spawned child is reaped by [`ProcessHandle::is_alive`] once it exits, so
/// its pid never lingers as a zombie. An attached process is only observed.
#[derive(Debug)]
pub enum ProcessHandle {
    Spawned { child: Child, started: Instant },
    Attached(u32),
}

impl ProcessHandle {
    /// Launches `path` with `args`, inheriting stdio.
    pub fn launch(path: &Path, args: &[String]) -> Result<Self> {
        if !path.is_file() {
            return Err(ProclogError::InvalidInput(format!(
                "executable not found: {}",
                path.display()
            )));
        }

        let started = Instant::now();
        let child = Command::new(path)
            .args(args)
            .spawn()
            .map_err(|source| ProclogError::Launch {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("launched {} as pid {}", path.display(), child.id());
        Ok(Self::Spawned { child, started })
    }

    /// Attaches to an already running process.
    pub fn attach(pid: u32, system: &mut System) -> Result<Self> {
        if !pid_alive(system, pid) {
            return Err(ProclogError::InvalidInput(format!(
                "no running process with pid {}",
                pid
            )));
        }

        debug!("attached to pid {}", pid);
        Ok(Self::Attached(pid))
    }

    pub fn pid(&self) -> u32 {
        match self {
            Self::Spawned { child, .. } => child.id(),
            Self::Attached(pid) => *pid,
        }
    }

    /// Returns whether the process still exists.
    ///
    /// `system` is only consulted for attached processes and when polling a
    /// child fails.
    pub fn is_alive(&mut self, system: &mut System) -> bool {
        match self {
            Self::Spawned { child, .. } => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    debug!("pid {} exited with {}", child.id(), status);
                    false
                }
                Err(e) => {
                    warn!("failed to poll child {}: {}", child.id(), e);
                    pid_alive(system, child.id())
                }
            },
            Self::Attached(pid) => pid_alive(system, *pid),
        }
    }

    /// When a spawned child was launched. `None` for attached processes.
    pub fn started(&self) -> Option<Instant> {
        match self {
            Self::Spawned { started, .. } => Some(*started),
            Self::Attached(_) => None,
        }
    }

    /// Gives up on the process after a failed start.
    ///
    /// A spawned child is killed and reaped; an attached process is left alone.
    pub fn abandon(self) {
        if let Self::Spawned { mut child, .. } = self {
            if let Err(e) = child.kill() {
                warn!("failed to kill pid {}: {}", child.id(), e);
            }
            if let Err(e) = child.wait() {
                warn!("failed to reap pid {}: {}", child.id(), e);
            }
        }
    }
}

/// Zombie and dead entries still show up in the process table but no longer
/// have anything to measure.
pub(crate) fn is_defunct(status: ProcessStatus) -> bool {
    matches!(status, ProcessStatus::Zombie | ProcessStatus::Dead)
}

fn pid_alive(system: &mut System, pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing(),
    );

    system
        .process(pid)
        .map(|process| !is_defunct(process.status()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_launch_missing_executable_is_invalid_input() {
        let result = ProcessHandle::launch(&PathBuf::from("/definitely/not/here"), &[]);

        match result {
            Err(ProclogError::InvalidInput(msg)) => assert!(msg.contains("/definitely/not/here")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_attach_unknown_pid_is_invalid_input() {
        let mut system = System::new();
        let result = ProcessHandle::attach(u32::MAX - 1, &mut system);

        assert!(matches!(result, Err(ProclogError::InvalidInput(_))));
    }

    #[test]
    fn test_attach_current_process() {
        let mut system = System::new();
        let pid = std::process::id();

        let mut handle = ProcessHandle::attach(pid, &mut system).unwrap();

        assert_eq!(handle.pid(), pid);
        assert!(handle.started().is_none());
        assert!(handle.is_alive(&mut system));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawned_child_reports_exit() {
        let mut system = System::new();
        let mut handle =
            ProcessHandle::launch(Path::new("/bin/sh"), &["-c".into(), "exit 0".into()]).unwrap();
        assert!(handle.started().is_some());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while handle.is_alive(&mut system) {
            assert!(std::time::Instant::now() < deadline, "child never exited");
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_abandon_kills_spawned_child() {
        let handle =
            ProcessHandle::launch(Path::new("/bin/sh"), &["-c".into(), "sleep 30".into()]).unwrap();
        let pid = handle.pid();

        handle.abandon();

        let mut system = System::new();
        assert!(!pid_alive(&mut system, pid));
    }

    #[test]
    fn test_is_defunct() {
        assert!(is_defunct(ProcessStatus::Zombie));
        assert!(is_defunct(ProcessStatus::Dead));
        assert!(!is_defunct(ProcessStatus::Run));
        assert!(!is_defunct(ProcessStatus::Sleep));
    }
}
