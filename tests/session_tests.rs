//! End-to-end sessions against real child processes.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, Local, SubsecRound};
use proclog::log_file::{log_file_name, HEADER};
use proclog::{ProclogError, Session, SessionOptions, Target};
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tempfile::TempDir;

fn shell(script: &str) -> Target {
    Target::Launch {
        path: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

fn cpu_field(line: &str) -> f64 {
    line.split(';')
        .nth(2)
        .unwrap()
        .trim_matches('\'')
        .parse()
        .unwrap()
}

fn logical_cpus() -> usize {
    let system =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
    system.cpus().len().max(1)
}

/// Whether any running process has `marker` in its command line.
fn process_with_marker_exists(marker: &str) -> bool {
    fs::read_dir("/proc")
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| fs::read(entry.path().join("cmdline")).ok())
        .any(|cmdline| String::from_utf8_lossy(&cmdline).contains(marker))
}

fn unique_marker() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("proclog-test-{}-{}", std::process::id(), nanos)
}

/// A shell that spins on builtins until killed. It never forks, so `marker`
/// appears in exactly one command line.
fn marked_spinner(marker: &str) -> Target {
    Target::Launch {
        path: PathBuf::from("/bin/sh"),
        args: vec![
            "-c".to_string(),
            "while :; do :; done".to_string(),
            marker.to_string(),
        ],
    }
}

fn is_record(line: &str) -> bool {
    let fields: Vec<&str> = line.split(';').collect();
    fields.len() == 6
        && fields
            .iter()
            .all(|f| f.len() >= 2 && f.starts_with('\'') && f.ends_with('\''))
}

#[test]
fn test_session_logs_until_child_exits() {
    let temp_dir = TempDir::new().unwrap();
    let options = SessionOptions {
        target: shell("sleep 1"),
        interval: 0.2,
        log_dir: temp_dir.path().to_path_buf(),
    };

    let report = Session::start(&options).unwrap().run().unwrap();

    let content = fs::read_to_string(&report.log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len() as u64, 1 + report.records_written);
    assert!(report.records_written >= 1);
    assert!(lines[1..].iter().all(|line| is_record(line)));

    for line in &lines[1..] {
        let cpu = cpu_field(line);
        assert!((0.0..=100.0).contains(&cpu), "cpu out of range in {}", line);
    }

    let stamps: Vec<&str> = lines[1..].iter().map(|l| &l[..23]).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

#[test]
fn test_session_for_instant_exit_writes_header_only_or_few_records() {
    let temp_dir = TempDir::new().unwrap();
    let options = SessionOptions {
        target: shell("exit 0"),
        interval: 0.2,
        log_dir: temp_dir.path().to_path_buf(),
    };

    let report = Session::start(&options).unwrap().run().unwrap();

    let content = fs::read_to_string(&report.log_path).unwrap();
    assert!(content.starts_with(HEADER));
    assert_eq!(content.lines().count() as u64, 1 + report.records_written);
    assert!(!content.ends_with('\n'));
}

#[test]
fn test_busy_child_logs_cpu_from_first_record() {
    let temp_dir = TempDir::new().unwrap();
    // The shell spins on builtins and a background subshell ends it.
    let options = SessionOptions {
        target: shell("(sleep 2; kill $$) & while :; do :; done"),
        interval: 0.4,
        log_dir: temp_dir.path().to_path_buf(),
    };

    let report = Session::start(&options).unwrap().run().unwrap();

    let content = fs::read_to_string(&report.log_path).unwrap();
    let cpus: Vec<f64> = content.lines().skip(1).map(cpu_field).collect();
    assert!(cpus.len() >= 2, "too few records: {:?}", cpus);

    let one_core = 100.0 / logical_cpus() as f64;
    for cpu in &cpus {
        assert!(*cpu > 0.0 && *cpu <= 100.0, "out of range: {:?}", cpus);
        assert!(*cpu <= one_core * 1.25 + 0.5, "over one core: {:?}", cpus);
    }
    assert!(cpus[0] >= one_core * 0.25, "first too low: {:?}", cpus);
}

#[test]
fn test_start_in_missing_log_dir_fails_without_orphan() {
    let temp_dir = TempDir::new().unwrap();
    let marker = unique_marker();
    let options = SessionOptions {
        target: marked_spinner(&marker),
        interval: 0.2,
        log_dir: temp_dir.path().join("missing"),
    };

    let result = Session::start(&options);

    assert!(matches!(result, Err(ProclogError::Io(_))));
    assert!(!process_with_marker_exists(&marker));
}

fn occupy_log_names(dir: &Path) {
    let now = Local::now().naive_local().trunc_subsecs(0);
    for offset in 0..3 {
        let name = log_file_name(now + Duration::seconds(offset));
        fs::write(dir.join(name), "taken").unwrap();
    }
}

#[test]
fn test_start_with_existing_log_file_is_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let marker = unique_marker();
    let options = SessionOptions {
        target: marked_spinner(&marker),
        interval: 0.2,
        log_dir: temp_dir.path().to_path_buf(),
    };
    occupy_log_names(temp_dir.path());

    let result = Session::start(&options);

    match result {
        Err(ProclogError::FileCreationConflict(path)) => {
            assert_eq!(fs::read_to_string(path).unwrap(), "taken");
        }
        Err(other) => panic!("Expected FileCreationConflict, got {:?}", other),
        Ok(_) => panic!("Expected FileCreationConflict, got a session"),
    }
    assert!(!process_with_marker_exists(&marker));
}
