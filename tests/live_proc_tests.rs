//! Integration tests against the host's real /proc.
//!
//! These only assert properties that hold on any Linux machine.

#![cfg(target_os = "linux")]

use proc_sampler::surface;
use proc_sampler::{cpu_core_count, is_readable, ProcReader};
use std::path::Path;

#[test]
fn test_live_cpu_stat() {
    let cpu = ProcReader::default().read_cpu_stat().expect("/proc/stat");
    // user nice system idle at minimum on every supported kernel
    assert!(cpu.counters().len() >= 4);

    let s = surface::read_cpu_stat();
    assert!(!s.is_empty());
    assert!(s.split_whitespace().all(|t| t.parse::<u64>().is_ok()));
}

#[test]
fn test_live_mem_info() {
    let mem = ProcReader::default().read_mem_info().expect("/proc/meminfo");
    assert!(mem.total > 0);
    assert!(mem.free <= mem.total);

    let s = surface::read_mem_info();
    assert_eq!(s.split_whitespace().count(), 3);
}

#[test]
fn test_live_own_process() {
    let pid = std::process::id();
    assert!(ProcReader::default().read_process_stat(pid).is_some());

    let s = surface::read_process_stat(pid as i32);
    assert_eq!(s.split_whitespace().count(), 2);
}

#[test]
fn test_live_batch_with_missing_pid() {
    let own = std::process::id() as i32;
    // PID_MAX_LIMIT is 2^22, so this can never exist
    let out = surface::batch_read_process_stats(&[own, 4_194_305, own]);

    assert_eq!(out.len(), 3);
    assert!(out[0].starts_with(&format!("{own} ")));
    assert_eq!(out[1], "");
    assert_eq!(out[0].split_whitespace().count(), 3);
}

#[test]
fn test_live_readability() {
    assert!(is_readable(Some(Path::new("/proc/self/stat"))));
    assert!(surface::is_proc_readable(Some("/proc/meminfo")));
    assert!(!surface::is_proc_readable(Some("/proc/this/does/not/exist")));
    assert!(!surface::is_proc_readable(None));
}

#[test]
fn test_live_core_count() {
    assert!(cpu_core_count() >= 1);
    assert!(surface::get_cpu_core_count() >= 1);
}
