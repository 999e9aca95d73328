//! String-encoded sampling calls for embedders.
//!
//! Each function reads the live `/proc` tree through a default
//! [`ProcReader`] and encodes the result the way a polling UI consumes it:
//! whitespace-joined counters, or an empty string when nothing could be
//! read. Nothing here panics or returns an error.

use std::path::Path;

use crate::probe;
use crate::reader::ProcReader;

/// Aggregate CPU counters after `"cpu "`, verbatim, or `""`.
pub fn read_cpu_stat() -> String {
    ProcReader::default()
        .read_cpu_stat()
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// `"total free available"` in kB, or `""` if meminfo cannot be opened.
pub fn read_mem_info() -> String {
    ProcReader::default()
        .read_mem_info()
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// `"utime stime"` for `pid`, or `""`.
pub fn read_process_stat(pid: i32) -> String {
    read_process_stat_with(&ProcReader::default(), pid)
}

/// `true` if `path` is readable by this process right now.
pub fn is_proc_readable(path: Option<&str>) -> bool {
    probe::is_readable(path.map(Path::new))
}

/// Configured CPU count, at least 1.
pub fn get_cpu_core_count() -> i32 {
    i32::try_from(probe::cpu_core_count()).unwrap_or(i32::MAX)
}

/// One `"pid utime stime"` string per input PID, `""` where the read failed.
pub fn batch_read_process_stats(pids: &[i32]) -> Vec<String> {
    batch_read_process_stats_with(&ProcReader::default(), pids)
}

fn positive_pid(pid: i32) -> Option<u32> {
    u32::try_from(pid).ok().filter(|&p| p > 0)
}

pub(crate) fn read_process_stat_with(reader: &ProcReader, pid: i32) -> String {
    positive_pid(pid)
        .and_then(|p| reader.read_process_stat(p))
        .map(|a| a.to_string())
        .unwrap_or_default()
}

pub(crate) fn batch_read_process_stats_with(reader: &ProcReader, pids: &[i32]) -> Vec<String> {
    // Only positive PIDs reach the filesystem; the rest keep an empty slot.
    let readable: Vec<u32> = pids.iter().filter_map(|&pid| positive_pid(pid)).collect();
    let mut results = reader.batch_read_process_stats(&readable).into_iter();

    pids.iter()
        .map(|&pid| match positive_pid(pid) {
            Some(_) => results
                .next()
                .flatten()
                .map(|e| e.to_string())
                .unwrap_or_default(),
            None => String::new(),
        })
        .collect()
}
