//! Batched CPU accounting across many processes.
//!
//! Output slot `i` always describes input PID `i`; a process that is gone or
//! has an unreadable record leaves `None` in its slot.

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::stat::{read_stat_file, ProcessAccounting};
use crate::paths::ProcessPathBuf;

/// CPU accounting tagged with the PID it was read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PidAccounting {
    pub pid: u32,
    #[serde(flatten)]
    pub accounting: ProcessAccounting,
}

impl fmt::Display for PidAccounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pid, self.accounting)
    }
}

/// Path and content buffers reused across every PID of a batch.
struct StatScratch {
    path: ProcessPathBuf,
    content: Vec<u8>,
}

impl StatScratch {
    fn new(root: &Path) -> Self {
        Self {
            path: ProcessPathBuf::new(root),
            content: Vec::with_capacity(512),
        }
    }

    fn read(&mut self, pid: u32) -> Option<PidAccounting> {
        let content = &mut self.content;
        self.path
            .with_pid(pid, |path| read_stat_file(path, content))
            .ok()
            .map(|accounting| PidAccounting { pid, accounting })
    }
}

/// Reads `<root>/<pid>/stat` for every PID, in order.
pub fn batch_read_process_stats(root: &Path, pids: &[u32]) -> Vec<Option<PidAccounting>> {
    let mut scratch = StatScratch::new(root);
    pids.iter().map(|&pid| scratch.read(pid)).collect()
}

/// Parallel variant of [`batch_read_process_stats`] on rayon's global pool.
///
/// Each worker gets its own scratch buffers; results come back in input order.
pub fn par_batch_read_process_stats(root: &Path, pids: &[u32]) -> Vec<Option<PidAccounting>> {
    pids.par_iter()
        .map_init(|| StatScratch::new(root), |scratch, &pid| scratch.read(pid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_stat(root: &Path, pid: u32, utime: u64, stime: u64) {
        let dir = root.join(pid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let line = format!("{pid} (proc {pid}) S 1 1 1 0 -1 0 0 0 0 0 {utime} {stime} 0 0 20 0 1 0 100\n");
        std::fs::write(dir.join("stat"), line).unwrap();
    }

    #[test]
    fn test_batch_preserves_index_alignment() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_stat(dir.path(), 111, 10, 20);
        write_stat(dir.path(), 333, 30, 40);

        let out = batch_read_process_stats(dir.path(), &[111, 222, 333]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].map(|r| r.to_string()), Some("111 10 20".to_string()));
        assert_eq!(out[1], None);
        assert_eq!(out[2].map(|r| r.to_string()), Some("333 30 40".to_string()));
    }

    #[test]
    fn test_batch_malformed_entry_leaves_none() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_stat(dir.path(), 1, 5, 6);
        std::fs::create_dir(dir.path().join("2")).unwrap();
        std::fs::write(dir.path().join("2").join("stat"), "2 (x) S 1").unwrap();

        let out = batch_read_process_stats(dir.path(), &[2, 1]);
        assert_eq!(out[0], None);
        assert_eq!(
            out[1],
            Some(PidAccounting {
                pid: 1,
                accounting: ProcessAccounting { utime: 5, stime: 6 },
            })
        );
    }

    #[test]
    fn test_batch_empty_and_duplicate_pids() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_stat(dir.path(), 7, 1, 2);

        assert!(batch_read_process_stats(dir.path(), &[]).is_empty());

        let out = batch_read_process_stats(dir.path(), &[7, 7]);
        assert_eq!(out[0], out[1]);
        assert!(out[0].is_some());
    }

    #[test]
    fn test_par_batch_matches_sequential() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pids: Vec<u32> = (1..=64).collect();
        for &pid in pids.iter().filter(|p| *p % 3 != 0) {
            write_stat(dir.path(), pid, pid as u64 * 10, pid as u64);
        }

        let seq = batch_read_process_stats(dir.path(), &pids);
        let par = par_batch_read_process_stats(dir.path(), &pids);

        assert_eq!(seq, par);
        assert_eq!(par.len(), pids.len());
        assert!(par[2].is_none());
        assert_eq!(par[3].map(|r| r.pid), Some(4));
    }

    #[test]
    fn test_pid_accounting_json_is_flat() {
        let entry = PidAccounting {
            pid: 9,
            accounting: ProcessAccounting { utime: 1, stime: 2 },
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"pid":9,"utime":1,"stime":2}"#);
    }
}
