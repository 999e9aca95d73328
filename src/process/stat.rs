//! CPU accounting parsing for a single process.
//!
//! This module extracts `utime` and `stime` from `/proc/<pid>/stat`.
//!
//! Layout assumed (proc(5), Linux 2.6 onward):
//!
//! ```text
//! pid (comm) state ppid pgrp session tty_nr tpgid flags minflt cminflt majflt cmajflt utime stime ...
//!  1    2      3    4    5     6       7      8     9     10     11      12     13     14    15
//! ```
//!
//! `comm` is chosen by the process and may contain spaces, parentheses and
//! other bytes, so the name ends at the *last* `)` in the record. The fields
//! after it are counted from zero (`state` = 0), which puts `utime` at index
//! 11 and `stime` at index 12. A kernel that inserted fields before these
//! would shift the indices without any visible format change.

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ReadError;
use crate::paths::process_stat_path;

/// Index of `utime` among the fields following the command name.
pub const UTIME_INDEX: usize = 11;

/// Index of `stime` among the fields following the command name.
pub const STIME_INDEX: usize = 12;

/// User-mode and kernel-mode CPU time of one process, in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessAccounting {
    pub utime: u64,
    pub stime: u64,
}

impl fmt::Display for ProcessAccounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.utime, self.stime)
    }
}

/// Parses the contents of `/proc/<pid>/stat`.
///
/// Returns `None` when there is no `)`, fewer than 13 fields follow it, or
/// `utime`/`stime` are not decimal integers.
pub fn parse_stat_line(line: &str) -> Option<ProcessAccounting> {
    parse_stat_bytes(line.as_bytes())
}

/// Byte-level variant of [`parse_stat_line`].
///
/// The command name is not guaranteed to be UTF-8; everything after it is
/// ASCII, so only that tail is decoded.
pub fn parse_stat_bytes(content: &[u8]) -> Option<ProcessAccounting> {
    let close = content.iter().rposition(|&b| b == b')')?;
    let tail = std::str::from_utf8(&content[close + 1..]).ok()?;

    let mut fields = tail.split_whitespace();
    let utime = fields.nth(UTIME_INDEX)?.parse().ok()?;
    let stime = fields.nth(STIME_INDEX - UTIME_INDEX - 1)?.parse().ok()?;

    Some(ProcessAccounting { utime, stime })
}

/// Reads and parses one stat file, reusing `buf` for its contents.
pub(crate) fn read_stat_file(
    path: &Path,
    buf: &mut Vec<u8>,
) -> Result<ProcessAccounting, ReadError> {
    let mut file = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    buf.clear();
    file.read_to_end(buf).map_err(|source| ReadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_stat_bytes(buf).ok_or_else(|| ReadError::Malformed {
        path: path.to_path_buf(),
        reason: "missing command name delimiter or too few fields",
    })
}

/// Reads `utime`/`stime` for `pid` from `<root>/<pid>/stat`.
pub fn read_process_stat(root: &Path, pid: u32) -> Result<ProcessAccounting, ReadError> {
    let path = process_stat_path(root, pid);
    let mut buf = Vec::with_capacity(512);
    read_stat_file(&path, &mut buf)
}
