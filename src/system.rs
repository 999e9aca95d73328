//! System-wide counters from the /proc filesystem.
//!
//! This module reads the aggregate CPU line of `/proc/stat` and the three
//! headline counters of `/proc/meminfo`. Values are returned raw; callers
//! difference CPU counters across samples themselves.

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ReadError;
use crate::paths::{meminfo_path, parse_kb_value, stat_path};

/// Tag that opens the aggregate line of `/proc/stat`.
const CPU_TAG: &str = "cpu";

/// Length of `"cpu "`: the tag plus one separator.
const CPU_PREFIX_LEN: usize = CPU_TAG.len() + 1;

/// Aggregate CPU counters from the first line of `/proc/stat`, in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuSample {
    raw: String,
    counters: Vec<u64>,
}

impl CpuSample {
    /// The line after `"cpu "`, exactly as the kernel wrote it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All counters in kernel order. A token that is not a decimal
    /// integer occupies its slot as zero.
    pub fn counters(&self) -> &[u64] {
        &self.counters
    }

    /// Counter at `index`, or zero if the kernel did not emit it.
    pub fn get(&self, index: usize) -> u64 {
        self.counters.get(index).copied().unwrap_or(0)
    }

    pub fn user(&self) -> u64 {
        self.get(0)
    }

    pub fn nice(&self) -> u64 {
        self.get(1)
    }

    pub fn system(&self) -> u64 {
        self.get(2)
    }

    pub fn idle(&self) -> u64 {
        self.get(3)
    }

    pub fn iowait(&self) -> u64 {
        self.get(4)
    }

    pub fn irq(&self) -> u64 {
        self.get(5)
    }

    pub fn softirq(&self) -> u64 {
        self.get(6)
    }

    pub fn steal(&self) -> u64 {
        self.get(7)
    }
}

impl fmt::Display for CpuSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses the first line of `/proc/stat`.
///
/// Format: `"cpu  user nice system idle iowait irq softirq ..."`.
/// Returns `None` unless the line starts with the `cpu` tag followed by at
/// least one more character.
pub fn parse_cpu_line(line: &str) -> Option<CpuSample> {
    if !line.starts_with(CPU_TAG) {
        return None;
    }
    let raw = line.get(CPU_PREFIX_LEN..)?;

    let counters = raw
        .split_whitespace()
        .map(|t| t.parse::<u64>().unwrap_or(0))
        .collect();

    Some(CpuSample {
        raw: raw.to_string(),
        counters,
    })
}

/// Reads the aggregate CPU line from `<root>/stat`.
pub fn read_cpu_stat(root: &Path) -> Result<CpuSample, ReadError> {
    let path = stat_path(root);
    let file = File::open(&path).map_err(|source| ReadError::Open {
        path: path.clone(),
        source,
    })?;

    // Only the first line is needed; keep the buffer small.
    let mut reader = BufReader::with_capacity(512, file);
    let mut line = String::with_capacity(256);
    let n = reader
        .read_line(&mut line)
        .map_err(|source| ReadError::Read {
            path: path.clone(),
            source,
        })?;
    if n == 0 {
        return Err(ReadError::Malformed {
            path,
            reason: "empty file",
        });
    }

    let line = line.strip_suffix('\n').unwrap_or(&line);
    parse_cpu_line(line).ok_or(ReadError::Malformed {
        path,
        reason: "first line is not the aggregate cpu line",
    })
}

/// Headline memory counters from `/proc/meminfo`, in kB as reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemorySample {
    pub total: u64,
    pub free: u64,
    pub available: u64,
}

impl fmt::Display for MemorySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.total, self.free, self.available)
    }
}

const MEM_TOTAL: u8 = 0b001;
const MEM_FREE: u8 = 0b010;
const MEM_AVAILABLE: u8 = 0b100;
const MEM_ALL: u8 = MEM_TOTAL | MEM_FREE | MEM_AVAILABLE;

/// Incremental `/proc/meminfo` scanner.
///
/// Fed one line at a time so the file reader can stop as soon as all three
/// counters have been seen.
#[derive(Debug, Default)]
struct MemInfoScan {
    sample: MemorySample,
    seen: u8,
}

impl MemInfoScan {
    /// Consumes one line; returns true once every counter has been seen.
    fn feed(&mut self, line: &str) -> bool {
        let (slot, bit, rest) = if let Some(v) = line.strip_prefix("MemTotal:") {
            (&mut self.sample.total, MEM_TOTAL, v)
        } else if let Some(v) = line.strip_prefix("MemFree:") {
            (&mut self.sample.free, MEM_FREE, v)
        } else if let Some(v) = line.strip_prefix("MemAvailable:") {
            (&mut self.sample.available, MEM_AVAILABLE, v)
        } else {
            return self.is_complete();
        };

        *slot = parse_kb_value(rest).unwrap_or(0);
        self.seen |= bit;
        self.is_complete()
    }

    fn is_complete(&self) -> bool {
        self.seen == MEM_ALL
    }
}

/// Extracts `MemTotal`, `MemFree` and `MemAvailable` from meminfo lines,
/// in any order. Missing counters stay zero.
pub fn parse_meminfo<'a>(lines: impl IntoIterator<Item = &'a str>) -> MemorySample {
    let mut scan = MemInfoScan::default();
    for line in lines {
        if scan.feed(line) {
            break;
        }
    }
    scan.sample
}

/// Reads the headline memory counters from `<root>/meminfo`.
///
/// A read error after the file was opened ends the scan early; whatever was
/// collected up to that point is returned.
pub fn read_mem_info(root: &Path) -> Result<MemorySample, ReadError> {
    let path = meminfo_path(root);
    let file = File::open(&path).map_err(|source| ReadError::Open { path, source })?;

    let mut reader = BufReader::with_capacity(4096, file);
    let mut line = String::with_capacity(64);
    let mut scan = MemInfoScan::default();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if scan.feed(&line) {
                    break;
                }
            }
        }
    }

    Ok(scan.sample)
}
