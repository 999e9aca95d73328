//! Per-process CPU accounting.
//!
//! This module provides:
//! - `stat`: parsing of a single `/proc/<pid>/stat` record
//! - `batch`: the same rule applied across a list of PIDs

pub mod batch;
pub mod stat;

// Re-export commonly used types
pub use batch::{batch_read_process_stats, par_batch_read_process_stats, PidAccounting};
pub use stat::{parse_stat_bytes, parse_stat_line, read_process_stat, ProcessAccounting};
