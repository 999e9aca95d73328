//! proc-sampler: low-overhead /proc accounting reader
//!
//! This library reads raw kernel counters for a monitoring UI that samples
//! many times per second. It covers four kernel interfaces and two probes:
//!
//! - **Aggregate CPU**: first line of `/proc/stat`
//! - **Memory**: `MemTotal`, `MemFree`, `MemAvailable` from `/proc/meminfo`
//! - **Process CPU**: `utime`/`stime` from `/proc/<pid>/stat`
//! - **Batch process CPU**: the same across a PID list, index-aligned
//! - **Readability probe**: `access(2)` on any path
//! - **Core count**: configured processing units
//!
//! Counters are returned raw. Computing percentages or deltas is the
//! caller's job.
//!
//! # Usage
//!
//! ```no_run
//! use proc_sampler::ProcReader;
//!
//! let reader = ProcReader::default();
//!
//! if let Some(cpu) = reader.read_cpu_stat() {
//!     println!("user={} idle={}", cpu.user(), cpu.idle());
//! }
//!
//! let pids: [u32; 3] = [1, 2, 3];
//! for (pid, entry) in pids.iter().zip(reader.batch_read_process_stats(&pids)) {
//!     match entry {
//!         Some(acct) => println!("{acct}"),
//!         None => println!("{pid}: gone"),
//!     }
//! }
//! ```
//!
//! Embedders that want plain strings can use the [`surface`] functions.

pub mod error;
pub mod paths;
pub mod probe;
pub mod process;
pub mod reader;
pub mod surface;
pub mod system;

// Re-export main types for convenience
pub use error::ReadError;
pub use probe::{cpu_core_count, is_readable};
pub use process::{PidAccounting, ProcessAccounting};
pub use reader::ProcReader;
pub use system::{CpuSample, MemorySample};
