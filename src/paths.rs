//! Path building and token helpers shared by the readers.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// System-wide CPU accounting file, relative to the procfs root.
pub const STAT_FILE: &str = "stat";

/// System memory accounting file, relative to the procfs root.
pub const MEMINFO_FILE: &str = "meminfo";

/// `<root>/stat`
pub fn stat_path(root: &Path) -> PathBuf {
    root.join(STAT_FILE)
}

/// `<root>/meminfo`
pub fn meminfo_path(root: &Path) -> PathBuf {
    root.join(MEMINFO_FILE)
}

/// `<root>/<pid>/stat`
pub fn process_stat_path(root: &Path, pid: u32) -> PathBuf {
    let mut path = root.to_path_buf();
    path.push(pid.to_string());
    path.push(STAT_FILE);
    path
}

/// Reusable buffers for building `<root>/<pid>/stat` without allocating per PID.
///
/// `path` always holds `<root>` between calls; [`ProcessPathBuf::with_pid`]
/// pushes the PID components, hands out the full path and pops them again.
#[derive(Debug)]
pub struct ProcessPathBuf {
    path: PathBuf,
    digits: String,
}

impl ProcessPathBuf {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.to_path_buf(),
            digits: String::with_capacity(10),
        }
    }

    /// Runs `f` with `<root>/<pid>/stat` and restores the buffer to `<root>`.
    pub fn with_pid<T>(&mut self, pid: u32, f: impl FnOnce(&Path) -> T) -> T {
        self.digits.clear();
        // Writing into a String cannot fail.
        let _ = write!(self.digits, "{pid}");
        self.path.push(&self.digits);
        self.path.push(STAT_FILE);
        let out = f(&self.path);
        self.path.pop();
        self.path.pop();
        out
    }
}

/// Parses the first whitespace-separated token of `v` as a decimal integer.
///
/// Used for `/proc/meminfo` values (`"   1234 kB"`), ignoring the unit.
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
