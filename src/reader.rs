//! The reader handle that ties the /proc parsers to a procfs root.

use std::path::{Path, PathBuf};
use tracing::{error, trace};

use crate::error::ReadError;
use crate::paths::DEFAULT_PROC_ROOT;
use crate::process::{self, PidAccounting, ProcessAccounting};
use crate::system::{self, CpuSample, MemorySample};

/// Reads CPU and memory accounting from a procfs tree.
///
/// Holds nothing but the root path, so one reader can be shared freely
/// across threads; every call opens and closes its own files.
///
/// The `read_*` methods are the sampling boundary: they never fail, they
/// return `None` instead. System-wide files that cannot be read are logged
/// at error level; per-process failures are silent because processes exit
/// between enumeration and sampling all the time. The `try_read_*` methods
/// return the underlying [`ReadError`] and never log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcReader {
    root: PathBuf,
}

impl Default for ProcReader {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn try_read_cpu_stat(&self) -> Result<CpuSample, ReadError> {
        system::read_cpu_stat(&self.root)
    }

    /// Aggregate CPU counters from `<root>/stat`.
    pub fn read_cpu_stat(&self) -> Option<CpuSample> {
        self.try_read_cpu_stat()
            .map_err(|e| log_system_failure(&e))
            .ok()
    }

    pub fn try_read_mem_info(&self) -> Result<MemorySample, ReadError> {
        system::read_mem_info(&self.root)
    }

    /// `MemTotal`, `MemFree` and `MemAvailable` from `<root>/meminfo`.
    pub fn read_mem_info(&self) -> Option<MemorySample> {
        self.try_read_mem_info()
            .map_err(|e| log_system_failure(&e))
            .ok()
    }

    pub fn try_read_process_stat(&self, pid: u32) -> Result<ProcessAccounting, ReadError> {
        process::read_process_stat(&self.root, pid)
    }

    /// `utime`/`stime` of one process.
    pub fn read_process_stat(&self, pid: u32) -> Option<ProcessAccounting> {
        self.try_read_process_stat(pid).ok()
    }

    /// `utime`/`stime` for each PID; slot `i` belongs to `pids[i]`.
    pub fn batch_read_process_stats(&self, pids: &[u32]) -> Vec<Option<PidAccounting>> {
        process::batch_read_process_stats(&self.root, pids)
    }

    /// Same as [`ProcReader::batch_read_process_stats`], spread over rayon's
    /// global pool.
    pub fn par_batch_read_process_stats(&self, pids: &[u32]) -> Vec<Option<PidAccounting>> {
        process::par_batch_read_process_stats(&self.root, pids)
    }
}

fn log_system_failure(err: &ReadError) {
    match err {
        ReadError::Open { .. } | ReadError::Read { .. } => error!("{}", err),
        ReadError::Malformed { .. } => trace!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts error-level events seen by a scoped subscriber.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_errors(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(Arc::clone(&count)));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_default_root_is_proc() {
        assert_eq!(ProcReader::default().root(), Path::new("/proc"));
    }

    #[test]
    fn test_missing_system_files_degrade_to_none() {
        let dir = tempdir().expect("Failed to create temp dir");
        let reader = ProcReader::new(dir.path());

        assert!(reader.read_cpu_stat().is_none());
        assert!(reader.read_mem_info().is_none());
        assert!(reader.try_read_cpu_stat().unwrap_err().is_unavailable());
    }

    #[test]
    fn test_missing_process_degrades_to_none() {
        let dir = tempdir().expect("Failed to create temp dir");
        let reader = ProcReader::new(dir.path());

        assert!(reader.read_process_stat(99999).is_none());
        assert_eq!(reader.batch_read_process_stats(&[1, 2]), vec![None, None]);
    }

    #[test]
    fn test_only_system_wide_failures_log_errors() {
        let dir = tempdir().expect("Failed to create temp dir");
        let reader = ProcReader::new(dir.path());

        let process_errors = count_errors(|| {
            assert!(reader.read_process_stat(4242).is_none());
            assert_eq!(reader.batch_read_process_stats(&[1, 2]), vec![None, None]);
        });
        assert_eq!(process_errors, 0);

        let meminfo_errors = count_errors(|| {
            assert!(reader.read_mem_info().is_none());
        });
        assert_eq!(meminfo_errors, 1);

        // Malformed content is traced, not logged as an error
        std::fs::write(dir.path().join("stat"), "intr 1 2 3\n").unwrap();
        let malformed_errors = count_errors(|| {
            assert!(reader.read_cpu_stat().is_none());
        });
        assert_eq!(malformed_errors, 0);
    }

    #[test]
    fn test_reader_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcReader>();
    }
}
