//! Error type shared by all /proc readers.
//!
//! The public `read_*` methods on [`ProcReader`](crate::ProcReader) never
//! surface these; they degrade to `None`. The `try_read_*` variants return
//! them for callers that want to know why a sample is missing.

use std::io;
use std::path::PathBuf;

/// Why a kernel accounting file could not be turned into a sample.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: &'static str },
}

impl ReadError {
    /// True when the file itself could not be opened (missing process,
    /// missing procfs, permission denied).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ReadError::Open { .. })
    }
}
