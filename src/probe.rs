//! Host probes: path readability and configured CPU count.

use nix::unistd::{access, AccessFlags};
use std::path::Path;
use tracing::error;

/// Returns true if the calling process may open `path` for reading right now.
///
/// Uses `access(2)` with `R_OK` rather than opening the file, so it reports
/// what the kernel (including SELinux policy) allows without reading
/// anything. Missing, inaccessible and NUL-containing paths are all `false`;
/// `None` is `false` without a syscall.
pub fn is_readable(path: Option<&Path>) -> bool {
    match path {
        Some(p) => access(p, AccessFlags::R_OK).is_ok(),
        None => false,
    }
}

/// Number of processing units configured in the system (not only online).
///
/// Falls back to 1 if `sysconf` fails or reports a non-positive value.
pub fn cpu_core_count() -> usize {
    // SAFETY: sysconf is safe to call with _SC_NPROCESSORS_CONF
    // Returns -1 on error, handled by core_count_or_default
    let raw = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_CONF) };
    core_count_or_default(i64::from(raw))
}

fn core_count_or_default(raw: i64) -> usize {
    if raw > 0 {
        return raw as usize;
    }
    error!("Failed to get CPU core count (sysconf returned {}), assuming 1", raw);
    1
}
