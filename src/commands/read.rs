//! One-shot sampling commands.
//!
//! Each command performs a single library call and prints its result.
//! A missing result prints an empty line (text) or `null` (JSON) and exits
//! with status 1.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use super::render;
use crate::cli::OutputFormat;
use proc_sampler::{cpu_core_count, is_readable, ProcReader};

fn status(found: bool) -> ExitCode {
    if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prints the aggregate CPU counters.
pub fn command_cpu(reader: &ProcReader, format: OutputFormat) -> Result<ExitCode> {
    let sample = reader.read_cpu_stat();
    println!("{}", render(sample.as_ref(), format)?);
    Ok(status(sample.is_some()))
}

/// Prints the memory triple.
pub fn command_mem(reader: &ProcReader, format: OutputFormat) -> Result<ExitCode> {
    let sample = reader.read_mem_info();
    println!("{}", render(sample.as_ref(), format)?);
    Ok(status(sample.is_some()))
}

/// Prints utime/stime of one process.
pub fn command_stat(reader: &ProcReader, pid: u32, format: OutputFormat) -> Result<ExitCode> {
    let acct = reader.read_process_stat(pid);
    if acct.is_none() {
        debug!("No accounting for pid {}", pid);
    }
    println!("{}", render(acct.as_ref(), format)?);
    Ok(status(acct.is_some()))
}

/// Prints one line per PID, keeping input order.
///
/// Exits 1 only when no PID could be read at all.
pub fn command_batch(
    reader: &ProcReader,
    pids: &[u32],
    parallel: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let results = if parallel {
        reader.par_batch_read_process_stats(pids)
    } else {
        reader.batch_read_process_stats(pids)
    };

    match format {
        OutputFormat::Text => {
            for entry in &results {
                println!("{}", render(entry.as_ref(), format)?);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&results)?),
    }

    let found = results.iter().filter(|r| r.is_some()).count();
    debug!("Read {}/{} processes", found, pids.len());
    Ok(status(found > 0))
}

/// Prints whether `path` is readable.
pub fn command_readable(path: &Path, format: OutputFormat) -> Result<ExitCode> {
    let readable = is_readable(Some(path));
    match format {
        OutputFormat::Text => println!("{}", readable),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "path": path, "readable": readable })
        ),
    }
    Ok(status(readable))
}

/// Prints the configured CPU count.
pub fn command_cores(format: OutputFormat) -> Result<ExitCode> {
    let cores = cpu_core_count();
    match format {
        OutputFormat::Text => println!("{}", cores),
        OutputFormat::Json => println!("{}", serde_json::json!({ "cores": cores })),
    }
    Ok(ExitCode::SUCCESS)
}
