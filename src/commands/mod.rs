//! CLI command implementations for proc-sampler.
//!
//! This module provides implementations for all CLI subcommands:
//! - `read`: one-shot sampling calls (cpu, mem, stat, batch, readable, cores)
//! - `sample`: repeated sampling rounds with timings
//! - `check`: procfs accessibility probe
//! - `config`: configuration file generation

pub mod check;
pub mod config;
pub mod read;
pub mod sample;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use read::{
    command_batch, command_cores, command_cpu, command_mem, command_readable, command_stat,
};
pub use sample::command_sample;

use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;

use crate::cli::OutputFormat;

/// Renders one result: the plain string form (empty when missing) in text
/// mode, a JSON value (`null` when missing) otherwise.
pub fn render<T: Serialize + Display>(value: Option<&T>, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => value.map(|v| v.to_string()).unwrap_or_default(),
        OutputFormat::Json => serde_json::to_string(&value)?,
    })
}
