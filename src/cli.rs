//! CLI arguments and subcommands for proc-sampler.
//!
//! This module defines the command-line interface structure using the clap library,
//! including global flags and one subcommand per sampling call.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parses the config-file spelling (`"info"`, `"debug"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// How samples are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Whitespace-joined counters, one result per line
    Text,
    /// One JSON document per result
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "proc-sampler",
    about = "Low-overhead /proc reader for CPU and memory accounting",
    long_about = "Low-overhead /proc reader for CPU and memory accounting.\n\n\
                  Reads the aggregate CPU line of /proc/stat, the headline counters of \
                  /proc/meminfo and per-process utime/stime from /proc/<pid>/stat, and \
                  prints the raw kernel counters.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// procfs mount point to read from
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,

    /// Output format for samples
    #[arg(short = 'f', long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands, one per sampling call plus tooling
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the aggregate CPU counters from <root>/stat
    Cpu,

    /// Print MemTotal, MemFree and MemAvailable (kB) from <root>/meminfo
    Mem,

    /// Print utime and stime of one process
    Stat {
        /// Process ID
        pid: u32,
    },

    /// Print utime and stime for each PID, one line per PID
    Batch {
        /// Process IDs
        #[arg(required = true)]
        pids: Vec<u32>,

        /// Read PIDs in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Check whether a path is readable by this process
    Readable {
        /// Path to check
        path: PathBuf,
    },

    /// Print the number of configured CPUs
    Cores,

    /// Run repeated sampling rounds and report timings
    Sample {
        /// Number of rounds (overrides config)
        #[arg(short = 'n', long)]
        iterations: Option<usize>,

        /// Milliseconds between rounds (overrides config)
        #[arg(short = 'i', long)]
        interval_ms: Option<u64>,

        /// PIDs to sample (repeatable; overrides config)
        #[arg(short = 'p', long = "pid")]
        pids: Vec<u32>,

        /// Read PIDs in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Probe the procfs files this tool depends on
    Check,

    /// Generate a configuration file
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        config_format: ConfigFormat,

        /// Include comments (YAML only)
        #[arg(long)]
        commented: bool,
    },
}
