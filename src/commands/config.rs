//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates a default configuration file.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<ExitCode> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("proc-sampler.yaml"));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# proc-sampler Configuration
# ==========================
#
# proc_root: "/proc"           # procfs mount point (absolute path)
# log_level: "info"            # off, error, warn, info, debug, trace
# format: "text"               # text or json
#
# Sampling
# --------
# interval_ms: 1000            # Delay between rounds of `sample`
# iterations: 1                # Number of rounds of `sample`
# pids: null                   # PIDs sampled by `sample` (null = own PID)
#
# Batch Reads
# -----------
# parallel: false              # Read PIDs on the rayon pool
# parallelism: null            # Rayon threads (null/0 = auto)
"#;

    format!("{comments}\n{yaml}")
}
