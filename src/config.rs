//! Configuration management for proc-sampler.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Args, ConfigFormat, LogLevel, OutputFormat};
use proc_sampler::paths::DEFAULT_PROC_ROOT;

// Default configuration constants
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_ITERATIONS: usize = 1;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default config file locations, tried in order.
const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/proc-sampler/config.yaml",
    "/etc/proc-sampler/config.yml",
    "/etc/proc-sampler/config.json",
    "./proc-sampler.yaml",
    "./proc-sampler.yml",
    "./proc-sampler.json",
];

/// Effective configuration of the proc-sampler binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// procfs mount point
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    // Output
    pub format: Option<OutputFormat>,

    // Sampling
    #[serde(alias = "interval-ms")]
    pub interval_ms: Option<u64>,
    pub iterations: Option<usize>,
    pub pids: Option<Vec<u32>>,

    // Batch reads
    pub parallel: Option<bool>,
    /// Rayon worker threads (0 or null = auto)
    pub parallelism: Option<usize>,

    /// File this config was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            format: Some(OutputFormat::Text),
            interval_ms: Some(DEFAULT_INTERVAL_MS),
            iterations: Some(DEFAULT_ITERATIONS),
            pids: None,
            parallel: Some(false),
            parallelism: None,
            source: None,
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Text)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::from_name)
            .unwrap_or(LogLevel::Info)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if let Some(root) = &cfg.proc_root {
        if !root.is_absolute() {
            bail!("proc_root must be an absolute path, got '{}'", root.display());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_name(level).is_none() {
            bail!(
                "Invalid log_level '{}', expected one of off, error, warn, info, debug, trace",
                level
            );
        }
    }

    if cfg.interval_ms == Some(0) {
        bail!("interval_ms must be greater than 0");
    }

    if cfg.iterations == Some(0) {
        bail!("iterations must be greater than 0");
    }

    if let Some(pids) = &cfg.pids {
        if pids.contains(&0) {
            bail!("pids must be positive process IDs");
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }

    if let Some(format) = args.format {
        config.format = Some(format);
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let mut config = parse_config(&content, &path)?;
    config.source = Some(path);
    Ok(config)
}

/// Parses config content, choosing the format from the file extension.
fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        Some("toml") => toml::from_str(content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?,
        // Default to YAML
        _ => serde_yaml::from_str(content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?,
    };
    Ok(config)
}

/// Serializes a config in the requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.interval_ms = Some(0);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.iterations = Some(0);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.proc_root = Some(PathBuf::from("relative/proc"));
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.log_level = Some("loud".into());
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.pids = Some(vec![1, 0]);
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sampler.yaml");
        fs::write(
            &path,
            "proc_root: /host/proc\nformat: json\ninterval-ms: 250\npids: [1, 42]\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.proc_root(), PathBuf::from("/host/proc"));
        assert_eq!(cfg.output_format(), OutputFormat::Json);
        assert_eq!(cfg.interval_ms, Some(250));
        assert_eq!(cfg.pids, Some(vec![1, 42]));
        assert_eq!(cfg.source.as_deref(), Some(path.as_path()));
        // Unset fields fall back to defaults at use sites
        assert!(cfg.iterations.is_none());
        assert!(matches!(cfg.log_level(), LogLevel::Info));
    }

    #[test]
    fn test_load_json_and_toml_config() {
        let dir = tempdir().expect("Failed to create temp dir");

        let json = dir.path().join("sampler.json");
        fs::write(&json, r#"{"iterations": 5, "parallel": true}"#).unwrap();
        let cfg = load_config(Some(&json)).unwrap();
        assert_eq!(cfg.iterations, Some(5));
        assert_eq!(cfg.parallel, Some(true));

        let toml_path = dir.path().join("sampler.toml");
        fs::write(&toml_path, "log_level = \"debug\"\nparallelism = 4\n").unwrap();
        let cfg = load_config(Some(&toml_path)).unwrap();
        assert!(matches!(cfg.log_level(), LogLevel::Debug));
        assert_eq!(cfg.parallelism, Some(4));
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(load_config(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sampler.yaml");
        fs::write(&path, "proc_root: /host/proc\nformat: json\nlog_level: warn\n").unwrap();
        let path_str = path.to_str().unwrap();

        let args = Args::try_parse_from([
            "proc-sampler",
            "--config",
            path_str,
            "--proc-root",
            "/other/proc",
            "--log-level",
            "trace",
            "cpu",
        ])
        .unwrap();

        let cfg = resolve_config(&args).unwrap();
        assert_eq!(cfg.proc_root(), PathBuf::from("/other/proc"));
        assert_eq!(cfg.output_format(), OutputFormat::Json);
        assert!(matches!(cfg.log_level(), LogLevel::Trace));
    }

    #[test]
    fn test_render_config_round_trips_through_yaml() {
        let rendered = render_config(&Config::default(), ConfigFormat::Yaml).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.proc_root(), PathBuf::from("/proc"));
        assert_eq!(parsed.interval_ms, Some(DEFAULT_INTERVAL_MS));
    }
}
