//! proc-sampler - version 0.1.0
//!
//! Command-line front end for the proc_sampler library with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info, Level};

use cli::{Args, Commands, LogLevel};
use commands::{
    command_batch, command_check, command_config, command_cores, command_cpu, command_mem,
    command_readable, command_sample, command_stat, sample::SampleSettings,
};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_INTERVAL_MS,
    DEFAULT_ITERATIONS,
};
use proc_sampler::ProcReader;

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr so stdout carries only sample output.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    debug!("Logging initialized with level: {:?}", config.log_level());
}

/// Configures the rayon global pool used by parallel batch reads.
fn setup_parallelism(config: &Config) {
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }
}

/// Merges `sample` flags over the config file values.
fn resolve_sample_settings(
    config: &Config,
    iterations: Option<usize>,
    interval_ms: Option<u64>,
    pids: &[u32],
    parallel: bool,
) -> SampleSettings {
    let pids = if !pids.is_empty() {
        pids.to_vec()
    } else {
        match &config.pids {
            Some(p) if !p.is_empty() => p.clone(),
            _ => vec![std::process::id()],
        }
    };

    SampleSettings {
        iterations: iterations
            .or(config.iterations)
            .unwrap_or(DEFAULT_ITERATIONS)
            .max(1),
        interval: Duration::from_millis(
            interval_ms
                .or(config.interval_ms)
                .unwrap_or(DEFAULT_INTERVAL_MS),
        ),
        pids,
        parallel: parallel || config.parallel.unwrap_or(false),
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = resolve_config(&args)?;

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        println!("✅ Configuration is valid");
        return Ok(ExitCode::SUCCESS);
    }

    if args.show_config {
        show_config(&config, args.config_format)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Config generation does not need a valid effective config
    if let Some(Commands::Config {
        output,
        config_format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), *config_format, *commented);
    }

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    setup_logging(&config);
    if let Some(source) = &config.source {
        info!("Loaded configuration from: {}", source.display());
    }
    setup_parallelism(&config);

    let reader = ProcReader::new(config.proc_root());
    let format = config.output_format();
    debug!("Reading from {}", reader.root().display());

    match args.command.unwrap_or(Commands::Check) {
        Commands::Cpu => command_cpu(&reader, format),
        Commands::Mem => command_mem(&reader, format),
        Commands::Stat { pid } => command_stat(&reader, pid, format),
        Commands::Batch { pids, parallel } => command_batch(
            &reader,
            &pids,
            parallel || config.parallel.unwrap_or(false),
            format,
        ),
        Commands::Readable { path } => command_readable(&path, format),
        Commands::Cores => command_cores(format),
        Commands::Sample {
            iterations,
            interval_ms,
            pids,
            parallel,
        } => {
            let settings =
                resolve_sample_settings(&config, iterations, interval_ms, &pids, parallel);
            command_sample(&reader, &settings, format)
        }
        Commands::Check => command_check(&reader, &config),
        Commands::Config { .. } => unreachable!("Config handled above"),
    }
}

/// Main application entry point.
fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
