//! Sample command implementation.
//!
//! Runs repeated sampling rounds and displays results with timings.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use proc_sampler::{CpuSample, MemorySample, PidAccounting, ProcReader};

/// Settings for a sampling run, already merged from CLI and config.
#[derive(Debug, Clone)]
pub struct SampleSettings {
    pub iterations: usize,
    pub interval: Duration,
    pub pids: Vec<u32>,
    pub parallel: bool,
}

/// Everything read in one round.
#[derive(Debug, Serialize)]
pub struct SampleRound {
    pub round: usize,
    pub timestamp: DateTime<Utc>,
    pub duration_us: u64,
    pub cpu: Option<CpuSample>,
    pub memory: Option<MemorySample>,
    pub processes: Vec<Option<PidAccounting>>,
}

/// Reads CPU, memory and the configured PIDs once.
pub fn sample_once(reader: &ProcReader, settings: &SampleSettings, round: usize) -> SampleRound {
    let timestamp = Utc::now();
    let start = Instant::now();

    let cpu = reader.read_cpu_stat();
    let memory = reader.read_mem_info();
    let processes = if settings.parallel {
        reader.par_batch_read_process_stats(&settings.pids)
    } else {
        reader.batch_read_process_stats(&settings.pids)
    };

    let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    SampleRound {
        round,
        timestamp,
        duration_us,
        cpu,
        memory,
        processes,
    }
}

fn print_round(r: &SampleRound, settings: &SampleSettings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(r)?),
        OutputFormat::Text => {
            println!(
                "\n🔄 Round {}/{} at {} ({:.3}ms)",
                r.round,
                settings.iterations,
                r.timestamp.to_rfc3339(),
                r.duration_us as f64 / 1000.0
            );
            match &r.cpu {
                Some(cpu) => println!("   cpu: {}", cpu.as_str().trim_start()),
                None => println!("   cpu: -"),
            }
            match &r.memory {
                Some(mem) => println!("   mem: {}", mem),
                None => println!("   mem: -"),
            }
            for (pid, entry) in settings.pids.iter().zip(&r.processes) {
                match entry {
                    Some(acct) => println!("   ├─ {}", acct),
                    None => println!("   ├─ {} -", pid),
                }
            }
        }
    }
    Ok(())
}

/// Runs `settings.iterations` sampling rounds, `settings.interval` apart.
///
/// Returns the number of rounds that had no CPU or no memory sample.
pub fn run_rounds(
    reader: &ProcReader,
    settings: &SampleSettings,
    format: OutputFormat,
) -> Result<usize> {
    debug!(
        "Sampling {} round(s) every {:?} over {} pid(s) from {}",
        settings.iterations,
        settings.interval,
        settings.pids.len(),
        reader.root().display()
    );

    let mut missing_system_rounds = 0;
    let mut total_us: u64 = 0;

    for round in 1..=settings.iterations {
        let r = sample_once(reader, settings, round);
        if r.cpu.is_none() || r.memory.is_none() {
            missing_system_rounds += 1;
        }
        total_us = total_us.saturating_add(r.duration_us);
        print_round(&r, settings, format)?;

        if round < settings.iterations {
            thread::sleep(settings.interval);
        }
    }

    if format == OutputFormat::Text {
        println!(
            "\n📊 {} round(s), avg read time {:.3}ms",
            settings.iterations,
            total_us as f64 / settings.iterations.max(1) as f64 / 1000.0
        );
    }

    Ok(missing_system_rounds)
}

/// Sampling loop entry point; exits 1 if any round lacked system counters.
pub fn command_sample(
    reader: &ProcReader,
    settings: &SampleSettings,
    format: OutputFormat,
) -> Result<ExitCode> {
    let missing = run_rounds(reader, settings, format)?;
    if missing > 0 {
        warn!("{} round(s) had no CPU or memory sample", missing);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
