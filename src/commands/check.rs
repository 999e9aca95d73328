//! Check command implementation.
//!
//! Validates that the procfs files the sampler depends on are readable and
//! parse, and that the configuration is valid.

use anyhow::Result;
use std::process::ExitCode;

use crate::config::{validate_effective_config, Config};
use proc_sampler::paths::{meminfo_path, process_stat_path, stat_path};
use proc_sampler::{cpu_core_count, is_readable, ProcReader};

/// Validates procfs access and configuration.
pub fn command_check(reader: &ProcReader, config: &Config) -> Result<ExitCode> {
    println!("🔍 proc-sampler - System Check");
    println!("==============================");

    let root = reader.root();
    let mut all_ok = true;

    println!("\n📁 Checking {} ...", root.display());
    for path in [stat_path(root), meminfo_path(root)] {
        if is_readable(Some(&path)) {
            println!("   ✅ {} readable", path.display());
        } else {
            println!("   ❌ {} not readable", path.display());
            all_ok = false;
        }
    }

    // Per-process access is best effort: missing entries are normal
    let own_pid = std::process::id();
    let own_stat = process_stat_path(root, own_pid);
    if is_readable(Some(&own_stat)) {
        println!("   ✅ {} readable", own_stat.display());
    } else {
        println!(
            "   ⚠️  {} not readable (per-process reads will be empty)",
            own_stat.display()
        );
    }

    println!("\n📊 Checking parsers...");
    match reader.try_read_cpu_stat() {
        Ok(cpu) => println!("   ✅ Aggregate CPU line: {} counters", cpu.counters().len()),
        Err(e) => {
            println!("   ❌ Aggregate CPU line: {}", e);
            all_ok = false;
        }
    }

    match reader.try_read_mem_info() {
        Ok(mem) => println!(
            "   ✅ Memory: total={} kB, free={} kB, available={} kB",
            mem.total, mem.free, mem.available
        ),
        Err(e) => {
            println!("   ❌ Memory: {}", e);
            all_ok = false;
        }
    }

    match reader.try_read_process_stat(own_pid) {
        Ok(acct) => println!(
            "   ✅ Own process (pid {}): utime={} stime={}",
            own_pid, acct.utime, acct.stime
        ),
        Err(e) => println!("   ⚠️  Own process (pid {}): {}", own_pid, e),
    }

    println!("\n🧮 Configured CPUs: {}", cpu_core_count());

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        Ok(ExitCode::FAILURE)
    }
}
