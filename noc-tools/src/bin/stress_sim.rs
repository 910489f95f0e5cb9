/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Multi-fault stress simulator.
//!
//! Maps a generated task graph, then repeatedly kills a random busy core and
//! prints the energy after every recovery.
//!
//! Example:
//!   stress-sim --width 5 --height 5 --tasks 15 --faults 3

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use noc_fttm::config::ScenarioConfig;
use noc_fttm::scenario::run_stress;

#[derive(Debug, Parser)]
#[command(name = "stress-sim", about = "Inject several random permanent faults")]
struct Args {
    /// YAML scenario file.  Flags below override its values.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    #[arg(short = 't', long)]
    tasks: Option<u32>,

    /// Number of faults to inject.
    #[arg(short = 'n', long)]
    faults: Option<u32>,

    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Print the grid after every fault, not only at the end.
    #[arg(short = 'g', long)]
    show_rounds: bool,
}

/// Without a scenario file the stress run uses a 5x5 mesh with 15 tasks.
fn base_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig {
        width: 5,
        height: 5,
        ..Default::default()
    };
    cfg.tasks.count = 15;
    cfg
}

fn resolve_config(args: &Args) -> Result<ScenarioConfig> {
    let mut cfg = match &args.config {
        Some(path) => ScenarioConfig::load_from_file(path)?,
        None => base_config(),
    };

    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(n) = args.tasks {
        cfg.tasks.count = n;
    }
    if let Some(n) = args.faults {
        cfg.stress_fault_count = n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }

    cfg.validate().context("Invalid command-line overrides")?;
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = resolve_config(&args)?;

    info!(
        width = cfg.width,
        height = cfg.height,
        tasks = cfg.tasks.count,
        faults = cfg.stress_fault_count,
        seed = cfg.seed,
        "=== NoC stress test: multiple faults ==="
    );

    let report = run_stress(&cfg).context("stress run failed")?;

    println!("Initial energy: {}", report.base_energy);
    for round in &report.rounds {
        let overhead = round
            .overhead_percent
            .map(|p| format!("{p:+.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "Fault #{} at core {}: {} | energy {} (overhead {})",
            round.round, round.core, round.outcome, round.energy, overhead
        );
        if args.show_rounds {
            print!("{}", round.grid);
        }
    }
    if !args.show_rounds {
        print!("{}", report.final_grid);
    }
    println!("{}", report.final_legend);
    if !report.unmapped.is_empty() {
        println!("Unmapped tasks: {:?}", report.unmapped);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let args = Args::parse_from(["stress-sim"]);
        let cfg = resolve_config(&args).unwrap();
        assert_eq!((cfg.width, cfg.height), (5, 5));
        assert_eq!(cfg.tasks.count, 15);
        assert_eq!(cfg.stress_fault_count, 3);
    }

    #[test]
    fn flags_override_values_from_file() {
        let f = yaml_tempfile(
            "grid:\n  width: 8\n  height: 6\ntasks:\n  count: 20\nstress:\n  fault_count: 4\n",
        );
        let path = f.path().to_str().unwrap();
        let args = Args::parse_from(["stress-sim", "-c", path, "-W", "7", "-n", "9"]);
        let cfg = resolve_config(&args).unwrap();

        assert_eq!(cfg.width, 7);
        assert_eq!(cfg.height, 6);
        assert_eq!(cfg.tasks.count, 20);
        assert_eq!(cfg.stress_fault_count, 9);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::parse_from(["stress-sim", "--height", "0"]);
        assert!(resolve_config(&args).is_err());
    }
}
