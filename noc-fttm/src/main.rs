/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use noc_fttm::config::ScenarioConfig;
use noc_fttm::mapper::energy::overhead_percent;
use noc_fttm::mapper::PlacementAlgorithm;
use noc_fttm::scenario::run_demo;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Fault-tolerant task mapping demo: map a random task graph onto a mesh,
/// inject permanent faults and report the communication-energy overhead.
///
/// Example:
///   noc-fttm -W 4 -H 4 -t 12 --fault 1,1 --fault 0,0
#[derive(Debug, Parser)]
#[command(
    name = "noc-fttm",
    about = "Fault-tolerant task mapping on a 2D mesh NoC",
    long_about = None,
)]
struct Cli {
    /// Path to a YAML scenario file.  Flags below override its values.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Grid width (cores per row).
    #[arg(short = 'W', long = "width")]
    width: Option<u32>,

    /// Grid height (number of rows).
    #[arg(short = 'H', long = "height")]
    height: Option<u32>,

    /// Number of generated tasks.
    #[arg(short = 't', long = "tasks")]
    tasks: Option<u32>,

    /// Seed for task generation and random placement.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Initial placement algorithm: sequential | random.
    #[arg(short = 'p', long = "placement")]
    placement: Option<PlacementAlgorithm>,

    /// Fault to inject as `X,Y`.  Repeat for several faults; replaces the
    /// configured list.
    #[arg(short = 'f', long = "fault", value_parser = parse_coord)]
    faults: Vec<(u32, u32)>,
}

fn parse_coord(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y in '{s}': {e}"))?;
    Ok((x, y))
}

fn resolve_config(cli: &Cli) -> Result<ScenarioConfig> {
    let mut cfg = match &cli.config {
        Some(path) => ScenarioConfig::load_from_file(path)?,
        None => {
            warn!("No scenario file provided, using default scenario");
            ScenarioConfig::default()
        }
    };

    if let Some(w) = cli.width {
        cfg.width = w;
    }
    if let Some(h) = cli.height {
        cfg.height = h;
    }
    if let Some(n) = cli.tasks {
        cfg.tasks.count = n;
    }
    if let Some(seed) = cli.seed {
        cfg.seed = seed;
    }
    if let Some(p) = cli.placement {
        cfg.placement = p;
    }
    if !cli.faults.is_empty() {
        cfg.faults = cli.faults.clone();
    }

    cfg.validate().context("Invalid command-line overrides")?;
    Ok(cfg)
}

fn overhead_line(initial: u64, current: u64) -> String {
    match overhead_percent(initial, current) {
        Some(pct) => format!(
            "Energy overhead: {:+} ({:+.2}%)",
            i128::from(current) - i128::from(initial),
            pct
        ),
        None => "Energy overhead: n/a (initial mapping has no traffic)".to_string(),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load scenario: {:#}", e);
            process::exit(1);
        }
    };

    info!(
        width     = cfg.width,
        height    = cfg.height,
        tasks     = cfg.tasks.count,
        seed      = cfg.seed,
        placement = %cfg.placement,
        faults    = ?cfg.faults,
        "Configuration"
    );

    let report = match run_demo(&cfg) {
        Ok(report) => report,
        Err(e) => {
            error!("Demo failed: {:#}", e);
            process::exit(1);
        }
    };

    println!("--- Initial mapping (energy: {}) ---", report.initial_energy);
    print!("{}", report.initial_grid);

    for ((x, y), outcome) in cfg.faults.iter().zip(&report.outcomes) {
        println!("fault at ({x}, {y}): {outcome}");
    }

    println!("--- Post-fault mapping (energy: {}) ---", report.final_energy);
    print!("{}", report.final_grid);
    println!("{}", report.final_legend);

    println!("{}", overhead_line(report.initial_energy, report.final_energy));
    if !report.unmapped.is_empty() {
        println!("Unmapped tasks: {:?}", report.unmapped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coord_accepts_spaces() {
        assert_eq!(parse_coord("1,2"), Ok((1, 2)));
        assert_eq!(parse_coord(" 3 , 0 "), Ok((3, 0)));
    }

    #[test]
    fn parse_coord_rejects_garbage() {
        assert!(parse_coord("1").is_err());
        assert!(parse_coord("a,1").is_err());
        assert!(parse_coord("-1,1").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["noc-fttm", "-W", "5", "-t", "3", "-f", "0,0", "-f", "2,2"]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.width, 5);
        assert_eq!(cfg.height, 4);
        assert_eq!(cfg.tasks.count, 3);
        assert_eq!(cfg.faults, vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn placement_flag_parses_algorithm_name() {
        let cli = Cli::parse_from(["noc-fttm", "--placement", "random"]);
        assert_eq!(cli.placement, Some(PlacementAlgorithm::Random { seed: 0 }));
    }

    #[test]
    fn overhead_line_signs_growth_and_savings() {
        assert_eq!(overhead_line(200, 250), "Energy overhead: +50 (+25.00%)");
        assert_eq!(overhead_line(200, 150), "Energy overhead: -50 (-25.00%)");
        assert_eq!(
            overhead_line(0, 10),
            "Energy overhead: n/a (initial mapping has no traffic)"
        );
    }
}
