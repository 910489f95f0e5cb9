/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Placement strategy comparison: sequential vs. random.
//!
//! Each iteration generates a fresh task graph and maps it twice, on two
//! independent topologies, then prints the average energies.
//!
//! Example:
//!   compare-sim --iterations 10 --seed 1

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use noc_fttm::config::ScenarioConfig;
use noc_fttm::scenario::run_comparison;

#[derive(Debug, Parser)]
#[command(name = "compare-sim", about = "Compare sequential and random placement energy")]
struct Args {
    /// YAML scenario file (grid, task and seed settings).
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Overrides `comparison.iterations`.
    #[arg(short = 'i', long)]
    iterations: Option<u32>,

    #[arg(short = 's', long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => ScenarioConfig::load_from_file(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(n) = args.iterations {
        cfg.comparison_iterations = n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }

    info!(
        width = cfg.width,
        height = cfg.height,
        tasks = cfg.tasks.count,
        iterations = cfg.comparison_iterations,
        "=== Sequential vs random mapping ==="
    );

    let report = run_comparison(&cfg).context("comparison failed")?;

    for run in &report.runs {
        println!(
            "Run {}: sequential={}, random={}",
            run.run + 1,
            run.sequential,
            run.random
        );
    }
    println!();
    println!("Average sequential energy: {:.2}", report.mean_sequential);
    println!("Average random energy:     {:.2}", report.mean_random);
    match report.improvement_percent {
        Some(pct) => println!("Improvement: {pct:.2}%"),
        None => println!("Improvement: n/a"),
    }

    Ok(())
}
