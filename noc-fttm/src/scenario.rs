/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scenario drivers built on the public mapper API.
//!
//! * [`run_demo`]: initial mapping, then the configured faults in order.
//! * [`run_stress`]: repeated faults on randomly chosen busy cores.
//! * [`run_comparison`]: sequential vs. random placement over several
//!   generated graphs, each strategy on its own topology.
//!
//! None of these hold mapping logic; they only call into
//! [`FaultTolerantMapper`] and collect numbers.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::mapper::energy::{improvement_percent, mean, overhead_percent};
use crate::mapper::{FaultOutcome, FaultTolerantMapper, PlacementAlgorithm};
use crate::render::{legend, render_grid};
use crate::task::{CoreId, Task, TaskId};
use crate::topology::Topology;

fn mapped_system(
    cfg: &ScenarioConfig,
    tasks: &[Task],
    algorithm: PlacementAlgorithm,
) -> Result<FaultTolerantMapper> {
    let mut mapper = FaultTolerantMapper::new(Topology::new(cfg.width, cfg.height));
    mapper
        .initial_mapping_with(tasks, algorithm)
        .with_context(|| format!("{} initial mapping failed", algorithm))?;
    Ok(mapper)
}

// ── Demo ──────────────────────────────────────────────────────────────────────

/// Result of [`run_demo`].
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub initial_energy: u64,
    pub final_energy: u64,
    /// One entry per configured fault, in order.
    pub outcomes: Vec<FaultOutcome>,
    pub unmapped: Vec<TaskId>,
    pub initial_grid: String,
    pub final_grid: String,
    /// Core state counts after the last fault.
    pub final_legend: String,
}

impl DemoReport {
    pub fn overhead_percent(&self) -> Option<f64> {
        overhead_percent(self.initial_energy, self.final_energy)
    }
}

/// Map a generated task graph, then inject `cfg.faults` one at a time.
pub fn run_demo(cfg: &ScenarioConfig) -> Result<DemoReport> {
    let tasks = cfg.task_generator(0).generate();
    let mut mapper = mapped_system(cfg, &tasks, cfg.placement_algorithm())?;

    let initial_energy = mapper.calculate_total_energy(&tasks);
    let initial_grid = render_grid(mapper.topology());
    info!(energy = initial_energy, "initial mapping energy");

    let mut outcomes = Vec::with_capacity(cfg.faults.len());
    for &(x, y) in &cfg.faults {
        let outcome = mapper.handle_fault(x, y);
        info!(x, y, "{outcome}");
        outcomes.push(outcome);
    }

    let final_energy = mapper.calculate_total_energy(&tasks);
    let unmapped = mapper.unmapped_tasks(&tasks);
    if !unmapped.is_empty() {
        warn!(count = unmapped.len(), "tasks left without a core");
    }

    Ok(DemoReport {
        initial_energy,
        final_energy,
        outcomes,
        unmapped,
        initial_grid,
        final_grid: render_grid(mapper.topology()),
        final_legend: legend(mapper.topology()),
    })
}

// ── Stress ────────────────────────────────────────────────────────────────────

/// One fault of a stress run.
#[derive(Debug, Clone, PartialEq)]
pub struct StressRound {
    pub round: u32,
    pub core: CoreId,
    pub outcome: FaultOutcome,
    pub energy: u64,
    pub overhead_percent: Option<f64>,
    /// Grid right after this fault was handled.
    pub grid: String,
}

/// Result of [`run_stress`].
#[derive(Debug, Clone)]
pub struct StressReport {
    pub base_energy: u64,
    pub rounds: Vec<StressRound>,
    pub unmapped: Vec<TaskId>,
    pub final_grid: String,
    pub final_legend: String,
}

/// Inject up to `cfg.stress_fault_count` faults, each on a random healthy
/// core that currently runs a task.
///
/// Stops early once no busy core is left.
pub fn run_stress(cfg: &ScenarioConfig) -> Result<StressReport> {
    let tasks = cfg.task_generator(0).generate();
    let mut mapper = mapped_system(cfg, &tasks, cfg.placement_algorithm())?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let base_energy = mapper.calculate_total_energy(&tasks);
    info!(energy = base_energy, faults = cfg.stress_fault_count, "stress run started");

    let mut rounds = Vec::new();
    for round in 1..=cfg.stress_fault_count {
        let busy: Vec<(CoreId, u32, u32)> = mapper
            .topology()
            .occupied_cores()
            .map(|c| (c.id, c.x, c.y))
            .collect();
        let Some(&(core, x, y)) = busy.choose(&mut rng) else {
            warn!(round, "no busy core left to fault, stopping");
            break;
        };

        let outcome = mapper.handle_fault(x, y);
        let energy = mapper.calculate_total_energy(&tasks);
        let overhead = overhead_percent(base_energy, energy);
        info!(round, core = core.0, energy, overhead_pct = ?overhead, "{outcome}");

        rounds.push(StressRound {
            round,
            core,
            outcome,
            energy,
            overhead_percent: overhead,
            grid: render_grid(mapper.topology()),
        });
    }

    Ok(StressReport {
        base_energy,
        rounds,
        unmapped: mapper.unmapped_tasks(&tasks),
        final_grid: render_grid(mapper.topology()),
        final_legend: legend(mapper.topology()),
    })
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// Energies of both strategies on one generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonRun {
    pub run: u32,
    pub sequential: u64,
    pub random: u64,
}

/// Result of [`run_comparison`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub runs: Vec<ComparisonRun>,
    pub mean_sequential: f64,
    pub mean_random: f64,
    /// How much lower the sequential mean is than the random mean, in
    /// percent.  `None` when the random mean is zero.
    pub improvement_percent: Option<f64>,
}

/// Compare sequential and random placement over
/// `cfg.comparison_iterations` graphs.
///
/// Run `i` uses graph seed `seed + i` and random-placement seed `seed + i`.
/// Each strategy gets a fresh topology; no state is shared.
pub fn run_comparison(cfg: &ScenarioConfig) -> Result<ComparisonReport> {
    let mut runs = Vec::with_capacity(cfg.comparison_iterations as usize);

    for run in 0..cfg.comparison_iterations {
        let tasks = cfg.task_generator(u64::from(run)).generate();

        let sequential = mapped_system(cfg, &tasks, PlacementAlgorithm::Sequential)?
            .calculate_total_energy(&tasks);
        let random_seed = cfg.seed.wrapping_add(u64::from(run));
        let random = mapped_system(cfg, &tasks, PlacementAlgorithm::Random { seed: random_seed })?
            .calculate_total_energy(&tasks);

        info!(run = run + 1, sequential, random, "comparison run");
        runs.push(ComparisonRun {
            run,
            sequential,
            random,
        });
    }

    let seq: Vec<u64> = runs.iter().map(|r| r.sequential).collect();
    let rnd: Vec<u64> = runs.iter().map(|r| r.random).collect();
    let mean_sequential = mean(&seq);
    let mean_random = mean(&rnd);

    Ok(ComparisonReport {
        runs,
        mean_sequential,
        mean_random,
        improvement_percent: improvement_percent(mean_sequential, mean_random),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
