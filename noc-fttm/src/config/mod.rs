/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scenario configuration loading.
//!
//! A scenario describes one simulation run: grid size, task-graph
//! parameters, seed, placement algorithm and the faults to inject.  Every
//! section is optional; missing values fall back to [`ScenarioConfig::default`].
//!
//! The expected YAML structure is:
//! ```yaml
//! grid:
//!   width: 4
//!   height: 4
//! tasks:
//!   count: 12
//!   max_partners: 3
//!   min_volume: 10
//!   max_volume: 100
//!   instruction_count: 1000
//! seed: 42
//! placement: sequential      # or "random"
//! faults:
//!   - [1, 1]
//! stress:
//!   fault_count: 3
//! comparison:
//!   iterations: 5
//! ```

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::generator::TaskGraphGenerator;
use crate::mapper::PlacementAlgorithm;
use crate::task::DEFAULT_INSTRUCTION_COUNT;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    grid: Option<GridEntry>,
    tasks: Option<TasksEntry>,
    seed: Option<u64>,
    placement: Option<String>,
    faults: Option<Vec<(u32, u32)>>,
    stress: Option<StressEntry>,
    comparison: Option<ComparisonEntry>,
}

#[derive(Debug, Deserialize)]
struct GridEntry {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TasksEntry {
    count: Option<u32>,
    max_partners: Option<u32>,
    min_volume: Option<u64>,
    max_volume: Option<u64>,
    instruction_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StressEntry {
    fault_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ComparisonEntry {
    iterations: Option<u32>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Shape of the generated task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSettings {
    pub count: u32,
    pub max_partners: u32,
    pub min_volume: u64,
    pub max_volume: u64,
    pub instruction_count: u64,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            count: 12,
            max_partners: 3,
            min_volume: 10,
            max_volume: 100,
            instruction_count: DEFAULT_INSTRUCTION_COUNT,
        }
    }
}

/// One fully-resolved simulation scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub width: u32,
    pub height: u32,
    pub tasks: TaskSettings,
    /// Drives task generation, random placement and random fault picks.
    pub seed: u64,
    pub placement: PlacementAlgorithm,
    /// Faults applied in order by the demo run.
    pub faults: Vec<(u32, u32)>,
    /// Number of random faults in a stress run.
    pub stress_fault_count: u32,
    /// Number of generated graphs in a strategy comparison.
    pub comparison_iterations: u32,
}

impl Default for ScenarioConfig {
    /// 4×4 mesh, 12 tasks (four spare cores), one fault at (1, 1).
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            tasks: TaskSettings::default(),
            seed: 42,
            placement: PlacementAlgorithm::Sequential,
            faults: vec![(1, 1)],
            stress_fault_count: 3,
            comparison_iterations: 5,
        }
    }
}

impl ScenarioConfig {
    /// Parses the scenario file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or the values fail [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scenario configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open scenario file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid scenario file: {}", path.display()))
    }

    /// Parses a scenario from YAML text.  An empty document yields the
    /// defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ScenarioFile = if content.trim().is_empty() {
            ScenarioFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse scenario YAML")?
        };

        let mut cfg = Self::default();

        if let Some(grid) = file.grid {
            cfg.width = grid.width.unwrap_or(cfg.width);
            cfg.height = grid.height.unwrap_or(cfg.height);
        }
        if let Some(tasks) = file.tasks {
            let t = &mut cfg.tasks;
            t.count = tasks.count.unwrap_or(t.count);
            t.max_partners = tasks.max_partners.unwrap_or(t.max_partners);
            t.min_volume = tasks.min_volume.unwrap_or(t.min_volume);
            t.max_volume = tasks.max_volume.unwrap_or(t.max_volume);
            t.instruction_count = tasks.instruction_count.unwrap_or(t.instruction_count);
        }
        if let Some(seed) = file.seed {
            cfg.seed = seed;
        }
        if let Some(name) = file.placement {
            cfg.placement = name
                .parse::<PlacementAlgorithm>()
                .with_context(|| format!("Invalid placement '{}'", name))?;
        }
        if let Some(faults) = file.faults {
            cfg.faults = faults;
        }
        if let Some(stress) = file.stress {
            cfg.stress_fault_count = stress.fault_count.unwrap_or(cfg.stress_fault_count);
        }
        if let Some(cmp) = file.comparison {
            cfg.comparison_iterations = cmp.iterations.unwrap_or(cfg.comparison_iterations);
        }

        cfg.validate()?;

        debug!(
            "  Scenario: {}x{} grid | {} tasks | seed {} | placement {} | {} fault(s)",
            cfg.width,
            cfg.height,
            cfg.tasks.count,
            cfg.seed,
            cfg.placement,
            cfg.faults.len(),
        );

        Ok(cfg)
    }

    /// Rejects values that would make a run meaningless.
    ///
    /// Task count vs. core count is deliberately **not** checked here: that
    /// surfaces as `MappingError::ResourceExhausted` from the mapper.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "grid must be at least 1x1 (got {}x{})",
            self.width,
            self.height
        );
        ensure!(
            self.tasks.max_partners >= 1,
            "tasks.max_partners must be at least 1"
        );
        ensure!(
            self.tasks.min_volume <= self.tasks.max_volume,
            "tasks.min_volume ({}) exceeds tasks.max_volume ({})",
            self.tasks.min_volume,
            self.tasks.max_volume
        );
        Ok(())
    }

    /// Generator for this scenario's task graph, offset by `run` so that
    /// repeated runs see different graphs.
    pub fn task_generator(&self, run: u64) -> TaskGraphGenerator {
        TaskGraphGenerator {
            task_count: self.tasks.count,
            max_partners: self.tasks.max_partners,
            min_volume: self.tasks.min_volume,
            max_volume: self.tasks.max_volume,
            instruction_count: self.tasks.instruction_count,
            seed: self.seed.wrapping_add(run),
        }
    }

    /// Configured placement, with `Random` seeded from the scenario seed.
    pub fn placement_algorithm(&self) -> PlacementAlgorithm {
        self.placement.with_seed(self.seed)
    }

    pub fn core_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
