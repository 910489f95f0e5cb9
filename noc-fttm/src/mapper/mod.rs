/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fault-tolerant task mapper.
//!
//! [`FaultTolerantMapper`] owns a [`Topology`] and the authoritative
//! `TaskId → CoreId` mapping.  It performs:
//!
//! 1. **Initial placement**: tasks are laid onto spare cores in a fixed
//!    order, all-or-nothing.
//! 2. **Fault recovery**: when a core dies, only the task it was running is
//!    moved, to the spare core that minimises that task's communication
//!    energy.
//! 3. **Energy accounting**: total `volume × hops` of the current mapping.
//!
//! # Invariants (hold after every public call)
//! * the mapping is injective (one task per core);
//! * every mapped core is healthy;
//! * `mapping[t] == c` ⇔ `core(c).assigned_task == Some(t)`.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Tie-breaking | Spare cores scanned in ascending id; first minimum wins |
//! | Eviction | [`Topology::fail_core`] marks faulty and returns the task in one step |
//! | Task storage | Id-addressed arena, tasks never mutated after hand-over |
//! | Error returns | Validate first, mutate second; a failed call changes nothing |
//! | Thread safety | Every mutating call takes `&mut self`; wrap in one lock to share |
//!
//! Faults are handled one at a time and greedily.  A partner displaced by an
//! earlier fault that has not been re-placed contributes nothing to the
//! energy of later choices, so multi-fault recovery quality depends on the
//! order in which faults arrive.
//!
//! # Example
//! ```rust
//! use noc_fttm::mapper::{FaultOutcome, FaultTolerantMapper};
//! use noc_fttm::task::{CoreId, Task, TaskId};
//! use noc_fttm::topology::Topology;
//!
//! let tasks: Vec<Task> = (0..5).map(Task::with_id).collect();
//! let mut mapper = FaultTolerantMapper::new(Topology::new(4, 4));
//! mapper.initial_mapping(&tasks).unwrap();
//!
//! let outcome = mapper.handle_fault(0, 0);
//! assert!(matches!(outcome, FaultOutcome::Remapped { to: CoreId(5), .. }));
//! assert_eq!(mapper.core_of(TaskId(0)), Some(CoreId(5)));
//! ```

pub mod energy;
pub mod error;

pub use error::{AssignmentReason, MappingError};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::task::{CoreId, Task, TaskId};
use crate::topology::Topology;

// ── Placement algorithms ──────────────────────────────────────────────────────

/// Strategy for the initial placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementAlgorithm {
    /// `task[i] → spare[i]` with spare cores in ascending id.  No locality
    /// optimisation: the communication graph is ignored.
    #[default]
    Sequential,

    /// Spare cores shuffled with a seeded RNG, then assigned positionally.
    /// Baseline for strategy comparisons.
    Random { seed: u64 },
}

impl PlacementAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            PlacementAlgorithm::Sequential => "sequential",
            PlacementAlgorithm::Random { .. } => "random",
        }
    }

    /// Re-seed a `Random` strategy; `Sequential` is returned unchanged.
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            PlacementAlgorithm::Sequential => PlacementAlgorithm::Sequential,
            PlacementAlgorithm::Random { .. } => PlacementAlgorithm::Random { seed },
        }
    }
}

impl fmt::Display for PlacementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses `"sequential"` or `"random"` (seed 0, see
/// [`with_seed`](PlacementAlgorithm::with_seed)).
impl FromStr for PlacementAlgorithm {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(PlacementAlgorithm::Sequential),
            "random" => Ok(PlacementAlgorithm::Random { seed: 0 }),
            _ => Err(MappingError::UnknownAlgorithm(s.to_string())),
        }
    }
}

// ── Fault outcome ─────────────────────────────────────────────────────────────

/// What [`FaultTolerantMapper::handle_fault`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultOutcome {
    /// No core at these coordinates.  Nothing changed.
    NoCore { x: u32, y: u32 },

    /// The core is now faulty but was not running a task.
    Idle { core: CoreId },

    /// The displaced task moved to the cheapest spare core.
    Remapped {
        task: TaskId,
        from: CoreId,
        to: CoreId,
        /// Energy of the task on its new core.
        energy: u64,
    },

    /// No spare core was left: the task is no longer mapped.
    Unmapped { task: TaskId, from: CoreId },
}

impl FaultOutcome {
    /// Task that lost its core, whether or not it found a new one.
    pub fn displaced_task(&self) -> Option<TaskId> {
        match self {
            FaultOutcome::Remapped { task, .. } | FaultOutcome::Unmapped { task, .. } => {
                Some(*task)
            }
            FaultOutcome::NoCore { .. } | FaultOutcome::Idle { .. } => None,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, FaultOutcome::Unmapped { .. })
    }
}

impl fmt::Display for FaultOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultOutcome::NoCore { x, y } => write!(f, "no core at ({x}, {y}), ignored"),
            FaultOutcome::Idle { core } => write!(f, "core {core} failed, no task displaced"),
            FaultOutcome::Remapped {
                task,
                from,
                to,
                energy,
            } => write!(f, "task {task} moved {from} → {to} (energy {energy})"),
            FaultOutcome::Unmapped { task, from } => {
                write!(f, "CRITICAL: task {task} lost core {from}, no spare core left")
            }
        }
    }
}

// ── FaultTolerantMapper ───────────────────────────────────────────────────────

/// The mapping engine.
///
/// Owns the topology so that core state and the mapping can only change
/// together.  Read-only consumers (renderers, reports) go through
/// [`topology`](Self::topology) and [`mapping`](Self::mapping).
#[derive(Debug, Clone)]
pub struct FaultTolerantMapper {
    topology: Topology,

    /// Authoritative task → core relation.
    mapping: BTreeMap<TaskId, CoreId>,

    /// Every task handed to the mapper, mapped or not.
    tasks: BTreeMap<TaskId, Task>,
}

impl FaultTolerantMapper {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            mapping: BTreeMap::new(),
            tasks: BTreeMap::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn mapping(&self) -> &BTreeMap<TaskId, CoreId> {
        &self.mapping
    }

    pub fn core_of(&self, task: TaskId) -> Option<CoreId> {
        self.mapping.get(&task).copied()
    }

    pub fn is_mapped(&self, task: TaskId) -> bool {
        self.mapping.contains_key(&task)
    }

    // ── Initial placement ─────────────────────────────────────────────────────

    /// Sequential placement: `tasks[i]` goes to the `i`-th spare core.
    ///
    /// # Errors
    /// * [`MappingError::ResourceExhausted`] if there are fewer spare cores
    ///   than tasks.
    /// * [`MappingError::DuplicateTask`] if a task id repeats or is already
    ///   mapped.
    ///
    /// On error nothing is assigned.
    pub fn initial_mapping(&mut self, tasks: &[Task]) -> Result<(), MappingError> {
        self.initial_mapping_with(tasks, PlacementAlgorithm::Sequential)
    }

    /// Initial placement with an explicit [`PlacementAlgorithm`].
    ///
    /// Same contract as [`initial_mapping`](Self::initial_mapping).
    pub fn initial_mapping_with(
        &mut self,
        tasks: &[Task],
        algorithm: PlacementAlgorithm,
    ) -> Result<(), MappingError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        let mut spares = self.topology.available_core_ids();
        if spares.len() < tasks.len() {
            return Err(MappingError::ResourceExhausted {
                tasks: tasks.len(),
                available: spares.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for task in tasks {
            if self.mapping.contains_key(&task.id) || !seen.insert(task.id) {
                return Err(MappingError::DuplicateTask(task.id));
            }
        }

        if let PlacementAlgorithm::Random { seed } = algorithm {
            let mut rng = StdRng::seed_from_u64(seed);
            spares.shuffle(&mut rng);
        }

        // ── Commit ────────────────────────────────────────────────────────────
        for (task, core) in tasks.iter().zip(spares) {
            self.topology.assign(core, task.id)?;
            self.mapping.insert(task.id, core);
            self.tasks.insert(task.id, task.clone());
            debug!(task = task.id.0, core = core.0, "task placed");
        }

        info!(
            algorithm = %algorithm,
            task_count = tasks.len(),
            spare_left = self.topology.available_cores().count(),
            "initial mapping completed"
        );
        Ok(())
    }

    /// Place a single task on a chosen core.
    ///
    /// # Errors
    /// [`MappingError::UnknownCore`], [`MappingError::DuplicateTask`], or
    /// [`MappingError::InvalidOperation`] when the core is faulty or busy.
    pub fn place_task(&mut self, task: Task, core: CoreId) -> Result<(), MappingError> {
        if self.mapping.contains_key(&task.id) {
            return Err(MappingError::DuplicateTask(task.id));
        }
        let target = self
            .topology
            .core_by_id(core)
            .ok_or(MappingError::UnknownCore(core))?;
        if let Some(holder) = target.assigned_task {
            return Err(MappingError::InvalidOperation {
                task: task.id,
                core,
                reason: AssignmentReason::CoreOccupied { holder },
            });
        }

        // Faulty cores are rejected here.
        self.topology.assign(core, task.id)?;
        self.mapping.insert(task.id, core);
        debug!(task = task.id.0, core = core.0, "task placed manually");
        self.tasks.insert(task.id, task);
        Ok(())
    }

    // ── Fault recovery ────────────────────────────────────────────────────────

    /// Permanently fail the core at `(x, y)` and relocate its task.
    ///
    /// The displaced task goes to the spare core with the strictly lowest
    /// [`task_energy_on_core`](Self::task_energy_on_core); ties go to the
    /// lowest core id.  No other task moves.
    ///
    /// Never fails.  Out-of-bounds coordinates yield
    /// [`FaultOutcome::NoCore`]; running out of spare cores yields
    /// [`FaultOutcome::Unmapped`] and leaves the mapper usable.
    pub fn handle_fault(&mut self, x: u32, y: u32) -> FaultOutcome {
        let Some(from) = self.topology.core_id_at(x, y) else {
            debug!(x, y, "fault coordinates outside the grid, ignored");
            return FaultOutcome::NoCore { x, y };
        };

        let Some(task) = self.topology.fail_core(from) else {
            return FaultOutcome::Idle { core: from };
        };
        self.mapping.remove(&task);

        info!(task = task.0, core = from.0, "task displaced, searching for a spare core");

        let Some((to, energy)) = self.find_best_spare_core(task) else {
            error!(
                task = task.0,
                core = from.0,
                "CRITICAL: no spare core available, task is now unmapped"
            );
            return FaultOutcome::Unmapped { task, from };
        };

        if let Err(e) = self.topology.assign(to, task) {
            error!(task = task.0, core = to.0, "spare core rejected the task: {e}");
            return FaultOutcome::Unmapped { task, from };
        }
        self.mapping.insert(task, to);

        if let Some(core) = self.topology.core_by_id(to) {
            info!(
                task = task.0,
                from = from.0,
                to = to.0,
                x = core.x,
                y = core.y,
                energy,
                "task remapped"
            );
        }

        FaultOutcome::Remapped {
            task,
            from,
            to,
            energy,
        }
    }

    /// Cheapest spare core for `task` and the energy it would cost there.
    fn find_best_spare_core(&self, task: TaskId) -> Option<(CoreId, u64)> {
        let task = self.tasks.get(&task);

        // available_cores() yields ascending ids and min_by_key keeps the
        // first minimum: lowest id wins ties.
        self.topology
            .available_cores()
            .map(|core| {
                let cost = task.map_or(0, |t| self.task_energy_on_core(t, core.id));
                debug!(core = core.id.0, energy = cost, "spare candidate");
                (core.id, cost)
            })
            .min_by_key(|&(_, cost)| cost)
    }

    // ── Energy accounting ─────────────────────────────────────────────────────

    /// Energy `task` would incur on `core` given the current mapping.
    ///
    /// Partners that are unmapped or on a faulty core contribute zero.
    pub fn task_energy_on_core(&self, task: &Task, core: CoreId) -> u64 {
        energy::task_energy(&self.topology, &self.mapping, task, core)
    }

    /// Sum of every mapped task's energy on its current core, saturating at
    /// `u64::MAX`.
    ///
    /// Order-independent.  With symmetric communication each link is counted
    /// from both endpoints.
    pub fn calculate_total_energy(&self, tasks: &[Task]) -> u64 {
        tasks
            .iter()
            .filter_map(|task| {
                let core = self.core_of(task.id)?;
                Some(self.task_energy_on_core(task, core))
            })
            .fold(0, u64::saturating_add)
    }

    /// Tasks from `tasks` that currently have no core.
    pub fn unmapped_tasks(&self, tasks: &[Task]) -> Vec<TaskId> {
        tasks
            .iter()
            .map(|t| t.id)
            .filter(|id| !self.mapping.contains_key(id))
            .collect()
    }

    /// Verify the mapping invariants against core state.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut used = BTreeSet::new();
        for (&task, &core_id) in &self.mapping {
            if !used.insert(core_id) {
                return Err(format!("core {core_id} holds more than one task"));
            }
            let core = self
                .topology
                .core_by_id(core_id)
                .ok_or_else(|| format!("task {task} mapped to unknown core {core_id}"))?;
            if !core.is_healthy() {
                return Err(format!("task {task} mapped to faulty core {core_id}"));
            }
            if core.assigned_task != Some(task) {
                return Err(format!(
                    "task {task} mapped to {core_id} but core holds {:?}",
                    core.assigned_task
                ));
            }
        }

        for core in self.topology.cores() {
            if let Some(task) = core.assigned_task {
                if !core.is_healthy() {
                    return Err(format!("faulty core {} still holds {task}", core.id));
                }
                if self.core_of(task) != Some(core.id) {
                    return Err(format!("core {} holds {task} outside the mapping", core.id));
                }
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
