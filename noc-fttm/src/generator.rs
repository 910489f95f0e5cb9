/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Seeded random task-graph generator.
//!
//! Produces `task_count` tasks with ids `0..task_count`.  Each task draws
//! between 1 and `max_partners` partners uniformly from the whole set (self
//! picks are dropped) and records a random volume on **both** endpoints, so
//! the resulting graph is symmetric.  A later draw of the same pair
//! overwrites the earlier volume on both sides.
//!
//! Output depends only on the parameters: the same seed always yields the
//! same graph.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::task::{Task, TaskId, DEFAULT_INSTRUCTION_COUNT};

/// Parameters of one generated task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGraphGenerator {
    pub task_count: u32,
    /// Upper bound on partner draws per task (at least one draw when > 0).
    pub max_partners: u32,
    /// Inclusive volume range in bits.
    pub min_volume: u64,
    pub max_volume: u64,
    pub instruction_count: u64,
    pub seed: u64,
}

impl Default for TaskGraphGenerator {
    fn default() -> Self {
        Self {
            task_count: 12,
            max_partners: 3,
            min_volume: 10,
            max_volume: 100,
            instruction_count: DEFAULT_INSTRUCTION_COUNT,
            seed: 42,
        }
    }
}

impl TaskGraphGenerator {
    pub fn generate(&self) -> Vec<Task> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut tasks: Vec<Task> = (0..self.task_count)
            .map(|id| Task::new(TaskId(id), self.instruction_count))
            .collect();

        if tasks.is_empty() || self.max_partners == 0 {
            return tasks;
        }

        let lo = self.min_volume.min(self.max_volume);
        let hi = self.min_volume.max(self.max_volume);
        let n = tasks.len();

        for i in 0..n {
            let draws = rng.gen_range(1..=self.max_partners);
            for _ in 0..draws {
                let j = rng.gen_range(0..n);
                if j == i {
                    continue;
                }
                let volume = rng.gen_range(lo..=hi);
                let (a, b) = (tasks[i].id, tasks[j].id);
                tasks[i].add_dependency(b, volume);
                tasks[j].add_dependency(a, volume);
            }
        }

        debug!(
            tasks = n,
            links = tasks.iter().map(|t| t.partners().count()).sum::<usize>() / 2,
            seed = self.seed,
            "task graph generated"
        );

        tasks
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_ids_in_order() {
        let tasks = TaskGraphGenerator::default().generate();
        let ids: Vec<u32> = tasks.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        assert!(tasks
            .iter()
            .all(|t| t.instruction_count == DEFAULT_INSTRUCTION_COUNT));
    }

    #[test]
    fn same_seed_same_graph() {
        let generator = TaskGraphGenerator {
            seed: 1234,
            ..Default::default()
        };
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    fn graph_is_symmetric_without_self_loops() {
        let tasks = TaskGraphGenerator {
            task_count: 20,
            max_partners: 4,
            seed: 9,
            ..Default::default()
        }
        .generate();

        for task in &tasks {
            assert!(task.volume_to(task.id).is_none(), "{} talks to itself", task.id);
            for (partner, volume) in task.partners() {
                let other = &tasks[partner.0 as usize];
                assert_eq!(other.volume_to(task.id), Some(volume));
            }
        }
    }

    #[test]
    fn volumes_stay_in_range() {
        let tasks = TaskGraphGenerator {
            task_count: 30,
            min_volume: 5,
            max_volume: 8,
            seed: 3,
            ..Default::default()
        }
        .generate();
        assert!(tasks
            .iter()
            .flat_map(|t| t.partners())
            .all(|(_, v)| (5..=8).contains(&v)));
    }

    #[test]
    fn zero_partners_yields_isolated_tasks() {
        let tasks = TaskGraphGenerator {
            max_partners: 0,
            ..Default::default()
        }
        .generate();
        assert!(tasks.iter().all(|t| !t.has_partners()));
    }

    #[test]
    fn empty_and_single_task_graphs() {
        let none = TaskGraphGenerator {
            task_count: 0,
            ..Default::default()
        };
        assert!(none.generate().is_empty());

        let one = TaskGraphGenerator {
            task_count: 1,
            ..Default::default()
        };
        let tasks = one.generate();
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].has_partners());
    }
}
