/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Communication-energy model.
//!
//! The cost of a link is `volume × hops`, with hops measured as the Manhattan
//! distance between the two cores.  A task's energy on a candidate core is
//! the sum over its partners:
//!
//! $$E(t, c) = \sum_{p \in partners(t)} v_{t,p} \cdot d(c, core(p))$$
//!
//! Partners that are unmapped, or sit on a faulty core, contribute zero.  The
//! total energy of a mapping sums `E(t, core(t))` over every mapped task, so
//! a symmetric graph counts each physical link twice (once per endpoint).
//! Both placement strategies are measured the same way, so the factor of two
//! cancels out in any comparison.
//!
//! Volumes are unbounded, so every product and sum saturates at `u64::MAX`
//! instead of overflowing.  A saturated energy still compares as the
//! largest possible cost.

use std::collections::BTreeMap;

use crate::task::{CoreId, Task, TaskId};
use crate::topology::Topology;

/// Energy `task` would incur if it ran on `candidate`, given where every
/// other task currently sits in `mapping`.
///
/// Returns `0` if `candidate` is not on the grid.
pub fn task_energy(
    topology: &Topology,
    mapping: &BTreeMap<TaskId, CoreId>,
    task: &Task,
    candidate: CoreId,
) -> u64 {
    let Some(candidate) = topology.core_by_id(candidate) else {
        return 0;
    };

    task.partners()
        .filter_map(|(partner, volume)| {
            let core = topology.core_by_id(*mapping.get(&partner)?)?;
            core.is_healthy().then(|| {
                volume.saturating_mul(u64::from(topology.manhattan_distance(candidate, core)))
            })
        })
        .fold(0, u64::saturating_add)
}

/// Relative growth of `current` over `base`, in percent.
///
/// `None` when `base` is zero (a mapping without traffic has no meaningful
/// overhead).
pub fn overhead_percent(base: u64, current: u64) -> Option<f64> {
    if base == 0 {
        return None;
    }
    Some((current as f64 - base as f64) / base as f64 * 100.0)
}

/// How much lower `candidate` is than `baseline`, in percent of `baseline`.
pub fn improvement_percent(candidate: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((baseline - candidate) / baseline * 100.0)
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(volume: u64) -> (Task, Task) {
        let mut a = Task::with_id(0);
        let mut b = Task::with_id(1);
        a.add_dependency(b.id, volume);
        b.add_dependency(a.id, volume);
        (a, b)
    }

    #[test]
    fn energy_is_volume_times_hops() {
        let topo = Topology::new(4, 4);
        let (a, _) = pair(10);
        let mapping = BTreeMap::from([(TaskId(1), CoreId(15))]);
        // (0,0) → (3,3) = 6 hops
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(0)), 60);
        // (3,2) → (3,3) = 1 hop
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(11)), 10);
    }

    #[test]
    fn unmapped_partner_contributes_nothing() {
        let topo = Topology::new(4, 4);
        let (a, _) = pair(10);
        assert_eq!(task_energy(&topo, &BTreeMap::new(), &a, CoreId(0)), 0);
    }

    #[test]
    fn partner_on_faulty_core_contributes_nothing() {
        let mut topo = Topology::new(4, 4);
        let (a, _) = pair(10);
        let mapping = BTreeMap::from([(TaskId(1), CoreId(15))]);
        topo.fail_core(CoreId(15));
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(0)), 0);
    }

    #[test]
    fn unknown_candidate_costs_zero() {
        let topo = Topology::new(2, 2);
        let (a, _) = pair(10);
        let mapping = BTreeMap::from([(TaskId(1), CoreId(0))]);
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(99)), 0);
    }

    #[test]
    fn huge_volume_saturates_instead_of_overflowing() {
        let topo = Topology::new(4, 1);
        let (a, _) = pair(u64::MAX / 2);
        let mapping = BTreeMap::from([(TaskId(1), CoreId(3))]);
        // 3 hops
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(0)), u64::MAX);
        // 1 hop stays exact
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(2)), u64::MAX / 2);
    }

    #[test]
    fn saturated_partners_sum_to_max() {
        let topo = Topology::new(3, 1);
        let mut a = Task::with_id(0);
        a.add_dependency(TaskId(1), u64::MAX - 1);
        a.add_dependency(TaskId(2), u64::MAX - 1);
        let mapping = BTreeMap::from([(TaskId(1), CoreId(1)), (TaskId(2), CoreId(2))]);
        assert_eq!(task_energy(&topo, &mapping, &a, CoreId(0)), u64::MAX);
    }

    #[test]
    fn overhead_percent_handles_zero_base() {
        assert_eq!(overhead_percent(0, 50), None);
        assert_eq!(overhead_percent(200, 250), Some(25.0));
        assert_eq!(overhead_percent(200, 150), Some(-25.0));
    }

    #[test]
    fn improvement_percent_relative_to_baseline() {
        assert_eq!(improvement_percent(75.0, 100.0), Some(25.0));
        assert_eq!(improvement_percent(1.0, 0.0), None);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2, 4, 9]), 5.0);
    }
}
