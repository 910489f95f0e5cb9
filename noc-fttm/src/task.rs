/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task graph data structures for the NoC mapper.
//!
//! ```text
//! generator  ──►  Vec<Task>  ──(initial_mapping)──►  FaultTolerantMapper
//!                   ↑ immutable input                   owns TaskId → CoreId
//! ```
//!
//! # Ownership model
//! A [`Task`] is created once by the caller (usually the
//! [`generator`](crate::generator)) and is never mutated by the mapper.  The
//! mapper keeps its own copy in an id-addressed arena so fault recovery can
//! look up a displaced task's partners from its [`TaskId`] alone.

use std::collections::BTreeMap;
use std::fmt;

/// Workload size used when the caller does not supply one.
pub const DEFAULT_INSTRUCTION_COUNT: u64 = 1_000;

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Stable identity of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Stable identity of a core.  Assigned row-major by the
/// [`Topology`](crate::topology::Topology) and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CoreId(pub u32);

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// A unit of work with a fixed workload and a set of communication partners.
///
/// Communication is expected to be recorded symmetrically by the caller (if
/// A sends `v` bits to B, B records `v` bits with A), but nothing here
/// enforces it.  Asymmetric graphs are legal and simply produce asymmetric
/// energy contributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,

    /// Workload size.  Opaque to the mapping algorithm.
    pub instruction_count: u64,

    /// Partner task → communication volume in bits.
    ///
    /// `BTreeMap` so energy sums and debug output iterate in a fixed order.
    pub communication_partners: BTreeMap<TaskId, u64>,
}

impl Task {
    pub fn new(id: TaskId, instruction_count: u64) -> Self {
        Self {
            id,
            instruction_count,
            communication_partners: BTreeMap::new(),
        }
    }

    /// Task with the default workload size.
    pub fn with_id(id: u32) -> Self {
        Self::new(TaskId(id), DEFAULT_INSTRUCTION_COUNT)
    }

    /// Record `volume` bits of traffic towards `partner`.
    ///
    /// A second call for the same partner overwrites the earlier volume.
    pub fn add_dependency(&mut self, partner: TaskId, volume: u64) {
        self.communication_partners.insert(partner, volume);
    }

    pub fn volume_to(&self, partner: TaskId) -> Option<u64> {
        self.communication_partners.get(&partner).copied()
    }

    /// `(partner, volume)` pairs in ascending partner id order.
    pub fn partners(&self) -> impl Iterator<Item = (TaskId, u64)> + '_ {
        self.communication_partners.iter().map(|(&p, &v)| (p, v))
    }

    pub fn has_partners(&self) -> bool {
        !self.communication_partners.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_has_no_partners() {
        let task = Task::with_id(7);
        assert_eq!(task.id, TaskId(7));
        assert_eq!(task.instruction_count, DEFAULT_INSTRUCTION_COUNT);
        assert!(!task.has_partners());
    }

    #[test]
    fn add_dependency_overwrites_previous_volume() {
        let mut task = Task::with_id(0);
        task.add_dependency(TaskId(1), 10);
        task.add_dependency(TaskId(1), 40);
        assert_eq!(task.volume_to(TaskId(1)), Some(40));
        assert_eq!(task.partners().count(), 1);
    }

    #[test]
    fn partners_iterate_in_ascending_id_order() {
        let mut task = Task::with_id(0);
        task.add_dependency(TaskId(5), 1);
        task.add_dependency(TaskId(2), 2);
        task.add_dependency(TaskId(9), 3);
        let ids: Vec<u32> = task.partners().map(|(p, _)| p.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn asymmetric_dependency_is_not_mirrored() {
        let mut a = Task::with_id(0);
        let b = Task::with_id(1);
        a.add_dependency(b.id, 50);
        assert_eq!(a.volume_to(b.id), Some(50));
        assert_eq!(b.volume_to(a.id), None);
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(TaskId(3).to_string(), "T3");
        assert_eq!(CoreId(12).to_string(), "C12");
    }
}
