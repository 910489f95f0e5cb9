/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! 2D mesh topology: a fixed `width × height` grid of cores.
//!
//! Cores live in an arena (`Vec<Core>`) indexed by [`CoreId`].  Ids are
//! assigned row-major at construction (`id = y * width + x`) and never
//! change, so coordinate and id lookups are both O(1) arithmetic.
//!
//! The grid is fully regular: adjacency is implicit in the coordinate metric
//! and the hop count between two cores is their Manhattan distance.
//!
//! # Core lifecycle
//! ```text
//! Healthy ──(inject_fault)──► Faulty   (terminal, no repair path)
//! ```
//! A faulty core never holds a task.

use std::fmt;

use tracing::{debug, info};

use crate::mapper::error::{AssignmentReason, MappingError};
use crate::task::{CoreId, TaskId};

// ── Core ──────────────────────────────────────────────────────────────────────

/// Health of a core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoreStatus {
    #[default]
    Healthy,
    /// Permanent failure.
    Faulty,
}

impl fmt::Display for CoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreStatus::Healthy => write!(f, "HEALTHY"),
            CoreStatus::Faulty => write!(f, "FAULTY"),
        }
    }
}

/// A compute unit at a fixed grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Core {
    pub id: CoreId,
    pub x: u32,
    pub y: u32,
    pub status: CoreStatus,
    /// Task currently running here.  Always `None` on a faulty core.
    pub assigned_task: Option<TaskId>,
}

impl Core {
    fn new(id: CoreId, x: u32, y: u32) -> Self {
        Self {
            id,
            x,
            y,
            status: CoreStatus::Healthy,
            assigned_task: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CoreStatus::Healthy
    }

    /// Healthy and not running anything, i.e. a spare core.
    pub fn is_available(&self) -> bool {
        self.is_healthy() && self.assigned_task.is_none()
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Core({} @ {},{} [{}])", self.id.0, self.x, self.y, self.status)
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// Owns every [`Core`] of the grid.
#[derive(Debug, Clone)]
pub struct Topology {
    width: u32,
    height: u32,
    /// Arena indexed by `CoreId.0`.
    cores: Vec<Core>,
}

impl Topology {
    /// Build a `width × height` grid with every core healthy and unassigned.
    pub fn new(width: u32, height: u32) -> Self {
        let mut cores = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let id = CoreId(y * width + x);
                cores.push(Core::new(id, x, y));
            }
        }

        debug!(width, height, cores = cores.len(), "topology initialised");

        Self {
            width,
            height,
            cores,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cores, healthy or not.
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    /// All cores in ascending id order.
    pub fn cores(&self) -> impl Iterator<Item = &Core> {
        self.cores.iter()
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Id of the core at `(x, y)`, or `None` when out of bounds.
    pub fn core_id_at(&self, x: u32, y: u32) -> Option<CoreId> {
        if x < self.width && y < self.height {
            Some(CoreId(y * self.width + x))
        } else {
            None
        }
    }

    pub fn core_at(&self, x: u32, y: u32) -> Option<&Core> {
        self.core_id_at(x, y).and_then(|id| self.core_by_id(id))
    }

    pub fn core_by_id(&self, id: CoreId) -> Option<&Core> {
        self.cores.get(id.0 as usize)
    }

    fn core_by_id_mut(&mut self, id: CoreId) -> Option<&mut Core> {
        self.cores.get_mut(id.0 as usize)
    }

    /// Hop count between two cores: `|xA - xB| + |yA - yB|`.
    pub fn manhattan_distance(&self, a: &Core, b: &Core) -> u32 {
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
    }

    /// Spare cores (healthy, no task) in ascending id order.
    ///
    /// The order is part of the contract: fault recovery breaks energy ties
    /// by taking the first spare core this iterator yields.  Every call
    /// re-scans the current state.
    pub fn available_cores(&self) -> impl Iterator<Item = &Core> {
        self.cores.iter().filter(|c| c.is_available())
    }

    pub fn available_core_ids(&self) -> Vec<CoreId> {
        self.available_cores().map(|c| c.id).collect()
    }

    /// Cores that are healthy and currently run a task.
    pub fn occupied_cores(&self) -> impl Iterator<Item = &Core> {
        self.cores
            .iter()
            .filter(|c| c.is_healthy() && c.assigned_task.is_some())
    }

    pub fn faulty_count(&self) -> usize {
        self.cores.iter().filter(|c| !c.is_healthy()).count()
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Permanently fail the core at `(x, y)` and evict its task.
    ///
    /// Returns the task that was running on the core, if any.  Marking the
    /// core faulty and clearing its slot happen in one step, so the displaced
    /// task can never be lost between a read and the eviction.
    ///
    /// Out-of-bounds coordinates are a silent no-op returning `None`, which is
    /// indistinguishable from hitting an idle core.  Use
    /// [`core_id_at`](Self::core_id_at) first if the difference matters.
    /// Re-faulting a faulty core is idempotent.
    pub fn inject_fault(&mut self, x: u32, y: u32) -> Option<TaskId> {
        let id = self.core_id_at(x, y)?;
        self.fail_core(id)
    }

    /// Same as [`inject_fault`](Self::inject_fault), addressed by id.
    pub fn fail_core(&mut self, id: CoreId) -> Option<TaskId> {
        let core = self.core_by_id_mut(id)?;
        let displaced = core.assigned_task.take();
        core.status = CoreStatus::Faulty;

        info!(
            core = core.id.0,
            x = core.x,
            y = core.y,
            displaced = ?displaced.map(|t| t.0),
            "fault injected"
        );

        displaced
    }

    /// Put `task` on core `id`.
    ///
    /// Fails if the core does not exist or is faulty.  Does **not** check
    /// whether the core is already occupied or the task already placed
    /// elsewhere; the mapper owns those invariants.
    pub fn assign(&mut self, id: CoreId, task: TaskId) -> Result<(), MappingError> {
        let core = self.core_by_id_mut(id).ok_or(MappingError::UnknownCore(id))?;
        if !core.is_healthy() {
            return Err(MappingError::InvalidOperation {
                task,
                core: id,
                reason: AssignmentReason::CoreFaulty,
            });
        }
        core.assigned_task = Some(task);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn fresh_topology_has_w_times_h_healthy_cores() {
        for (w, h) in [(1, 1), (4, 4), (5, 3), (2, 7)] {
            let topo = Topology::new(w, h);
            assert_eq!(topo.len(), (w * h) as usize);
            assert!(topo.cores().all(|c| c.is_available()));
        }
    }

    #[test]
    fn ids_are_contiguous_and_row_major() {
        let topo = Topology::new(5, 3);
        for (i, core) in topo.cores().enumerate() {
            assert_eq!(core.id, CoreId(i as u32));
            assert_eq!(core.id.0, core.y * 5 + core.x);
        }
    }

    #[test]
    fn zero_sized_grid_is_empty() {
        let topo = Topology::new(0, 4);
        assert!(topo.is_empty());
        assert!(topo.core_at(0, 0).is_none());
        assert_eq!(topo.available_cores().count(), 0);
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    #[test]
    fn core_at_and_core_by_id_agree() {
        let topo = Topology::new(4, 4);
        let by_coord = topo.core_at(1, 1).unwrap();
        assert_eq!(by_coord.id, CoreId(5));
        assert_eq!(topo.core_by_id(CoreId(5)).unwrap(), by_coord);
    }

    #[test]
    fn out_of_bounds_lookup_returns_none() {
        let topo = Topology::new(4, 4);
        assert!(topo.core_at(4, 0).is_none());
        assert!(topo.core_at(0, 4).is_none());
        assert!(topo.core_by_id(CoreId(16)).is_none());
    }

    #[test]
    fn manhattan_distance_is_symmetric_and_zero_on_self() {
        let topo = Topology::new(4, 4);
        let a = topo.core_at(0, 3).unwrap();
        let b = topo.core_at(2, 1).unwrap();
        assert_eq!(topo.manhattan_distance(a, b), 4);
        assert_eq!(topo.manhattan_distance(b, a), 4);
        assert_eq!(topo.manhattan_distance(a, a), 0);
    }

    #[test]
    fn available_cores_are_in_ascending_id_order() {
        let mut topo = Topology::new(3, 3);
        topo.assign(CoreId(1), TaskId(0)).unwrap();
        topo.inject_fault(2, 1);
        let ids: Vec<u32> = topo.available_cores().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 2, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn available_cores_rescans_current_state() {
        let mut topo = Topology::new(2, 2);
        assert_eq!(topo.available_core_ids().len(), 4);
        topo.assign(CoreId(0), TaskId(0)).unwrap();
        assert_eq!(topo.available_core_ids().len(), 3);
    }

    // ── Fault injection ───────────────────────────────────────────────────────

    #[test]
    fn inject_fault_marks_faulty_and_returns_displaced_task() {
        let mut topo = Topology::new(4, 4);
        topo.assign(CoreId(10), TaskId(3)).unwrap();

        let displaced = topo.inject_fault(2, 2);

        assert_eq!(displaced, Some(TaskId(3)));
        let core = topo.core_at(2, 2).unwrap();
        assert_eq!(core.status, CoreStatus::Faulty);
        assert_eq!(core.assigned_task, None);
    }

    #[test]
    fn inject_fault_on_idle_core_displaces_nothing() {
        let mut topo = Topology::new(4, 4);
        assert_eq!(topo.inject_fault(1, 1), None);
        assert!(!topo.core_at(1, 1).unwrap().is_healthy());
        assert_eq!(topo.faulty_count(), 1);
    }

    #[test]
    fn inject_fault_out_of_bounds_is_silent_no_op() {
        let mut topo = Topology::new(4, 4);
        assert_eq!(topo.inject_fault(9, 9), None);
        assert_eq!(topo.faulty_count(), 0);
    }

    #[test]
    fn inject_fault_twice_is_idempotent() {
        let mut topo = Topology::new(2, 2);
        topo.inject_fault(0, 0);
        assert_eq!(topo.inject_fault(0, 0), None);
        assert_eq!(topo.faulty_count(), 1);
    }

    // ── Assignment ────────────────────────────────────────────────────────────

    #[test]
    fn assign_to_faulty_core_is_invalid_operation() {
        let mut topo = Topology::new(2, 2);
        topo.inject_fault(1, 0);
        let err = topo.assign(CoreId(1), TaskId(0)).unwrap_err();
        assert_eq!(
            err,
            MappingError::InvalidOperation {
                task: TaskId(0),
                core: CoreId(1),
                reason: AssignmentReason::CoreFaulty,
            }
        );
        assert_eq!(topo.core_by_id(CoreId(1)).unwrap().assigned_task, None);
    }

    #[test]
    fn assign_to_unknown_core_fails() {
        let mut topo = Topology::new(2, 2);
        let err = topo.assign(CoreId(4), TaskId(0)).unwrap_err();
        assert_eq!(err, MappingError::UnknownCore(CoreId(4)));
    }

    #[test]
    fn assign_sets_task_slot() {
        let mut topo = Topology::new(4, 4);
        topo.assign(CoreId(0), TaskId(1)).unwrap();
        assert_eq!(topo.core_at(0, 0).unwrap().assigned_task, Some(TaskId(1)));
        assert_eq!(topo.occupied_cores().count(), 1);
    }
}
