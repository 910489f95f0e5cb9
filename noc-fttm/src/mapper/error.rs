/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the fault-tolerant mapper.
//!
//! Two types model the two failure layers:
//!
//! * [`AssignmentReason`]: why a single task could not be put on a specific
//!   core.
//! * [`MappingError`]: top-level failure returned from the mapper and the
//!   topology.
//!
//! Every error is raised **before** any state is touched: a failed call leaves
//! the mapping and all core slots exactly as they were.
//!
//! A fault that leaves a task without a spare core is **not** an error.  It is
//! reported through [`FaultOutcome::Unmapped`](super::FaultOutcome::Unmapped)
//! so the mapper stays usable.

use thiserror::Error;

use crate::task::{CoreId, TaskId};

// ── Assignment ────────────────────────────────────────────────────────────────

/// Detailed reason why a task cannot be assigned to a core.
///
/// Carried inside [`MappingError::InvalidOperation`] so the caller knows both
/// *which* task/core pair failed and *why*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentReason {
    /// The core has suffered a permanent fault.
    CoreFaulty,

    /// The core already holds another task.
    CoreOccupied { holder: TaskId },
}

impl std::fmt::Display for AssignmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentReason::CoreFaulty => write!(f, "core is faulty"),
            AssignmentReason::CoreOccupied { holder } => {
                write!(f, "core already holds task {}", holder)
            }
        }
    }
}

// ── Top-level errors ──────────────────────────────────────────────────────────

/// Top-level error type for mapping operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// More tasks than healthy, unassigned cores.  Nothing was mapped.
    #[error("not enough healthy cores: {tasks} task(s) but only {available} spare core(s)")]
    ResourceExhausted { tasks: usize, available: usize },

    /// A task cannot be placed on the given core.
    #[error("cannot assign task {task} to core {core}: {reason}")]
    InvalidOperation {
        task: TaskId,
        core: CoreId,
        reason: AssignmentReason,
    },

    /// The core id is not part of the grid.
    #[error("core {0} does not exist on this topology")]
    UnknownCore(CoreId),

    /// The task id appears twice in the input, or is already mapped.
    #[error("task {0} is already mapped or listed twice")]
    DuplicateTask(TaskId),

    /// The placement algorithm name is not recognised.
    #[error("unknown placement algorithm: '{0}' (valid: sequential, random)")]
    UnknownAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operation_message_names_task_core_and_reason() {
        let err = MappingError::InvalidOperation {
            task: TaskId(4),
            core: CoreId(9),
            reason: AssignmentReason::CoreOccupied { holder: TaskId(1) },
        };
        assert_eq!(
            err.to_string(),
            "cannot assign task T4 to core C9: core already holds task T1"
        );
    }

    #[test]
    fn resource_exhausted_message_carries_counts() {
        let err = MappingError::ResourceExhausted {
            tasks: 20,
            available: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("20 task(s)"), "got: {msg}");
        assert!(msg.contains("16 spare core(s)"), "got: {msg}");
    }
}
