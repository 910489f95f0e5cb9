/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fault-tolerant task mapping on a 2D mesh Network-on-Chip.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── topology/   – grid of cores, health status, fault injection
//! ├── task        – task ids, core ids, communication graph
//! ├── mapper/     – initial placement, fault recovery, energy accounting
//! ├── generator   – seeded random task graphs
//! ├── render      – text view of the grid
//! ├── scenario    – demo / stress / comparison drivers
//! └── config/     – YAML scenario files
//! ```

pub mod config;
pub mod generator;
pub mod mapper;
pub mod render;
pub mod scenario;
pub mod task;
pub mod topology;
