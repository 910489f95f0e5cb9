/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plain-text rendering of a topology.
//!
//! ```text
//!      x=0    x=1    x=2    x=3
//! y=0  T0     T1     T2     T3
//! y=1  T4     FAULT  Spare  Spare
//! ```
//!
//! Read-only: takes `&Topology` and never mutates it.

use crate::topology::{Core, Topology};

const CELL_WIDTH: usize = 7;
const ROW_LABEL_WIDTH: usize = 5;

fn cell_label(core: &Core) -> String {
    if !core.is_healthy() {
        "FAULT".to_string()
    } else if let Some(task) = core.assigned_task {
        task.to_string()
    } else {
        "Spare".to_string()
    }
}

/// One line per grid row, `y` ascending from the top.
pub fn render_grid(topology: &Topology) -> String {
    let mut out = " ".repeat(ROW_LABEL_WIDTH);
    for x in 0..topology.width() {
        out.push_str(&format!("{:<w$}", format!("x={x}"), w = CELL_WIDTH));
    }
    end_line(&mut out);

    for y in 0..topology.height() {
        out.push_str(&format!("{:<w$}", format!("y={y}"), w = ROW_LABEL_WIDTH));
        for core in (0..topology.width()).filter_map(|x| topology.core_at(x, y)) {
            out.push_str(&format!("{:<w$}", cell_label(core), w = CELL_WIDTH));
        }
        end_line(&mut out);
    }
    out
}

/// Drop the padding after the last column and terminate the line.
fn end_line(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

/// One-line summary: healthy / faulty / occupied / spare counts.
pub fn legend(topology: &Topology) -> String {
    let faulty = topology.faulty_count();
    let occupied = topology.occupied_cores().count();
    let spare = topology.available_cores().count();
    format!(
        "{} cores: {} occupied, {} spare, {} faulty",
        topology.len(),
        occupied,
        spare,
        faulty
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{CoreId, TaskId};

    #[test]
    fn renders_tasks_faults_and_spares() {
        let mut topo = Topology::new(3, 2);
        topo.assign(CoreId(0), TaskId(0)).unwrap();
        topo.assign(CoreId(4), TaskId(11)).unwrap();
        topo.inject_fault(2, 0);

        let text = render_grid(&topo);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "     x=0    x=1    x=2");
        assert_eq!(lines[1], "y=0  T0     Spare  FAULT");
        assert_eq!(lines[2], "y=1  Spare  T11    Spare");
    }

    #[test]
    fn lines_carry_no_trailing_padding() {
        let topo = Topology::new(4, 3);
        for line in render_grid(&topo).lines() {
            assert_eq!(line, line.trim_end(), "padded line: {line:?}");
        }
    }

    #[test]
    fn legend_counts_core_states() {
        let mut topo = Topology::new(2, 2);
        topo.assign(CoreId(0), TaskId(0)).unwrap();
        topo.inject_fault(1, 1);
        assert_eq!(legend(&topo), "4 cores: 1 occupied, 2 spare, 1 faulty");
    }
}
