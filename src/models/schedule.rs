//! Schedule (solution) model.
//!
//! A schedule is the decoded phenotype of one chromosome: a complete set of
//! lot-to-machine assignments with per-machine time offsets. Start and end
//! times are relative to zero at the beginning of the round on each machine,
//! not wall-clock times.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// A complete dispatch plan for one scheduling round.
///
/// Holds the flat assignment list, a per-machine index in execution order,
/// and the aggregate quality metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// All assignments, in decode order.
    pub assignments: Vec<Assignment>,
    /// Assignments grouped by machine index, in execution order.
    pub machine_queues: Vec<Vec<Assignment>>,
    /// Latest completion time across all machines.
    pub makespan: f64,
    /// Mean completion time across assignments (`0` when empty).
    pub mean_flow_time: f64,
    /// Largest single delay past a due date. No due dates are in scope for
    /// a round, so this is reported as `0`.
    pub max_tardiness: f64,
}

/// One lot scheduled on one machine during one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Lot index into the round's problem input.
    pub lot_index: usize,
    /// Lot identifier (denormalized for persistence).
    pub lot_id: String,
    /// Machine index into the round's problem input.
    pub machine_index: usize,
    /// Machine identifier (denormalized for persistence).
    pub machine_id: String,
    /// Process time of this lot on this machine.
    pub processing_time: f64,
    /// Offset from the start of the round's plan on this machine.
    pub start_time: f64,
    /// `start_time + processing_time`.
    pub end_time: f64,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment, maintaining the per-machine index.
    pub fn add(&mut self, assignment: Assignment) {
        if assignment.machine_index >= self.machine_queues.len() {
            self.machine_queues
                .resize_with(assignment.machine_index + 1, Vec::new);
        }
        self.machine_queues[assignment.machine_index].push(assignment.clone());
        self.assignments.push(assignment);
    }

    /// Drops all assignments and resets the metrics.
    pub fn clear(&mut self) {
        self.assignments.clear();
        self.machine_queues.clear();
        self.makespan = 0.0;
        self.mean_flow_time = 0.0;
        self.max_tardiness = 0.0;
    }

    /// Whether the schedule holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Execution-ordered assignments for one machine (empty if the machine
    /// received no work).
    pub fn assignments_for_machine(&self, machine: usize) -> &[Assignment] {
        self.machine_queues
            .get(machine)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
