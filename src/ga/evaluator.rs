//! Chromosome evaluation.
//!
//! Deterministic, side-effect-free decode of a chromosome into per-machine
//! job queues, and the makespan-based fitness derived from them. All inputs
//! are immutable, so one evaluator is shared across island worker threads
//! without synchronization.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::ga::chromosome::{decode_gene, Chromosome};
use crate::models::{Assignment, ProblemInput, Schedule};

/// Decodes chromosomes and scores them as `-makespan` (larger is better).
pub struct Evaluator<'a> {
    problem: &'a ProblemInput,
    // Repaired chromosomes carry no invalid genes; if one slips through we
    // drop it and warn once per evaluator lifetime (one scheduling round).
    dropped_gene_reported: AtomicBool,
}

impl<'a> Evaluator<'a> {
    pub fn new(problem: &'a ProblemInput) -> Self {
        Self {
            problem,
            dropped_gene_reported: AtomicBool::new(false),
        }
    }

    /// Decodes a chromosome into per-machine lot queues.
    ///
    /// Genes are visited in order; each valid (lot, machine) pair appends
    /// the lot to that machine's queue. Invalid genes are dropped silently
    /// apart from a once-per-round warning.
    pub fn decode(&self, chromosome: &Chromosome) -> Vec<Vec<usize>> {
        let machine_count = self.problem.machine_count();
        let mut queues = vec![Vec::new(); machine_count];

        for &gene in chromosome.genes() {
            let (lot, machine) = decode_gene(gene, machine_count);
            if lot < self.problem.lot_count()
                && machine < machine_count
                && self.problem.is_compatible(lot, machine)
            {
                queues[machine].push(lot);
            } else if !self.dropped_gene_reported.swap(true, Ordering::Relaxed) {
                warn!(gene, "dropped unrepaired gene during decode");
            }
        }

        queues
    }

    /// Latest completion time across all machines. Idle machines contribute
    /// zero.
    pub fn makespan(&self, queues: &[Vec<usize>]) -> f64 {
        queues
            .iter()
            .enumerate()
            .map(|(machine, lots)| {
                lots.iter()
                    .map(|&lot| self.problem.time(lot, machine))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// Fitness of a chromosome: `-makespan` of its decoded schedule.
    pub fn fitness(&self, chromosome: &Chromosome) -> f64 {
        -self.makespan(&self.decode(chromosome))
    }

    /// Decodes into `schedule` with per-assignment time offsets and
    /// aggregate metrics, returning the fitness.
    pub fn evaluate_into(&self, chromosome: &Chromosome, schedule: &mut Schedule) -> f64 {
        schedule.clear();

        let queues = self.decode(chromosome);
        let mut makespan: f64 = 0.0;

        for (machine, lots) in queues.iter().enumerate() {
            let mut current = 0.0;
            for &lot in lots {
                let processing_time = self.problem.time(lot, machine);
                let start_time = current;
                let end_time = start_time + processing_time;
                current = end_time;

                schedule.add(Assignment {
                    lot_index: lot,
                    lot_id: self.problem.lot_id(lot).to_string(),
                    machine_index: machine,
                    machine_id: self.problem.machine_id(machine).to_string(),
                    processing_time,
                    start_time,
                    end_time,
                });
            }
            makespan = makespan.max(current);
        }

        schedule.makespan = makespan;
        schedule.mean_flow_time = if schedule.is_empty() {
            0.0
        } else {
            schedule
                .assignments
                .iter()
                .map(|a| a.end_time)
                .sum::<f64>()
                / schedule.len() as f64
        };
        schedule.max_tardiness = 0.0;

        -schedule.makespan
    }
}
