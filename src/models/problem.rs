//! Problem input model.
//!
//! One scheduling round operates on an immutable snapshot: ordered lot and
//! machine identifiers plus the L×M process-time matrix. A cell value of
//! zero (or below) marks the pair as incompatible and must never appear in
//! a decoded schedule.

use crate::error::ProblemError;

/// Immutable inputs for one scheduling round.
///
/// Construction validates the data-model invariants; a `ProblemInput` that
/// exists is always well-formed, so the optimization core can index the
/// matrix without re-checking dimensions.
#[derive(Debug, Clone)]
pub struct ProblemInput {
    lot_ids: Vec<String>,
    machine_ids: Vec<String>,
    process_times: Vec<Vec<f64>>,
}

impl ProblemInput {
    /// Builds a validated problem.
    ///
    /// Rejects empty lot or machine lists, matrix dimension mismatches, and
    /// any lot without at least one compatible machine.
    pub fn new(
        lot_ids: Vec<String>,
        machine_ids: Vec<String>,
        process_times: Vec<Vec<f64>>,
    ) -> Result<Self, ProblemError> {
        if lot_ids.is_empty() {
            return Err(ProblemError::NoLots);
        }
        if machine_ids.is_empty() {
            return Err(ProblemError::NoMachines);
        }
        if process_times.len() != lot_ids.len() {
            return Err(ProblemError::RowCountMismatch {
                rows: process_times.len(),
                expected: lot_ids.len(),
            });
        }
        for (lot_id, row) in lot_ids.iter().zip(&process_times) {
            if row.len() != machine_ids.len() {
                return Err(ProblemError::ColumnCountMismatch {
                    lot_id: lot_id.clone(),
                    cols: row.len(),
                    expected: machine_ids.len(),
                });
            }
            if !row.iter().any(|&t| t > 0.0) {
                return Err(ProblemError::IncompatibleLot {
                    lot_id: lot_id.clone(),
                });
            }
        }

        Ok(Self {
            lot_ids,
            machine_ids,
            process_times,
        })
    }

    /// Number of lots (L).
    #[inline]
    pub fn lot_count(&self) -> usize {
        self.lot_ids.len()
    }

    /// Number of machines (M).
    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machine_ids.len()
    }

    /// Lot identifier at the given index.
    pub fn lot_id(&self, lot: usize) -> &str {
        &self.lot_ids[lot]
    }

    /// Machine identifier at the given index.
    pub fn machine_id(&self, machine: usize) -> &str {
        &self.machine_ids[machine]
    }

    /// All lot identifiers, in index order.
    pub fn lot_ids(&self) -> &[String] {
        &self.lot_ids
    }

    /// All machine identifiers, in index order.
    pub fn machine_ids(&self) -> &[String] {
        &self.machine_ids
    }

    /// Process time of `lot` on `machine`.
    #[inline]
    pub fn time(&self, lot: usize, machine: usize) -> f64 {
        self.process_times[lot][machine]
    }

    /// Whether `lot` may run on `machine` (strictly positive process time).
    #[inline]
    pub fn is_compatible(&self, lot: usize, machine: usize) -> bool {
        self.process_times[lot][machine] > 0.0
    }

    /// Machine indices with a positive process time for `lot`.
    pub fn compatible_machines(&self, lot: usize) -> Vec<usize> {
        (0..self.machine_count())
            .filter(|&m| self.is_compatible(lot, m))
            .collect()
    }

    /// Number of compatible (lot, machine) pairs across the whole matrix.
    pub fn compatible_pair_count(&self) -> usize {
        self.process_times
            .iter()
            .map(|row| row.iter().filter(|&&t| t > 0.0).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_valid_problem() {
        let p = ProblemInput::new(
            ids("L", 2),
            ids("M", 2),
            vec![vec![3.0, 0.0], vec![0.0, 7.0]],
        )
        .unwrap();

        assert_eq!(p.lot_count(), 2);
        assert_eq!(p.machine_count(), 2);
        assert!(p.is_compatible(0, 0));
        assert!(!p.is_compatible(0, 1));
        assert_eq!(p.compatible_pair_count(), 2);
        assert_eq!(p.compatible_machines(1), vec![1]);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let err = ProblemInput::new(vec![], ids("M", 1), vec![]).unwrap_err();
        assert_eq!(err, ProblemError::NoLots);

        let err = ProblemInput::new(ids("L", 1), vec![], vec![vec![]]).unwrap_err();
        assert_eq!(err, ProblemError::NoMachines);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = ProblemInput::new(ids("L", 2), ids("M", 1), vec![vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::RowCountMismatch {
                rows: 1,
                expected: 2
            }
        );

        let err =
            ProblemInput::new(ids("L", 1), ids("M", 2), vec![vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::ColumnCountMismatch {
                lot_id: "L0".into(),
                cols: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_stranded_lot_rejected() {
        // L1 has no machine with a positive process time
        let err = ProblemInput::new(
            ids("L", 2),
            ids("M", 2),
            vec![vec![3.0, 1.0], vec![0.0, -2.0]],
        )
        .unwrap_err();
        assert_eq!(err, ProblemError::IncompatibleLot { lot_id: "L1".into() });
    }

    #[test]
    fn test_negative_time_is_incompatible() {
        let p = ProblemInput::new(
            ids("L", 1),
            ids("M", 2),
            vec![vec![-5.0, 2.0]],
        )
        .unwrap();
        assert!(!p.is_compatible(0, 0));
        assert_eq!(p.compatible_machines(0), vec![1]);
    }
}
