//! In-memory datastore gateway.
//!
//! Serves a fixed problem snapshot and collects persisted batches for
//! inspection. Used by tests and by embedders that already hold the data.

use std::sync::Mutex;

use super::{DatastoreGateway, DispatchRecord, GatewayError};

/// Gateway over data held in memory.
pub struct InMemoryGateway {
    machines: Vec<String>,
    lots: Vec<String>,
    process_times: Vec<Vec<f64>>,
    saved: Mutex<Vec<Vec<DispatchRecord>>>,
}

impl InMemoryGateway {
    /// Creates a gateway serving the given snapshot. `process_times` rows
    /// follow `lots` order, columns follow `machines` order.
    pub fn new(machines: Vec<String>, lots: Vec<String>, process_times: Vec<Vec<f64>>) -> Self {
        Self {
            machines,
            lots,
            process_times,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// All record batches persisted so far, in call order.
    pub fn saved_batches(&self) -> Vec<Vec<DispatchRecord>> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DatastoreGateway for InMemoryGateway {
    fn list_machines(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.machines.clone())
    }

    fn list_lots(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.lots.clone())
    }

    fn process_time_matrix(
        &self,
        lots: &[String],
        machines: &[String],
    ) -> Result<Vec<Vec<f64>>, GatewayError> {
        let matrix = lots
            .iter()
            .map(|lot| {
                let row = self.lots.iter().position(|l| l == lot);
                machines
                    .iter()
                    .map(|machine| {
                        let col = self.machines.iter().position(|m| m == machine);
                        match (row, col) {
                            (Some(r), Some(c)) => self.process_times[r][c],
                            _ => 0.0,
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(matrix)
    }

    fn save_dispatch_records(&self, records: &[DispatchRecord]) -> Result<(), GatewayError> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::new(
            vec!["M0".into(), "M1".into()],
            vec!["L0".into(), "L1".into()],
            vec![vec![3.0, 0.0], vec![0.0, 7.0]],
        )
    }

    #[test]
    fn test_listings() {
        let g = gateway();
        assert_eq!(g.list_machines().unwrap(), vec!["M0", "M1"]);
        assert_eq!(g.list_lots().unwrap(), vec!["L0", "L1"]);
    }

    #[test]
    fn test_matrix_follows_requested_order() {
        let g = gateway();
        let matrix = g
            .process_time_matrix(
                &["L1".into(), "L0".into()],
                &["M1".into(), "M0".into()],
            )
            .unwrap();
        assert_eq!(matrix, vec![vec![7.0, 0.0], vec![0.0, 3.0]]);
    }

    #[test]
    fn test_unknown_ids_are_incompatible() {
        let g = gateway();
        let matrix = g
            .process_time_matrix(&["L9".into()], &["M0".into()])
            .unwrap();
        assert_eq!(matrix, vec![vec![0.0]]);
    }

    #[test]
    fn test_saved_batches_accumulate() {
        let g = gateway();
        let record = DispatchRecord {
            machine_id: "M0".into(),
            lot_id: "L0".into(),
            release_time: 1000.0,
            start_time: 0.0,
            end_time: 3.0,
        };
        g.save_dispatch_records(&[record.clone()]).unwrap();
        g.save_dispatch_records(&[record.clone(), record.clone()])
            .unwrap();

        let batches = g.saved_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[1].len(), 2);
        assert_eq!(batches[0][0], record);
    }
}
