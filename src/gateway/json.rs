//! JSON-file-backed datastore gateway.
//!
//! Development and small-deployment backend: the problem snapshot lives in
//! one JSON document, and persisted dispatch records are appended to an
//! output file as JSON lines, one batch per write call.
//!
//! Expected problem document:
//!
//! ```json
//! {
//!   "machines": ["EQP-001", "EQP-002"],
//!   "lots": ["LOT-A", "LOT-B"],
//!   "process_times": [[120.0, 0.0], [90.0, 150.0]]
//! }
//! ```
//!
//! `process_times` rows follow `lots` order, columns follow `machines`
//! order; `0` marks an incompatible pair.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use super::{DatastoreGateway, DispatchRecord, GatewayError};

#[derive(Debug, Deserialize)]
struct ProblemDocument {
    machines: Vec<String>,
    lots: Vec<String>,
    process_times: Vec<Vec<f64>>,
}

/// Gateway reading the problem from a JSON file and appending dispatch
/// records to a JSON-lines file.
///
/// The problem file is re-read on every listing call, so the snapshot may
/// change between rounds but stays consistent within one.
pub struct JsonFileGateway {
    problem_path: PathBuf,
    dispatch_path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(problem_path: impl Into<PathBuf>, dispatch_path: impl Into<PathBuf>) -> Self {
        Self {
            problem_path: problem_path.into(),
            dispatch_path: dispatch_path.into(),
        }
    }

    /// Verifies the problem document exists and parses. Called once at
    /// service startup so a missing datastore fails fast.
    pub fn probe(&self) -> Result<(), GatewayError> {
        self.load().map(|_| ())
    }

    fn load(&self) -> Result<ProblemDocument, GatewayError> {
        let raw = std::fs::read_to_string(&self.problem_path).map_err(|e| {
            GatewayError::Unavailable(format!(
                "cannot read {}: {e}",
                self.problem_path.display()
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl DatastoreGateway for JsonFileGateway {
    fn list_machines(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.load()?.machines)
    }

    fn list_lots(&self) -> Result<Vec<String>, GatewayError> {
        // Deduplicate, keeping first-occurrence order for round stability.
        let mut lots = Vec::new();
        for lot in self.load()?.lots {
            if !lots.contains(&lot) {
                lots.push(lot);
            }
        }
        Ok(lots)
    }

    fn process_time_matrix(
        &self,
        lots: &[String],
        machines: &[String],
    ) -> Result<Vec<Vec<f64>>, GatewayError> {
        let document = self.load()?;
        let matrix = lots
            .iter()
            .map(|lot| {
                let row = document.lots.iter().position(|l| l == lot);
                machines
                    .iter()
                    .map(|machine| {
                        let col = document.machines.iter().position(|m| m == machine);
                        match (row, col) {
                            (Some(r), Some(c)) => document
                                .process_times
                                .get(r)
                                .and_then(|row| row.get(c))
                                .copied()
                                .unwrap_or(0.0),
                            _ => 0.0,
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(matrix)
    }

    fn save_dispatch_records(&self, records: &[DispatchRecord]) -> Result<(), GatewayError> {
        // One buffered write per batch keeps the append as close to atomic
        // as the filesystem allows.
        let mut payload = String::new();
        for record in records {
            payload.push_str(&serde_json::to_string(record)?);
            payload.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.dispatch_path)?;
        file.write_all(payload.as_bytes())?;
        Ok(())
    }
}
