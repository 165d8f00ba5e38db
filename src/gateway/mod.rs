//! Datastore capability surface.
//!
//! The engine consumes a deliberately narrow interface: list machines, list
//! lots, fetch the process-time matrix in bulk, and persist dispatch
//! records. Everything else about the datastore (drivers, pooling, query
//! catalogs) belongs to the surrounding infrastructure.

mod json;
mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json::JsonFileGateway;
pub use memory::InMemoryGateway;

/// One persisted dispatch instruction: run `lot_id` on `machine_id` during
/// `[start_time, end_time]`, released at wall-clock `release_time`
/// (seconds since the Unix epoch). Start and end are offsets from the
/// beginning of the computed plan, not wall-clock times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub machine_id: String,
    pub lot_id: String,
    pub release_time: f64,
    pub start_time: f64,
    pub end_time: f64,
}

/// Datastore call failures. The service logs these and skips the round.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("datastore unavailable: {0}")]
    Unavailable(String),

    #[error("datastore I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed datastore payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The datastore operations one scheduling round depends on.
///
/// Calls are made sequentially per round; implementations only need interior
/// mutability for persistence.
pub trait DatastoreGateway {
    /// Ordered machine identifiers.
    fn list_machines(&self) -> Result<Vec<String>, GatewayError>;

    /// Ordered, deduplicated lot identifiers. Order is implementation
    /// defined but must be stable within one round.
    fn list_lots(&self) -> Result<Vec<String>, GatewayError>;

    /// Bulk L×M process-time matrix for the given lots and machines.
    /// Incompatible pairs are `0`.
    fn process_time_matrix(
        &self,
        lots: &[String],
        machines: &[String],
    ) -> Result<Vec<Vec<f64>>, GatewayError>;

    /// Persists one round's dispatch records — atomically if the backend
    /// supports it, best-effort otherwise.
    fn save_dispatch_records(&self, records: &[DispatchRecord]) -> Result<(), GatewayError>;
}
