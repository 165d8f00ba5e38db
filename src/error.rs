//! Error taxonomy for the scheduling engine.
//!
//! The archipelago itself never fails on a bad chromosome — the repair
//! operator normalizes those. Errors surface at the edges: rejected problem
//! inputs, unreachable datastores, and configuration that violates
//! arithmetic bounds. The service layer decides whether to skip a round or
//! abort startup.

use thiserror::Error;

use crate::gateway::GatewayError;

/// A scheduling round failure, as seen by the service loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Problem inputs violate the data-model invariants.
    #[error("invalid problem: {0}")]
    Problem(#[from] ProblemError),

    /// A datastore call failed; the round is skipped and the loop continues.
    #[error("gateway unavailable: {0}")]
    Gateway(#[from] GatewayError),

    /// Configuration violates arithmetic bounds. Fatal at startup.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Rejected problem inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ProblemError {
    #[error("no lots to schedule")]
    NoLots,

    #[error("no machines available")]
    NoMachines,

    #[error("process-time matrix has {rows} rows, expected {expected}")]
    RowCountMismatch { rows: usize, expected: usize },

    #[error("process-time row for lot `{lot_id}` has {cols} columns, expected {expected}")]
    ColumnCountMismatch {
        lot_id: String,
        cols: usize,
        expected: usize,
    },

    /// Every lot must have at least one machine with a positive process time.
    #[error("lot `{lot_id}` has no compatible machine")]
    IncompatibleLot { lot_id: String },
}

/// Rejected engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("island_count must be at least 1")]
    NoIslands,

    #[error("population_size {population} leaves island populations empty across {islands} islands")]
    EmptyIslandPopulation { population: usize, islands: usize },

    #[error("elitism_count {elitism} must be smaller than the per-island population {population}")]
    ElitismTooLarge { elitism: usize, population: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("migration_interval must be at least 1")]
    ZeroMigrationInterval,

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}
