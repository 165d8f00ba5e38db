//! Island-model genetic optimization core.
//!
//! Splits the population across isolated islands that evolve in parallel
//! and periodically exchange individuals along a static topology.
//!
//! # Encoding
//!
//! Each gene packs one (lot, machine) assignment into a single integer
//! (`lot * machine_count + machine`); a chromosome orders at most one gene
//! per lot. The evaluator decodes gene order into per-machine job sequences
//! and scores the result as `-makespan`.
//!
//! # Pipeline per generation
//!
//! 1. One worker per island: elitism → tournament selection → OX crossover
//!    → swap mutation → repair → evaluation (see [`chromosome`]).
//! 2. Barrier: all islands finish before anything else runs.
//! 3. Every `migration_interval` generations, migrants move along the
//!    topology edges, displacing the destination's worst members.
//!
//! # Submodules
//!
//! - [`chromosome`]: encoding and the search operators
//! - [`evaluator`]: deterministic decode and fitness
//! - [`topology`]: island connection graphs
//! - [`migration`]: migrant selection policies
//! - [`archipelago`]: orchestration and the global best
//!
//! # References
//!
//! - Cantú-Paz (2000), "Efficient and Accurate Parallel Genetic Algorithms"
//! - Davis (1985), "Applying adaptive algorithms to epistatic domains"

pub mod archipelago;
pub mod chromosome;
pub mod evaluator;
mod island;
pub mod migration;
pub mod topology;

pub use archipelago::Archipelago;
pub use chromosome::{decode_gene, encode_gene, Chromosome, Gene};
pub use evaluator::Evaluator;
pub use migration::MigrationPolicy;
pub use topology::MigrationTopology;
