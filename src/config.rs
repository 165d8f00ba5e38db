//! Engine configuration.
//!
//! All knobs of the optimization core in one serde struct: population
//! sizing, operator rates, and the migration matrix of interval, rate,
//! policy and topology. Values can come from a JSON file or be set through
//! the builder methods; `validate` enforces the arithmetic bounds before a
//! round may run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ga::{MigrationPolicy, MigrationTopology};

/// Configuration for one archipelago run.
///
/// The total population is split evenly across islands as
/// `population_size / island_count` individuals each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Total population across all islands.
    pub population_size: usize,
    /// Generations per scheduling round.
    pub generation_count: usize,
    /// Number of islands (and worker fan-out per generation).
    pub island_count: usize,
    /// Probability of crossover per reproduction, in `[0, 1]`.
    pub crossover_rate: f64,
    /// Per-position swap probability, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Individuals copied verbatim into each next generation.
    pub elitism_count: usize,
    /// Generations between migrations.
    pub migration_interval: usize,
    /// Fraction of an island's population that migrates, in `[0, 1]`.
    pub migration_rate: f64,
    /// How migrants are chosen from a source island.
    pub migration_policy: MigrationPolicy,
    /// Island connection structure.
    pub migration_topology: MigrationTopology,
    /// Base seed for the per-island RNG streams. `None` draws from OS
    /// entropy; set it for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generation_count: 200,
            island_count: 4,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            elitism_count: 2,
            migration_interval: 10,
            migration_rate: 0.1,
            migration_policy: MigrationPolicy::default(),
            migration_topology: MigrationTopology::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a JSON file; missing keys keep defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Individuals per island.
    pub fn population_per_island(&self) -> usize {
        self.population_size / self.island_count.max(1)
    }

    /// Checks the arithmetic bounds a round depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.island_count == 0 {
            return Err(ConfigError::NoIslands);
        }
        if self.population_per_island() == 0 {
            return Err(ConfigError::EmptyIslandPopulation {
                population: self.population_size,
                islands: self.island_count,
            });
        }
        if self.elitism_count >= self.population_per_island() {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.elitism_count,
                population: self.population_per_island(),
            });
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("migration_rate", self.migration_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        if self.migration_interval == 0 {
            return Err(ConfigError::ZeroMigrationInterval);
        }
        Ok(())
    }

    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_generation_count(mut self, generation_count: usize) -> Self {
        self.generation_count = generation_count;
        self
    }

    pub fn with_island_count(mut self, island_count: usize) -> Self {
        self.island_count = island_count;
        self
    }

    pub fn with_crossover_rate(mut self, crossover_rate: f64) -> Self {
        self.crossover_rate = crossover_rate;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn with_elitism_count(mut self, elitism_count: usize) -> Self {
        self.elitism_count = elitism_count;
        self
    }

    pub fn with_migration_interval(mut self, migration_interval: usize) -> Self {
        self.migration_interval = migration_interval;
        self
    }

    pub fn with_migration_rate(mut self, migration_rate: f64) -> Self {
        self.migration_rate = migration_rate;
        self
    }

    pub fn with_migration_policy(mut self, migration_policy: MigrationPolicy) -> Self {
        self.migration_policy = migration_policy;
        self
    }

    pub fn with_migration_topology(mut self, migration_topology: MigrationTopology) -> Self {
        self.migration_topology = migration_topology;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 100);
        assert_eq!(config.generation_count, 200);
        assert_eq!(config.island_count, 4);
        assert_eq!(config.population_per_island(), 25);
        assert_eq!(config.crossover_rate, 0.8);
        assert_eq!(config.mutation_rate, 0.2);
        assert_eq!(config.elitism_count, 2);
        assert_eq!(config.migration_interval, 10);
        assert_eq!(config.migration_rate, 0.1);
        assert_eq!(config.migration_policy, MigrationPolicy::Best);
        assert_eq!(config.migration_topology, MigrationTopology::Ring);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_zero_islands_rejected() {
        let err = EngineConfig::default()
            .with_island_count(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoIslands));
    }

    #[test]
    fn test_empty_island_population_rejected() {
        let err = EngineConfig::default()
            .with_population_size(3)
            .with_island_count(4)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyIslandPopulation { .. }));
    }

    #[test]
    fn test_elitism_bound() {
        let err = EngineConfig::default()
            .with_population_size(8)
            .with_island_count(4)
            .with_elitism_count(2)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ElitismTooLarge { .. }));
    }

    #[test]
    fn test_rate_bounds() {
        let err = EngineConfig::default()
            .with_mutation_rate(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RateOutOfRange {
                name: "mutation_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_migration_interval_rejected() {
        let err = EngineConfig::default()
            .with_migration_interval(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMigrationInterval));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"population_size": 60, "migration_topology": "star", "migration_policy": "roulette_wheel"}"#,
        )
        .unwrap();
        assert_eq!(config.population_size, 60);
        assert_eq!(config.migration_topology, MigrationTopology::Star);
        assert_eq!(config.migration_policy, MigrationPolicy::RouletteWheel);
        assert_eq!(config.generation_count, 200);
    }
}
