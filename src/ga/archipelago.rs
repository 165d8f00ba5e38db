//! Island-model orchestration.
//!
//! The archipelago owns the islands, fans one worker per island out for each
//! generation, and runs the migration protocol in the serial gap between
//! generations. Problem inputs are borrowed immutably for the round; the
//! global best is the single synchronized touch point.
//!
//! # Reference
//! Cantú-Paz (2000), "Efficient and Accurate Parallel Genetic Algorithms"

use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::ga::chromosome::Chromosome;
use crate::ga::evaluator::Evaluator;
use crate::ga::island::{Island, ReproductionParams};
use crate::ga::migration::select_migrants;
use crate::models::{ProblemInput, Schedule};

/// Replace-if-better record of the fittest chromosome seen anywhere.
///
/// Updates are publish-if-better, so lock contention stays rare even with
/// every island worker reporting through it.
pub(crate) struct BestTracker {
    inner: Mutex<Option<(f64, Chromosome)>>,
}

impl BestTracker {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Records the chromosome if it beats the current best.
    pub(crate) fn offer(&self, fitness: f64, chromosome: &Chromosome) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some((best, slot)) => {
                if fitness > *best {
                    *best = fitness;
                    *slot = chromosome.clone();
                }
            }
            None => *guard = Some((fitness, chromosome.clone())),
        }
    }

    pub(crate) fn snapshot(&self) -> Option<(f64, Chromosome)> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// All islands of one scheduling round plus their migration wiring.
pub struct Archipelago<'a> {
    problem: &'a ProblemInput,
    evaluator: Evaluator<'a>,
    config: EngineConfig,
    islands: Vec<Island>,
    topology: Vec<Vec<bool>>,
    generation: usize,
    best: BestTracker,
}

impl<'a> Archipelago<'a> {
    /// Creates an archipelago for the given problem.
    ///
    /// Island RNG streams derive from the configured seed (OS entropy when
    /// absent), so a seeded run is reproducible island by island.
    pub fn new(problem: &'a ProblemInput, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut seed_source = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let islands = (0..config.island_count)
            .map(|_| Island::new(SmallRng::seed_from_u64(seed_source.random())))
            .collect();

        Ok(Self {
            problem,
            evaluator: Evaluator::new(problem),
            config: config.clone(),
            islands,
            topology: Vec::new(),
            generation: 0,
            best: BestTracker::new(),
        })
    }

    /// Populates every island with random valid chromosomes, evaluates them,
    /// seeds the global best and builds the migration topology.
    pub fn initialize(&mut self) {
        let per_island = self.config.population_per_island();
        let problem = self.problem;
        let evaluator = &self.evaluator;
        let best = &self.best;
        for island in &mut self.islands {
            island.populate(problem, evaluator, per_island, best);
        }
        self.topology = self
            .config
            .migration_topology
            .build(self.config.island_count);
        self.generation = 0;
    }

    /// Runs `generations` generations.
    ///
    /// Each generation forks one task per island; the fan-out join is the
    /// generation barrier. Migration fires between generations, serially,
    /// every `migration_interval` generations.
    pub fn evolve(&mut self, generations: usize) {
        let params = ReproductionParams {
            crossover_rate: self.config.crossover_rate,
            mutation_rate: self.config.mutation_rate,
            elitism_count: self.config.elitism_count,
        };

        for _ in 0..generations {
            let problem = self.problem;
            let evaluator = &self.evaluator;
            let best = &self.best;
            self.islands
                .par_iter_mut()
                .for_each(|island| island.step(problem, evaluator, &params, best));

            if (self.generation + 1) % self.config.migration_interval == 0 {
                self.migrate();
            }
            self.generation += 1;
        }
    }

    /// Copies selected migrants along every topology edge, each replacing
    /// the destination's worst member when strictly fitter.
    fn migrate(&mut self) {
        let per_island = self.config.population_per_island();
        let count = ((per_island as f64 * self.config.migration_rate).floor() as usize).max(1);

        for source in 0..self.islands.len() {
            let migrants = {
                let island = &mut self.islands[source];
                select_migrants(
                    self.config.migration_policy,
                    &island.population,
                    &island.fitness,
                    count,
                    &mut island.rng,
                )
            };

            for dest in 0..self.islands.len() {
                if dest == source || !self.topology[source][dest] {
                    continue;
                }
                for (migrant, migrant_fitness) in &migrants {
                    let island = &mut self.islands[dest];
                    let Some(worst) = worst_index(&island.fitness) else {
                        continue;
                    };
                    if *migrant_fitness > island.fitness[worst] {
                        island.population[worst] = migrant.clone();
                        island.fitness[worst] = *migrant_fitness;
                        self.best.offer(*migrant_fitness, migrant);
                    }
                }
            }
        }

        let fittest_island = self
            .islands
            .iter()
            .map(Island::best_fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        debug!(
            generation = self.generation,
            migrants_per_island = count,
            fittest_island,
            "migration complete"
        );
    }

    /// Best chromosome seen so far and its decoded schedule.
    ///
    /// `None` until the archipelago is initialized.
    pub fn best_solution(&self) -> Option<(Chromosome, Schedule)> {
        let (_, chromosome) = self.best.snapshot()?;
        let mut schedule = Schedule::new();
        self.evaluator.evaluate_into(&chromosome, &mut schedule);
        Some((chromosome, schedule))
    }

    /// Fitness of the best chromosome seen so far.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.snapshot().map(|(fitness, _)| fitness)
    }

    /// Completed generation count.
    pub fn generation(&self) -> usize {
        self.generation
    }
}

/// Worst slot on an island; equal-fitness ties go to the highest index.
fn worst_index(fitness: &[f64]) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let mut worst = 0;
    for (i, &f) in fitness.iter().enumerate().skip(1) {
        if f <= fitness[worst] {
            worst = i;
        }
    }
    Some(worst)
}
