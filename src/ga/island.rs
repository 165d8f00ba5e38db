//! A single island: an isolated sub-population with its own RNG stream.
//!
//! One generation step runs elitism, tournament selection, OX crossover,
//! swap mutation, repair and evaluation, entirely on island-local state.
//! The only shared touch point is the archipelago's publish-if-better
//! global-best hook.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::ga::archipelago::BestTracker;
use crate::ga::chromosome::Chromosome;
use crate::ga::evaluator::Evaluator;
use crate::ga::migration::tournament_pick;
use crate::models::ProblemInput;

/// Per-generation operator rates, shared by all islands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReproductionParams {
    pub(crate) crossover_rate: f64,
    pub(crate) mutation_rate: f64,
    pub(crate) elitism_count: usize,
}

/// Population, fitness cache and RNG for one island. Slot `i` of `fitness`
/// always scores slot `i` of `population`.
pub(crate) struct Island {
    pub(crate) population: Vec<Chromosome>,
    pub(crate) fitness: Vec<f64>,
    pub(crate) rng: SmallRng,
}

impl Island {
    pub(crate) fn new(rng: SmallRng) -> Self {
        Self {
            population: Vec::new(),
            fitness: Vec::new(),
            rng,
        }
    }

    /// Fills the island with `size` random valid chromosomes and seeds the
    /// global best with anything it finds.
    pub(crate) fn populate(
        &mut self,
        problem: &ProblemInput,
        evaluator: &Evaluator<'_>,
        size: usize,
        best: &BestTracker,
    ) {
        self.population.clear();
        self.fitness.clear();
        for _ in 0..size {
            let chromosome = Chromosome::random(problem, &mut self.rng);
            let fitness = evaluator.fitness(&chromosome);
            best.offer(fitness, &chromosome);
            self.population.push(chromosome);
            self.fitness.push(fitness);
        }
    }

    /// Advances the island by one generation.
    pub(crate) fn step(
        &mut self,
        problem: &ProblemInput,
        evaluator: &Evaluator<'_>,
        params: &ReproductionParams,
        best: &BestTracker,
    ) {
        let size = self.population.len();
        if size == 0 {
            return;
        }

        // Stable rank keeps index order on fitness ties.
        let mut ranked: Vec<usize> = (0..size).collect();
        ranked.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));

        let mut next_population = Vec::with_capacity(size);
        let mut next_fitness = Vec::with_capacity(size);
        for &idx in ranked.iter().take(params.elitism_count.min(size)) {
            next_population.push(self.population[idx].clone());
            next_fitness.push(self.fitness[idx]);
        }

        while next_population.len() < size {
            let parent_a = tournament_pick(&self.fitness, &mut self.rng);
            let parent_b = tournament_pick(&self.fitness, &mut self.rng);

            let (mut child_a, mut child_b) =
                if self.rng.random::<f64>() < params.crossover_rate {
                    (
                        self.population[parent_a]
                            .crossover(&self.population[parent_b], &mut self.rng),
                        self.population[parent_b]
                            .crossover(&self.population[parent_a], &mut self.rng),
                    )
                } else {
                    (
                        self.population[parent_a].clone(),
                        self.population[parent_b].clone(),
                    )
                };

            child_a.mutate(params.mutation_rate, &mut self.rng);
            child_b.mutate(params.mutation_rate, &mut self.rng);
            child_a.repair(problem, &mut self.rng);
            child_b.repair(problem, &mut self.rng);

            let fitness_a = evaluator.fitness(&child_a);
            let fitness_b = evaluator.fitness(&child_b);
            best.offer(fitness_a, &child_a);
            best.offer(fitness_b, &child_b);

            next_population.push(child_a);
            next_fitness.push(fitness_a);
            // Second child is dropped when it would overflow the population.
            if next_population.len() < size {
                next_population.push(child_b);
                next_fitness.push(fitness_b);
            }
        }

        self.population = next_population;
        self.fitness = next_fitness;
    }

    /// Fittest cached fitness on this island.
    pub(crate) fn best_fitness(&self) -> f64 {
        self.fitness
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn problem() -> ProblemInput {
        ProblemInput::new(
            vec!["L0".into(), "L1".into(), "L2".into(), "L3".into()],
            vec!["M0".into(), "M1".into()],
            vec![
                vec![2.0, 2.0],
                vec![2.0, 2.0],
                vec![2.0, 2.0],
                vec![2.0, 2.0],
            ],
        )
        .unwrap()
    }

    fn params() -> ReproductionParams {
        ReproductionParams {
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            elitism_count: 2,
        }
    }

    #[test]
    fn test_populate_fills_with_valid_individuals() {
        let p = problem();
        let evaluator = Evaluator::new(&p);
        let best = BestTracker::new();
        let mut island = Island::new(SmallRng::seed_from_u64(1));

        island.populate(&p, &evaluator, 10, &best);
        assert_eq!(island.population.len(), 10);
        assert_eq!(island.fitness.len(), 10);
        for (chromosome, &fitness) in island.population.iter().zip(&island.fitness) {
            assert!(chromosome.is_valid(&p));
            assert_eq!(fitness, evaluator.fitness(chromosome));
        }
        assert!(best.snapshot().is_some());
    }

    #[test]
    fn test_step_preserves_population_size() {
        let p = problem();
        let evaluator = Evaluator::new(&p);
        let best = BestTracker::new();
        let mut island = Island::new(SmallRng::seed_from_u64(2));
        island.populate(&p, &evaluator, 9, &best);

        for _ in 0..5 {
            island.step(&p, &evaluator, &params(), &best);
            assert_eq!(island.population.len(), 9);
            assert_eq!(island.fitness.len(), 9);
        }
    }

    #[test]
    fn test_step_output_is_valid() {
        let p = problem();
        let evaluator = Evaluator::new(&p);
        let best = BestTracker::new();
        let mut island = Island::new(SmallRng::seed_from_u64(3));
        island.populate(&p, &evaluator, 8, &best);

        for _ in 0..10 {
            island.step(&p, &evaluator, &params(), &best);
        }
        for chromosome in &island.population {
            assert!(chromosome.is_valid(&p));
        }
    }

    #[test]
    fn test_elitism_keeps_island_best() {
        let p = problem();
        let evaluator = Evaluator::new(&p);
        let best = BestTracker::new();
        let mut island = Island::new(SmallRng::seed_from_u64(4));
        island.populate(&p, &evaluator, 8, &best);

        for _ in 0..20 {
            let before = island.best_fitness();
            island.step(&p, &evaluator, &params(), &best);
            assert!(island.best_fitness() >= before);
        }
    }

    #[test]
    fn test_global_best_is_monotone() {
        let p = problem();
        let evaluator = Evaluator::new(&p);
        let best = BestTracker::new();
        let mut island = Island::new(SmallRng::seed_from_u64(5));
        island.populate(&p, &evaluator, 8, &best);

        let mut last = best.snapshot().map(|(f, _)| f).unwrap();
        for _ in 0..20 {
            island.step(&p, &evaluator, &params(), &best);
            let current = best.snapshot().map(|(f, _)| f).unwrap();
            assert!(current >= last);
            last = current;
        }
    }
}
