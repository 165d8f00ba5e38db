//! Migrant selection policies.
//!
//! Chooses which individuals leave an island when migration fires. Selection
//! returns copies — migrants stay in the source population.
//!
//! # Reference
//! Cantú-Paz (2000), "Efficient and Accurate Parallel Genetic Algorithms",
//! Ch. 4 (migrant selection)

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ga::chromosome::Chromosome;

/// Tournament size used for parent and migrant selection.
pub(crate) const TOURNAMENT_SIZE: usize = 3;

// Keeps roulette weights positive after shifting by the island minimum.
const ROULETTE_EPSILON: f64 = 1e-9;

/// How migrants are picked from a source island.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPolicy {
    /// The island's fittest individuals (ties: lower index first).
    #[default]
    Best,
    /// Uniform sample without replacement.
    Random,
    /// Independent size-3 tournaments, one per migrant.
    Tournament,
    /// Fitness-proportional sampling over shifted fitness values.
    RouletteWheel,
}

/// Picks `count` migrants with their cached fitness values.
pub(crate) fn select_migrants<R: Rng>(
    policy: MigrationPolicy,
    population: &[Chromosome],
    fitness: &[f64],
    count: usize,
    rng: &mut R,
) -> Vec<(Chromosome, f64)> {
    let count = count.min(population.len());
    if count == 0 {
        return Vec::new();
    }

    let picked: Vec<usize> = match policy {
        MigrationPolicy::Best => {
            let mut order: Vec<usize> = (0..population.len()).collect();
            order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
            order.truncate(count);
            order
        }
        MigrationPolicy::Random => index::sample(rng, population.len(), count).into_vec(),
        MigrationPolicy::Tournament => (0..count)
            .map(|_| tournament_pick(fitness, rng))
            .collect(),
        MigrationPolicy::RouletteWheel => roulette_picks(fitness, count, rng),
    };

    picked
        .into_iter()
        .map(|i| (population[i].clone(), fitness[i]))
        .collect()
}

/// Size-3 tournament: draws uniform indices and keeps the fittest.
/// Equal-fitness ties go to the earliest candidate drawn.
pub(crate) fn tournament_pick<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let mut best = rng.random_range(0..fitness.len());
    for _ in 1..TOURNAMENT_SIZE {
        let candidate = rng.random_range(0..fitness.len());
        if fitness[candidate] > fitness[best] {
            best = candidate;
        }
    }
    best
}

/// Samples `count` indices proportionally to fitness shifted above zero.
///
/// Fitness is `-makespan`, so raw values are non-positive; shifting by the
/// island minimum (plus a small epsilon) turns them into usable weights.
fn roulette_picks<R: Rng>(fitness: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| f - min + ROULETTE_EPSILON)
        .collect();
    let total: f64 = weights.iter().sum();

    (0..count)
        .map(|_| {
            let pick = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            for (i, &w) in weights.iter().enumerate() {
                cumulative += w;
                if cumulative >= pick {
                    return i;
                }
            }
            weights.len() - 1
        })
        .collect()
}
