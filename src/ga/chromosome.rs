//! Assignment-permutation chromosome.
//!
//! # Encoding
//!
//! Each gene packs one (lot, machine) assignment into a single integer:
//! `gene = lot * machine_count + machine`. A chromosome is an ordered gene
//! sequence of at most one gene per lot; gene order is the tie-breaker the
//! evaluator uses to sequence jobs on each machine.
//!
//! Crossover is order-based (OX) on raw gene values, so it can duplicate a
//! lot when the parents place it on different machines. Validity is restored
//! by [`Chromosome::repair`], the only operator that consults the
//! compatibility matrix — keeping the search-operator surface small.
//!
//! # Reference
//! Davis (1985), "Applying adaptive algorithms to epistatic domains" (OX)

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::models::ProblemInput;

/// A single packed (lot, machine) assignment.
pub type Gene = usize;

/// Packs a (lot, machine) pair into a gene.
#[inline]
pub fn encode_gene(lot: usize, machine: usize, machine_count: usize) -> Gene {
    lot * machine_count + machine
}

/// Unpacks a gene into its (lot, machine) pair.
#[inline]
pub fn decode_gene(gene: Gene, machine_count: usize) -> (usize, usize) {
    (gene / machine_count, gene % machine_count)
}

/// Ordered sequence of assignment genes for one candidate schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chromosome {
    genes: Vec<Gene>,
}

impl Chromosome {
    /// Wraps a raw gene sequence.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome carries no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Creates a uniformly random valid chromosome.
    ///
    /// Every lot is assigned to one of its compatible machines, then the
    /// sequence is shuffled.
    pub fn random<R: Rng>(problem: &ProblemInput, rng: &mut R) -> Self {
        let machine_count = problem.machine_count();
        let mut genes = Vec::with_capacity(problem.lot_count());

        for lot in 0..problem.lot_count() {
            let machines = problem.compatible_machines(lot);
            if let Some(&machine) = machines.choose(rng) {
                genes.push(encode_gene(lot, machine, machine_count));
            }
        }
        genes.shuffle(rng);

        Self { genes }
    }

    /// Order-based (OX) crossover.
    ///
    /// Copies a random contiguous segment of `self` into the child at the
    /// same positions, then fills the remaining positions in wrap-around
    /// order with the other parent's genes, skipping gene-value collisions.
    /// The child may assign a lot twice (same lot, different machine in each
    /// parent) — callers must repair afterwards.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let len = self.genes.len();
        if len != other.genes.len() || len <= 2 {
            return self.clone();
        }

        let mut start = rng.random_range(0..len);
        let mut end = rng.random_range(0..len);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        // Sentinel marks positions still to fill; with distinct parent genes
        // the donor always supplies enough, and repair drops any stragglers.
        let mut child = vec![Gene::MAX; len];
        let mut used: HashSet<Gene> = HashSet::with_capacity(len);
        for i in start..=end {
            child[i] = self.genes[i];
            used.insert(self.genes[i]);
        }

        let mut write = (end + 1) % len;
        for i in 0..len {
            if write == start {
                break;
            }
            let gene = other.genes[(end + 1 + i) % len];
            if used.insert(gene) {
                child[write] = gene;
                write = (write + 1) % len;
            }
        }

        Self { genes: child }
    }

    /// Position-swap mutation.
    ///
    /// Each position is swapped with a uniformly chosen position with
    /// probability `rate`. Acts on gene order only.
    pub fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        let len = self.genes.len();
        if len <= 1 {
            return;
        }
        for i in 0..len {
            if rng.random::<f64>() < rate {
                let j = rng.random_range(0..len);
                self.genes.swap(i, j);
            }
        }
    }

    /// Whether every gene is in range, no lot repeats, and every assignment
    /// is compatible.
    pub fn is_valid(&self, problem: &ProblemInput) -> bool {
        let lot_count = problem.lot_count();
        let machine_count = problem.machine_count();
        let mut seen = vec![false; lot_count];

        for &gene in &self.genes {
            let (lot, machine) = decode_gene(gene, machine_count);
            if lot >= lot_count || machine >= machine_count {
                return false;
            }
            if seen[lot] || !problem.is_compatible(lot, machine) {
                return false;
            }
            seen[lot] = true;
        }
        true
    }

    /// Restores validity after crossover and mutation.
    ///
    /// Pass 1 scans left to right, keeping a gene only if its lot has not
    /// been seen, both indices are in range, and the pair is compatible.
    /// Pass 2 writes a random compatible assignment for every missing lot
    /// into the rejected slots (appending once the slots run out), then
    /// drops any leftover rejected slots.
    ///
    /// Idempotent: repairing an already-valid full-length chromosome is a
    /// no-op.
    pub fn repair<R: Rng>(&mut self, problem: &ProblemInput, rng: &mut R) {
        let lot_count = problem.lot_count();
        let machine_count = problem.machine_count();

        let mut assigned = vec![false; lot_count];
        let mut rejected: Vec<usize> = Vec::new();
        for (pos, &gene) in self.genes.iter().enumerate() {
            let (lot, machine) = decode_gene(gene, machine_count);
            let keep = lot < lot_count
                && machine < machine_count
                && problem.is_compatible(lot, machine)
                && !assigned[lot];
            if keep {
                assigned[lot] = true;
            } else {
                rejected.push(pos);
            }
        }

        let mut free_slots = rejected.into_iter();
        for lot in 0..lot_count {
            if assigned[lot] {
                continue;
            }
            let machines = problem.compatible_machines(lot);
            let Some(&machine) = machines.choose(rng) else {
                continue;
            };
            let gene = encode_gene(lot, machine, machine_count);
            match free_slots.next() {
                Some(pos) => self.genes[pos] = gene,
                None => self.genes.push(gene),
            }
        }

        let leftover: HashSet<usize> = free_slots.collect();
        if !leftover.is_empty() {
            let mut pos = 0;
            self.genes.retain(|_| {
                let keep = !leftover.contains(&pos);
                pos += 1;
                keep
            });
        }
    }
}
