//! # Population Store
//!
//! Owns the current generation's chromosomes together with a parallel
//! fitness column. A slot's fitness is `None` until the evaluator writes it
//! and is cleared whenever the slot's chromosome is replaced, so stale
//! scores can never survive a generation swap.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// The current generation: chromosomes plus their nullable fitness column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
    fitness: Vec<Option<f64>>,
}

impl Population {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chromosomes: Vec::with_capacity(capacity),
            fitness: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Appends a chromosome with no fitness.
    pub fn push(&mut self, chromosome: Chromosome) {
        self.chromosomes.push(chromosome);
        self.fitness.push(None);
    }

    pub fn chromosome(&self, index: usize) -> &Chromosome {
        &self.chromosomes[index]
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn fitness(&self, index: usize) -> Option<f64> {
        self.fitness[index]
    }

    pub(crate) fn set_fitness(&mut self, index: usize, fitness: f64) {
        self.fitness[index] = Some(fitness);
    }

    /// Replaces the chromosome at `index`, clearing the slot's fitness.
    pub(crate) fn replace(&mut self, index: usize, chromosome: Chromosome) {
        self.chromosomes[index] = chromosome;
        self.fitness[index] = None;
    }

    /// Swaps in the next generation. Callers pass the new chromosomes with a
    /// fitness column that retains scores only for preserved slots.
    pub(crate) fn replace_all(
        &mut self,
        chromosomes: Vec<Chromosome>,
        fitness: Vec<Option<f64>>,
    ) {
        self.chromosomes = chromosomes;
        self.fitness = fitness;
    }

    /// Overwrites the prefix of the population with the given chromosomes.
    ///
    /// The caller validates the chromosomes beforehand; each replaced slot's
    /// fitness is cleared.
    pub(crate) fn overwrite_prefix(&mut self, chromosomes: Vec<Chromosome>) {
        for (index, chromosome) in chromosomes.into_iter().enumerate() {
            self.replace(index, chromosome);
        }
    }

    /// Indices ordered by fitness, best first. Unevaluated and NaN scores
    /// rank last; ties keep insertion order, so the lower index wins.
    pub fn ranked(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|&a, &b| compare_fitness(self.fitness[b], self.fitness[a]));
        indices
    }

    /// The full fitness column as a dense vector.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Fitness` if any slot is unevaluated; callers
    /// run the evaluator first.
    pub(crate) fn fitness_vec(&self) -> Result<Vec<f64>> {
        self.fitness
            .iter()
            .enumerate()
            .map(|(index, f)| {
                f.ok_or_else(|| {
                    GeneticError::Fitness(format!("Chromosome {} has no fitness score", index))
                })
            })
            .collect()
    }
}

/// Descending-order comparator that tolerates NaN the way the ranking needs:
/// NaN and missing scores sort behind every real score.
fn compare_fitness(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or_else(|| {
            if a.is_nan() && b.is_nan() {
                Ordering::Equal
            } else if a.is_nan() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
