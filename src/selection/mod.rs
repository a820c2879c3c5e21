//! # Selection
//!
//! Chooses parent indices from the current population. Schemes are a closed
//! tagged-variant family: the small fixed set keeps the per-child selection
//! loop branch-predictable, and every scheme works on the fitness vector
//! alone, returning indices rather than clones.
//!
//! All fitness-weighted schemes require non-negative fitness. A fitness sum
//! of zero is not an error: the scheme degrades to uniform sampling and
//! emits a warning event.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GeneticError, Result};
use crate::rng::{Distribution, RandomNumberGenerator};

/// A parent-selection scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionScheme {
    /// Sample indices with probability proportional to fitness.
    RouletteBasic,
    /// Restrict to the top-ranked half of the population, then sample
    /// proportionally to fitness within that subset.
    Roulette,
    /// Build the cumulative fitness distribution and draw lookup values from
    /// the given probability distribution mapped to `[0, total_fitness)`.
    RouletteDistribution(Distribution),
    /// Draw indices directly in `[0, N)` from the given probability
    /// distribution, with no fitness weighting.
    Distribution(Distribution),
}

impl SelectionScheme {
    /// Checks any embedded distribution parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RouletteDistribution(d) | Self::Distribution(d) => d.validate(),
            _ => Ok(()),
        }
    }

    /// Selects `count` parent indices from a population with the given
    /// fitness vector. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` for an empty fitness vector
    /// and `GeneticError::Selection` when a weighted scheme sees negative
    /// fitness.
    pub fn select(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        if fitness.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        match self {
            Self::RouletteBasic => {
                let indices: Vec<usize> = (0..fitness.len()).collect();
                roulette_over(&indices, fitness, count, rng)
            }
            Self::Roulette => {
                let mut ranked: Vec<usize> = (0..fitness.len()).collect();
                let half = (fitness.len() + 1) / 2;
                // A linear partition is enough: only membership in the top
                // half matters, not its internal order.
                if half < ranked.len() {
                    ranked.select_nth_unstable_by(half - 1, |&a, &b| {
                        fitness[b]
                            .partial_cmp(&fitness[a])
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                }
                ranked.truncate(half);
                roulette_over(&ranked, fitness, count, rng)
            }
            Self::RouletteDistribution(distribution) => {
                if fitness.iter().any(|&f| f < 0.0) {
                    return Err(GeneticError::Selection(
                        "Distribution-driven roulette requires non-negative fitness values"
                            .to_string(),
                    ));
                }
                let mut cumulative = Vec::with_capacity(fitness.len());
                let mut total = 0.0;
                for &f in fitness {
                    total += f;
                    cumulative.push(total);
                }
                if total <= 0.0 {
                    warn!("all-zero fitness during weighted selection, falling back to uniform");
                    return uniform_indices(fitness.len(), count, rng);
                }
                let mut selected = Vec::with_capacity(count);
                for _ in 0..count {
                    let u = distribution.sample_unit(fitness.len(), rng)? * total;
                    let index = cumulative.partition_point(|&c| c <= u);
                    selected.push(index.min(fitness.len() - 1));
                }
                Ok(selected)
            }
            Self::Distribution(distribution) => (0..count)
                .map(|_| distribution.sample_index(fitness.len(), rng))
                .collect(),
        }
    }
}

/// Fitness-proportionate sampling restricted to `indices`.
fn roulette_over(
    indices: &[usize],
    fitness: &[f64],
    count: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<usize>> {
    if fitness.iter().any(|&f| f < 0.0) {
        return Err(GeneticError::Selection(
            "Roulette selection requires non-negative fitness values".to_string(),
        ));
    }

    let total: f64 = indices.iter().map(|&i| fitness[i]).sum();
    if total <= 0.0 {
        warn!("all-zero fitness during weighted selection, falling back to uniform");
        return Ok((0..count)
            .map(|_| indices[rng.rng.gen_range(0..indices.len())])
            .collect());
    }

    let mut probs = Vec::with_capacity(indices.len());
    let mut cumulative = 0.0;
    for &i in indices {
        cumulative += fitness[i] / total;
        probs.push(cumulative);
    }
    if let Some(last) = probs.last_mut() {
        *last = 1.0;
    }

    let mut selected = Vec::with_capacity(count);
    for _ in 0..count {
        let r = rng.fetch_uniform(0.0, 1.0, 1).pop_front().ok_or_else(|| {
            GeneticError::Selection("Failed to draw a roulette lookup value".to_string())
        })?;
        let slot = probs.partition_point(|&p| p < r).min(indices.len() - 1);
        selected.push(indices[slot]);
    }
    Ok(selected)
}

fn uniform_indices(
    n: usize,
    count: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<usize>> {
    Ok((0..count).map(|_| rng.rng.gen_range(0..n)).collect())
}
