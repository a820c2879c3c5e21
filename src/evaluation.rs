//! # Fitness Evaluation
//!
//! This module connects the engine to the user's fitness function. The
//! [`Challenge`] trait is the callback seam; the [`FitnessEvaluator`] wraps
//! it with the machinery the evolution driver needs: a fingerprint-keyed
//! cache that persists across generations, an optional fixed-size worker
//! pool for parallel evaluation, and the strict-mode guard that verifies a
//! chromosome's content did not change across a callback.
//!
//! Results always land in the population's fitness column by chromosome
//! index, regardless of worker completion order.

use std::collections::HashMap;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::population::Population;

/// Trait for evaluating the fitness of chromosomes.
///
/// This trait defines the interface for the user-supplied fitness function.
/// Higher scores are better. The callback must treat the chromosome as
/// read-only and must be side-effect free when evaluation runs in parallel;
/// this is a documented contract, with strict mode as a fingerprint-based
/// backstop.
///
/// Any `Fn(&Chromosome) -> f64` closure that is `Send + Sync` is a
/// `Challenge`.
pub trait Challenge: Send + Sync {
    /// Calculates the fitness score of a chromosome.
    fn score(&self, chromosome: &Chromosome) -> f64;
}

impl<F> Challenge for F
where
    F: Fn(&Chromosome) -> f64 + Send + Sync,
{
    fn score(&self, chromosome: &Chromosome) -> f64 {
        self(chromosome)
    }
}

/// Evaluates chromosomes through the user challenge, with caching, optional
/// parallelism, and strict-mode verification.
pub struct FitnessEvaluator<C: Challenge> {
    challenge: C,
    cache: Option<HashMap<u64, f64>>,
    strict: bool,
    pool: Option<rayon::ThreadPool>,
    evaluations: u64,
}

impl<C: Challenge> FitnessEvaluator<C> {
    /// Creates an evaluator.
    ///
    /// With `threads > 1` a dedicated pool of that many workers evaluates
    /// each generation's pending chromosomes; otherwise evaluation stays on
    /// the driver thread.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the worker pool cannot be
    /// built.
    pub fn new(challenge: C, cache: bool, strict: bool, threads: usize) -> Result<Self> {
        let pool = if threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?,
            )
        } else {
            None
        };
        Ok(Self {
            challenge,
            cache: cache.then(HashMap::new),
            strict,
            pool,
            evaluations: 0,
        })
    }

    /// Number of times the user challenge has actually been invoked. Cache
    /// hits do not count.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Number of distinct chromosomes in the cache, 0 when caching is off.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    /// Drops all cached scores. Called when a new run starts.
    pub(crate) fn reset_cache(&mut self) {
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }

    /// Scores every unevaluated chromosome of the population, writing each
    /// score into the fitness column by chromosome index.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Fitness` for a non-finite score and
    /// `GeneticError::StrictViolation` when strict mode detects a content
    /// change; scores already written for this generation are retained.
    pub fn evaluate_population(&mut self, population: &mut Population) -> Result<()> {
        let mut pending = Vec::new();
        for index in 0..population.len() {
            if population.fitness(index).is_some() {
                continue;
            }
            if let Some(cache) = &self.cache {
                let fingerprint = population.chromosome(index).fingerprint();
                if let Some(&score) = cache.get(&fingerprint) {
                    population.set_fitness(index, score);
                    continue;
                }
            }
            pending.push(index);
        }

        let scored: Vec<(usize, f64)> = match &self.pool {
            Some(pool) if pending.len() > 1 => {
                let view: &Population = population;
                let challenge = &self.challenge;
                let strict = self.strict;
                pool.install(|| {
                    pending
                        .par_iter()
                        .map(|&index| -> Result<(usize, f64)> {
                            let score =
                                checked_score(challenge, view.chromosome(index), strict)?;
                            Ok((index, score))
                        })
                        .collect::<Result<Vec<_>>>()
                })?
            }
            _ => {
                let mut scored = Vec::with_capacity(pending.len());
                for &index in &pending {
                    let score =
                        checked_score(&self.challenge, population.chromosome(index), self.strict)?;
                    scored.push((index, score));
                }
                scored
            }
        };

        self.evaluations += scored.len() as u64;
        for (index, score) in scored {
            if let Some(cache) = &mut self.cache {
                cache.insert(population.chromosome(index).fingerprint(), score);
            }
            population.set_fitness(index, score);
        }
        Ok(())
    }

    /// Scores a single chromosome through the cache. Used for ranking
    /// crossover children and for the `as_value` accessor.
    pub fn score_one(&mut self, chromosome: &Chromosome) -> Result<f64> {
        if let Some(cache) = &self.cache {
            if let Some(&score) = cache.get(&chromosome.fingerprint()) {
                return Ok(score);
            }
        }
        let score = checked_score(&self.challenge, chromosome, self.strict)?;
        self.evaluations += 1;
        if let Some(cache) = &mut self.cache {
            cache.insert(chromosome.fingerprint(), score);
        }
        Ok(score)
    }
}

/// Invokes the challenge with the strict-mode fingerprint guard and the
/// non-finite score check.
fn checked_score<C: Challenge>(challenge: &C, chromosome: &Chromosome, strict: bool) -> Result<f64> {
    let before = strict.then(|| chromosome.fingerprint());
    let score = challenge.score(chromosome);
    if let Some(before) = before {
        strict_check(before, chromosome.fingerprint())?;
    }
    if !score.is_finite() {
        return Err(GeneticError::Fitness(format!(
            "Non-finite fitness score encountered: {}",
            score
        )));
    }
    Ok(score)
}

/// The strict-mode comparison: equal fingerprints or a fatal error.
fn strict_check(before: u64, after: u64) -> Result<()> {
    if before != after {
        return Err(GeneticError::StrictViolation(format!(
            "fingerprint changed from {:#018x} to {:#018x} across the fitness callback",
            before, after
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{Genome, GenomeSpec, VariableLength};
    use crate::rng::RandomNumberGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingChallenge {
        calls: Arc<AtomicUsize>,
    }

    impl Challenge for CountingChallenge {
        fn score(&self, chromosome: &Chromosome) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            chromosome.defined_len() as f64
        }
    }

    fn small_population(n: usize, seed: u64) -> Population {
        let genome = Genome::new(GenomeSpec::Bit { length: 8 }, VariableLength::Fixed).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let mut population = Population::with_capacity(n);
        for _ in 0..n {
            population.push(genome.random(&mut rng));
        }
        population
    }

    #[test]
    fn test_cache_skips_repeat_evaluations() {
        let calls = Arc::new(AtomicUsize::new(0));
        let challenge = CountingChallenge {
            calls: calls.clone(),
        };
        let mut evaluator = FitnessEvaluator::new(challenge, true, false, 1).unwrap();

        let genome = Genome::new(GenomeSpec::Bit { length: 8 }, VariableLength::Fixed).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let chromosome = genome.random(&mut rng);

        let first = evaluator.score_one(&chromosome).unwrap();
        let second = evaluator.score_one(&chromosome).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(evaluator.evaluations(), 1);
        assert_eq!(evaluator.cache_len(), 1);
    }

    #[test]
    fn test_evaluate_population_fills_every_slot() {
        let mut evaluator =
            FitnessEvaluator::new(|c: &Chromosome| c.defined_len() as f64, false, false, 1)
                .unwrap();
        let mut population = small_population(10, 3);

        evaluator.evaluate_population(&mut population).unwrap();
        for i in 0..population.len() {
            assert!(population.fitness(i).is_some());
        }
    }

    #[test]
    fn test_parallel_results_align_with_indices() {
        let mut sequential =
            FitnessEvaluator::new(|c: &Chromosome| c.fingerprint() as f64, false, false, 1)
                .unwrap();
        let mut parallel =
            FitnessEvaluator::new(|c: &Chromosome| c.fingerprint() as f64, false, false, 4)
                .unwrap();

        let mut population_a = small_population(50, 4);
        let mut population_b = population_a.clone();

        sequential.evaluate_population(&mut population_a).unwrap();
        parallel.evaluate_population(&mut population_b).unwrap();

        for i in 0..population_a.len() {
            assert_eq!(population_a.fitness(i), population_b.fitness(i));
        }
    }

    #[test]
    fn test_non_finite_score_is_fatal() {
        let mut evaluator =
            FitnessEvaluator::new(|_: &Chromosome| f64::NAN, false, false, 1).unwrap();
        let mut population = small_population(2, 5);

        let result = evaluator.evaluate_population(&mut population);
        assert!(matches!(result, Err(GeneticError::Fitness(_))));
    }

    #[test]
    fn test_strict_check_flags_changed_fingerprint() {
        assert!(strict_check(0xdead, 0xdead).is_ok());
        assert!(matches!(
            strict_check(0xdead, 0xbeef),
            Err(GeneticError::StrictViolation(_))
        ));
    }

    #[test]
    fn test_strict_mode_accepts_honest_callback() {
        let mut evaluator =
            FitnessEvaluator::new(|c: &Chromosome| c.defined_len() as f64, false, true, 1)
                .unwrap();
        let mut population = small_population(5, 6);
        assert!(evaluator.evaluate_population(&mut population).is_ok());
    }
}
