//! # Random Number Generation
//!
//! The engine draws all of its randomness on the driver thread through a
//! single [`RandomNumberGenerator`]. The generator is seedable for
//! reproducible runs and its state serializes with the rest of the engine,
//! so a saved run resumes with the exact random stream it would have
//! consumed anyway.
//!
//! [`Distribution`] is the closed set of probability distributions that the
//! distribution-driven selection and crossover strategies can draw from.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_distr::Distribution as Sampler;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::{GeneticError, Result};

/// Smallest admissible beta shape parameter.
const BETA_MIN: f64 = 1e-37;

/// Seedable random number generator used by the whole engine.
///
/// Wraps a PCG-64 generator: fast, small state, and serializable, which is
/// what makes save/load reproducibility possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomNumberGenerator {
    pub rng: Pcg64,
}

impl RandomNumberGenerator {
    /// Creates a generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Pcg64::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Draws `num` uniform values from `[from, to)`.
    pub fn fetch_uniform(&mut self, from: f64, to: f64, num: usize) -> VecDeque<f64> {
        let mut uniform_numbers = VecDeque::new();
        uniform_numbers.extend((0..num).map(|_| self.rng.gen_range(from..to)));
        uniform_numbers
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A probability distribution used by distribution-driven selection and
/// crossover strategies.
///
/// Parameters are given on the *context scale*: the size of the index range
/// the draw will be mapped into (population size for selection, effective
/// chromosome length for crossover). The `*_for` constructors compute the
/// documented context defaults, e.g. [`Distribution::chi_square_for`] uses
/// the context size itself as the degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    /// Uniform over the whole target range.
    Uniform,
    /// Normal with the given mean and standard deviation.
    Normal(f64, f64),
    /// Beta with shape parameters `a, b >= 1e-37`. Draws land in `[0, 1)`
    /// and are scaled to the target range.
    Beta(f64, f64),
    /// Binomial with `n` trials and success probability `p`.
    Binomial(u64, f64),
    /// Chi-square with the given degrees of freedom.
    ChiSquare(f64),
    /// Exponential with the given mean.
    Exponential(f64),
    /// Poisson with the given mean.
    Poisson(f64),
}

impl Distribution {
    /// Normal with context defaults: mean and standard deviation both `n / 2`.
    pub fn normal_for(n: usize) -> Self {
        Self::Normal(n as f64 / 2.0, n as f64 / 2.0)
    }

    /// Beta with context defaults: both shape parameters equal to `n`.
    pub fn beta_for(n: usize) -> Self {
        Self::Beta(n as f64, n as f64)
    }

    /// Binomial with context defaults: `n` trials at probability `0.5`.
    pub fn binomial_for(n: usize) -> Self {
        Self::Binomial(n as u64, 0.5)
    }

    /// Chi-square with context defaults: `n` degrees of freedom.
    pub fn chi_square_for(n: usize) -> Self {
        Self::ChiSquare(n as f64)
    }

    /// Exponential with context defaults: mean `n`.
    pub fn exponential_for(n: usize) -> Self {
        Self::Exponential(n as f64)
    }

    /// Poisson with context defaults: mean `n`.
    pub fn poisson_for(n: usize) -> Self {
        Self::Poisson(n as f64)
    }

    /// Checks the parameters for admissibility.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for parameters the underlying
    /// sampler rejects (non-finite values, beta shapes below `1e-37`,
    /// probabilities outside `[0, 1]`, non-positive scale parameters).
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Uniform => Ok(()),
            Self::Normal(mean, sd) => {
                if !mean.is_finite() || !sd.is_finite() || sd <= 0.0 {
                    return Err(GeneticError::Configuration(format!(
                        "Normal distribution requires a finite mean and a positive standard deviation, got ({}, {})",
                        mean, sd
                    )));
                }
                Ok(())
            }
            Self::Beta(a, b) => {
                if !(a >= BETA_MIN && b >= BETA_MIN && a.is_finite() && b.is_finite()) {
                    return Err(GeneticError::Configuration(format!(
                        "Beta distribution requires shape parameters >= {:e}, got ({}, {})",
                        BETA_MIN, a, b
                    )));
                }
                Ok(())
            }
            Self::Binomial(_, p) => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(GeneticError::Configuration(format!(
                        "Binomial distribution requires a probability in [0, 1], got {}",
                        p
                    )));
                }
                Ok(())
            }
            Self::ChiSquare(df) => {
                if !df.is_finite() || df <= 0.0 {
                    return Err(GeneticError::Configuration(format!(
                        "Chi-square distribution requires positive degrees of freedom, got {}",
                        df
                    )));
                }
                Ok(())
            }
            Self::Exponential(mean) | Self::Poisson(mean) => {
                if !mean.is_finite() || mean <= 0.0 {
                    return Err(GeneticError::Configuration(format!(
                        "Distribution requires a positive mean, got {}",
                        mean
                    )));
                }
                Ok(())
            }
        }
    }

    /// The natural cut-point count of the distribution, where one exists.
    ///
    /// `Binomial(n, _)` counts `n` points and `Poisson(mean)` counts
    /// `round(mean)`; the remaining distributions have no natural count.
    pub fn point_count(&self) -> Option<usize> {
        match *self {
            Self::Binomial(n, _) => Some(n as usize),
            Self::Poisson(mean) => Some((mean.round() as usize).max(1)),
            _ => None,
        }
    }

    /// Draws from the distribution and maps the draw into `[0, 1)` against
    /// the context size `n` the parameters were computed for.
    ///
    /// Distributions with unbounded support are clamped: the caller scales
    /// the unit value into its target range (an index range or a cumulative
    /// fitness total).
    pub fn sample_unit(&self, n: usize, rng: &mut RandomNumberGenerator) -> Result<f64> {
        let n = n.max(1) as f64;
        let raw = match *self {
            Self::Uniform => rng.rng.gen_range(0.0..1.0),
            Self::Normal(mean, sd) => {
                let normal = rand_distr::Normal::new(mean, sd)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                normal.sample(&mut rng.rng) / n
            }
            Self::Beta(a, b) => {
                let beta = rand_distr::Beta::new(a, b)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                beta.sample(&mut rng.rng)
            }
            Self::Binomial(trials, p) => {
                let binomial = rand_distr::Binomial::new(trials, p)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                binomial.sample(&mut rng.rng) as f64 / (trials + 1) as f64
            }
            Self::ChiSquare(df) => {
                let chi = rand_distr::ChiSquared::new(df)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                chi.sample(&mut rng.rng) / n
            }
            Self::Exponential(mean) => {
                let exp = rand_distr::Exp::new(1.0 / mean)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                exp.sample(&mut rng.rng) / n
            }
            Self::Poisson(mean) => {
                let poisson = rand_distr::Poisson::new(mean)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?;
                poisson.sample(&mut rng.rng) / n
            }
        };
        Ok(raw.clamp(0.0, 1.0 - f64::EPSILON))
    }

    /// Draws an index in `0..n`.
    pub fn sample_index(&self, n: usize, rng: &mut RandomNumberGenerator) -> Result<usize> {
        if n == 0 {
            return Err(GeneticError::EmptyPopulation);
        }
        let unit = self.sample_unit(n, rng)?;
        Ok(((unit * n as f64) as usize).min(n - 1))
    }
}
