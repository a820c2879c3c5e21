//! # Evolution Driver
//!
//! The [`GeneticEngine`] orchestrates the whole run: it owns the population
//! store, the cache-aware fitness evaluator, the driver-thread RNG, and the
//! per-generation history, and it advances generations with the fixed
//! procedure
//!
//! 1. evaluate every unevaluated chromosome,
//! 2. check the terminate callback,
//! 3. preserve the top `preserve` chromosomes verbatim,
//! 4. breed the remaining slots (select parents, cross over with the
//!    configured probability, mutate),
//! 5. swap the next population in,
//! 6. append to the history when enabled.
//!
//! Selection, crossover, and mutation all run on the driver thread and
//! observe a stable ordering over population indices; only fitness
//! evaluation may fan out to workers. Seeded runs are therefore
//! reproducible even with parallel fitness, provided the user callback is
//! pure.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::history::History;
use super::options::{GeneticOptions, LogLevel};
use crate::chromosome::{Chromosome, GeneValue, Genome, GenomeSpec};
use crate::error::{GeneticError, Result};
use crate::evaluation::{Challenge, FitnessEvaluator};
use crate::mutation::Mutator;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// A snapshot of the just-evaluated generation, handed to the terminate
/// callback.
#[derive(Debug)]
pub struct GenerationStats<'a> {
    /// Index of the evaluated generation, starting at 0.
    pub generation: usize,
    /// Lowest fitness in the generation.
    pub min: f64,
    /// Mean fitness of the generation.
    pub mean: f64,
    /// Highest fitness in the generation.
    pub max: f64,
    /// The fittest chromosome of the generation.
    pub best: &'a Chromosome,
}

/// The user-supplied termination callback. Returning `true` stops the run
/// before the current generation breeds.
pub type TerminateFn = Box<dyn FnMut(&GenerationStats<'_>) -> bool + Send>;

/// State that exists only after `init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EngineState {
    genome: Genome,
    population: Population,
    generation: usize,
    history: History,
}

/// On-disk engine dump. The format is a structural serde snapshot, stable
/// within a major version; the fitness and terminate callbacks are not part
/// of it and are re-supplied at load.
#[derive(Serialize, Deserialize)]
struct EngineSnapshot {
    options: GeneticOptions,
    rng: RandomNumberGenerator,
    state: EngineState,
}

enum StepOutcome {
    Completed,
    Terminated,
}

/// The evolution driver.
///
/// # Example
///
/// ```rust
/// use evogen::evolution::{GeneticEngine, GeneticOptions};
/// use evogen::chromosome::{Chromosome, GenomeSpec};
///
/// // Maximise the number of ones in a 16-bit chromosome.
/// let options = GeneticOptions::builder()
///     .population(50)
///     .preserve(2)
///     .build()
///     .unwrap();
/// let popcount = |c: &Chromosome| {
///     (0..c.len()).filter(|&i| c.get(i) == Some(1)).count() as f64
/// };
///
/// let mut engine = GeneticEngine::new(options, popcount).unwrap().with_seed(42);
/// engine.init(GenomeSpec::Bit { length: 16 }).unwrap();
/// engine.evolve(20).unwrap();
///
/// let best = engine.fittest(1, false).unwrap().remove(0);
/// assert!(engine.as_value(&best).unwrap() >= 8.0);
/// ```
pub struct GeneticEngine<C: Challenge> {
    options: GeneticOptions,
    evaluator: FitnessEvaluator<C>,
    terminate: Option<TerminateFn>,
    rng: RandomNumberGenerator,
    state: Option<EngineState>,
}

impl<C: Challenge> GeneticEngine<C> {
    /// Creates an engine from validated options and the fitness challenge.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for inconsistent options or an
    /// unbuildable worker pool.
    pub fn new(options: GeneticOptions, challenge: C) -> Result<Self> {
        options.validate()?;
        let evaluator = FitnessEvaluator::new(
            challenge,
            options.get_cache(),
            options.get_strict(),
            options.get_threads(),
        )?;
        Ok(Self {
            options,
            evaluator,
            terminate: None,
            rng: RandomNumberGenerator::new(),
            state: None,
        })
    }

    /// Replaces the RNG with one seeded for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RandomNumberGenerator::from_seed(seed);
        self
    }

    /// Installs the termination callback, checked once per generation after
    /// evaluation.
    pub fn set_terminate<F>(&mut self, callback: F)
    where
        F: FnMut(&GenerationStats<'_>) -> bool + Send + 'static,
    {
        self.terminate = Some(Box::new(callback));
    }

    /// Creates the starting population of random chromosomes for the given
    /// genome spec. Clears any previous run, including the fitness cache.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for an invalid spec or a
    /// strategy/genome mismatch (permutation operators on a non-combination
    /// genome and vice versa, variable length on a combination genome).
    pub fn init(&mut self, spec: GenomeSpec) -> Result<()> {
        let genome = Genome::new(spec, self.options.get_variable_length())?;
        self.options.get_strategy().check_compatible(&genome)?;

        let mut population = Population::with_capacity(self.options.get_population());
        for _ in 0..self.options.get_population() {
            population.push(genome.random(&mut self.rng));
        }
        self.evaluator.reset_cache();
        self.state = Some(EngineState {
            genome,
            population,
            generation: 0,
            history: History::default(),
        });
        Ok(())
    }

    /// Overwrites the prefix of the population with user-supplied
    /// chromosomes, validated against the genome's invariants.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidChromosome` if any chromosome violates
    /// the invariants or more chromosomes are given than the population
    /// holds; the population is unchanged on error.
    pub fn inject(&mut self, chromosomes: &[Vec<GeneValue>]) -> Result<()> {
        let state = self
            .state
            .as_mut()
            .ok_or(GeneticError::NotInitialized("inject"))?;
        if chromosomes.len() > state.population.len() {
            return Err(GeneticError::InvalidChromosome(format!(
                "Cannot inject {} chromosomes into a population of {}",
                chromosomes.len(),
                state.population.len()
            )));
        }
        let encoded = chromosomes
            .iter()
            .map(|raw| state.genome.encode(raw))
            .collect::<Result<Vec<_>>>()?;
        state.population.overwrite_prefix(encoded);
        Ok(())
    }

    /// Advances up to `generations` generations (unlimited when 0), stopping
    /// early when the terminate callback returns `true`. Returns the number
    /// of generations completed by this call.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::NotInitialized` before `init`, and propagates
    /// fitness failures; on a fitness failure the last completed generation
    /// is retained.
    pub fn evolve(&mut self, generations: usize) -> Result<usize> {
        if self.state.is_none() {
            return Err(GeneticError::NotInitialized("evolve"));
        }
        let mut completed = 0;
        while generations == 0 || completed < generations {
            match self.step()? {
                StepOutcome::Completed => completed += 1,
                StepOutcome::Terminated => break,
            }
        }
        Ok(completed)
    }

    fn step(&mut self) -> Result<StepOutcome> {
        let Self {
            options,
            evaluator,
            terminate,
            rng,
            state,
        } = self;
        let state = state
            .as_mut()
            .ok_or(GeneticError::NotInitialized("evolve"))?;

        // 1. Evaluation.
        evaluator.evaluate_population(&mut state.population)?;
        let fitness = state.population.fitness_vec()?;
        let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;

        match options.get_log_level() {
            LogLevel::Info => {
                info!(
                    generation = state.generation,
                    min, mean, max, "evolution progress"
                );
            }
            LogLevel::Debug => {
                for (index, score) in fitness.iter().enumerate() {
                    debug!(
                        generation = state.generation,
                        index,
                        score,
                        chromosome = %state.genome.as_string(state.population.chromosome(index)),
                        "evolution detailed progress"
                    );
                }
            }
            LogLevel::None => {}
        }

        let ranked = state.population.ranked();

        // 2. Termination check.
        if let Some(callback) = terminate.as_mut() {
            let stats = GenerationStats {
                generation: state.generation,
                min,
                mean,
                max,
                best: state.population.chromosome(ranked[0]),
            };
            if callback(&stats) {
                return Ok(StepOutcome::Terminated);
            }
        }

        // 3. Preservation.
        let n = options.get_population();
        let mut next = Vec::with_capacity(n);
        let mut next_fitness = Vec::with_capacity(n);
        for &index in ranked.iter().take(options.get_preserve()) {
            next.push(state.population.chromosome(index).clone());
            next_fitness.push(state.population.fitness(index));
        }

        // 4. Breeding.
        let mutator = Mutator::new(options.get_mutation_probability());
        while next.len() < n {
            let parent_indices =
                options
                    .get_selection()
                    .select(&fitness, options.get_parents(), rng)?;
            let parents: Vec<&Chromosome> = parent_indices
                .iter()
                .map(|&index| state.population.chromosome(index))
                .collect();

            let mut child = if rng.rng.gen_bool(options.get_crossover_probability()) {
                options.get_strategy().breed(&parents, &state.genome, rng, &mut |c| {
                    evaluator.score_one(c)
                })?
            } else {
                parents[0].clone()
            };
            mutator.mutate(&mut child, &state.genome, rng);

            next.push(child);
            next_fitness.push(None);
        }

        // 5. Swap.
        state.population.replace_all(next, next_fitness);
        state.generation += 1;

        // 6. History.
        if options.get_history() {
            state.history.record(min, mean, max);
        }

        Ok(StepOutcome::Completed)
    }

    /// The top `k` chromosomes by fitness rank; with `unique` set,
    /// fingerprint duplicates are skipped.
    pub fn fittest(&self, k: usize, unique: bool) -> Result<Vec<Chromosome>> {
        let state = self
            .state
            .as_ref()
            .ok_or(GeneticError::NotInitialized("fittest"))?;
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::with_capacity(k.min(state.population.len()));
        for index in state.population.ranked() {
            if result.len() == k {
                break;
            }
            let chromosome = state.population.chromosome(index);
            if unique && !seen.insert(chromosome.fingerprint()) {
                continue;
            }
            result.push(chromosome.clone());
        }
        Ok(result)
    }

    /// Decoded per-position view of a chromosome; holes surface as `None`.
    pub fn as_array(&self, chromosome: &Chromosome) -> Result<Vec<Option<GeneValue>>> {
        Ok(self.genome()?.decode(chromosome))
    }

    /// Decoded view of the defined genes only.
    pub fn as_array_def_only(&self, chromosome: &Chromosome) -> Result<Vec<GeneValue>> {
        Ok(self.genome()?.decode_defined(chromosome))
    }

    /// Gene tokens joined with `___`; holes render as a single space.
    pub fn as_string(&self, chromosome: &Chromosome) -> Result<String> {
        Ok(self.genome()?.as_string(chromosome))
    }

    /// Gene tokens of the defined genes joined with `___`.
    pub fn as_string_def_only(&self, chromosome: &Chromosome) -> Result<String> {
        Ok(self.genome()?.as_string_defined(chromosome))
    }

    /// The fitness of a chromosome, computed through the cache-aware
    /// evaluator.
    pub fn as_value(&mut self, chromosome: &Chromosome) -> Result<f64> {
        if self.state.is_none() {
            return Err(GeneticError::NotInitialized("as_value"));
        }
        self.evaluator.score_one(chromosome)
    }

    /// Per-generation fitness history; empty unless the `history` option is
    /// enabled.
    pub fn history(&self) -> Result<&History> {
        Ok(&self
            .state
            .as_ref()
            .ok_or(GeneticError::NotInitialized("history"))?
            .history)
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.generation)
    }

    /// The current population.
    pub fn population(&self) -> Result<&Population> {
        Ok(&self
            .state
            .as_ref()
            .ok_or(GeneticError::NotInitialized("population"))?
            .population)
    }

    /// The genome built at `init`.
    pub fn genome(&self) -> Result<&Genome> {
        Ok(&self
            .state
            .as_ref()
            .ok_or(GeneticError::NotInitialized("genome"))?
            .genome)
    }

    /// Number of times the fitness challenge has actually been invoked.
    pub fn evaluations(&self) -> u64 {
        self.evaluator.evaluations()
    }

    /// Serializes the engine state to a file.
    ///
    /// The dump contains the options, genome, population, fitness column,
    /// history, generation counter, and RNG state; callbacks are excluded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let state = self
            .state
            .as_ref()
            .ok_or(GeneticError::NotInitialized("save"))?;
        let snapshot = EngineSnapshot {
            options: self.options.clone(),
            rng: self.rng.clone(),
            state: state.clone(),
        };
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &snapshot)?;
        Ok(())
    }

    /// Restores an engine from a file written by [`GeneticEngine::save`],
    /// re-attaching the given fitness challenge. A loaded engine evolves
    /// identically to the saved one under the same challenge.
    pub fn load<P: AsRef<Path>>(path: P, challenge: C) -> Result<Self> {
        let file = File::open(path)?;
        let snapshot: EngineSnapshot = serde_json::from_reader(BufReader::new(file))?;
        snapshot.options.validate()?;
        let evaluator = FitnessEvaluator::new(
            challenge,
            snapshot.options.get_cache(),
            snapshot.options.get_strict(),
            snapshot.options.get_threads(),
        )?;
        Ok(Self {
            options: snapshot.options,
            evaluator,
            terminate: None,
            rng: snapshot.rng,
            state: Some(snapshot.state),
        })
    }
}
