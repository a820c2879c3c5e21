//! # EvoGen
//!
//! A fast, memory-compact genetic algorithm engine written in Rust.
//!
//! ## Overview
//!
//! EvoGen evolves large populations (tens of thousands of chromosomes) of
//! long chromosomes efficiently in both time and memory. Chromosomes are
//! stored in compact type-specialised encodings — bit genomes pack one gene
//! per bit — and the engine offers a menu of probabilistic selection
//! schemes, parametric point-based crossover, and permutation-preserving
//! operators, with optional parallel fitness evaluation and a fitness cache
//! that persists across generations.
//!
//! ## Key Features
//!
//! - **Four gene types**: bit vectors, per-position alphabets, per-position
//!   integer ranges, and permutations of a global alphabet
//! - **Compact storage**: bit-packed words and narrow index encodings keep
//!   per-gene cost near one bit or one byte
//! - **Strategy menu**: roulette and distribution-driven selection;
//!   point-based, distribution-driven, PMX, and OX crossover
//! - **Variable-length chromosomes**: right-edge or both-edge growth and
//!   shrink, with hole-prefix bookkeeping
//! - **Fitness caching**: fingerprint-keyed memoisation across generations
//! - **Parallel fitness**: a fixed-size worker pool with index-aligned
//!   results
//! - **Reproducible runs**: a seedable, serializable RNG; save and load an
//!   engine mid-run and it evolves identically
//!
//! ## Quick Start
//!
//! Maximise the number of ones in a bit chromosome:
//!
//! ```rust
//! use evogen::{Chromosome, GenomeSpec, GeneticEngine, GeneticOptions};
//!
//! let options = GeneticOptions::builder()
//!     .population(100)
//!     .crossover_probability(0.9)
//!     .mutation_probability(0.01)
//!     .preserve(2)
//!     .build()
//!     .unwrap();
//!
//! let popcount = |c: &Chromosome| {
//!     (0..c.len()).filter(|&i| c.get(i) == Some(1)).count() as f64
//! };
//!
//! let mut engine = GeneticEngine::new(options, popcount).unwrap().with_seed(42);
//! engine.init(GenomeSpec::Bit { length: 24 }).unwrap();
//! engine.evolve(30).unwrap();
//!
//! let best = engine.fittest(1, false).unwrap().remove(0);
//! assert!(engine.as_value(&best).unwrap() >= 12.0);
//! ```
//!
//! Evolve a permutation with order crossover:
//!
//! ```rust
//! use evogen::{
//!     Chromosome, CrossoverStrategy, GenomeSpec, GeneticEngine, GeneticOptions,
//!     SelectionScheme,
//! };
//!
//! let options = GeneticOptions::builder()
//!     .population(60)
//!     .selection(SelectionScheme::Roulette)
//!     .strategy(CrossoverStrategy::Ox)
//!     .preserve(2)
//!     .build()
//!     .unwrap();
//!
//! // Reward permutations that keep symbol 0 in front.
//! let fitness = |c: &Chromosome| if c.get(0) == Some(0) { 2.0 } else { 1.0 };
//!
//! let mut engine = GeneticEngine::new(options, fitness).unwrap().with_seed(7);
//! engine
//!     .init(GenomeSpec::Combination {
//!         alphabet: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
//!     })
//!     .unwrap();
//! engine.evolve(10).unwrap();
//!
//! let best = engine.fittest(1, false).unwrap().remove(0);
//! assert_eq!(best.len(), 5);
//! ```
//!
//! ## Terminating Early
//!
//! The terminate callback sees the statistics of the just-evaluated
//! generation and stops the run by returning `true`:
//!
//! ```rust
//! use evogen::{Chromosome, GenomeSpec, GeneticEngine, GeneticOptions};
//!
//! let options = GeneticOptions::builder().population(50).build().unwrap();
//! let popcount = |c: &Chromosome| {
//!     (0..c.len()).filter(|&i| c.get(i) == Some(1)).count() as f64
//! };
//!
//! let mut engine = GeneticEngine::new(options, popcount).unwrap().with_seed(1);
//! engine.init(GenomeSpec::Bit { length: 16 }).unwrap();
//! engine.set_terminate(|stats| stats.max >= 10.0);
//! engine.evolve(0).unwrap(); // unlimited, the callback decides
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns the crate-wide [`error::Result`], with
//! [`error::GeneticError`] variants for configuration problems, invalid
//! injected chromosomes, fitness failures, strict-mode violations, and
//! persistence errors.
//!
//! ## Modules
//!
//! - [`chromosome`]: compact chromosome storage and the genome codec
//! - [`crossover`]: crossover strategies
//! - [`error`]: error types and utilities
//! - [`evaluation`]: the fitness challenge seam, cache, and worker pool
//! - [`evolution`]: options, history, and the evolution driver
//! - [`mutation`]: per-gene and variable-length mutation
//! - [`population`]: the population store and fitness column
//! - [`rng`]: seedable randomness and the distribution samplers
//! - [`selection`]: parent-selection schemes

pub mod chromosome;
pub mod crossover;
pub mod error;
pub mod evaluation;
pub mod evolution;
pub mod mutation;
pub mod population;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use chromosome::{Chromosome, GeneValue, Genome, GenomeSpec, VariableLength};
pub use crossover::CrossoverStrategy;
pub use error::{GeneticError, Result};
pub use evaluation::Challenge;
pub use evolution::{
    GenerationStats, GeneticEngine, GeneticOptions, GeneticOptionsBuilder, History, LogLevel,
};
pub use population::Population;
pub use rng::{Distribution, RandomNumberGenerator};
pub use selection::SelectionScheme;
