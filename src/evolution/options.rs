//! # GeneticOptions
//!
//! The `GeneticOptions` struct represents the configuration of an evolution
//! run: population size, genetic operator probabilities, parent count,
//! selection scheme, crossover strategy, elitism, caching, history,
//! variable-length level, worker threads, strict mode, and logging level.
//!
//! ## Example
//!
//! ```rust
//! use evogen::evolution::options::GeneticOptions;
//! use evogen::selection::SelectionScheme;
//! use evogen::crossover::CrossoverStrategy;
//!
//! let options = GeneticOptions::builder()
//!     .population(500)
//!     .crossover_probability(0.9)
//!     .mutation_probability(0.01)
//!     .selection(SelectionScheme::Roulette)
//!     .strategy(CrossoverStrategy::Points(2))
//!     .preserve(5)
//!     .cache(true)
//!     .history(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.get_population(), 500);
//! ```

use serde::{Deserialize, Serialize};

use crate::chromosome::VariableLength;
use crate::crossover::CrossoverStrategy;
use crate::error::{GeneticError, Result};
use crate::selection::SelectionScheme;

/// Logging level for per-generation progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    /// One progress event per generation.
    Info,
    /// Per-chromosome detail every generation.
    Debug,
    /// No progress events.
    #[default]
    None,
}

/// Configuration of an evolution run.
///
/// Build instances through [`GeneticOptions::builder`]; `build` validates
/// every field, and the engine validates again at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticOptions {
    population: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    parents: usize,
    selection: SelectionScheme,
    strategy: CrossoverStrategy,
    cache: bool,
    history: bool,
    preserve: usize,
    variable_length: VariableLength,
    threads: usize,
    strict: bool,
    log_level: LogLevel,
}

impl GeneticOptions {
    pub fn get_population(&self) -> usize {
        self.population
    }

    pub fn get_crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn get_parents(&self) -> usize {
        self.parents
    }

    pub fn get_selection(&self) -> &SelectionScheme {
        &self.selection
    }

    pub fn get_strategy(&self) -> &CrossoverStrategy {
        &self.strategy
    }

    pub fn get_cache(&self) -> bool {
        self.cache
    }

    pub fn get_history(&self) -> bool {
        self.history
    }

    pub fn get_preserve(&self) -> usize {
        self.preserve
    }

    pub fn get_variable_length(&self) -> VariableLength {
        self.variable_length
    }

    pub fn get_threads(&self) -> usize {
        self.threads
    }

    pub fn get_strict(&self) -> bool {
        self.strict
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Returns a builder for creating a `GeneticOptions` instance.
    pub fn builder() -> GeneticOptionsBuilder {
        GeneticOptionsBuilder::default()
    }

    /// Checks every field for consistency.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for a population below two, a
    /// parent count outside `2..=population`, a probability outside
    /// `[0, 1]`, `preserve` above the population size, a zero thread count,
    /// or invalid scheme/strategy parameters.
    pub fn validate(&self) -> Result<()> {
        if self.population < 2 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population
            )));
        }
        if self.parents < 2 || self.parents > self.population {
            return Err(GeneticError::Configuration(format!(
                "Parent count must be in 2..={}, got {}",
                self.population, self.parents
            )));
        }
        for (name, p) in [
            ("crossover", self.crossover_probability),
            ("mutation", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GeneticError::Configuration(format!(
                    "The {} probability must be in [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.preserve > self.population {
            return Err(GeneticError::Configuration(format!(
                "Cannot preserve {} chromosomes out of a population of {}",
                self.preserve, self.population
            )));
        }
        if self.threads == 0 {
            return Err(GeneticError::Configuration(
                "Thread count must be at least 1".to_string(),
            ));
        }
        self.selection.validate()?;
        self.strategy.validate()?;
        Ok(())
    }
}

/// Builder for [`GeneticOptions`].
///
/// Provides a fluent interface; only the population size is required.
#[derive(Debug, Clone, Default)]
pub struct GeneticOptionsBuilder {
    population: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    parents: Option<usize>,
    selection: Option<SelectionScheme>,
    strategy: Option<CrossoverStrategy>,
    cache: Option<bool>,
    history: Option<bool>,
    preserve: Option<usize>,
    variable_length: Option<VariableLength>,
    threads: Option<usize>,
    strict: Option<bool>,
    log_level: Option<LogLevel>,
}

impl GeneticOptionsBuilder {
    /// Sets the population size (required, at least 2).
    pub fn population(mut self, value: usize) -> Self {
        self.population = Some(value);
        self
    }

    /// Sets the per-child crossover probability.
    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    /// Sets the number of parents selected per child.
    pub fn parents(mut self, value: usize) -> Self {
        self.parents = Some(value);
        self
    }

    /// Sets the selection scheme.
    pub fn selection(mut self, value: SelectionScheme) -> Self {
        self.selection = Some(value);
        self
    }

    /// Sets the crossover strategy.
    pub fn strategy(mut self, value: CrossoverStrategy) -> Self {
        self.strategy = Some(value);
        self
    }

    /// Enables or disables the cross-generation fitness cache.
    pub fn cache(mut self, value: bool) -> Self {
        self.cache = Some(value);
        self
    }

    /// Enables or disables per-generation history recording.
    pub fn history(mut self, value: bool) -> Self {
        self.history = Some(value);
        self
    }

    /// Sets the number of top chromosomes preserved verbatim per generation.
    pub fn preserve(mut self, value: usize) -> Self {
        self.preserve = Some(value);
        self
    }

    /// Sets the variable-length level.
    pub fn variable_length(mut self, value: VariableLength) -> Self {
        self.variable_length = Some(value);
        self
    }

    /// Sets the fitness worker thread count; 1 keeps evaluation on the
    /// driver thread.
    pub fn threads(mut self, value: usize) -> Self {
        self.threads = Some(value);
        self
    }

    /// Enables or disables the strict fitness-callback guard.
    pub fn strict(mut self, value: bool) -> Self {
        self.strict = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds and validates the `GeneticOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` when the population size is
    /// missing or any field fails validation.
    pub fn build(self) -> Result<GeneticOptions> {
        let Some(population) = self.population else {
            return Err(GeneticError::Configuration(
                "Population size is required".to_string(),
            ));
        };
        let options = GeneticOptions {
            population,
            crossover_probability: self.crossover_probability.unwrap_or(0.9),
            mutation_probability: self.mutation_probability.unwrap_or(0.01),
            parents: self.parents.unwrap_or(2),
            selection: self.selection.unwrap_or(SelectionScheme::RouletteBasic),
            strategy: self.strategy.unwrap_or(CrossoverStrategy::Points(2)),
            cache: self.cache.unwrap_or(false),
            history: self.history.unwrap_or(false),
            preserve: self.preserve.unwrap_or(0),
            variable_length: self.variable_length.unwrap_or_default(),
            threads: self.threads.unwrap_or(1),
            strict: self.strict.unwrap_or(false),
            log_level: self.log_level.unwrap_or_default(),
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = GeneticOptions::builder().population(10).build().unwrap();

        assert_eq!(options.get_population(), 10);
        assert_eq!(options.get_parents(), 2);
        assert_eq!(options.get_preserve(), 0);
        assert_eq!(options.get_threads(), 1);
        assert!(!options.get_cache());
        assert!(!options.get_history());
        assert!(!options.get_strict());
        assert_eq!(options.get_variable_length(), VariableLength::Fixed);
        assert_eq!(options.get_log_level(), LogLevel::None);
    }

    #[test]
    fn test_population_is_required() {
        let result = GeneticOptions::builder().build();
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_preserve_cannot_exceed_population() {
        let result = GeneticOptions::builder()
            .population(10)
            .preserve(11)
            .build();
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_parent_count_bounds() {
        assert!(GeneticOptions::builder()
            .population(10)
            .parents(1)
            .build()
            .is_err());
        assert!(GeneticOptions::builder()
            .population(10)
            .parents(11)
            .build()
            .is_err());
        assert!(GeneticOptions::builder()
            .population(10)
            .parents(4)
            .build()
            .is_ok());
    }

    #[test]
    fn test_probability_bounds() {
        assert!(GeneticOptions::builder()
            .population(10)
            .crossover_probability(1.5)
            .build()
            .is_err());
        assert!(GeneticOptions::builder()
            .population(10)
            .mutation_probability(-0.1)
            .build()
            .is_err());
    }

    #[test]
    fn test_invalid_strategy_parameters_are_rejected() {
        let result = GeneticOptions::builder()
            .population(10)
            .strategy(CrossoverStrategy::Points(0))
            .build();
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}
