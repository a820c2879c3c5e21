//! # Error Types
//!
//! This module defines custom error types for the genetic algorithm engine.
//! It provides specific error variants for the different failure scenarios
//! that may occur during configuration, initialization, and evolution.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evogen::error::{GeneticError, Result};
//!
//! fn some_function() -> Result<()> {
//!     // Function implementation
//!     Ok(())
//! }
//!
//! fn caller() {
//!     match some_function() {
//!         Ok(_) => println!("Success!"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur in the genetic algorithm engine.
///
/// This enum provides specific error variants for different failure scenarios
/// that may occur during configuration and the evolution process.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid or inconsistent configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an injected or encoded chromosome violates the
    /// invariants of its gene type.
    #[error("Invalid chromosome: {0}")]
    InvalidChromosome(String),

    /// Error that occurs when a selection operation fails.
    #[error("Selection error: {0}")]
    Selection(String),

    /// Error that occurs when a crossover operation fails.
    #[error("Crossover error: {0}")]
    Crossover(String),

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    Fitness(String),

    /// Error that occurs when strict mode detects a chromosome whose content
    /// changed across a fitness callback.
    #[error("Chromosome mutated during fitness evaluation: {0}")]
    StrictViolation(String),

    /// Error that occurs when an operation requires an initialized engine.
    #[error("Engine not initialized: call init before {0}")]
    NotInitialized(&'static str),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when engine state cannot be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for genetic algorithm operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the
/// error type fixed to `GeneticError`.
///
/// ## Examples
///
/// ```rust
/// use evogen::error::{GeneticError, Result};
///
/// fn may_fail() -> Result<i32> {
///     // Some operation that might fail
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeneticError>;
