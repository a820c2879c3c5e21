pub mod engine;
pub mod history;
pub mod options;

pub use engine::{GenerationStats, GeneticEngine, TerminateFn};
pub use history::History;
pub use options::{GeneticOptions, GeneticOptionsBuilder, LogLevel};
