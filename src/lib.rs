pub mod algorithm;
pub mod boundary;
pub mod error;
pub mod experiment;
pub mod local_search;
pub mod problem;
pub mod rng;
pub mod trend;

// Re-export commonly used types for convenience
pub use algorithm::{Algorithm, AlgorithmConfig, Optimizer, RunResult, Solution};
pub use error::{OptimizationError, OptionExt, Result, ResultExt};
pub use experiment::{Experiment, ExperimentOptions, ExperimentReport};
pub use problem::{Bounds, Problem};
pub use trend::ConvergenceTrend;
