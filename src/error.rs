//! # Error Types
//!
//! This module defines the error type shared by the optimisers, the
//! experiment harness and the result persistence layer.
//!
//! Evaluating a problem with a vector of the wrong length is deliberately
//! *not* represented here: the evaluation yields `f64::NAN` and the anomaly is
//! logged, so a run is never aborted by a single bad evaluation.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use sosbench::error::{OptimizationError, Result};
//!
//! fn check_budget(budget: usize) -> Result<()> {
//!     if budget == 0 {
//!         return Err(OptimizationError::Configuration(
//!             "Budget must be positive".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_budget(0).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use sosbench::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_trend(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open trend file")?;
//!     Ok(())
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::algorithm::ParameterSlot;

/// Represents errors that can occur while configuring or running optimisers
/// and experiments.
#[derive(Error, Debug)]
pub enum OptimizationError {
    /// A parameter or option holds an invalid value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A parameter required by the algorithm was never configured.
    #[error("Missing parameter: {algorithm} requires `{slot}`")]
    MissingParameter {
        algorithm: String,
        slot: ParameterSlot,
    },

    /// A parameter was configured on an algorithm that does not use it.
    #[error("Unsupported parameter: {algorithm} has no `{slot}` slot")]
    UnsupportedParameter {
        algorithm: String,
        slot: ParameterSlot,
    },

    /// A parameter name could not be parsed.
    #[error("Unknown parameter name: {0}")]
    UnknownParameter(String),

    /// The declared bounds of a problem are unusable.
    #[error("Bounds error: {0}")]
    InvalidBounds(String),

    /// A supplied solution does not match the problem dimension.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The experiment has nothing to run.
    #[error("Empty experiment: {0}")]
    EmptyExperiment(String),

    /// Statistics were requested over an empty sample.
    #[error("Empty sample: cannot compute statistics over zero runs")]
    EmptySample,

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for optimisation operations.
pub type Result<T> = std::result::Result<T, OptimizationError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use sosbench::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> sosbench::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it to an `OptimizationError`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| OptimizationError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
///
/// ## Examples
///
/// ```rust
/// use sosbench::error::{OptimizationError, OptionExt};
///
/// fn best_of(values: &[f64]) -> sosbench::error::Result<f64> {
///     values.iter().copied().reduce(f64::min).ok_or_else_opt(||
///         OptimizationError::EmptySample
///     )
/// }
///
/// assert!(best_of(&[]).is_err());
/// ```
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError,
    {
        self.ok_or_else(err_fn)
    }
}
