//! # Problem
//!
//! The `Problem` trait describes an objective function over a fixed-dimension
//! real vector with declared bounds. Optimisers minimise it.
//!
//! Problems are immutable once built and are shared read-only across every run
//! of every algorithm in an experiment, which is why the trait requires
//! `Send + Sync`.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::problem::{Benchmark, BenchmarkFunction, Problem};
//!
//! let sphere = Benchmark::new(BenchmarkFunction::Sphere, 2);
//! assert_eq!(sphere.evaluate(&[1.0, 2.0]), 5.0);
//!
//! // A vector of the wrong length yields NaN instead of panicking.
//! assert!(sphere.evaluate(&[1.0]).is_nan());
//! ```

pub mod functions;

use std::fmt::Debug;

use tracing::warn;

use crate::error::{OptimizationError, Result};

pub use functions::{Benchmark, BenchmarkFunction, FnProblem};

/// Search space bounds.
///
/// Either a single `(low, high)` interval shared by every dimension or one
/// interval per dimension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bounds {
    Uniform { low: f64, high: f64 },
    PerDimension(Vec<(f64, f64)>),
}

impl Bounds {
    pub fn uniform(low: f64, high: f64) -> Self {
        Bounds::Uniform { low, high }
    }

    pub fn per_dimension(intervals: Vec<(f64, f64)>) -> Self {
        Bounds::PerDimension(intervals)
    }

    /// Returns the `(low, high)` interval of dimension `i`.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are per-dimension and `i` is out of range.
    pub fn interval(&self, i: usize) -> (f64, f64) {
        match self {
            Bounds::Uniform { low, high } => (*low, *high),
            Bounds::PerDimension(intervals) => intervals[i],
        }
    }

    /// Returns the interval of dimension `i`, or `None` if per-dimension
    /// bounds declare fewer than `i + 1` intervals.
    pub fn get(&self, i: usize) -> Option<(f64, f64)> {
        match self {
            Bounds::Uniform { low, high } => Some((*low, *high)),
            Bounds::PerDimension(intervals) => intervals.get(i).copied(),
        }
    }

    /// Returns `high - low` for dimension `i`.
    pub fn width(&self, i: usize) -> f64 {
        let (low, high) = self.interval(i);
        high - low
    }

    /// Checks that the bounds can describe a `dimension`-dimensional box.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::InvalidBounds` if a per-dimension list has
    /// the wrong length, or if any interval is empty or not finite.
    pub fn validate(&self, dimension: usize) -> Result<()> {
        let check = |index: usize, low: f64, high: f64| -> Result<()> {
            if !low.is_finite() || !high.is_finite() || low >= high {
                return Err(OptimizationError::InvalidBounds(format!(
                    "interval {} is [{}, {}], expected finite low < high",
                    index, low, high
                )));
            }
            Ok(())
        };

        match self {
            Bounds::Uniform { low, high } => check(0, *low, *high),
            Bounds::PerDimension(intervals) => {
                if intervals.len() != dimension {
                    return Err(OptimizationError::InvalidBounds(format!(
                        "{} intervals declared for a {}-dimensional problem",
                        intervals.len(),
                        dimension
                    )));
                }
                intervals
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, &(low, high))| check(i, low, high))
            }
        }
    }
}

/// An objective function to be minimised.
pub trait Problem: Debug + Send + Sync {
    /// A short identifier used in reports and artifact names.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn bounds(&self) -> &Bounds;

    /// The raw objective. Only called with vectors of length `dimension()`.
    fn fitness(&self, x: &[f64]) -> f64;

    /// Evaluates `x`, returning `f64::NAN` if its length does not match the
    /// problem dimension.
    ///
    /// The mismatch is logged rather than raised so that a run can carry on;
    /// the optimisers treat NaN as worse than any other fitness.
    fn evaluate(&self, x: &[f64]) -> f64 {
        if x.len() != self.dimension() {
            warn!(
                problem = self.name(),
                expected = self.dimension(),
                got = x.len(),
                "design variable does not match the problem dimension"
            );
            return f64::NAN;
        }
        self.fitness(x)
    }
}
