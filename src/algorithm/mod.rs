//! # Algorithm
//!
//! The `Algorithm` trait is the seam every optimiser plugs into. A run receives
//! the problem, its evaluation budget, an optional starting solution and the
//! random source explicitly, and returns its convergence trend together with
//! the best solution found. Nothing about a run is kept on the algorithm
//! value itself, so one instance can be executed any number of times.
//!
//! Three optimisers are provided:
//!
//! - [`DifferentialEvolution`]: classic DE/rand/1/bin.
//! - [`SelfAdaptiveDe`]: jDE-style self-adaptive DE with an embedded
//!   short-distance local search (jDES).
//! - [`ShortDistanceExploration`]: coordinate-wise shrinking local search (S).
//!
//! [`Optimizer`] is the closed set of these, and [`AlgorithmConfig`] builds one
//! from named parameter slots with validation.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::algorithm::{Algorithm, AlgorithmConfig, AlgorithmKind, ParameterSlot};
//! use sosbench::problem::{Benchmark, BenchmarkFunction};
//! use sosbench::rng::RandomNumberGenerator;
//!
//! let de = AlgorithmConfig::new(AlgorithmKind::DifferentialEvolution)
//!     .with(ParameterSlot::PopulationSize, 20.0)?
//!     .with(ParameterSlot::ScalingFactor, 0.5)?
//!     .with(ParameterSlot::CrossoverRate, 0.8)?
//!     .build()?;
//!
//! let problem = Benchmark::new(BenchmarkFunction::Sphere, 2);
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let result = de.execute(&problem, 1000, None, &mut rng)?;
//! assert!(result.trend.total_evaluations() <= 1000);
//! # Ok::<(), sosbench::error::OptimizationError>(())
//! ```

pub mod config;
pub mod de;
pub mod evaluator;
pub mod jdes;
pub mod operators;
pub mod short;

use std::fmt::Debug;

use crate::error::{OptimizationError, Result};
use crate::problem::Problem;
use crate::rng::RandomSource;
use crate::trend::ConvergenceTrend;

pub use config::{AlgorithmConfig, AlgorithmKind, ParameterSlot};
pub use de::{DifferentialEvolution, Population};
pub use evaluator::{Evaluator, TREND_INTERVAL};
pub use jdes::SelfAdaptiveDe;
pub use operators::{binomial_crossover, is_better, is_not_worse, rand_one_mutation};
pub use short::ShortDistanceExploration;

/// A point in the search space together with its fitness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub x: Vec<f64>,
    pub fitness: f64,
}

impl Solution {
    pub fn new(x: Vec<f64>, fitness: f64) -> Self {
        Self { x, fitness }
    }
}

/// The outcome of a single run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    pub trend: ConvergenceTrend,
    pub best: Solution,
}

/// A stochastic search procedure over a [`Problem`].
pub trait Algorithm: Debug + Send + Sync {
    /// A short identifier used in reports and artifact names.
    fn name(&self) -> &str;

    /// Minimises `problem` using at most `max_evaluations` evaluations.
    ///
    /// If `initial` is given the run starts from it instead of a random
    /// initialisation; its fitness is trusted and costs no evaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem bounds are invalid, if `initial` has the
    /// wrong dimension, or if the budget is zero and no initial solution was
    /// given. Running out of budget is the normal way for a run to end and is
    /// never an error.
    fn execute(
        &self,
        problem: &dyn Problem,
        max_evaluations: usize,
        initial: Option<&Solution>,
        rng: &mut dyn RandomSource,
    ) -> Result<RunResult>;
}

/// The optimisers shipped with the crate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Optimizer {
    DifferentialEvolution(DifferentialEvolution),
    SelfAdaptiveDe(SelfAdaptiveDe),
    ShortDistanceExploration(ShortDistanceExploration),
}

impl Optimizer {
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Optimizer::DifferentialEvolution(_) => AlgorithmKind::DifferentialEvolution,
            Optimizer::SelfAdaptiveDe(_) => AlgorithmKind::SelfAdaptiveDe,
            Optimizer::ShortDistanceExploration(_) => AlgorithmKind::ShortDistanceExploration,
        }
    }
}

impl Algorithm for Optimizer {
    fn name(&self) -> &str {
        match self {
            Optimizer::DifferentialEvolution(a) => a.name(),
            Optimizer::SelfAdaptiveDe(a) => a.name(),
            Optimizer::ShortDistanceExploration(a) => a.name(),
        }
    }

    fn execute(
        &self,
        problem: &dyn Problem,
        max_evaluations: usize,
        initial: Option<&Solution>,
        rng: &mut dyn RandomSource,
    ) -> Result<RunResult> {
        match self {
            Optimizer::DifferentialEvolution(a) => a.execute(problem, max_evaluations, initial, rng),
            Optimizer::SelfAdaptiveDe(a) => a.execute(problem, max_evaluations, initial, rng),
            Optimizer::ShortDistanceExploration(a) => {
                a.execute(problem, max_evaluations, initial, rng)
            }
        }
    }
}

impl From<DifferentialEvolution> for Optimizer {
    fn from(algorithm: DifferentialEvolution) -> Self {
        Optimizer::DifferentialEvolution(algorithm)
    }
}

impl From<SelfAdaptiveDe> for Optimizer {
    fn from(algorithm: SelfAdaptiveDe) -> Self {
        Optimizer::SelfAdaptiveDe(algorithm)
    }
}

impl From<ShortDistanceExploration> for Optimizer {
    fn from(algorithm: ShortDistanceExploration) -> Self {
        Optimizer::ShortDistanceExploration(algorithm)
    }
}

/// Checks the preconditions shared by every run.
pub(crate) fn validate_run(
    problem: &dyn Problem,
    max_evaluations: usize,
    initial: Option<&Solution>,
) -> Result<()> {
    if problem.dimension() == 0 {
        return Err(OptimizationError::Configuration(format!(
            "Problem {} has dimension zero",
            problem.name()
        )));
    }

    problem.bounds().validate(problem.dimension())?;

    match initial {
        Some(solution) if solution.x.len() != problem.dimension() => {
            Err(OptimizationError::DimensionMismatch {
                expected: problem.dimension(),
                got: solution.x.len(),
            })
        }
        None if max_evaluations == 0 => Err(OptimizationError::Configuration(
            "Budget must allow at least one evaluation when no initial solution is given"
                .to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Benchmark, BenchmarkFunction, Bounds};
    use crate::rng::RandomNumberGenerator;

    fn optimizers() -> Vec<Optimizer> {
        vec![
            DifferentialEvolution::new(10, 0.5, 0.8).unwrap().into(),
            SelfAdaptiveDe::new(10, 0.1, 1.0, 0.1, 0.1, 0.4, 5).unwrap().into(),
            ShortDistanceExploration::new(0.4).unwrap().into(),
        ]
    }

    #[test]
    fn test_zero_budget_without_initial_is_rejected() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 2);
        let mut rng = RandomNumberGenerator::from_seed(0);
        for optimizer in optimizers() {
            let result = optimizer.execute(&problem, 0, None, &mut rng);
            assert!(matches!(result, Err(OptimizationError::Configuration(_))));
        }
    }

    #[test]
    fn test_zero_budget_with_initial_returns_it() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 2);
        let initial = Solution::new(vec![1.0, 1.0], 2.0);
        let mut rng = RandomNumberGenerator::from_seed(0);
        for optimizer in optimizers() {
            let result = optimizer.execute(&problem, 0, Some(&initial), &mut rng).unwrap();
            assert_eq!(result.best, initial);
            assert_eq!(result.trend.total_evaluations(), 0);
        }
    }

    #[test]
    fn test_initial_dimension_mismatch_is_rejected() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 3);
        let initial = Solution::new(vec![1.0], 1.0);
        let mut rng = RandomNumberGenerator::from_seed(0);
        for optimizer in optimizers() {
            let result = optimizer.execute(&problem, 100, Some(&initial), &mut rng);
            assert!(matches!(
                result,
                Err(OptimizationError::DimensionMismatch {
                    expected: 3,
                    got: 1
                })
            ));
        }
    }

    #[test]
    fn test_invalid_bounds_are_rejected() {
        let problem = Benchmark::with_bounds(
            BenchmarkFunction::Sphere,
            2,
            Bounds::per_dimension(vec![(0.0, 1.0)]),
        );
        let mut rng = RandomNumberGenerator::from_seed(0);
        for optimizer in optimizers() {
            let result = optimizer.execute(&problem, 100, None, &mut rng);
            assert!(matches!(result, Err(OptimizationError::InvalidBounds(_))));
        }
    }

    #[test]
    fn test_names_and_kinds() {
        let names: Vec<String> = optimizers().iter().map(|o| o.name().to_string()).collect();
        assert_eq!(names, vec!["DE", "jDES", "S"]);
        let kinds: Vec<AlgorithmKind> = optimizers().iter().map(Optimizer::kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlgorithmKind::DifferentialEvolution,
                AlgorithmKind::SelfAdaptiveDe,
                AlgorithmKind::ShortDistanceExploration
            ]
        );
    }
}
