//! Closed-form benchmark functions and a closure-backed problem.

use std::f64::consts::{E, PI};
use std::fmt;

use super::{Bounds, Problem};

/// The built-in test functions. All have their global minimum at or near 0
/// except Schwefel (0 at `x_i = 420.9687`) and Michalewicz (negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BenchmarkFunction {
    Ackley,
    Alpine,
    Rosenbrock,
    Sphere,
    Schwefel,
    Rastrigin,
    Michalewicz,
}

impl BenchmarkFunction {
    /// The conventional hyper-cube for this function.
    pub fn default_bounds(&self) -> Bounds {
        match self {
            BenchmarkFunction::Ackley => Bounds::uniform(-1.0, 1.0),
            BenchmarkFunction::Alpine => Bounds::uniform(-10.0, 10.0),
            BenchmarkFunction::Rosenbrock => Bounds::uniform(-100.0, 100.0),
            BenchmarkFunction::Sphere => Bounds::uniform(-5.12, 5.12),
            BenchmarkFunction::Schwefel => Bounds::uniform(-500.0, 500.0),
            BenchmarkFunction::Rastrigin => Bounds::uniform(-5.12, 5.12),
            BenchmarkFunction::Michalewicz => Bounds::uniform(0.0, PI),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BenchmarkFunction::Ackley => "Ackley",
            BenchmarkFunction::Alpine => "Alpine",
            BenchmarkFunction::Rosenbrock => "Rosenbrock",
            BenchmarkFunction::Sphere => "Sphere",
            BenchmarkFunction::Schwefel => "Schwefel",
            BenchmarkFunction::Rastrigin => "Rastrigin",
            BenchmarkFunction::Michalewicz => "Michalewicz",
        }
    }

    fn value(&self, x: &[f64]) -> f64 {
        let n = x.len() as f64;
        match self {
            BenchmarkFunction::Ackley => {
                let (a, b, c) = (20.0, 0.2, 2.0 * PI);
                let square_sum: f64 = x.iter().map(|v| v * v).sum();
                let cos_sum: f64 = x.iter().map(|v| (c * v).cos()).sum();
                -a * (-b * (square_sum / n).sqrt()).exp() - (cos_sum / n).exp() + a + E
            }
            BenchmarkFunction::Alpine => x.iter().map(|v| (v * v.sin() + 0.1 * v).abs()).sum(),
            BenchmarkFunction::Rosenbrock => x
                .windows(2)
                .map(|w| (1.0 - w[0]).powi(2) + 100.0 * (w[1] - w[0] * w[0]).powi(2))
                .sum(),
            BenchmarkFunction::Sphere => x.iter().map(|v| v * v).sum(),
            BenchmarkFunction::Schwefel => {
                let sum: f64 = x.iter().map(|v| v * v.abs().sqrt().sin()).sum();
                418.9829 * n - sum
            }
            BenchmarkFunction::Rastrigin => {
                let sum: f64 = x
                    .iter()
                    .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
                    .sum();
                10.0 * n + sum
            }
            BenchmarkFunction::Michalewicz => {
                let m = 10;
                -x.iter()
                    .enumerate()
                    .map(|(i, v)| v.sin() * ((i as f64 + 1.0) * v * v / PI).sin().powi(2 * m))
                    .sum::<f64>()
            }
        }
    }
}

/// A benchmark function bound to a dimension and a search space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Benchmark {
    function: BenchmarkFunction,
    dimension: usize,
    bounds: Bounds,
}

impl Benchmark {
    /// Creates the benchmark over its conventional hyper-cube.
    pub fn new(function: BenchmarkFunction, dimension: usize) -> Self {
        Self {
            function,
            dimension,
            bounds: function.default_bounds(),
        }
    }

    pub fn with_bounds(function: BenchmarkFunction, dimension: usize, bounds: Bounds) -> Self {
        Self {
            function,
            dimension,
            bounds,
        }
    }

    pub fn function(&self) -> BenchmarkFunction {
        self.function
    }
}

impl Problem for Benchmark {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn fitness(&self, x: &[f64]) -> f64 {
        self.function.value(x)
    }
}

/// A problem backed by an arbitrary closure.
///
/// ```rust
/// use sosbench::problem::{Bounds, FnProblem, Problem};
///
/// let shifted = FnProblem::new("shifted", 2, Bounds::uniform(-1.0, 1.0), |x: &[f64]| {
///     x.iter().map(|v| (v - 0.5).powi(2)).sum()
/// });
/// assert_eq!(shifted.evaluate(&[0.5, 0.5]), 0.0);
/// ```
pub struct FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    name: String,
    dimension: usize,
    bounds: Bounds,
    objective: F,
}

impl<F> FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, dimension: usize, bounds: Bounds, objective: F) -> Self {
        Self {
            name: name.into(),
            dimension,
            bounds,
            objective,
        }
    }
}

impl<F> fmt::Debug for FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProblem")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn fitness(&self, x: &[f64]) -> f64 {
        (self.objective)(x)
    }
}
