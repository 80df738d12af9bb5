//! Short distance exploration (S): a single-point, coordinate-wise shrinking
//! local search used as a stand-alone optimiser.

use tracing::debug;

use crate::boundary::random_solution;
use crate::error::{OptimizationError, Result};
use crate::local_search::ShortDistanceSearch;
use crate::problem::Problem;
use crate::rng::RandomSource;

use super::{validate_run, Algorithm, Evaluator, RunResult, Solution};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortDistanceExploration {
    alpha: f64,
}

impl ShortDistanceExploration {
    /// Creates the optimiser with exploratory radius `alpha * (high - low)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `alpha` is not a positive finite number.
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Alpha must be positive, got {}",
                alpha
            )));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Algorithm for ShortDistanceExploration {
    fn name(&self) -> &str {
        "S"
    }

    fn execute(
        &self,
        problem: &dyn Problem,
        max_evaluations: usize,
        initial: Option<&Solution>,
        rng: &mut dyn RandomSource,
    ) -> Result<RunResult> {
        validate_run(problem, max_evaluations, initial)?;
        debug!(
            algorithm = self.name(),
            problem = problem.name(),
            max_evaluations,
            "starting run"
        );

        let mut evaluator = Evaluator::new(problem, max_evaluations);
        let mut best = match initial {
            Some(solution) => solution.clone(),
            None => {
                let x = random_solution(problem.bounds(), problem.dimension(), rng);
                let fitness = evaluator.evaluate(&x).unwrap_or(f64::NAN);
                evaluator.record(fitness);
                Solution::new(x, fitness)
            }
        };

        let mut search = ShortDistanceSearch::new(self.alpha, problem.bounds(), problem.dimension())?;
        let mut sweeps = 0usize;
        while !evaluator.is_exhausted() {
            search.sweep(&mut best, &mut evaluator);
            sweeps += 1;
        }

        debug!(
            algorithm = self.name(),
            problem = problem.name(),
            evaluations = evaluator.evaluations(),
            sweeps,
            best = best.fitness,
            "run finished"
        );
        Ok(evaluator.finish(best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Benchmark, BenchmarkFunction};
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_new_validates_alpha() {
        assert!(ShortDistanceExploration::new(0.0).is_err());
        assert!(ShortDistanceExploration::new(f64::INFINITY).is_err());
        assert_eq!(ShortDistanceExploration::new(0.4).unwrap().alpha(), 0.4);
    }

    #[test]
    fn test_uses_whole_budget() {
        let problem = Benchmark::new(BenchmarkFunction::Rosenbrock, 4);
        let s = ShortDistanceExploration::new(0.4).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let result = s.execute(&problem, 777, None, &mut rng).unwrap();
        assert_eq!(result.trend.total_evaluations(), 777);
        assert_eq!(result.trend.first().map(|t| t.evaluations), Some(1));
    }

    #[test]
    fn test_starts_from_initial_solution() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 2);
        let s = ShortDistanceExploration::new(0.4).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let initial = Solution::new(vec![0.0, 0.0], 0.0);
        let result = s.execute(&problem, 200, Some(&initial), &mut rng).unwrap();
        // already at the optimum: nothing strictly better exists
        assert_eq!(result.best.fitness, 0.0);
        let counts: Vec<usize> = result.trend.iter().map(|t| t.evaluations).collect();
        assert_eq!(counts, vec![100, 200]);
    }

    #[test]
    fn test_improves_on_sphere() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 3);
        let s = ShortDistanceExploration::new(0.4).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(12);
        let result = s.execute(&problem, 2000, None, &mut rng).unwrap();
        let first = result.trend.first().map(|t| t.fitness).unwrap();
        assert!(result.best.fitness <= first);
        assert!(result.best.fitness < 1e-3);
    }
}
