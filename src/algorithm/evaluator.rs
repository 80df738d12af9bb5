//! Evaluation budget accounting and trend sampling shared by every optimiser.

use tracing::warn;

use crate::problem::{Bounds, Problem};
use crate::trend::ConvergenceTrend;

use super::{RunResult, Solution};

/// A trend sample is taken whenever the evaluation count is a multiple of this.
pub const TREND_INTERVAL: usize = 100;

/// Counts evaluations of a problem against a budget and owns the run's trend.
///
/// Once the budget is spent [`Evaluator::evaluate`] refuses to evaluate, so an
/// optimiser can never overrun it.
#[derive(Debug)]
pub struct Evaluator<'a> {
    problem: &'a dyn Problem,
    max_evaluations: usize,
    evaluations: usize,
    last_sampled: Option<usize>,
    trend: ConvergenceTrend,
}

impl<'a> Evaluator<'a> {
    pub fn new(problem: &'a dyn Problem, max_evaluations: usize) -> Self {
        Self {
            problem,
            max_evaluations,
            evaluations: 0,
            last_sampled: None,
            trend: ConvergenceTrend::new(),
        }
    }

    pub fn bounds(&self) -> &'a Bounds {
        self.problem.bounds()
    }

    pub fn dimension(&self) -> usize {
        self.problem.dimension()
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn remaining(&self) -> usize {
        self.max_evaluations.saturating_sub(self.evaluations)
    }

    pub fn is_exhausted(&self) -> bool {
        self.evaluations >= self.max_evaluations
    }

    /// Evaluates `x`, or returns `None` if the budget is already spent.
    pub fn evaluate(&mut self, x: &[f64]) -> Option<f64> {
        if self.is_exhausted() {
            return None;
        }
        self.evaluations += 1;
        let fitness = self.problem.evaluate(x);
        if fitness.is_nan() {
            warn!(
                problem = self.problem.name(),
                evaluation = self.evaluations,
                "evaluation returned NaN"
            );
        }
        Some(fitness)
    }

    /// Samples the trend if the evaluation count sits on a
    /// [`TREND_INTERVAL`] boundary that has not been sampled yet.
    pub fn sample(&mut self, best_fitness: f64) {
        if self.evaluations > 0
            && self.evaluations % TREND_INTERVAL == 0
            && self.last_sampled != Some(self.evaluations)
        {
            self.record(best_fitness);
        }
    }

    /// Samples the trend at the current evaluation count unconditionally.
    pub fn record(&mut self, best_fitness: f64) {
        self.trend.record(self.evaluations, best_fitness);
        self.last_sampled = Some(self.evaluations);
    }

    /// Closes the run with a final sample and hands over the trend.
    pub fn finish(mut self, best: Solution) -> RunResult {
        self.record(best.fitness);
        RunResult {
            trend: self.trend,
            best,
        }
    }
}
