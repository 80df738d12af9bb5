use tracing::trace;

use crate::algorithm::{is_not_worse, Evaluator, Solution};
use crate::boundary::toro;
use crate::error::{OptimizationError, Result};
use crate::problem::Bounds;

/// Coordinate-wise shrinking local search ("short distance exploration").
///
/// Keeps one exploratory radius per dimension, initialised to
/// `alpha * (high - low)`. A sweep visits every dimension in turn: it first
/// tries a full step down, then a half step up, accepting a move whenever it
/// is not worse than the incumbent. After a sweep without any acceptance all
/// radii are halved.
///
/// The trial point is an independent copy of the incumbent; the incumbent is
/// only modified once a move has been accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortDistanceSearch {
    initial_radius: Vec<f64>,
    radius: Vec<f64>,
}

impl ShortDistanceSearch {
    /// Creates a search with radii `alpha * (high - low)` per dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `alpha` is not a positive finite number.
    pub fn new(alpha: f64, bounds: &Bounds, dimension: usize) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Alpha must be positive, got {}",
                alpha
            )));
        }
        let radius: Vec<f64> = (0..dimension).map(|i| alpha * bounds.width(i)).collect();
        Ok(Self {
            initial_radius: radius.clone(),
            radius,
        })
    }

    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    /// Restores the radii the search was created with.
    pub fn reset(&mut self) {
        self.radius.copy_from_slice(&self.initial_radius);
    }

    /// Performs one sweep over every dimension, or as many as the budget
    /// allows.
    ///
    /// Returns `true` if at least one move was accepted. If none was, every
    /// radius is halved before returning.
    pub fn sweep(&mut self, best: &mut Solution, evaluator: &mut Evaluator<'_>) -> bool {
        let bounds = evaluator.bounds();
        let mut improved = false;
        let mut trial = best.x.clone();

        for i in 0..self.radius.len() {
            if evaluator.is_exhausted() {
                break;
            }

            trial[i] = best.x[i] - self.radius[i];
            trial = toro(&trial, bounds);
            let Some(fitness) = evaluator.evaluate(&trial) else {
                break;
            };

            if is_not_worse(fitness, best.fitness) {
                best.x.copy_from_slice(&trial);
                best.fitness = fitness;
                improved = true;
                evaluator.sample(best.fitness);
                continue;
            }
            evaluator.sample(best.fitness);

            trial.copy_from_slice(&best.x);
            trial[i] = best.x[i] + self.radius[i] / 2.0;
            trial = toro(&trial, bounds);
            let Some(fitness) = evaluator.evaluate(&trial) else {
                trial.copy_from_slice(&best.x);
                break;
            };

            if is_not_worse(fitness, best.fitness) {
                best.x.copy_from_slice(&trial);
                best.fitness = fitness;
                improved = true;
            } else {
                trial.copy_from_slice(&best.x);
            }
            evaluator.sample(best.fitness);
        }

        if !improved {
            self.radius.iter_mut().for_each(|r| *r /= 2.0);
            trace!(radius = ?self.radius, "no move accepted, shrinking radius");
        }

        improved
    }

    /// Runs up to `max_sweeps` sweeps or until the budget is exhausted.
    ///
    /// Returns `true` if the incumbent was replaced at least once.
    pub fn refine(
        &mut self,
        best: &mut Solution,
        evaluator: &mut Evaluator<'_>,
        max_sweeps: usize,
    ) -> bool {
        let mut improved = false;
        for _ in 0..max_sweeps {
            if evaluator.is_exhausted() {
                break;
            }
            improved |= self.sweep(best, evaluator);
        }
        improved
    }
}
