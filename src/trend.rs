//! # ConvergenceTrend
//!
//! An append-only record of `(evaluations, best fitness so far)` samples
//! produced during a single run.
//!
//! The trend enforces its own invariants on insertion: evaluation counts are
//! strictly increasing, at most one sample exists per count, and the recorded
//! fitness never increases.
//!
//! ```rust
//! use sosbench::trend::ConvergenceTrend;
//!
//! let mut trend = ConvergenceTrend::new();
//! trend.record(1, 10.0);
//! trend.record(100, 12.0); // worse than before: the best-so-far is kept
//! trend.record(100, 3.0); // same count: the sample is tightened, not duplicated
//!
//! assert_eq!(trend.len(), 2);
//! assert_eq!(trend.last().map(|s| s.fitness), Some(3.0));
//! ```

use crate::algorithm::is_better;

/// A single point of a convergence trend.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendSample {
    pub evaluations: usize,
    pub fitness: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceTrend {
    samples: Vec<TrendSample>,
}

impl ConvergenceTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the best fitness known after `evaluations` evaluations.
    ///
    /// Returns `false` when the sample was ignored because `evaluations` is
    /// behind the last recorded count.
    pub fn record(&mut self, evaluations: usize, fitness: f64) -> bool {
        match self.samples.last_mut() {
            Some(last) if evaluations < last.evaluations => false,
            Some(last) if evaluations == last.evaluations => {
                if is_better(fitness, last.fitness) {
                    last.fitness = fitness;
                }
                true
            }
            Some(last) => {
                let fitness = if is_better(fitness, last.fitness) {
                    fitness
                } else {
                    last.fitness
                };
                self.samples.push(TrendSample {
                    evaluations,
                    fitness,
                });
                true
            }
            None => {
                self.samples.push(TrendSample {
                    evaluations,
                    fitness,
                });
                true
            }
        }
    }

    pub fn samples(&self) -> &[TrendSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrendSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrendSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrendSample> {
        self.samples.last()
    }

    /// Evaluations consumed by the run, as of the last sample.
    pub fn total_evaluations(&self) -> usize {
        self.samples.last().map_or(0, |s| s.evaluations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_best_so_far() {
        let mut trend = ConvergenceTrend::new();
        trend.record(1, 5.0);
        trend.record(100, 7.0);
        trend.record(200, 2.0);
        let fitness: Vec<f64> = trend.iter().map(|s| s.fitness).collect();
        assert_eq!(fitness, vec![5.0, 5.0, 2.0]);
    }

    #[test]
    fn test_one_sample_per_count() {
        let mut trend = ConvergenceTrend::new();
        assert!(trend.record(100, 4.0));
        assert!(trend.record(100, 4.0));
        assert!(trend.record(100, 9.0));
        assert_eq!(trend.len(), 1);
        assert_eq!(trend.samples()[0].fitness, 4.0);
    }

    #[test]
    fn test_rejects_going_backwards() {
        let mut trend = ConvergenceTrend::new();
        trend.record(200, 4.0);
        assert!(!trend.record(100, 1.0));
        assert_eq!(trend.len(), 1);
        assert_eq!(trend.total_evaluations(), 200);
    }

    #[test]
    fn test_nan_never_replaces_a_number() {
        let mut trend = ConvergenceTrend::new();
        trend.record(1, f64::NAN);
        trend.record(2, 3.0);
        trend.record(3, f64::NAN);
        assert!(trend.first().map_or(false, |s| s.fitness.is_nan()));
        assert_eq!(trend.last().map(|s| s.fitness), Some(3.0));
    }

    #[test]
    fn test_empty_trend() {
        let trend = ConvergenceTrend::new();
        assert!(trend.is_empty());
        assert_eq!(trend.total_evaluations(), 0);
        assert!(trend.last().is_none());
    }
}
