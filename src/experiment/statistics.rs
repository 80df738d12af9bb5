//! # Statistics
//!
//! Summary statistics over the final fitness of repeated runs, and the
//! Wilcoxon rank-sum test used to compare two algorithms on one problem.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::experiment::{rank_sum_test, Outcome, Statistics};
//!
//! let de = [0.9, 1.1, 1.0, 1.3, 0.8, 1.2, 1.05, 0.95];
//! let s = [0.01, 0.02, 0.015, 0.03, 0.005, 0.012, 0.02, 0.018];
//!
//! let summary = Statistics::from_values(&s)?;
//! assert_eq!(summary.best, 0.005);
//!
//! let test = rank_sum_test(&s, &de)?;
//! assert_eq!(test.outcome, Outcome::Better);
//! # Ok::<(), sosbench::error::OptimizationError>(())
//! ```

use std::cmp::Ordering;

use statrs::function::erf::erfc;

use crate::error::{OptimizationError, OptionExt, Result};

/// Significance level of [`rank_sum_test`].
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl Statistics {
    /// Computes the summary of a sample of final fitness values.
    ///
    /// NaN values sort after every number and so count as the worst.
    /// The standard deviation is the sample (n - 1) estimate, 0 for one run.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::EmptySample` for an empty slice.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let best = *sorted.first().ok_or_else_opt(|| OptimizationError::EmptySample)?;
        let worst = *sorted.last().ok_or_else_opt(|| OptimizationError::EmptySample)?;

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        let std_dev = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Ok(Self {
            best,
            worst,
            mean,
            median,
            std_dev,
        })
    }
}

/// Outcome of comparing a candidate sample against a reference sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The candidate reaches significantly lower fitness.
    Better,
    /// The candidate reaches significantly higher fitness.
    Worse,
    /// No significant difference.
    Equivalent,
}

impl Outcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            Outcome::Better => "+",
            Outcome::Worse => "-",
            Outcome::Equivalent => "=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankSumTest {
    pub u: f64,
    pub z: f64,
    pub p_value: f64,
    pub outcome: Outcome,
}

/// Two-sided Wilcoxon rank-sum (Mann-Whitney U) test of `candidate` against
/// `reference`, using the normal approximation with tie correction.
///
/// # Errors
///
/// Returns `OptimizationError::EmptySample` if either sample is empty.
pub fn rank_sum_test(candidate: &[f64], reference: &[f64]) -> Result<RankSumTest> {
    if candidate.is_empty() || reference.is_empty() {
        return Err(OptimizationError::EmptySample);
    }

    let n1 = candidate.len() as f64;
    let n2 = reference.len() as f64;
    let n = n1 + n2;

    let mut pooled: Vec<(f64, bool)> = candidate
        .iter()
        .map(|&v| (v, true))
        .chain(reference.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < pooled.len() {
        let mut j = i + 1;
        while j < pooled.len() && pooled[j].0.total_cmp(&pooled[i].0) == Ordering::Equal {
            j += 1;
        }
        let ties = (j - i) as f64;
        // ranks are 1-based: positions i..j share the average of i+1..=j
        let average_rank = (i + 1 + j) as f64 / 2.0;
        rank_sum += pooled[i..j].iter().filter(|(_, c)| *c).count() as f64 * average_rank;
        tie_term += ties.powi(3) - ties;
        i = j;
    }

    let u = rank_sum - n1 * (n1 + 1.0) / 2.0;
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    let (z, p_value) = if variance > 0.0 {
        let z = (u - mean) / variance.sqrt();
        (z, two_sided_p_value(z))
    } else {
        (0.0, 1.0)
    };

    let outcome = if p_value >= SIGNIFICANCE_LEVEL {
        Outcome::Equivalent
    } else if u < mean {
        Outcome::Better
    } else {
        Outcome::Worse
    };

    Ok(RankSumTest {
        u,
        z,
        p_value,
        outcome,
    })
}

// P(|Z| >= |z|) for a standard normal Z
fn two_sided_p_value(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
}
