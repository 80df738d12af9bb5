//! # Reports
//!
//! Per-pair results of an experiment and their plain-text renderings: one
//! trend artifact per algorithm/problem pair and a summary table.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::algorithm::ShortDistanceExploration;
//! use sosbench::experiment::{Budget, Experiment, ExperimentOptions};
//! use sosbench::problem::{Benchmark, BenchmarkFunction};
//!
//! let options = ExperimentOptions::builder()
//!     .runs(2)
//!     .budget(Budget::Fixed(200))
//!     .seed(3)
//!     .build();
//! let mut experiment = Experiment::new("report", options);
//! experiment
//!     .add_algorithm(ShortDistanceExploration::new(0.4)?)
//!     .add_problem(Benchmark::new(BenchmarkFunction::Sphere, 2));
//!
//! let report = experiment.run()?;
//! let pair = report.pair("S", "Sphere").expect("pair was registered");
//! assert_eq!(pair.artifact_name(), "S-Sphere.txt");
//! assert_eq!(pair.render_trends().matches("# run").count(), 2);
//! assert!(report.render_summary().starts_with("# experiment report"));
//! # Ok::<(), sosbench::error::OptimizationError>(())
//! ```

use std::fmt::Write as _;

use crate::algorithm::RunResult;
use crate::error::Result;

use super::statistics::{rank_sum_test, RankSumTest, Statistics};

/// All runs of one algorithm on one problem.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairReport {
    pub algorithm: String,
    pub problem: String,
    pub dimension: usize,
    pub max_evaluations: usize,
    pub runs: Vec<RunResult>,
    pub statistics: Statistics,
    /// Rank-sum test against the first registered algorithm on the same
    /// problem. `None` for that algorithm itself.
    pub comparison: Option<RankSumTest>,
}

impl PairReport {
    pub(crate) fn new(
        algorithm: String,
        problem: String,
        dimension: usize,
        max_evaluations: usize,
        runs: Vec<RunResult>,
    ) -> Result<Self> {
        let finals: Vec<f64> = runs.iter().map(|r| r.best.fitness).collect();
        let statistics = Statistics::from_values(&finals)?;
        Ok(Self {
            algorithm,
            problem,
            dimension,
            max_evaluations,
            runs,
            statistics,
            comparison: None,
        })
    }

    /// Final fitness of every run, in run order.
    pub fn final_fitness(&self) -> Vec<f64> {
        self.runs.iter().map(|r| r.best.fitness).collect()
    }

    /// Name of the trend artifact for this pair.
    pub fn artifact_name(&self) -> String {
        format!("{}-{}.txt", self.algorithm, self.problem)
    }

    /// Renders the trends of all runs, one blank-line separated block per run
    /// of `evaluations fitness` lines.
    pub fn render_trends(&self) -> String {
        let mut out = String::new();
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "# run {}", i + 1);
            for sample in run.trend.iter() {
                let _ = writeln!(out, "{} {:e}", sample.evaluations, sample.fitness);
            }
        }
        out
    }
}

/// Everything an experiment produced. Pairs are ordered by algorithm, then
/// problem, both in registration order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentReport {
    pub name: String,
    pub pairs: Vec<PairReport>,
}

impl ExperimentReport {
    pub(crate) fn new(name: String, mut pairs: Vec<PairReport>) -> Result<Self> {
        compare_against_reference(&mut pairs)?;
        Ok(Self { name, pairs })
    }

    pub fn pair(&self, algorithm: &str, problem: &str) -> Option<&PairReport> {
        self.pairs
            .iter()
            .find(|p| p.algorithm == algorithm && p.problem == problem)
    }

    /// Renders a plain-text table with one row per algorithm/problem pair.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# experiment {}", self.name);
        let _ = writeln!(
            out,
            "{:<10} {:<14} {:>5} {:>13} {:>13} {:>13} {:>13} {:>13} {:>9} {:>3}",
            "algorithm", "problem", "runs", "best", "worst", "mean", "median", "std", "p", "vs"
        );
        for pair in &self.pairs {
            let s = &pair.statistics;
            let (p, symbol) = match &pair.comparison {
                Some(test) => (format!("{:.4}", test.p_value), test.outcome.symbol()),
                None => ("-".to_string(), ""),
            };
            let _ = writeln!(
                out,
                "{:<10} {:<14} {:>5} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>9} {:>3}",
                pair.algorithm,
                pair.problem,
                pair.runs.len(),
                s.best,
                s.worst,
                s.mean,
                s.median,
                s.std_dev,
                p,
                symbol
            );
        }
        out
    }
}

// The first pair seen for a problem is the reference for that problem.
fn compare_against_reference(pairs: &mut [PairReport]) -> Result<()> {
    let mut references: Vec<(String, Vec<f64>)> = Vec::new();
    for pair in pairs.iter_mut() {
        match references.iter().find(|(problem, _)| *problem == pair.problem) {
            Some((_, reference)) => {
                pair.comparison = Some(rank_sum_test(&pair.final_fitness(), reference)?);
            }
            None => references.push((pair.problem.clone(), pair.final_fitness())),
        }
    }
    Ok(())
}
