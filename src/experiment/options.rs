//! # ExperimentOptions
//!
//! Configuration for an experiment: how many independent runs each
//! algorithm/problem pair gets, the evaluation budget, seeding, whether runs
//! are spread over a worker pool, and where results are written.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::experiment::{Budget, ExperimentOptions};
//!
//! let options = ExperimentOptions::builder()
//!     .runs(5)
//!     .budget(Budget::Fixed(2000))
//!     .seed(42)
//!     .parallel(true)
//!     .build();
//!
//! assert_eq!(options.get_runs(), 5);
//! assert_eq!(options.get_budget().evaluations(10), 2000);
//! ```

use std::path::{Path, PathBuf};

/// Evaluation budget of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Budget {
    /// `n * dimension` evaluations.
    PerDimension(usize),
    /// A fixed number of evaluations regardless of dimension.
    Fixed(usize),
}

impl Budget {
    /// The number of evaluations a run on a `dimension`-dimensional problem gets.
    pub fn evaluations(&self, dimension: usize) -> usize {
        match self {
            Budget::PerDimension(n) => n.saturating_mul(dimension),
            Budget::Fixed(n) => *n,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::PerDimension(5000)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentOptions {
    runs: usize,
    budget: Budget,
    seed: Option<u64>,
    parallel: bool,
    output_dir: Option<PathBuf>,
}

impl ExperimentOptions {
    pub fn new(runs: usize, budget: Budget) -> Self {
        Self {
            runs,
            budget,
            ..Self::default()
        }
    }

    pub fn get_runs(&self) -> usize {
        self.runs
    }

    pub fn get_budget(&self) -> Budget {
        self.budget
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn get_output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn set_runs(&mut self, runs: usize) {
        self.runs = runs;
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.budget = budget;
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn set_output_dir(&mut self, output_dir: Option<PathBuf>) {
        self.output_dir = output_dir;
    }

    pub fn builder() -> ExperimentOptionsBuilder {
        ExperimentOptionsBuilder::default()
    }
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            runs: 30,
            budget: Budget::default(),
            seed: None,
            parallel: false,
            output_dir: None,
        }
    }
}

/// Builder for `ExperimentOptions`.
#[derive(Debug, Clone, Default)]
pub struct ExperimentOptionsBuilder {
    runs: Option<usize>,
    budget: Option<Budget>,
    seed: Option<u64>,
    parallel: Option<bool>,
    output_dir: Option<PathBuf>,
}

impl ExperimentOptionsBuilder {
    pub fn runs(mut self, value: usize) -> Self {
        self.runs = Some(value);
        self
    }

    pub fn budget(mut self, value: Budget) -> Self {
        self.budget = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn parallel(mut self, value: bool) -> Self {
        self.parallel = Some(value);
        self
    }

    pub fn output_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(value.into());
        self
    }

    pub fn build(self) -> ExperimentOptions {
        let defaults = ExperimentOptions::default();
        ExperimentOptions {
            runs: self.runs.unwrap_or(defaults.runs),
            budget: self.budget.unwrap_or(defaults.budget),
            seed: self.seed,
            parallel: self.parallel.unwrap_or(defaults.parallel),
            output_dir: self.output_dir,
        }
    }
}
