//! # Experiment
//!
//! Runs every registered algorithm on every registered problem a configured
//! number of times, summarises the final fitness of each pair and, when an
//! output directory is configured, writes trend and summary artifacts.
//!
//! Runs can execute sequentially from one shared random source
//! ([`Experiment::start`]) or on a rayon worker pool
//! ([`Experiment::start_parallel`]). In the parallel case every
//! (algorithm, problem, run) task gets its own generator derived from the
//! experiment seed, so a seeded experiment reproduces exactly.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::algorithm::{DifferentialEvolution, ShortDistanceExploration};
//! use sosbench::experiment::{Budget, Experiment, ExperimentOptions};
//! use sosbench::problem::{Benchmark, BenchmarkFunction};
//!
//! let options = ExperimentOptions::builder()
//!     .runs(3)
//!     .budget(Budget::Fixed(300))
//!     .seed(7)
//!     .build();
//!
//! let mut experiment = Experiment::new("demo", options);
//! experiment
//!     .add_algorithm(DifferentialEvolution::new(10, 0.5, 0.8)?)
//!     .add_algorithm(ShortDistanceExploration::new(0.4)?)
//!     .add_problem(Benchmark::new(BenchmarkFunction::Sphere, 2));
//!
//! let report = experiment.start_parallel()?;
//! assert_eq!(report.pairs.len(), 2);
//! # Ok::<(), sosbench::error::OptimizationError>(())
//! ```

pub mod options;
pub mod report;
pub mod statistics;
pub mod store;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::algorithm::{Algorithm, RunResult};
use crate::error::{OptimizationError, Result};
use crate::problem::Problem;
use crate::rng::{RandomNumberGenerator, RandomSource};

pub use options::{Budget, ExperimentOptions, ExperimentOptionsBuilder};
pub use report::{ExperimentReport, PairReport};
pub use statistics::{rank_sum_test, Outcome, RankSumTest, Statistics, SIGNIFICANCE_LEVEL};
pub use store::{DirectoryStore, MemoryStore, ResultStore};

/// Name of the summary artifact.
pub const SUMMARY_ARTIFACT: &str = "summary.txt";

#[derive(Debug)]
pub struct Experiment {
    name: String,
    options: ExperimentOptions,
    algorithms: Vec<Box<dyn Algorithm>>,
    problems: Vec<Box<dyn Problem>>,
}

impl Experiment {
    pub fn new(name: impl Into<String>, options: ExperimentOptions) -> Self {
        Self {
            name: name.into(),
            options,
            algorithms: Vec::new(),
            problems: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ExperimentOptions {
        &self.options
    }

    /// Registers an algorithm. The first one registered is the reference in
    /// pairwise comparisons.
    pub fn add_algorithm(&mut self, algorithm: impl Algorithm + 'static) -> &mut Self {
        self.algorithms.push(Box::new(algorithm));
        self
    }

    pub fn add_problem(&mut self, problem: impl Problem + 'static) -> &mut Self {
        self.problems.push(Box::new(problem));
        self
    }

    pub fn set_run_count(&mut self, runs: usize) -> &mut Self {
        self.options.set_runs(runs);
        self
    }

    /// Runs according to the options: on the worker pool when `parallel` is
    /// set, otherwise sequentially from a generator seeded with `seed` (or
    /// from entropy).
    pub fn run(&self) -> Result<ExperimentReport> {
        if self.options.is_parallel() {
            return self.start_parallel();
        }
        let mut rng = match self.options.get_seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        };
        self.start(&mut rng)
    }

    /// Executes all runs one after another, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is registered, the run count is zero, a run
    /// fails to start, or writing artifacts fails.
    pub fn start(&self, rng: &mut dyn RandomSource) -> Result<ExperimentReport> {
        self.validate()?;
        info!(
            experiment = %self.name,
            algorithms = self.algorithms.len(),
            problems = self.problems.len(),
            runs = self.options.get_runs(),
            "starting experiment"
        );

        let mut pairs = Vec::with_capacity(self.algorithms.len() * self.problems.len());
        for algorithm in &self.algorithms {
            for problem in &self.problems {
                let budget = self.budget_for(problem.as_ref());
                let mut runs = Vec::with_capacity(self.options.get_runs());
                for _ in 0..self.options.get_runs() {
                    runs.push(algorithm.execute(problem.as_ref(), budget, None, &mut *rng)?);
                }
                pairs.push(self.summarise(algorithm.as_ref(), problem.as_ref(), runs)?);
            }
        }

        self.finish(pairs)
    }

    /// Executes all runs on the rayon worker pool.
    ///
    /// Each (algorithm, problem, run) task draws from its own generator
    /// derived from the configured seed; without a seed one is drawn from
    /// entropy and logged.
    pub fn start_parallel(&self) -> Result<ExperimentReport> {
        self.validate()?;
        let seed = match self.options.get_seed() {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                warn!(seed, "no seed configured, parallel experiment seeded from entropy");
                seed
            }
        };
        info!(
            experiment = %self.name,
            algorithms = self.algorithms.len(),
            problems = self.problems.len(),
            runs = self.options.get_runs(),
            seed,
            "starting parallel experiment"
        );

        let runs_per_pair = self.options.get_runs();
        let tasks: Vec<(usize, usize, usize)> = (0..self.algorithms.len())
            .flat_map(|a| {
                (0..self.problems.len()).flat_map(move |p| (0..runs_per_pair).map(move |r| (a, p, r)))
            })
            .collect();

        let results: Vec<RunResult> = tasks
            .par_iter()
            .enumerate()
            .map(|(task, &(a, p, _))| {
                let problem = self.problems[p].as_ref();
                let mut rng = RandomNumberGenerator::for_task(seed, task as u64);
                self.algorithms[a].execute(problem, self.budget_for(problem), None, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut results = results.into_iter();
        let mut pairs = Vec::with_capacity(self.algorithms.len() * self.problems.len());
        for algorithm in &self.algorithms {
            for problem in &self.problems {
                let runs: Vec<RunResult> = results.by_ref().take(runs_per_pair).collect();
                pairs.push(self.summarise(algorithm.as_ref(), problem.as_ref(), runs)?);
            }
        }

        self.finish(pairs)
    }

    /// Writes one trend artifact per pair and the summary table to `store`.
    pub fn persist(report: &ExperimentReport, store: &dyn ResultStore) -> Result<()> {
        store.ensure_destination()?;
        for pair in &report.pairs {
            store.write_artifact(&pair.artifact_name(), &pair.render_trends())?;
        }
        store.write_artifact(SUMMARY_ARTIFACT, &report.render_summary())
    }

    fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(OptimizationError::EmptyExperiment(format!(
                "{} has no algorithms",
                self.name
            )));
        }
        if self.problems.is_empty() {
            return Err(OptimizationError::EmptyExperiment(format!(
                "{} has no problems",
                self.name
            )));
        }
        if self.options.get_runs() == 0 {
            return Err(OptimizationError::Configuration(
                "Run count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn budget_for(&self, problem: &dyn Problem) -> usize {
        self.options.get_budget().evaluations(problem.dimension())
    }

    fn summarise(
        &self,
        algorithm: &dyn Algorithm,
        problem: &dyn Problem,
        runs: Vec<RunResult>,
    ) -> Result<PairReport> {
        let pair = PairReport::new(
            algorithm.name().to_string(),
            problem.name().to_string(),
            problem.dimension(),
            self.budget_for(problem),
            runs,
        )?;
        info!(
            algorithm = %pair.algorithm,
            problem = %pair.problem,
            best = pair.statistics.best,
            mean = pair.statistics.mean,
            std_dev = pair.statistics.std_dev,
            "pair finished"
        );
        Ok(pair)
    }

    fn finish(&self, pairs: Vec<PairReport>) -> Result<ExperimentReport> {
        let report = ExperimentReport::new(self.name.clone(), pairs)?;
        if let Some(dir) = self.options.get_output_dir() {
            let store = DirectoryStore::new(dir.join(&self.name));
            Self::persist(&report, &store)?;
            info!(path = %store.root().display(), "results written");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{DifferentialEvolution, ShortDistanceExploration};
    use crate::problem::{Benchmark, BenchmarkFunction};

    fn options() -> ExperimentOptions {
        ExperimentOptions::builder()
            .runs(3)
            .budget(Budget::Fixed(250))
            .seed(11)
            .build()
    }

    fn experiment() -> Experiment {
        let mut experiment = Experiment::new("unit", options());
        experiment
            .add_algorithm(DifferentialEvolution::new(10, 0.5, 0.8).unwrap())
            .add_algorithm(ShortDistanceExploration::new(0.4).unwrap())
            .add_problem(Benchmark::new(BenchmarkFunction::Sphere, 2))
            .add_problem(Benchmark::new(BenchmarkFunction::Alpine, 3));
        experiment
    }

    #[test]
    fn test_empty_experiment_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let mut experiment = Experiment::new("empty", options());
        assert!(matches!(
            experiment.start(&mut rng),
            Err(OptimizationError::EmptyExperiment(_))
        ));
        experiment.add_algorithm(ShortDistanceExploration::new(0.4).unwrap());
        assert!(matches!(
            experiment.start_parallel(),
            Err(OptimizationError::EmptyExperiment(_))
        ));
    }

    #[test]
    fn test_zero_runs_is_rejected() {
        let mut experiment = experiment();
        experiment.set_run_count(0);
        assert!(matches!(
            experiment.run(),
            Err(OptimizationError::Configuration(_))
        ));
    }

    #[test]
    fn test_sequential_report_shape() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let report = experiment().start(&mut rng).unwrap();
        let order: Vec<(&str, &str)> = report
            .pairs
            .iter()
            .map(|p| (p.algorithm.as_str(), p.problem.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("DE", "Sphere"), ("DE", "Alpine"), ("S", "Sphere"), ("S", "Alpine")]
        );
        for pair in &report.pairs {
            assert_eq!(pair.runs.len(), 3);
            assert_eq!(pair.max_evaluations, 250);
            for run in &pair.runs {
                assert_eq!(run.trend.total_evaluations(), 250);
            }
        }
        assert!(report.pairs[0].comparison.is_none());
        assert!(report.pairs[2].comparison.is_some());
    }

    #[test]
    fn test_parallel_is_reproducible() {
        let experiment = experiment();
        let first = experiment.start_parallel().unwrap();
        let second = experiment.start_parallel().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_persist_to_memory_store() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let report = experiment().start(&mut rng).unwrap();
        let store = MemoryStore::new();
        Experiment::persist(&report, &store).unwrap();
        assert_eq!(
            store.names(),
            vec![
                "DE-Alpine.txt",
                "DE-Sphere.txt",
                "S-Alpine.txt",
                "S-Sphere.txt",
                "summary.txt"
            ]
        );
        let trends = store.get("DE-Sphere.txt").unwrap();
        assert_eq!(trends.matches("# run").count(), 3);
    }
}
