//! Self-adaptive Differential Evolution with an embedded short-distance local
//! search (jDES).

use tracing::{debug, trace};

use crate::boundary::toro;
use crate::error::{OptimizationError, Result};
use crate::local_search::ShortDistanceSearch;
use crate::problem::Problem;
use crate::rng::RandomSource;

use super::operators::{binomial_crossover, is_better, rand_one_mutation};
use super::{validate_run, Algorithm, Evaluator, Population, RunResult, Solution};

/// DE/rand/1/bin where every individual carries its own scale factor and
/// crossover rate.
///
/// Before mutation the individual's scale factor is resampled as
/// `lower + U(0,1) * upper` with probability `tau_one`; before crossover its
/// crossover rate is resampled as `U(0,1)` with probability `tau_two`.
///
/// Each time a trial improves the global incumbent, a [`ShortDistanceSearch`]
/// with fresh radii `alpha * (high - low)` refines it for up to
/// `local_search_sweeps` sweeps. A refined point replaces the trial in the
/// next generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfAdaptiveDe {
    population_size: usize,
    scaling_factor_lower: f64,
    scaling_factor_upper: f64,
    tau_one: f64,
    tau_two: f64,
    alpha: f64,
    local_search_sweeps: usize,
}

impl SelfAdaptiveDe {
    /// Creates a new jDES optimiser.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `population_size` is below 3
    /// - `scaling_factor_lower` is negative or `scaling_factor_upper` is not positive
    /// - `tau_one` or `tau_two` is outside `[0, 1]`
    /// - `alpha` is not positive
    /// - `local_search_sweeps` is 0
    pub fn new(
        population_size: usize,
        scaling_factor_lower: f64,
        scaling_factor_upper: f64,
        tau_one: f64,
        tau_two: f64,
        alpha: f64,
        local_search_sweeps: usize,
    ) -> Result<Self> {
        if population_size < 3 {
            return Err(OptimizationError::Configuration(
                "Population size must be at least 3".to_string(),
            ));
        }
        if !scaling_factor_lower.is_finite() || scaling_factor_lower < 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Scaling factor lower bound must be non-negative, got {}",
                scaling_factor_lower
            )));
        }
        if !scaling_factor_upper.is_finite() || scaling_factor_upper <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Scaling factor upper bound must be positive, got {}",
                scaling_factor_upper
            )));
        }
        for (name, tau) in [("tau_one", tau_one), ("tau_two", tau_two)] {
            if !(0.0..=1.0).contains(&tau) {
                return Err(OptimizationError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, tau
                )));
            }
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Alpha must be positive, got {}",
                alpha
            )));
        }
        if local_search_sweeps == 0 {
            return Err(OptimizationError::Configuration(
                "Local search sweeps must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            population_size,
            scaling_factor_lower,
            scaling_factor_upper,
            tau_one,
            tau_two,
            alpha,
            local_search_sweeps,
        })
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn local_search_sweeps(&self) -> usize {
        self.local_search_sweeps
    }

    fn sample_scaling_factor(&self, rng: &mut dyn RandomSource) -> f64 {
        self.scaling_factor_lower + rng.uniform() * self.scaling_factor_upper
    }

    /// Runs one generation and returns the next population with the number
    /// of successful refinements.
    ///
    /// Mutation draws its donors from `population`; improved trials go into
    /// the returned copy. `search` is reset before each refinement.
    fn evolve(
        &self,
        population: &Population,
        control: &mut ControlParameters,
        best: &mut Solution,
        search: &mut ShortDistanceSearch,
        evaluator: &mut Evaluator<'_>,
        rng: &mut dyn RandomSource,
    ) -> (Population, usize) {
        let bounds = evaluator.bounds();
        let mut next = population.clone();
        let mut refinements = 0usize;

        for j in 0..population.len() {
            if evaluator.is_exhausted() {
                break;
            }

            if rng.uniform() < self.tau_one {
                control.scaling_factor[j] = self.sample_scaling_factor(rng);
            }
            let mutant = rand_one_mutation(population.individuals(), control.scaling_factor[j], rng);

            if rng.uniform() < self.tau_two {
                control.crossover_rate[j] = rng.uniform();
            }
            let trial = toro(
                &binomial_crossover(
                    population.individual(j),
                    &mutant,
                    control.crossover_rate[j],
                    rng,
                ),
                bounds,
            );

            let Some(trial_fitness) = evaluator.evaluate(&trial) else {
                break;
            };

            if is_better(trial_fitness, population.fitness(j)) {
                next.replace(j, trial.clone(), trial_fitness);

                if is_better(trial_fitness, best.fitness) {
                    *best = Solution::new(trial, trial_fitness);
                    evaluator.sample(best.fitness);

                    search.reset();
                    if search.refine(best, evaluator, self.local_search_sweeps) {
                        next.replace(j, best.x.clone(), best.fitness);
                        refinements += 1;
                    }
                }
            }

            evaluator.sample(best.fitness);
        }

        (next, refinements)
    }
}

/// Per-individual scale factors and crossover rates.
#[derive(Debug, Clone, PartialEq)]
struct ControlParameters {
    scaling_factor: Vec<f64>,
    crossover_rate: Vec<f64>,
}

impl ControlParameters {
    fn sample(size: usize, algorithm: &SelfAdaptiveDe, rng: &mut dyn RandomSource) -> Self {
        let scaling_factor = (0..size)
            .map(|_| algorithm.sample_scaling_factor(rng))
            .collect();
        let crossover_rate = (0..size).map(|_| rng.uniform()).collect();
        Self {
            scaling_factor,
            crossover_rate,
        }
    }
}

impl Algorithm for SelfAdaptiveDe {
    fn name(&self) -> &str {
        "jDES"
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

        let mut search =
            ShortDistanceSearch::new(self.alpha, problem.bounds(), problem.dimension())?;
        let mut evaluator = Evaluator::new(problem, max_evaluations);
        let (mut population, mut best) =
            Population::initialize(self.population_size, initial, &mut evaluator, rng);
        let mut control = ControlParameters::sample(population.len(), self, rng);

        let mut generation = 0usize;
        let mut refinements = 0usize;
        while !evaluator.is_exhausted() {
            let (next, refined) = self.evolve(
                &population,
                &mut control,
                &mut best,
                &mut search,
                &mut evaluator,
                rng,
            );
            population = next;
            refinements += refined;
            generation += 1;
            trace!(
                generation,
                evaluations = evaluator.evaluations(),
                best = best.fitness,
                "generation complete"
            );
        }

        debug!(
            algorithm = self.name(),
            problem = problem.name(),
            evaluations = evaluator.evaluations(),
            refinements,
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
    use crate::trend::TrendSample;

    fn jdes() -> SelfAdaptiveDe {
        SelfAdaptiveDe::new(20, 0.1, 1.0, 0.1, 0.1, 0.4, 10).unwrap()
    }

    /// Replays the same draws every time: a constant uniform, index 0 for
    /// crossover and a fixed donor order.
    struct ScriptedSource {
        uniform: f64,
        donors: Vec<usize>,
    }

    impl RandomSource for ScriptedSource {
        fn uniform(&mut self) -> f64 {
            self.uniform
        }

        fn integer(&mut self, _upper_inclusive: usize) -> usize {
            0
        }

        fn permutation(&mut self, n: usize) -> Vec<usize> {
            assert_eq!(n, self.donors.len());
            self.donors.clone()
        }
    }

    // 1-D sphere population where donors (1, 2, 0) give the mutant 1 + F * (3 - 4)
    fn line_population() -> (Population, Solution) {
        let population = Population::from_members(vec![
            Solution::new(vec![4.0], 16.0),
            Solution::new(vec![1.0], 1.0),
            Solution::new(vec![3.0], 9.0),
        ]);
        (population, Solution::new(vec![1.0], 1.0))
    }

    fn control(scaling_factor: f64, crossover_rate: f64) -> ControlParameters {
        ControlParameters {
            scaling_factor: vec![scaling_factor; 3],
            crossover_rate: vec![crossover_rate; 3],
        }
    }

    #[test]
    fn test_new_validates_parameters() {
        assert!(SelfAdaptiveDe::new(2, 0.1, 1.0, 0.1, 0.1, 0.4, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, -0.1, 1.0, 0.1, 0.1, 0.4, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.1, 0.0, 0.1, 0.1, 0.4, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.1, 1.0, 1.1, 0.1, 0.4, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.1, 1.0, 0.1, -0.1, 0.4, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.1, 1.0, 0.1, 0.1, 0.0, 10).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.1, 1.0, 0.1, 0.1, 0.4, 0).is_err());
        assert!(SelfAdaptiveDe::new(20, 0.0, 1.0, 1.0, 1.0, 0.2, 100).is_ok());
    }

    #[test]
    fn test_stays_within_budget() {
        let problem = Benchmark::new(BenchmarkFunction::Ackley, 4);
        let algorithm = jdes();
        let mut rng = RandomNumberGenerator::from_seed(31);
        for budget in [1, 20, 21, 150, 1234] {
            let result = algorithm.execute(&problem, budget, None, &mut rng).unwrap();
            assert_eq!(result.trend.total_evaluations(), budget);
        }
    }

    #[test]
    fn test_local_search_drives_sphere_down() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 5);
        let algorithm = SelfAdaptiveDe::new(20, 0.1, 1.0, 0.1, 0.1, 0.4, 100).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let result = algorithm.execute(&problem, 5000, None, &mut rng).unwrap();
        assert!(result.best.fitness < 1e-6);
        assert_eq!(problem.evaluate(&result.best.x), result.best.fitness);
    }

    #[test]
    fn test_refined_point_replaces_trial_in_next_generation() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 1);
        let algorithm = SelfAdaptiveDe::new(3, 0.1, 1.0, 0.1, 0.1, 0.1, 2).unwrap();
        let mut rng = ScriptedSource {
            uniform: 0.9,
            donors: vec![1, 2, 0],
        };
        let (population, mut best) = line_population();
        let mut control = control(0.5, 0.5);
        let mut search = ShortDistanceSearch::new(0.1, problem.bounds(), 1).unwrap();

        let mut evaluator = Evaluator::new(&problem, 1000);
        for _ in 0..96 {
            evaluator.evaluate(&[5.0]);
        }

        let (next, refinements) = algorithm.evolve(
            &population,
            &mut control,
            &mut best,
            &mut search,
            &mut evaluator,
            &mut rng,
        );

        // the trial 0.5 (fitness 0.25) was refined to 0.5 - 1.024 / 2
        assert_eq!(refinements, 1);
        assert!((best.x[0] + 0.012).abs() < 1e-9);
        assert!(best.fitness < 0.25);
        assert_eq!(next.individual(0), best.x.as_slice());
        assert_eq!(next.fitness(0), best.fitness);

        // later slots keep their unrefined trials
        assert_eq!(next.individual(1), &[0.5]);
        assert_eq!(next.fitness(2), 0.25);

        // 3 trials plus 3 local-search evaluations
        assert_eq!(evaluator.evaluations(), 96 + 6);
        let result = evaluator.finish(best.clone());
        assert_eq!(
            result.trend.samples(),
            &[
                TrendSample {
                    evaluations: 100,
                    fitness: best.fitness
                },
                TrendSample {
                    evaluations: 102,
                    fitness: best.fitness
                },
            ]
        );
    }

    #[test]
    fn test_zero_tau_keeps_control_parameters() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 1);
        let algorithm = SelfAdaptiveDe::new(3, 0.1, 1.0, 0.0, 0.0, 0.1, 2).unwrap();
        let mut rng = ScriptedSource {
            uniform: 0.9,
            donors: vec![1, 2, 0],
        };
        let (population, mut best) = line_population();
        let mut control = control(0.5, 0.5);
        let mut search = ShortDistanceSearch::new(0.1, problem.bounds(), 1).unwrap();
        let mut evaluator = Evaluator::new(&problem, 1000);

        algorithm.evolve(
            &population,
            &mut control,
            &mut best,
            &mut search,
            &mut evaluator,
            &mut rng,
        );
        assert_eq!(control, self::control(0.5, 0.5));
    }

    #[test]
    fn test_unit_tau_resamples_every_slot() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 1);
        let algorithm = SelfAdaptiveDe::new(3, 0.1, 1.0, 1.0, 1.0, 0.1, 2).unwrap();
        let mut rng = ScriptedSource {
            uniform: 0.9,
            donors: vec![1, 2, 0],
        };
        let (population, mut best) = line_population();
        let mut control = control(0.5, 0.5);
        let mut search = ShortDistanceSearch::new(0.1, problem.bounds(), 1).unwrap();
        let mut evaluator = Evaluator::new(&problem, 1000);

        algorithm.evolve(
            &population,
            &mut control,
            &mut best,
            &mut search,
            &mut evaluator,
            &mut rng,
        );
        // F = 0.1 + 0.9 * 1.0, CR = 0.9
        for (f, cr) in control.scaling_factor.iter().zip(&control.crossover_rate) {
            assert!((f - 1.0).abs() < 1e-12);
            assert_eq!(*cr, 0.9);
        }
        // with F = 1 the mutant 1 + (3 - 4) lands on the optimum
        assert_eq!(best, Solution::new(vec![0.0], 0.0));
    }

    #[test]
    fn test_initial_control_parameters_follow_resampling_law() {
        let algorithm = SelfAdaptiveDe::new(3, 0.2, 0.5, 0.1, 0.1, 0.1, 2).unwrap();
        let mut rng = ScriptedSource {
            uniform: 0.4,
            donors: vec![],
        };
        let control = ControlParameters::sample(4, &algorithm, &mut rng);
        assert_eq!(control.scaling_factor, vec![0.2 + 0.4 * 0.5; 4]);
        assert_eq!(control.crossover_rate, vec![0.4; 4]);
    }
}
