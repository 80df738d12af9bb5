//! Differential Evolution, original DE/rand/1/bin variant.

use tracing::{debug, trace};

use crate::boundary::{random_solution, toro};
use crate::error::{OptimizationError, Result};
use crate::problem::Problem;
use crate::rng::RandomSource;

use super::operators::{binomial_crossover, is_better, rand_one_mutation};
use super::{validate_run, Algorithm, Evaluator, RunResult, Solution};

/// A fixed-size set of candidate vectors with their cached fitness values.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Vec<f64>>,
    fitness: Vec<f64>,
}

impl Population {
    /// Builds the initial population and the incumbent.
    ///
    /// A supplied `initial` solution takes slot 0 without being evaluated;
    /// every other slot is drawn uniformly inside the bounds and evaluated.
    /// The trend is sampled after the first evaluated individual and then on
    /// every interval boundary. If the budget runs out first, the population
    /// holds only the individuals that could be evaluated.
    pub fn initialize(
        size: usize,
        initial: Option<&Solution>,
        evaluator: &mut Evaluator<'_>,
        rng: &mut dyn RandomSource,
    ) -> (Self, Solution) {
        // never more slots than the budget can fill
        let capacity = size.min(evaluator.remaining() + 1);
        let mut population = Self {
            individuals: Vec::with_capacity(capacity),
            fitness: Vec::with_capacity(capacity),
        };
        let mut best: Option<Solution> = initial.cloned();
        if let Some(solution) = initial {
            population.individuals.push(solution.x.clone());
            population.fitness.push(solution.fitness);
        }

        while population.len() < size {
            let x = random_solution(evaluator.bounds(), evaluator.dimension(), rng);
            let Some(fitness) = evaluator.evaluate(&x) else {
                break;
            };

            let incumbent = match best.take() {
                Some(b) if !is_better(fitness, b.fitness) => b,
                _ => Solution::new(x.clone(), fitness),
            };

            if evaluator.evaluations() == 1 {
                evaluator.record(incumbent.fitness);
            } else {
                evaluator.sample(incumbent.fitness);
            }

            best = Some(incumbent);
            population.individuals.push(x);
            population.fitness.push(fitness);
        }

        // validate_run guarantees either an initial solution or one evaluation
        let best = best.unwrap_or_else(|| Solution::new(Vec::new(), f64::NAN));
        (population, best)
    }

    /// Builds a population from already evaluated members.
    pub fn from_members(members: Vec<Solution>) -> Self {
        let (individuals, fitness) = members.into_iter().map(|m| (m.x, m.fitness)).unzip();
        Self {
            individuals,
            fitness,
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Vec<f64>] {
        &self.individuals
    }

    pub fn individual(&self, index: usize) -> &[f64] {
        &self.individuals[index]
    }

    pub fn fitness(&self, index: usize) -> f64 {
        self.fitness[index]
    }

    /// Overwrites a slot with a new vector and its fitness.
    pub fn replace(&mut self, index: usize, x: Vec<f64>, fitness: f64) {
        self.individuals[index] = x;
        self.fitness[index] = fitness;
    }
}

/// Classic Differential Evolution (DE/rand/1/bin) with toroidal repair and
/// strictly greedy one-to-one selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferentialEvolution {
    population_size: usize,
    scaling_factor: f64,
    crossover_rate: f64,
}

impl DifferentialEvolution {
    /// Creates a new DE optimiser.
    ///
    /// # Errors
    ///
    /// Returns an error if `population_size` is below 3, if `scaling_factor`
    /// is not a positive finite number, or if `crossover_rate` is outside
    /// `[0, 1]`.
    pub fn new(population_size: usize, scaling_factor: f64, crossover_rate: f64) -> Result<Self> {
        if population_size < 3 {
            return Err(OptimizationError::Configuration(
                "Population size must be at least 3".to_string(),
            ));
        }
        if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
            return Err(OptimizationError::Configuration(format!(
                "Scaling factor must be positive, got {}",
                scaling_factor
            )));
        }
        if !(0.0..=1.0).contains(&crossover_rate) {
            return Err(OptimizationError::Configuration(format!(
                "Crossover rate must be in [0, 1], got {}",
                crossover_rate
            )));
        }
        Ok(Self {
            population_size,
            scaling_factor,
            crossover_rate,
        })
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }
}

impl Algorithm for DifferentialEvolution {
    fn name(&self) -> &str {
        "DE"
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

        let bounds = problem.bounds();
        let mut evaluator = Evaluator::new(problem, max_evaluations);
        let (mut population, mut best) =
            Population::initialize(self.population_size, initial, &mut evaluator, rng);

        let mut generation = 0usize;
        while !evaluator.is_exhausted() {
            let mut next = population.clone();

            for j in 0..population.len() {
                if evaluator.is_exhausted() {
                    break;
                }

                let mutant = rand_one_mutation(population.individuals(), self.scaling_factor, rng);
                let trial = toro(
                    &binomial_crossover(
                        population.individual(j),
                        &mutant,
                        self.crossover_rate,
                        rng,
                    ),
                    bounds,
                );

                let Some(trial_fitness) = evaluator.evaluate(&trial) else {
                    break;
                };

                if is_better(trial_fitness, population.fitness(j)) {
                    if is_better(trial_fitness, best.fitness) {
                        best = Solution::new(trial.clone(), trial_fitness);
                    }
                    next.replace(j, trial, trial_fitness);
                }

                evaluator.sample(best.fitness);
            }

            population = next;
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
            best = best.fitness,
            "run finished"
        );
        Ok(evaluator.finish(best))
    }
}
