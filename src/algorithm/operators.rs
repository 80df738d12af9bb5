//! Fitness comparisons and the DE/rand/1/bin variation operators.

use crate::rng::RandomSource;

/// Strict improvement test for minimisation.
///
/// NaN is worse than every other value: a NaN candidate is never better, and
/// any non-NaN candidate is better than a NaN incumbent.
pub fn is_better(candidate: f64, incumbent: f64) -> bool {
    if candidate.is_nan() {
        false
    } else if incumbent.is_nan() {
        true
    } else {
        candidate < incumbent
    }
}

/// Like [`is_better`] but also accepts ties.
pub fn is_not_worse(candidate: f64, incumbent: f64) -> bool {
    if candidate.is_nan() {
        false
    } else if incumbent.is_nan() {
        true
    } else {
        candidate <= incumbent
    }
}

/// DE/rand/1 mutation: `pop[r1] + F * (pop[r2] - pop[r3])`.
///
/// `r1`, `r2` and `r3` are the first three entries of a random permutation of
/// the population indices. The target individual is not excluded.
///
/// # Panics
///
/// Panics if the population has fewer than three members.
pub fn rand_one_mutation(
    population: &[Vec<f64>],
    scaling_factor: f64,
    rng: &mut dyn RandomSource,
) -> Vec<f64> {
    let order = rng.permutation(population.len());
    let (r1, r2, r3) = (&population[order[0]], &population[order[1]], &population[order[2]]);

    r1.iter()
        .zip(r2.iter().zip(r3))
        .map(|(a, (b, c))| a + scaling_factor * (b - c))
        .collect()
}

/// Binomial crossover.
///
/// Each gene comes from the mutant when a uniform draw falls below
/// `crossover_rate`; one randomly chosen gene always comes from the mutant.
pub fn binomial_crossover(
    current: &[f64],
    mutant: &[f64],
    crossover_rate: f64,
    rng: &mut dyn RandomSource,
) -> Vec<f64> {
    let forced = rng.integer(current.len().saturating_sub(1));

    current
        .iter()
        .zip(mutant)
        .enumerate()
        .map(|(i, (&c, &m))| {
            if rng.uniform() < crossover_rate || i == forced {
                m
            } else {
                c
            }
        })
        .collect()
}
