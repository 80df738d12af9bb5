use sosbench::{
    algorithm::{Algorithm, AlgorithmConfig, AlgorithmKind, Optimizer, ParameterSlot},
    error::OptimizationError,
    problem::{Benchmark, BenchmarkFunction},
    rng::RandomNumberGenerator,
};

fn jdes(dimension: usize) -> Optimizer {
    AlgorithmConfig::new(AlgorithmKind::SelfAdaptiveDe)
        .with(ParameterSlot::PopulationSize, 10.0 * dimension as f64)
        .and_then(|c| c.with(ParameterSlot::ScalingFactorLower, 0.1))
        .and_then(|c| c.with(ParameterSlot::ScalingFactorUpper, 1.0))
        .and_then(|c| c.with(ParameterSlot::TauOne, 1.0))
        .and_then(|c| c.with(ParameterSlot::TauTwo, 1.0))
        .and_then(|c| c.with(ParameterSlot::Alpha, 0.2))
        .and_then(|c| c.with(ParameterSlot::LocalSearchSweeps, 100.0))
        .and_then(|c| c.build())
        .unwrap()
}

#[test]
fn test_jdes_trend_invariants() {
    let problem = Benchmark::new(BenchmarkFunction::Rastrigin, 3);
    let optimizer = jdes(3);
    let mut rng = RandomNumberGenerator::from_seed(44);

    let result = optimizer.execute(&problem, 3000, None, &mut rng).unwrap();

    assert_eq!(optimizer.name(), "jDES");
    assert_eq!(result.trend.total_evaluations(), 3000);
    assert_eq!(result.trend.first().unwrap().evaluations, 1);
    for pair in result.trend.samples().windows(2) {
        assert!(pair[0].evaluations < pair[1].evaluations);
        assert!(pair[1].fitness <= pair[0].fitness);
    }
    assert_eq!(result.trend.last().unwrap().fitness, result.best.fitness);
}

#[test]
fn test_jdes_is_deterministic_for_a_seed() {
    let problem = Benchmark::new(BenchmarkFunction::Ackley, 4);
    let optimizer = jdes(4);
    let a = optimizer
        .execute(&problem, 2000, None, &mut RandomNumberGenerator::from_seed(12))
        .unwrap();
    let b = optimizer
        .execute(&problem, 2000, None, &mut RandomNumberGenerator::from_seed(12))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_jdes_missing_parameter_is_a_configuration_error() {
    let err = AlgorithmConfig::new(AlgorithmKind::SelfAdaptiveDe)
        .with(ParameterSlot::PopulationSize, 20.0)
        .and_then(|c| c.build())
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizationError::MissingParameter {
            slot: ParameterSlot::ScalingFactorLower,
            ..
        }
    ));
}
