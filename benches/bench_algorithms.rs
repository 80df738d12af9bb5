use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sosbench::{
    algorithm::{Algorithm, DifferentialEvolution, Optimizer, SelfAdaptiveDe, ShortDistanceExploration},
    boundary::toro,
    experiment::{Budget, Experiment, ExperimentOptions},
    problem::{Benchmark, BenchmarkFunction, Bounds},
    rng::RandomNumberGenerator,
};

fn optimizers(dimension: usize) -> Vec<Optimizer> {
    vec![
        DifferentialEvolution::new(10 * dimension, 0.5, 0.8).unwrap().into(),
        SelfAdaptiveDe::new(10 * dimension, 0.1, 1.0, 1.0, 1.0, 0.2, 100)
            .unwrap()
            .into(),
        ShortDistanceExploration::new(0.4).unwrap().into(),
    ]
}

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_run");
    for dimension in [2, 10, 30].iter() {
        let problem = Benchmark::new(BenchmarkFunction::Rastrigin, *dimension);
        for optimizer in optimizers(*dimension) {
            group.bench_with_input(
                BenchmarkId::new(optimizer.name().to_string(), dimension),
                dimension,
                |b, &dimension| {
                    let mut rng = RandomNumberGenerator::from_seed(42);
                    b.iter(|| {
                        let result = optimizer.execute(
                            black_box(&problem),
                            black_box(500 * dimension),
                            None,
                            &mut rng,
                        );
                        assert!(result.is_ok());
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_toro(c: &mut Criterion) {
    let bounds = Bounds::uniform(-5.12, 5.12);
    let x: Vec<f64> = (0..100).map(|i| (i as f64 - 50.0) * 0.37).collect();
    c.bench_function("toro_100", |b| b.iter(|| toro(black_box(&x), black_box(&bounds))));
}

fn bench_experiment(c: &mut Criterion) {
    let mut group = c.benchmark_group("experiment");
    group.sample_size(10);
    for parallel in [false, true].iter() {
        let options = ExperimentOptions::builder()
            .runs(8)
            .budget(Budget::PerDimension(500))
            .seed(1)
            .parallel(*parallel)
            .build();
        let mut experiment = Experiment::new("bench", options);
        for optimizer in optimizers(5) {
            experiment.add_algorithm(optimizer);
        }
        experiment
            .add_problem(Benchmark::new(BenchmarkFunction::Sphere, 5))
            .add_problem(Benchmark::new(BenchmarkFunction::Ackley, 5));

        let label = if *parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let report = experiment.run();
                assert!(report.is_ok());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_run, bench_toro, bench_experiment);
criterion_main!(benches);
