//! Criterion benchmarks for the evolutionary core.
//!
//! Uses synthetic objective sets (random points, ZDT1) to measure pure
//! algorithm overhead independent of any application domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evogen::engine::pareto::{crowding_distance, non_dominated_sort};
use evogen::engine::{Nsga2Config, Nsga2Engine};
use evogen::individual::{FloatIndividual, Individual};
use evogen::operators::{PolynomialMutation, SbxCrossover};
use evogen::population::Population;
use evogen::tree::PruferCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_objectives(n: usize, m: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..m).map(|_| rng.random::<f64>()).collect())
        .collect()
}

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");
    for n in [100usize, 400] {
        let objectives = random_objectives(n, 2, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &objectives, |b, o| {
            b.iter(|| non_dominated_sort(black_box(o)));
        });
    }
    group.finish();
}

fn bench_crowding_distance(c: &mut Criterion) {
    let objectives = random_objectives(400, 2, 7);
    c.bench_function("crowding_distance/400", |b| {
        b.iter(|| crowding_distance(black_box(&objectives)));
    });
}

fn bench_prufer_decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let mut group = c.benchmark_group("prufer_decode");
    for n in [50usize, 200] {
        let mut code = PruferCode::new(n).unwrap();
        code.random_init(&mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &code, |b, code| {
            b.iter(|| code.decode().unwrap());
        });
    }
    group.finish();
}

fn bench_nsga2_zdt1(c: &mut Criterion) {
    // ZDT1 with 10 decision variables, 20 generations, population 50.
    c.bench_function("nsga2_zdt1/50x20", |b| {
        b.iter(|| {
            let template = FloatIndividual::new(10, 0.0, 1.0).unwrap();
            let population = Population::new(template, 50).unwrap();
            let mut engine = Nsga2Engine::new(
                population,
                Box::new(SbxCrossover::new(0.9, 15.0).unwrap()),
                Box::new(PolynomialMutation::new(0.1, 20.0).unwrap()),
                Nsga2Config::default().with_max_generations(20).with_seed(42),
            )
            .unwrap();
            engine.minimize_objective(|ind: &FloatIndividual| ind.chromosome().genes()[0]);
            engine.minimize_objective(|ind: &FloatIndividual| {
                let genes = ind.chromosome().genes();
                let g = 1.0 + 9.0 * genes[1..].iter().sum::<f64>() / (genes.len() - 1) as f64;
                g * (1.0 - (genes[0] / g).sqrt())
            });
            engine.run().unwrap();
            black_box(engine.front_objectives())
        });
    });
}

criterion_group!(
    benches,
    bench_non_dominated_sort,
    bench_crowding_distance,
    bench_prufer_decode,
    bench_nsga2_zdt1
);
criterion_main!(benches);
