//! Performance benchmarks for the Wa-Tor steppers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wator::{step_parallel, step_sequential, Rules, World};

fn seeded_world(size: usize) -> World {
    // Same density as the default 150x150 world with 800 prey and 150 predators
    let area = (size * size) as f64 / (150.0 * 150.0);
    let mut world = World::create(size).unwrap();
    world.seed(
        (800.0 * area) as usize,
        (150.0 * area) as usize,
        &Rules::default(),
        &mut ChaCha8Rng::seed_from_u64(42),
    );
    world
}

fn benchmark_step_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_sequential");
    let rules = Rules::default();

    for size in [150, 300, 600].iter() {
        let world = seeded_world(*size);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        group.bench_with_input(BenchmarkId::new("size", size), size, |b, _| {
            b.iter(|| step_sequential(black_box(&world), &rules, &mut rng));
        });
    }

    group.finish();
}

fn benchmark_step_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_parallel_600");
    let rules = Rules::default();
    let world = seeded_world(600);

    for workers in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("workers", workers), workers, |b, &w| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                step_parallel(black_box(&world), &rules, w, seed).unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_census(c: &mut Criterion) {
    let world = seeded_world(600);

    c.bench_function("census_600", |b| {
        b.iter(|| black_box(&world).census());
    });
}

criterion_group!(
    benches,
    benchmark_step_sequential,
    benchmark_step_parallel,
    benchmark_census,
);

criterion_main!(benches);
