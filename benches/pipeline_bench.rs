//! Benchmarks for construction and refinement.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use christofides_tsp::christofides::Christofides;
#[cfg(feature = "bench")]
use christofides_tsp::config::{AnnealingParams, Neighbourhood};
#[cfg(feature = "bench")]
use christofides_tsp::graph::{Graph, Node};
#[cfg(feature = "bench")]
use christofides_tsp::local_search::{ThreeOpt, TwoOpt};
#[cfg(feature = "bench")]
use christofides_tsp::parallel::ParallelAnnealing;
#[cfg(feature = "bench")]
use christofides_tsp::{DistanceCache, PlainEdgeCreator, Tour};
#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
#[cfg(feature = "bench")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "bench")]
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "bench")]
use std::sync::Arc;
#[cfg(feature = "bench")]
use std::time::Duration;

/// Create a benchmark instance of uniformly random points.
#[cfg(feature = "bench")]
fn create_benchmark_instance(size: usize) -> DistanceCache<usize, (f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(size as u64);
    let nodes: Vec<_> = (0..size)
        .map(|i| Node::shared(i, (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0))))
        .collect();
    DistanceCache::complete(nodes, |a, b| {
        let (x1, y1): (f64, f64) = *a.value();
        let (x2, y2): (f64, f64) = *b.value();
        ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
    })
}

#[cfg(feature = "bench")]
fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let cache = create_benchmark_instance(size);
            let graph = Graph::complete(&cache, Arc::new(PlainEdgeCreator)).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(0);

            b.iter(|| {
                Christofides::new(&graph, &cache)
                    .construct(false, &mut rng)
                    .unwrap()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("exhaustive");

    for size in [50, 100].iter() {
        let cache = create_benchmark_instance(*size);
        let start = Tour::from_order((0..*size).collect(), &cache);

        group.bench_with_input(BenchmarkId::new("two_opt", size), size, |b, _| {
            let two_opt = TwoOpt::new(&cache).unwrap();
            b.iter(|| {
                let mut tour = start.clone();
                two_opt.perform(&mut tour)
            });
        });

        group.bench_with_input(BenchmarkId::new("three_opt", size), size, |b, _| {
            let three_opt = ThreeOpt::new(&cache).unwrap();
            b.iter(|| {
                let mut tour = start.clone();
                three_opt.perform(&mut tour)
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_parallel_annealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_annealing");
    group.measurement_time(Duration::from_secs(30));
    group.sample_size(10);

    let params = AnnealingParams::new().with_max_iterations(2_000);
    for size in [100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let cache = create_benchmark_instance(size);
            let start = Tour::from_order((0..size).collect(), &cache);
            let coordinator = ParallelAnnealing::new(&cache, params.clone(), 8, 1).unwrap();

            b.iter(|| {
                let mut tour = start.clone();
                coordinator.run_best(&mut tour, Neighbourhood::TwoOpt).unwrap()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_construction,
    benchmark_exhaustive,
    benchmark_parallel_annealing
);

#[cfg(feature = "bench")]
criterion_main!(benches);

#[cfg(not(feature = "bench"))]
fn main() {}
