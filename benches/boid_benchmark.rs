/*
 * Boid Simulation Benchmark
 *
 * This file contains benchmarks for the boid simulation to identify performance bottlenecks.
 * It measures grid range queries, neighbour collection and the full two-pass tick,
 * with and without clear path sampling.
 */

use std::time::Duration;

use clearpath_boids::neighbors;
use clearpath_boids::physics::reset_flock;
use clearpath_boids::{AgentParams, Flock, GridParams};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn populated_flock(agents: usize, params: &AgentParams) -> Flock {
    let mut flock = Flock::new(&GridParams::default()).expect("default grid");
    let mut rng = StdRng::seed_from_u64(42);
    reset_flock(&mut flock, agents, agents / 10, params, 2.0, &mut rng).expect("valid setup");
    flock
}

// Benchmark the spatial grid range queries
fn bench_spatial_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_grid");

    for num_boids in [100, 500, 1000, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, &n| {
            let flock = populated_flock(n, &AgentParams::default());
            let mut rng = StdRng::seed_from_u64(7);
            let queries: Vec<Vec3> = (0..64)
                .map(|_| Vec3::new(rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0), 0.0))
                .collect();

            b.iter(|| {
                let grid = flock.grid();
                let mut found = 0;
                for &query in &queries {
                    let range = grid.cell_range_covering(query, 20.0).expect("valid radius");
                    found += grid.agents_in_range(&range).count();
                }
                black_box(found)
            });
        });
    }

    group.finish();
}

// Benchmark one neighbour collection pass over the whole flock
fn bench_neighbor_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_collection");

    for num_boids in [100, 500, 1000, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, &n| {
            let flock = populated_flock(n, &AgentParams::default());

            b.iter(|| {
                let mut count = 0;
                for (id, boid) in flock.agents() {
                    count += neighbors::collect(id, boid, &flock).expect("valid params").count;
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

// Benchmark the overall tick
fn bench_update_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_loop");

    for clear_path in [false, true] {
        let params = AgentParams {
            clear_path,
            ..AgentParams::default()
        };
        for num_boids in [100, 500, 1000].iter() {
            let label = if clear_path { "clear_path" } else { "steering" };
            group.bench_with_input(BenchmarkId::new(label, num_boids), num_boids, |b, &n| {
                let mut flock = populated_flock(n, &params);
                b.iter(|| black_box(flock.tick(1.0).expect("valid time step")));
            });
        }
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_spatial_grid, bench_neighbor_collection, bench_update_loop
}

criterion_main!(benches);
