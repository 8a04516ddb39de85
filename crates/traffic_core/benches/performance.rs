//! Performance benchmarks for traffic_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use traffic_core::ecs::DriverKind;
use traffic_core::grid::{GridConfig, WorldPoint};
use traffic_core::routing::Router;
use traffic_core::scenario::{build_scenario, ScenarioParams};
use traffic_core::simulation::Simulation;

fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");

    group.bench_function("find_path_uncached", |b| {
        b.iter(|| {
            // A fresh router every iteration defeats the cache.
            let mut router = Router::new(GridConfig::default());
            black_box(router.find_path(
                black_box(WorldPoint::new(110.0, 110.0)),
                black_box(WorldPoint::new(2100.0, 1350.0)),
            ))
        });
    });

    group.bench_function("find_path_cached", |b| {
        let mut router = Router::new(GridConfig::default());
        router.find_path(WorldPoint::new(110.0, 110.0), WorldPoint::new(2100.0, 1350.0));
        b.iter(|| {
            black_box(router.find_path(
                black_box(WorldPoint::new(110.0, 110.0)),
                black_box(WorldPoint::new(2100.0, 1350.0)),
            ))
        });
    });

    group.finish();
}

fn bench_simulation_tick(c: &mut Criterion) {
    let populations = vec![("small", 10usize), ("medium", 50), ("large", 200)];

    let mut group = c.benchmark_group("simulation_tick");
    for (name, population) in populations {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &population,
            |b, &population| {
                let mut sim = Simulation::new(ScenarioParams::default().with_seed(42));
                for i in 0..population {
                    sim.spawn_rider();
                    let kind = if i % 2 == 0 {
                        DriverKind::Ground
                    } else {
                        DriverKind::Air
                    };
                    sim.spawn_driver(kind);
                }
                for _ in 0..population / 2 {
                    let _ = sim.request_ride(DriverKind::Ground);
                }
                b.iter(|| {
                    sim.tick(black_box(0.016));
                });
            },
        );
    }
    group.finish();
}

fn bench_scenario_build(c: &mut Criterion) {
    c.bench_function("build_scenario", |b| {
        b.iter(|| {
            let mut world = World::new();
            build_scenario(&mut world, ScenarioParams::default().with_seed(7));
            black_box(world)
        });
    });
}

criterion_group!(
    benches,
    bench_routing,
    bench_simulation_tick,
    bench_scenario_build
);
criterion_main!(benches);
