//! Benchmark search and executor performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxpath::{
    generate_world, AgentState, Cell, NeighborPolicy, PathExecutor, Pathfinder, PathfinderConfig,
    TerrainConfig, VoxelGrid,
};

/// Generated terrain plus the surface cells at two opposite corners.
fn corner_to_corner(size: u32) -> (VoxelGrid, Cell, Cell) {
    let config = TerrainConfig::new(42).with_size(size, size);
    let world = generate_world(&config).expect("terrain config is valid");
    let last = size as i32 - 1;
    let start = world.surface_cell(0, 0).unwrap_or(Cell::new(0, 1, 0));
    let goal = world.surface_cell(last, last).unwrap_or(Cell::new(last, 1, last));
    (world, start, goal)
}

fn bench_flat_search(c: &mut Criterion) {
    let world = VoxelGrid::flat(64, 4, 64, 0);
    let pathfinder = Pathfinder::default();

    c.bench_function("flat_64_diagonal", |b| {
        b.iter(|| {
            let path = pathfinder.find_path(
                black_box(&world),
                black_box(Cell::new(0, 1, 0)),
                black_box(Cell::new(63, 1, 63)),
            );
            black_box(path)
        })
    });
}

fn bench_terrain_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain_search");

    for size in [16u32, 32, 64].iter() {
        let (world, start, goal) = corner_to_corner(*size);
        let pathfinder = Pathfinder::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let outcome = pathfinder.search(black_box(&world), start, goal);
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_policy");
    let (world, start, goal) = corner_to_corner(32);

    for policy in [NeighborPolicy::Simple, NeighborPolicy::Enhanced] {
        let pathfinder = Pathfinder::new(PathfinderConfig::new(policy));
        group.bench_function(policy.to_string(), |b| {
            b.iter(|| black_box(pathfinder.search(black_box(&world), start, goal)))
        });
    }

    group.finish();
}

fn bench_executor_tick(c: &mut Criterion) {
    let world = VoxelGrid::flat(64, 4, 64, 0);
    let path = Pathfinder::default().find_path(&world, Cell::new(0, 1, 0), Cell::new(63, 1, 63));
    let agent = AgentState::new(0.5, 1.0, 0.5, 0.0);

    c.bench_function("executor_tick", |b| {
        let mut executor = PathExecutor::default();
        executor.start_path(path.clone());
        b.iter(|| black_box(executor.tick(black_box(&world), Some(agent))))
    });
}

criterion_group!(
    benches,
    bench_flat_search,
    bench_terrain_sizes,
    bench_policies,
    bench_executor_tick
);
criterion_main!(benches);
