use criterion::{criterion_group, criterion_main, Criterion};

use grid_world::game_interface::Position;
use grid_world::grid::MultiLevelGrid;
use grid_world::pairs::seeded_pairs;
use grid_world::render::composite;
use grid_world::scorer::PathScorer;

const SIZE: usize = 64;
const LEVELS: usize = 5;

fn make_grid() -> MultiLevelGrid {
    let keys = ["A", "B", "C", "D"];
    MultiLevelGrid::new(SIZE, SIZE, LEVELS, seeded_pairs(42, &keys, SIZE, SIZE))
}

// A diagonal staircase through every level, for every key.
fn draw_paths(grid: &mut MultiLevelGrid) {
    let keys = grid.keys().to_vec();
    for key in &keys {
        for i in 0..SIZE as i32 {
            let level = i % LEVELS as i32;
            grid.add_path_segment(key, level, Position { row: i, column: i });
            grid.add_path_segment(key, level, Position { row: i, column: SIZE as i32 - 1 - i });
        }
    }
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");
    group.bench_function("add_path_segment", |b| b.iter(|| {
        let mut grid = make_grid();
        draw_paths(&mut grid);
        grid
    }));
    group.bench_function("reset", |b| {
        let mut grid = make_grid();
        b.iter(|| {
            draw_paths(&mut grid);
            grid.reset();
        })
    });
    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut grid = make_grid();
    draw_paths(&mut grid);
    let mut group = c.benchmark_group("scoring");
    group.bench_function("calculate_total_distance", |b| b.iter(|| {
        PathScorer::calculate_total_distance(&grid)
    }));
    group.bench_function("composite", |b| b.iter(|| composite(&grid)));
    group.finish();
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = bench_mutation, bench_scoring,
}
criterion_main!(benches);
