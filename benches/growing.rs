use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use growing_mazes::{
    generators::{seeded_rng, Algorithm},
    grid::Style,
    growing::GrowingMaze,
    pathing,
    units::{Height, Width},
};

fn growing_41(style: Style) -> GrowingMaze {
    GrowingMaze::generate(Algorithm::DepthFirst, Width(41), Height(41), style, &mut seeded_rng(1))
        .unwrap()
}

fn bench_finish_basic_41(c: &mut Criterion) {
    let maze = growing_41(Style::Basic);
    c.bench_function("finish_basic_41", move |b| {
        b.iter_batched(|| maze.clone(), |mut m| m.finish(), BatchSize::SmallInput)
    });
}

fn bench_finish_advanced_41(c: &mut Criterion) {
    let maze = growing_41(Style::Advanced);
    c.bench_function("finish_advanced_41", move |b| {
        b.iter_batched(|| maze.clone(), |mut m| m.finish(), BatchSize::SmallInput)
    });
}

fn bench_longest_path_advanced_41(c: &mut Criterion) {
    let mut maze = growing_41(Style::Advanced);
    let _ = maze.finish().unwrap();
    let grid = maze.into_grid();
    c.bench_function("longest_path_advanced_41", move |b| {
        b.iter(|| pathing::longest_path(&grid))
    });
}

criterion_group!(
    benches,
    bench_finish_basic_41,
    bench_finish_advanced_41,
    bench_longest_path_advanced_41
);
criterion_main!(benches);
