use criterion::{criterion_group, criterion_main, Criterion};
use grid_core::InMemoryGrid;
use grid_parse::{parse, ParseConfig};

fn grid_of_scattered_blocks(n: i64) -> InMemoryGrid {
    let mut grid = InMemoryGrid::new(200, 200).unwrap();
    let mut r = 1;
    while r < 200 {
        let mut c = 1;
        while c < 200 {
            for dr in 0..2 {
                for dc in 0..2 {
                    grid.set(r + dr, c + dc, "x").unwrap();
                }
            }
            c += n;
        }
        r += n;
    }
    grid
}

fn bench_full_pipeline(c: &mut Criterion) {
    let grid = grid_of_scattered_blocks(6);
    let config = ParseConfig::default();
    c.bench_function("parse over scattered blocks", |b| {
        b.iter(|| parse(&grid, &config))
    });
}

criterion_group!(benches, bench_full_pipeline);
criterion_main!(benches);
