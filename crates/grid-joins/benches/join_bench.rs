use criterion::{criterion_group, criterion_main, Criterion};
use grid_blocks::finalize_blocks;
use grid_core::InMemoryGrid;
use grid_geom::build_containers;
use grid_joins::build_joins;

fn grid_of_scattered_blocks(n: i64) -> InMemoryGrid {
    let mut grid = InMemoryGrid::new(200, 200).unwrap();
    let mut r = 1;
    while r < 200 {
        let mut c = 1;
        while c < 200 {
            grid.set(r, c, "x").unwrap();
            c += n;
        }
        r += n;
    }
    grid
}

fn bench_join_builder(c: &mut Criterion) {
    let grid = grid_of_scattered_blocks(6);
    let points = grid.filled_cells();
    let containers = build_containers(&points, 2, 200, 200);
    let blocks = finalize_blocks(containers, 200, 200);
    c.bench_function("build_joins over scattered blocks", |b| {
        b.iter(|| build_joins(&blocks))
    });
}

criterion_group!(benches, bench_join_builder);
criterion_main!(benches);
