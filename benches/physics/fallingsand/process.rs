use criterion::{black_box, criterion_group, BatchSize, Criterion};
use pixel_sand::physics::fallingsand::data::element_grid::{ElementGrid, ElementGridBuilder};
use pixel_sand::physics::fallingsand::elements::element::Material;
use pixel_sand::physics::fallingsand::input::InputSnapshot;
use pixel_sand::physics::fallingsand::process::step;
use pixel_sand::physics::fallingsand::util::vectors::Coord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A screen sized grid with the top half sprinkled with material
fn get_element_grid() -> ElementGrid {
    let mut grid = ElementGridBuilder::new()
        .from_resolution(1920, 1080, 8)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let materials = [Material::Sand, Material::Water, Material::Rock];
    for y in 0..grid.get_height() / 2 {
        for x in 0..grid.get_width() {
            if rng.gen_bool(0.4) {
                let material = materials[rng.gen_range(0..materials.len())];
                grid.create(Coord::new(x, y), material, &mut rng);
            }
        }
    }
    grid.drain_changes();
    grid
}

fn bench_step(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("step_falling", |b| {
        b.iter_batched(
            get_element_grid,
            |mut grid| step(black_box(&mut grid), &InputSnapshot::idle(), 8, &mut rng),
            BatchSize::LargeInput,
        )
    });
}

fn bench_step_settled(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut grid = get_element_grid();
    for _ in 0..200 {
        step(&mut grid, &InputSnapshot::idle(), 8, &mut rng);
    }
    c.bench_function("step_settled", |b| {
        b.iter(|| {
            step(black_box(&mut grid), &InputSnapshot::idle(), 8, &mut rng);
            grid.drain_changes();
        })
    });
}

criterion_group!(benches, bench_step, bench_step_settled);
