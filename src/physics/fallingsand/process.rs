//! Advances the simulation one tick at a time.

use bevy::log::trace;
use rand::Rng;

use super::brush;
use super::data::element_grid::ElementGrid;
use super::input::InputSnapshot;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Cells created or erased by the brush
    pub injected: usize,
    /// Occupied cells visited by the rule pass
    pub processed: usize,
    /// Cells whose contents moved or swapped
    pub relocated: usize,
    /// Changes waiting in the queue once the tick finished
    pub pending_changes: usize,
}

/// Run exactly one tick: apply the brush, then every occupied cell's rule once.
///
/// The rule pass walks a snapshot of the occupied set taken after the brush,
/// bottom row first and left to right within a row. Rules mutate the grid in
/// place, so a coordinate is handled according to whatever it holds when its
/// turn comes, which may differ from what it held when the snapshot was taken.
pub fn step<R: Rng + ?Sized>(
    grid: &mut ElementGrid,
    input: &InputSnapshot,
    cell_scale: usize,
    rng: &mut R,
) -> StepReport {
    let injected = brush::apply(grid, input, cell_scale, rng);

    let snapshot = grid.occupied_coords();
    let mut relocated = 0;
    for pos in snapshot.iter().copied() {
        let material = grid.material(pos);
        if material.process(pos, grid, rng).relocated() {
            relocated += 1;
        }
    }
    debug_assert!(grid.is_consistent(), "occupied set diverged from the grid");
    grid.advance_tick();

    let report = StepReport {
        injected,
        processed: snapshot.len(),
        relocated,
        pending_changes: grid.pending_changes(),
    };
    trace!("Tick {}: {:?}", grid.get_tick(), report);
    report
}

#[cfg(test)]
mod tests {
    use rand::{rngs::mock::StepRng, rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::physics::fallingsand::data::element_grid::ElementGridBuilder;
    use crate::physics::fallingsand::elements::element::Material;
    use crate::physics::fallingsand::input::PointerButton;
    use crate::physics::fallingsand::util::vectors::{Coord, ScreenPos};

    fn setup(width: usize, height: usize, cells: &[((usize, usize), Material)]) -> ElementGrid {
        let mut grid = ElementGridBuilder::new()
            .width(width)
            .height(height)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for (pos, material) in cells {
            grid.create((*pos).into(), *material, &mut rng);
        }
        grid.drain_changes();
        grid
    }

    fn tick(grid: &mut ElementGrid) -> StepReport {
        step(
            grid,
            &InputSnapshot::idle(),
            1,
            &mut StdRng::seed_from_u64(13),
        )
    }

    fn assert_consistent(grid: &ElementGrid) {
        assert!(grid.is_consistent(), "occupied set diverged from the grid");
    }

    #[test]
    fn test_sand_falls_one_row() {
        let mut grid = setup(1, 2, &[((0, 0), Material::Sand)]);
        let report = tick(&mut grid);
        assert_eq!(grid.material(Coord::new(0, 1)), Material::Sand);
        assert_eq!(grid.material(Coord::new(0, 0)), Material::Empty);
        assert!(!grid.is_occupied(Coord::new(0, 0)));
        assert_eq!(
            grid.drain_changes(),
            vec![Coord::new(0, 0), Coord::new(0, 1)]
        );
        assert_eq!(report.relocated, 1);
        assert_eq!(grid.get_tick(), 1);
        assert_consistent(&grid);
    }

    #[test]
    fn test_sand_slides_to_the_in_bounds_diagonal() {
        let mut grid = setup(3, 2, &[((0, 0), Material::Sand), ((0, 1), Material::Rock)]);
        tick(&mut grid);
        assert_eq!(grid.material(Coord::new(1, 1)), Material::Sand);
        assert_eq!(grid.material(Coord::new(0, 0)), Material::Empty);
        assert_eq!(grid.material(Coord::new(0, 1)), Material::Rock);
        assert_consistent(&grid);
    }

    #[test]
    fn test_sand_sinks_below_water() {
        let mut grid = setup(1, 2, &[((0, 0), Material::Sand), ((0, 1), Material::Water)]);
        tick(&mut grid);
        assert_eq!(grid.material(Coord::new(0, 0)), Material::Water);
        assert_eq!(grid.material(Coord::new(0, 1)), Material::Sand);
        assert!(grid.is_occupied(Coord::new(0, 0)));
        assert!(grid.is_occupied(Coord::new(0, 1)));
        assert_consistent(&grid);
    }

    #[test]
    fn test_stack_falls_together() {
        // Bottom first ordering lets the whole column drop in one tick
        let mut grid = setup(1, 4, &[((0, 0), Material::Sand), ((0, 1), Material::Sand)]);
        tick(&mut grid);
        assert_eq!(grid.material(Coord::new(0, 1)), Material::Sand);
        assert_eq!(grid.material(Coord::new(0, 2)), Material::Sand);
        assert_eq!(grid.occupied_len(), 2);
    }

    #[test]
    fn test_injection_does_not_repeat() {
        let mut grid = setup(10, 6, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        let input = InputSnapshot::pressed(PointerButton::Primary, ScreenPos::new(5.0, 5.0));

        let first = step(&mut grid, &input, 1, &mut rng);
        assert_eq!(first.injected, 3);
        for x in 4..=6 {
            assert_eq!(grid.material(Coord::new(x, 5)), Material::Sand);
        }

        let second = step(&mut grid, &input, 1, &mut rng);
        assert_eq!(second.injected, 0);
        assert_eq!(grid.count(Material::Sand), 3);
        assert_consistent(&grid);
    }

    #[test]
    fn test_injected_cells_move_in_the_same_tick() {
        let mut grid = setup(10, 10, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        let input = InputSnapshot::pressed(PointerButton::Primary, ScreenPos::new(16.0, 0.0));
        let report = step(&mut grid, &input, 8, &mut rng);
        assert_eq!(report.injected, 3);
        assert_eq!(report.processed, 3);
        for x in 1..=3 {
            assert_eq!(grid.material(Coord::new(x, 1)), Material::Sand);
        }
    }

    #[test]
    fn test_water_on_bottom_row_never_moves() {
        let mut grid = setup(
            4,
            3,
            &[
                ((1, 2), Material::Water),
                ((2, 2), Material::Water),
                ((3, 2), Material::Rock),
            ],
        );
        let before = grid.clone();
        // Zero draws would spawn on every roll
        let mut rng = StepRng::new(0, 0);
        for _ in 0..40 {
            step(&mut grid, &InputSnapshot::idle(), 1, &mut rng);
        }
        assert!(grid.drain_changes().is_empty());
        for pos in [(0, 2), (1, 2), (2, 2), (3, 2)] {
            let pos = Coord::from(pos);
            assert_eq!(grid.get(pos), before.get(pos));
        }
        assert_eq!(grid.count(Material::Water), 2);
    }

    #[test]
    fn test_rock_holds_a_pile() {
        let mut grid = setup(
            5,
            5,
            &[
                ((1, 2), Material::Rock),
                ((2, 2), Material::Rock),
                ((3, 2), Material::Rock),
                ((2, 1), Material::Sand),
            ],
        );
        for _ in 0..5 {
            tick(&mut grid);
        }
        assert_eq!(grid.material(Coord::new(2, 1)), Material::Sand);
        assert_eq!(grid.count(Material::Rock), 3);
    }

    #[test]
    fn test_sand_settles_into_a_pile() {
        let mut grid = setup(7, 4, &[]);
        let mut rng = StdRng::seed_from_u64(9);
        let input = InputSnapshot::pressed(PointerButton::Primary, ScreenPos::new(3.0, 0.0));
        for _ in 0..4 {
            step(&mut grid, &input, 1, &mut rng);
        }
        for _ in 0..40 {
            step(&mut grid, &InputSnapshot::idle(), 1, &mut rng);
        }
        // Everything came to rest: another tick changes nothing
        grid.drain_changes();
        let report = step(&mut grid, &InputSnapshot::idle(), 1, &mut rng);
        assert_eq!(report.relocated, 0);
        assert!(grid.drain_changes().is_empty());
        // Nothing floats
        for pos in grid.occupied_coords() {
            if let Some(below) = pos.below(grid.get_height()) {
                assert!(grid.is_occupied(below), "{:?} is floating", pos);
            }
        }
    }

    /// Random ticks on a small grid, checking the invariants after each one.
    /// Any out of bounds access panics inside ndarray, failing the test.
    fn fuzz(seed: u64) {
        let mut grid = setup(5, 5, &[]);
        let mut rng = StdRng::seed_from_u64(seed);
        let buttons = [
            PointerButton::Primary,
            PointerButton::Secondary,
            PointerButton::Tertiary,
        ];
        for _ in 0..300 {
            let input = if rng.gen_bool(0.3) {
                InputSnapshot {
                    erase: rng.gen_bool(0.1),
                    ..InputSnapshot::pressed(
                        buttons[rng.gen_range(0..buttons.len())],
                        ScreenPos::new(rng.gen_range(-4.0..44.0), rng.gen_range(-4.0..44.0)),
                    )
                }
            } else {
                InputSnapshot::idle()
            };
            let sand = grid.count(Material::Sand);
            let water = grid.count(Material::Water);

            let report = step(&mut grid, &input, 8, &mut rng);
            assert_consistent(&grid);

            if report.injected == 0 {
                assert_eq!(grid.count(Material::Sand), sand);
                assert!(grid.count(Material::Water) >= water);
            }
            for pos in grid.drain_changes() {
                assert!(grid.contains(pos));
            }
        }
    }

    #[test]
    fn test_fuzz_invariants() {
        for seed in 0..40 {
            fuzz(seed);
        }
    }
}
