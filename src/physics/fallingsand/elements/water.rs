use rand::Rng;

use super::element::{Element, LiquidBias, Material, Movement};
use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::util::vectors::Coord;

/// One in this many non bottom row water ticks tries to spawn new water
pub const SPAWN_ONE_IN: u32 = 100;

/// A liquid
/// Falls straight down, then diagonally, then drifts sideways in the
/// direction of its bias. Water is not conserved: every so often a cell
/// sitting on something grows a new water cell next to itself.
#[derive(Default, Copy, Clone, Debug)]
pub struct Water;

impl Water {
    /// Diagonal flow and sideways drift, for when something is directly below
    fn flow(pos: Coord, grid: &mut ElementGrid) -> Movement {
        let width = grid.get_width();
        let height = grid.get_height();
        let below_left = pos.below_left(height);
        let below_right = pos.below_right(width, height);

        for diagonal in [below_left, below_right].into_iter().flatten() {
            if !grid.is_occupied(diagonal) {
                grid.move_contents(pos, diagonal);
                return Movement::Moved(diagonal);
            }
        }

        // Both diagonals exist and are occupied
        if below_left.is_some() && below_right.is_some() {
            return Self::drift(pos, grid);
        }
        Movement::Stay
    }

    /// Step one cell in the bias direction, or turn around if that is blocked
    fn drift(pos: Coord, grid: &mut ElementGrid) -> Movement {
        let bias = grid.get(pos).liquid_bias;
        let side = match bias {
            LiquidBias::Left => pos.left(),
            LiquidBias::Right => pos.right(grid.get_width()),
        };
        match side.filter(|side| !grid.is_occupied(*side)) {
            Some(side) => {
                grid.move_contents(pos, side);
                Movement::Moved(side)
            }
            None => {
                grid.set_liquid_bias(pos, bias.flipped());
                Movement::BiasFlipped
            }
        }
    }

    /// Roll the spawn chance for the cell that started the tick at `pos`.
    /// On a hit, fill the left neighbor if it is empty with something under it,
    /// otherwise the right neighbor under the same condition.
    pub fn try_spawn<R: Rng + ?Sized>(
        pos: Coord,
        grid: &mut ElementGrid,
        rng: &mut R,
    ) -> Option<Coord> {
        if rng.gen_range(0..SPAWN_ONE_IN) != 0 {
            return None;
        }
        let width = grid.get_width();
        let height = grid.get_height();
        let left = pos.left().zip(pos.below_left(height));
        let right = pos.right(width).zip(pos.below_right(width, height));
        let (side, _) = [left, right]
            .into_iter()
            .flatten()
            .find(|(side, under)| grid.is_occupied(*under) && !grid.is_occupied(*side))?;
        grid.spawn(side, Material::Water, rng);
        Some(side)
    }
}

impl Element for Water {
    fn process<R: Rng + ?Sized>(pos: Coord, grid: &mut ElementGrid, rng: &mut R) -> Movement {
        // Resting on the bottom of the world, nothing flows or spawns here
        let Some(below) = pos.below(grid.get_height()) else {
            return Movement::Stay;
        };
        if !grid.is_occupied(below) {
            grid.move_contents(pos, below);
            return Movement::Moved(below);
        }

        let movement = Self::flow(pos, grid);
        // Rolled from the starting position whether or not the cell moved
        Self::try_spawn(pos, grid, rng);
        movement
    }
}
