use rand::Rng;

use super::element::{Element, Material, Movement};
use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::util::vectors::Coord;

/// A granular solid
/// Falls straight down, sinks through water, and slides off anything solid,
/// trying down left before down right.
#[derive(Default, Copy, Clone, Debug)]
pub struct Sand;

impl Sand {
    /// Move into an empty target or sink into a water target.
    /// Anything else blocks.
    fn fall_into(pos: Coord, target: Coord, grid: &mut ElementGrid) -> Option<Movement> {
        match grid.material(target) {
            Material::Empty => {
                grid.move_contents(pos, target);
                Some(Movement::Moved(target))
            }
            Material::Water => {
                grid.swap_contents(pos, target);
                Some(Movement::Swapped(target))
            }
            Material::Sand | Material::Rock => None,
        }
    }
}

impl Element for Sand {
    fn process<R: Rng + ?Sized>(pos: Coord, grid: &mut ElementGrid, _rng: &mut R) -> Movement {
        let width = grid.get_width();
        let height = grid.get_height();

        // Resting on the bottom of the world
        let Some(below) = pos.below(height) else {
            return Movement::Stay;
        };
        if let Some(movement) = Self::fall_into(pos, below, grid) {
            return movement;
        }

        // Something solid below, slide off it
        [pos.below_left(height), pos.below_right(width, height)]
            .into_iter()
            .flatten()
            .find_map(|diagonal| Self::fall_into(pos, diagonal, grid))
            .unwrap_or(Movement::Stay)
    }
}
