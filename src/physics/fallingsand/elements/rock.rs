use rand::Rng;

use super::element::{Element, Movement};
use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::util::vectors::Coord;

/// Stays wherever it was placed
#[derive(Default, Copy, Clone, Debug)]
pub struct Rock;

impl Element for Rock {
    fn process<R: Rng + ?Sized>(_pos: Coord, _grid: &mut ElementGrid, _rng: &mut R) -> Movement {
        Movement::Stay
    }
}
