//! Pointer driven injection and erasing.

use bevy::log::{debug, trace};
use rand::Rng;

use super::data::element_grid::ElementGrid;
use super::elements::element::Material;
use super::input::InputSnapshot;
use super::util::vectors::Coord;

/// What the brush does to the cell under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Place(Material),
    Erase,
}

/// Pour `material` at `pos`.
/// The center is filled if empty. Independently, when both horizontal
/// neighbors exist and are empty they are filled too, giving a three wide
/// stroke. Returns the number of cells created.
pub fn inject<R: Rng + ?Sized>(
    grid: &mut ElementGrid,
    pos: Coord,
    material: Material,
    rng: &mut R,
) -> usize {
    let mut created = usize::from(grid.create(pos, material, rng));
    if let (Some(left), Some(right)) = (pos.left(), pos.right(grid.get_width())) {
        if !grid.is_occupied(left) && !grid.is_occupied(right) {
            created += usize::from(grid.create(left, material, rng));
            created += usize::from(grid.create(right, material, rng));
        }
    }
    created
}

/// Apply the input snapshot to the grid.
/// Returns how many cells changed material.
pub fn apply<R: Rng + ?Sized>(
    grid: &mut ElementGrid,
    input: &InputSnapshot,
    cell_scale: usize,
    rng: &mut R,
) -> usize {
    let Some(tool) = input.tool() else {
        return 0;
    };
    let Some(pointer) = input.pointer else {
        return 0;
    };
    let Some(pos) = pointer.to_cell(cell_scale) else {
        trace!("Pointer {:?} is left of or above the grid", pointer);
        return 0;
    };
    if !grid.contains(pos) {
        trace!("Pointer cell {:?} is outside the grid", pos);
        return 0;
    }
    let changed = match tool {
        Tool::Place(material) => inject(grid, pos, material, rng),
        Tool::Erase => grid.destroy_brush(pos),
    };
    if changed > 0 {
        debug!("{:?} changed {} cells at {:?}", tool, changed, pos);
    }
    changed
}
