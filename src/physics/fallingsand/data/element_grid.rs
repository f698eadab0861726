use std::fmt;

use bevy::log::{debug, info};
use hashbrown::HashSet;
use itertools::Itertools;
use rand::Rng;

use crate::physics::fallingsand::elements::element::{Cell, LiquidBias, Material, Rgb, SKY};
use crate::physics::fallingsand::util::grid::{Grid, GridOutOfBoundsError};
use crate::physics::fallingsand::util::image::RenderSink;
use crate::physics::fallingsand::util::vectors::Coord;

/// An element grid is the single source of truth for the simulation.
/// It owns three views of one state:
/// * the dense grid of cells
/// * the set of occupied (non empty) coordinates
/// * the queue of coordinates whose look changed since the last drain
///
/// Every mutation goes through the primitives below, which keep a coordinate
/// in the occupied set exactly when its cell is not empty.
/// Coordinates handed to the primitives must be inside the grid.
#[derive(Clone, Debug)]
pub struct ElementGrid {
    cells: Grid<Cell>,
    occupied: HashSet<Coord>,
    changes: Vec<Coord>,
    background: Rgb,
    tick: u64,
}

/// Returned when asked to build a grid with no cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSizeError {
    pub width: usize,
    pub height: usize,
}
impl fmt::Display for GridSizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a {}x{} grid has no cells, both dimensions must be at least 1",
            self.width, self.height
        )
    }
}
impl std::error::Error for GridSizeError {}

/// A builder for ElementGrid
pub struct ElementGridBuilder {
    width: usize,
    height: usize,
    background: Rgb,
}

impl Default for ElementGridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementGridBuilder {
    /// Start here
    pub fn new() -> Self {
        Self {
            width: 160,
            height: 90,
            background: SKY,
        }
    }
    /// Number of columns
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    /// Number of rows
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    /// Size the grid to cover a screen, one cell per `cell_scale` pixels.
    /// Partial cells at the right and bottom edges are dropped.
    pub fn from_resolution(self, width_px: usize, height_px: usize, cell_scale: usize) -> Self {
        let cell_scale = cell_scale.max(1);
        self.width(width_px / cell_scale)
            .height(height_px / cell_scale)
    }
    /// The color of empty cells
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }
    pub fn build(self) -> Result<ElementGrid, GridSizeError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridSizeError {
                width: self.width,
                height: self.height,
            });
        }
        info!("Creating a {}x{} element grid", self.width, self.height);
        Ok(ElementGrid {
            cells: Grid::new_fill(self.width, self.height, Cell::empty(self.background)),
            occupied: HashSet::new(),
            changes: Vec::new(),
            background: self.background,
            tick: 0,
        })
    }
}

/* Getters */
impl ElementGrid {
    pub fn get_width(&self) -> usize {
        self.cells.get_width()
    }
    pub fn get_height(&self) -> usize {
        self.cells.get_height()
    }
    /// How many ticks have been applied to this grid
    pub fn get_tick(&self) -> u64 {
        self.tick
    }
    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }
    pub fn contains(&self, pos: Coord) -> bool {
        self.cells.contains(pos)
    }
    pub fn get(&self, pos: Coord) -> &Cell {
        self.cells.get(pos)
    }
    pub fn checked_get(&self, pos: Coord) -> Result<&Cell, GridOutOfBoundsError> {
        self.cells.checked_get(pos)
    }
    pub fn material(&self, pos: Coord) -> Material {
        self.cells.get(pos).material
    }
    pub fn is_occupied(&self, pos: Coord) -> bool {
        self.occupied.contains(&pos)
    }
    pub fn occupied_len(&self) -> usize {
        self.occupied.len()
    }
    /// Number of cells holding the given material
    pub fn count(&self, material: Material) -> usize {
        if material.is_empty() {
            return self.cells.total_size() - self.occupied.len();
        }
        self.occupied
            .iter()
            .filter(|pos| self.cells.get(**pos).material == material)
            .count()
    }
    /// Number of queued changes not yet drained
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }

    /// A copy of the occupied coordinates, safe to iterate while the grid mutates.
    /// Ordered bottom row first, then left to right, so falling material
    /// clears the way for whatever sits on top of it within the same tick.
    pub fn occupied_coords(&self) -> Vec<Coord> {
        self.occupied
            .iter()
            .copied()
            .sorted_unstable_by_key(|pos| (std::cmp::Reverse(pos.y), pos.x))
            .collect()
    }

    /// Checks that the occupied set and the cell materials agree
    pub fn is_consistent(&self) -> bool {
        let non_empty = self
            .cells
            .iter()
            .filter(|cell| !cell.material.is_empty())
            .count();
        non_empty == self.occupied.len()
            && self
                .occupied
                .iter()
                .all(|pos| self.contains(*pos) && !self.material(*pos).is_empty())
    }
}

/* Primitives */
impl ElementGrid {
    /// Place a new cell of `material` with a color drawn from its palette.
    /// Does nothing and returns false if the coordinate is already occupied.
    pub fn create<R: Rng + ?Sized>(&mut self, pos: Coord, material: Material, rng: &mut R) -> bool {
        let Some(color) = material.random_color(rng) else {
            return false;
        };
        self.place(pos, material, color, rng)
    }

    /// Like create, but always uses the first palette color
    pub fn spawn<R: Rng + ?Sized>(&mut self, pos: Coord, material: Material, rng: &mut R) -> bool {
        let Some(color) = material.base_color() else {
            return false;
        };
        self.place(pos, material, color, rng)
    }

    /// Shared by create and spawn
    fn place<R: Rng + ?Sized>(
        &mut self,
        pos: Coord,
        material: Material,
        color: Rgb,
        rng: &mut R,
    ) -> bool {
        debug_assert!(self.contains(pos), "{:?} is outside the grid", pos);
        if self.is_occupied(pos) {
            return false;
        }
        let liquid_bias = match material {
            Material::Water => LiquidBias::random(rng),
            _ => LiquidBias::default(),
        };
        self.cells.set(
            pos,
            Cell {
                material,
                color,
                liquid_bias,
            },
        );
        self.occupied.insert(pos);
        self.changes.push(pos);
        true
    }

    /// Empty the cell and paint it with the background.
    /// Does nothing and returns false if the coordinate is not occupied.
    pub fn destroy(&mut self, pos: Coord) -> bool {
        debug_assert!(self.contains(pos), "{:?} is outside the grid", pos);
        if !self.occupied.remove(&pos) {
            return false;
        }
        self.cells.set(pos, Cell::empty(self.background));
        self.changes.push(pos);
        true
    }

    /// Erase the cell under the brush, and both horizontal neighbors when
    /// both of them hold material. Returns how many cells were emptied.
    pub fn destroy_brush(&mut self, pos: Coord) -> usize {
        let mut destroyed = usize::from(self.destroy(pos));
        if let (Some(left), Some(right)) = (pos.left(), pos.right(self.get_width())) {
            if self.is_occupied(left) && self.is_occupied(right) {
                destroyed += usize::from(self.destroy(left));
                destroyed += usize::from(self.destroy(right));
            }
        }
        if destroyed > 0 {
            debug!("Erased {} cells around {:?}", destroyed, pos);
        }
        destroyed
    }

    /// Exchange everything two cells hold. Occupancy is left alone, so this
    /// is for pairs that are both occupied.
    pub fn swap_contents(&mut self, a: Coord, b: Coord) {
        debug_assert!(self.contains(a) && self.contains(b));
        self.cells.swap(a, b);
        self.changes.push(a);
        self.changes.push(b);
    }

    /// Move the contents of occupied `from` into empty `to`.
    /// Afterwards `from` is empty and unoccupied, `to` is occupied.
    pub fn move_contents(&mut self, from: Coord, to: Coord) {
        debug_assert!(self.is_occupied(from), "{:?} has nothing to move", from);
        debug_assert!(!self.is_occupied(to), "{:?} is already occupied", to);
        self.swap_contents(from, to);
        self.occupied.remove(&from);
        self.occupied.insert(to);
    }

    /// Change which way a water cell wants to drift. Not a visual change.
    pub fn set_liquid_bias(&mut self, pos: Coord, liquid_bias: LiquidBias) {
        self.cells.get_mut(pos).liquid_bias = liquid_bias;
    }
}

/* Change queue */
impl ElementGrid {
    /// Take every queued change, oldest first, leaving the queue empty
    pub fn drain_changes(&mut self) -> Vec<Coord> {
        std::mem::take(&mut self.changes)
    }

    /// Queue every cell for redraw, used to paint the first frame
    pub fn mark_all_dirty(&mut self) {
        self.changes.extend(self.cells.coords());
    }

    /// Drain the queue into a render sink in order. Returns how many cells were drawn.
    pub fn flush<S: RenderSink + ?Sized>(&mut self, sink: &mut S, cell_size: usize) -> usize {
        let changes = self.drain_changes();
        for pos in changes.iter() {
            sink.draw_cell(*pos, self.cells.get(*pos).color, cell_size);
        }
        changes.len()
    }
}
