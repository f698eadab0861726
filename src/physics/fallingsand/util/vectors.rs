//! Coordinate types for the sand grid and the screen it is drawn on.

use derive_more::From;

/// A cell position on the grid
/// x is the column, growing to the right
/// y is the row, growing downward, so the bottom row is `height - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

/// Convienient constants
impl Coord {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Neighbor lookups
/// Every lookup takes the grid dimensions it needs and returns None when
/// the neighbor would fall outside of them, so no caller can address a cell
/// off the grid.
impl Coord {
    /// The cell one column to the left
    pub fn left(&self) -> Option<Coord> {
        self.x.checked_sub(1).map(|x| Coord { x, y: self.y })
    }
    /// The cell one column to the right
    pub fn right(&self, width: usize) -> Option<Coord> {
        (self.x + 1 < width).then_some(Coord {
            x: self.x + 1,
            y: self.y,
        })
    }
    /// The cell one row down
    pub fn below(&self, height: usize) -> Option<Coord> {
        (self.y + 1 < height).then_some(Coord {
            x: self.x,
            y: self.y + 1,
        })
    }
    pub fn below_left(&self, height: usize) -> Option<Coord> {
        self.below(height)?.left()
    }
    pub fn below_right(&self, width: usize, height: usize) -> Option<Coord> {
        self.below(height)?.right(width)
    }
}

/// A pointer position in pixels, origin at the top left of the drawn grid
#[derive(Debug, Clone, Copy, PartialEq, Default, From)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Integer divides both axes by the cell scale, truncating toward zero.
    /// Positions left of or above the screen have no cell.
    /// The result is not checked against any grid.
    pub fn to_cell(self, cell_scale: usize) -> Option<Coord> {
        if self.x < 0.0 || self.y < 0.0 || cell_scale == 0 {
            return None;
        }
        Some(Coord {
            x: self.x as usize / cell_scale,
            y: self.y as usize / cell_scale,
        })
    }
}
