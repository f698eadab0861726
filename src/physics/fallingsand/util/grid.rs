//! A simple 2d grid type
//! Backed by an ndarray in standard (row major) layout.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use itertools::iproduct;

use super::vectors::Coord;

/// A simple 2d grid type
#[derive(Clone, Debug)]
pub struct Grid<T>(ndarray::Array2<T>);

/* =================
 * Initialization
 * ================= */
impl<T> Grid<T> {
    /// Create a new grid filled with one value
    pub fn new_fill(width: usize, height: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self(ndarray::Array2::from_elem((height, width), value))
    }
}

/* ======================================
 * Simple Getters
 * Access basic attributes of the struct
 * ====================================== */
impl<T> Grid<T> {
    /// Get the width of the grid
    pub fn get_width(&self) -> usize {
        self.0.ncols()
    }
    /// Get the height of the grid
    pub fn get_height(&self) -> usize {
        self.0.nrows()
    }
    /// Get the total size of the grid
    pub fn total_size(&self) -> usize {
        self.0.len()
    }
    /// Whether the coordinate addresses a cell of this grid
    pub fn contains(&self, idx: Coord) -> bool {
        idx.x < self.get_width() && idx.y < self.get_height()
    }
}

/// Defines when the user has simply exceeded the bounds of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOutOfBoundsError(pub Coord);
impl fmt::Display for GridOutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} went outside the constraints of grid", self.0)
    }
}
impl std::error::Error for GridOutOfBoundsError {}

/* ======================================
 * Position Based Getters
 * Access data at a position
 * ====================================== */
impl<T> Grid<T> {
    /// Gets the value at the given coordinate
    /// Panics if the coordinate is out of bounds
    pub fn get(&self, idx: Coord) -> &T {
        &self.0[[idx.y, idx.x]]
    }
    /// Gets the value at the given coordinate, or returns an error if the coordinate is out of bounds
    pub fn checked_get(&self, idx: Coord) -> Result<&T, GridOutOfBoundsError> {
        self.0
            .get([idx.y, idx.x])
            .ok_or(GridOutOfBoundsError(idx))
    }
    /// Gets the value at the given coordinate, mutably
    pub fn get_mut(&mut self, idx: Coord) -> &mut T {
        &mut self.0[[idx.y, idx.x]]
    }
    /// Sets the value at the given coordinate, overwriting the old value
    pub fn set(&mut self, idx: Coord, value: T) {
        self.replace(idx, value);
    }
    /// Like set, but gives you ownership of the original value
    pub fn replace(&mut self, idx: Coord, replacement: T) -> T {
        std::mem::replace(&mut self.0[[idx.y, idx.x]], replacement)
    }
    /// Exchange the values at two coordinates
    pub fn swap(&mut self, a: Coord, b: Coord) {
        self.0.swap([a.y, a.x], [b.y, b.x]);
    }
}

/// Iteration
impl<T> Grid<T> {
    /// Iterate over the values in row major order
    pub fn iter(&self) -> ndarray::iter::Iter<'_, T, ndarray::Ix2> {
        self.0.iter()
    }

    /// Every coordinate of the grid in row major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        iproduct!(0..self.get_height(), 0..self.get_width()).map(|(y, x)| Coord { x, y })
    }
}
