//! The cell model shared by every material.
#![warn(missing_docs)]

use derive_more::{From, Into};
use rand::Rng;
use strum_macros::EnumIter;

use super::{rock::Rock, sand::Sand, water::Water};
use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::util::vectors::Coord;

/// A plain 8 bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Opaque RGBA bytes
    pub fn as_rgba_u8(&self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

/// The color of empty cells
pub const SKY: Rgb = Rgb(157, 222, 213);

/// Visual variety for sand, picked at random on creation
pub const SAND_PALETTE: [Rgb; 4] = [
    Rgb(179, 159, 106),
    Rgb(212, 192, 137),
    Rgb(210, 204, 189),
    Rgb(180, 172, 150),
];

/// Visual variety for water, picked at random on creation
pub const WATER_PALETTE: [Rgb; 4] = [
    Rgb(40, 140, 180),
    Rgb(50, 150, 190),
    Rgb(30, 130, 170),
    Rgb(30, 150, 180),
];

/// Visual variety for rock, picked at random on creation
pub const ROCK_PALETTE: [Rgb; 4] = [
    Rgb(50, 50, 50),
    Rgb(60, 60, 60),
    Rgb(40, 40, 40),
    Rgb(100, 50, 50),
];

/// The closed set of materials a cell can hold
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Material {
    /// Nothing, drawn as the background
    #[default]
    Empty,
    /// Falls, piles up and sinks through water
    Sand,
    /// Falls, flows sideways and occasionally multiplies
    Water,
    /// Never moves
    Rock,
}

impl Material {
    /// The colors a freshly created cell of this material may take
    /// Empty cells have no palette, they use the grid background instead
    pub fn palette(&self) -> &'static [Rgb] {
        match self {
            Material::Empty => &[],
            Material::Sand => &SAND_PALETTE,
            Material::Water => &WATER_PALETTE,
            Material::Rock => &ROCK_PALETTE,
        }
    }

    /// Draw a color from the palette
    pub fn random_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Rgb> {
        let palette = self.palette();
        if palette.is_empty() {
            return None;
        }
        Some(palette[rng.gen_range(0..palette.len())])
    }

    /// The first palette entry, used when a cell appears without going through creation
    pub fn base_color(&self) -> Option<Rgb> {
        self.palette().first().copied()
    }

    /// Whether this is the empty material
    pub fn is_empty(&self) -> bool {
        *self == Material::Empty
    }

    /// Run this material's rule for the cell at `pos`
    pub fn process<R: Rng + ?Sized>(
        &self,
        pos: Coord,
        grid: &mut ElementGrid,
        rng: &mut R,
    ) -> Movement {
        match self {
            Material::Empty => Movement::Stay,
            Material::Sand => Sand::process(pos, grid, rng),
            Material::Water => Water::process(pos, grid, rng),
            Material::Rock => Rock::process(pos, grid, rng),
        }
    }
}

/// The horizontal direction a water cell prefers to drift in
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquidBias {
    /// Drift toward x - 1
    #[default]
    Left,
    /// Drift toward x + 1
    Right,
}

impl LiquidBias {
    /// A fair coin flip between left and right
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            LiquidBias::Left
        } else {
            LiquidBias::Right
        }
    }

    /// The opposite direction
    pub fn flipped(&self) -> Self {
        match self {
            LiquidBias::Left => LiquidBias::Right,
            LiquidBias::Right => LiquidBias::Left,
        }
    }
}

/// One slot of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// What the cell holds
    pub material: Material,
    /// What the cell looks like
    pub color: Rgb,
    /// Only meaningful for water
    pub liquid_bias: LiquidBias,
}

impl Cell {
    /// An empty cell painted with the background
    pub fn empty(background: Rgb) -> Self {
        Self {
            material: Material::Empty,
            color: background,
            liquid_bias: LiquidBias::default(),
        }
    }
}

/// What a material rule did to its cell during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Nothing changed
    Stay,
    /// The contents moved into the empty cell at this coordinate
    Moved(Coord),
    /// The contents traded places with the occupied cell at this coordinate
    Swapped(Coord),
    /// A water cell hit a wall and now prefers the other direction
    BiasFlipped,
}

impl Movement {
    /// Whether the cell's contents left their coordinate
    pub fn relocated(&self) -> bool {
        matches!(self, Movement::Moved(_) | Movement::Swapped(_))
    }
}

/// The per tick behavior of a material
/// Rules only touch the grid through its primitives, so occupancy stays consistent.
pub trait Element {
    /// Apply the rule to the cell at `pos`
    fn process<R: Rng + ?Sized>(pos: Coord, grid: &mut ElementGrid, rng: &mut R) -> Movement;
}
