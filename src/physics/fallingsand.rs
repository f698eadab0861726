//! Falling sand physics engine.
//! A fixed grid of cells holding sand, water and rock, advanced one tick
//! at a time by local movement rules.

pub mod brush;
pub mod data;
pub mod elements;
pub mod input;
pub mod process;
pub mod util;
