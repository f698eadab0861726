//! Bevy side input handling.

pub mod brush;
