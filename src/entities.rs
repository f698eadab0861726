//! Bevy entities and resources that carry the simulation.

pub mod canvas;
