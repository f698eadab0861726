//! Input the engine consumes each tick.
//! The platform layer turns its own events into [ButtonEvent]s and pointer
//! positions, and hands the engine an [InputSnapshot] per tick.

use strum_macros::{Display, EnumIter};

use super::brush::Tool;
use super::elements::element::Material;
use super::util::vectors::ScreenPos;

/// The three logical pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum PointerButton {
    Primary,
    Secondary,
    Tertiary,
}

impl PointerButton {
    /// The material this button pours
    pub fn material(&self) -> Material {
        match self {
            PointerButton::Primary => Material::Sand,
            PointerButton::Secondary => Material::Water,
            PointerButton::Tertiary => Material::Rock,
        }
    }
}

/// A discrete change in button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed(PointerButton),
    Released(PointerButton),
}

/// Tracks which button is active.
/// The last pressed button wins. Releasing it hands control back to the most
/// recently pressed button that is still held.
#[derive(Debug, Clone, Default)]
pub struct ButtonTracker {
    /// Held buttons, oldest press first
    held: Vec<PointerButton>,
}

impl ButtonTracker {
    pub fn apply(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Pressed(button) => {
                self.held.retain(|held| *held != button);
                self.held.push(button);
            }
            ButtonEvent::Released(button) => {
                self.held.retain(|held| *held != button);
            }
        }
    }

    pub fn active(&self) -> Option<PointerButton> {
        self.held.last().copied()
    }
}

/// Everything the engine needs to know about input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Where the pointer is on screen, if it is over the window
    pub pointer: Option<ScreenPos>,
    /// The active button, if any
    pub button: Option<PointerButton>,
    /// Erase instead of pouring while a button is held
    pub erase: bool,
}

impl InputSnapshot {
    /// No pointer, no buttons
    pub fn idle() -> Self {
        Self::default()
    }

    /// A held button at a screen position
    pub fn pressed(button: PointerButton, pointer: ScreenPos) -> Self {
        Self {
            pointer: Some(pointer),
            button: Some(button),
            erase: false,
        }
    }

    /// What the brush should do this tick
    pub fn tool(&self) -> Option<Tool> {
        let button = self.button?;
        if self.erase {
            Some(Tool::Erase)
        } else {
            Some(Tool::Place(button.material()))
        }
    }
}
