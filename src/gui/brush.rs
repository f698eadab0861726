use bevy::app::{App, Plugin, Update};
use bevy::ecs::query::With;
use bevy::ecs::system::{Query, Res, ResMut, Resource};
use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::input::Input;
use bevy::log::debug;
use bevy::math::Vec2;
use bevy::render::camera::Camera;
use bevy::transform::components::{GlobalTransform, Transform};
use bevy::window::{PrimaryWindow, Window};

use crate::entities::canvas::CanvasSprite;
use crate::physics::fallingsand::input::{ButtonEvent, ButtonTracker, InputSnapshot, PointerButton};
use crate::physics::fallingsand::util::vectors::ScreenPos;

/// Samples the mouse into an [InputSnapshot] for the simulation.
pub struct BrushPlugin;

impl Plugin for BrushPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>().add_systems(
            Update,
            (
                PointerInput::track_buttons_system,
                PointerInput::track_cursor_system,
            ),
        );
    }
}

/// The latest pointer state, read by the simulation each tick
#[derive(Resource, Default, Debug, Clone)]
pub struct PointerInput {
    tracker: ButtonTracker,
    position: Option<ScreenPos>,
    erase: bool,
}

impl PointerInput {
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            pointer: self.position,
            button: self.tracker.active(),
            erase: self.erase,
        }
    }
}

/// Left pours sand, right pours water, middle pours rock
fn logical_button(button: &MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Tertiary),
        MouseButton::Other(_) => None,
    }
}

/// Bevy Systems
impl PointerInput {
    pub fn track_buttons_system(
        mouse: Res<Input<MouseButton>>,
        keys: Res<Input<KeyCode>>,
        mut pointer: ResMut<PointerInput>,
    ) {
        for button in mouse.get_just_pressed().filter_map(logical_button) {
            debug!("{} pressed", button);
            pointer.tracker.apply(ButtonEvent::Pressed(button));
        }
        for button in mouse.get_just_released().filter_map(logical_button) {
            debug!("{} released", button);
            pointer.tracker.apply(ButtonEvent::Released(button));
        }
        // Holding shift turns any button into an eraser
        pointer.erase = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    }

    /// Follow the cursor in canvas pixels, through the camera and the canvas sprite
    pub fn track_cursor_system(
        windows: Query<&Window, With<PrimaryWindow>>,
        cameras: Query<(&Camera, &GlobalTransform)>,
        canvas: Query<&Transform, With<CanvasSprite>>,
        mut pointer: ResMut<PointerInput>,
    ) {
        let Some(cursor) = windows
            .get_single()
            .ok()
            .and_then(|window| window.cursor_position())
        else {
            pointer.position = None;
            return;
        };
        let world = cameras
            .get_single()
            .ok()
            .and_then(|(camera, transform)| camera.viewport_to_world_2d(transform, cursor));
        pointer.position = match (world, canvas.get_single()) {
            (Some(world), Ok(origin)) => Some(canvas_pixel(world, origin.translation.truncate())),
            _ => None,
        };
    }
}

/// A world position relative to the canvas's top left corner `origin`.
/// World y grows upward, canvas y grows downward.
pub fn canvas_pixel(world: Vec2, origin: Vec2) -> ScreenPos {
    ScreenPos::new(world.x - origin.x, origin.y - world.y)
}
