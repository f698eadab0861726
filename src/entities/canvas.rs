//! The sand grid as a bevy resource, drawn into a single texture.

use bevy::app::{App, FixedUpdate, Plugin, Startup, Update};
use bevy::asset::{Assets, Handle};
use bevy::core_pipeline::core_2d::Camera2dBundle;
use bevy::ecs::component::Component;
use bevy::ecs::entity::Entity;
use bevy::ecs::event::EventReader;
use bevy::ecs::query::With;
use bevy::ecs::schedule::common_conditions::{not, resource_exists};
use bevy::ecs::schedule::IntoSystemConfigs;
use bevy::ecs::system::{Commands, Local, Query, Res, ResMut, Resource};
use bevy::log::{debug, info, trace, warn};
use bevy::render::texture::Image;
use bevy::sprite::{Anchor, Sprite, SpriteBundle};
use bevy::transform::components::Transform;
use bevy::window::{PrimaryWindow, Window, WindowResized};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SandConfig;
use crate::gui::brush::PointerInput;
use crate::physics::fallingsand::data::element_grid::{ElementGrid, ElementGridBuilder};
use crate::physics::fallingsand::elements::element::Rgb;
use crate::physics::fallingsand::process;
use crate::physics::fallingsand::util::image::{fill_cell_rgba, RawImage, RenderSink};
use crate::physics::fallingsand::util::vectors::Coord;

/// Frames a fullscreen window gets to report its real size before the grid
/// is sized from whatever the window says
const RESIZE_WAIT_FRAMES: u32 = 30;

/// Creates the grid and its texture once the window knows its size, steps it
/// on the fixed clock, and paints whatever changed every frame.
pub struct SandCanvasPlugin;

impl Plugin for SandCanvasPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, SandWorld::camera_system)
            .add_systems(
                Update,
                SandWorld::create_system.run_if(not(resource_exists::<SandWorld>())),
            )
            .add_systems(FixedUpdate, SandWorld::step_system)
            .add_systems(Update, SandWorld::paint_system);
    }
}

/// The simulation state and its random source
#[derive(Resource)]
pub struct SandWorld {
    pub grid: ElementGrid,
    rng: StdRng,
}

impl SandWorld {
    pub fn new(grid: ElementGrid) -> Self {
        Self {
            grid,
            rng: StdRng::from_entropy(),
        }
    }
}

/// The texture the grid is painted into
#[derive(Resource)]
pub struct CanvasImage(pub Handle<Image>);

/// Marks the sprite showing the grid. Its translation is the canvas's top left corner.
#[derive(Component, Debug, Default)]
pub struct CanvasSprite;

/// How long grid creation has been waiting on the window
#[derive(Default)]
pub struct CreateState {
    frames_waited: u32,
    gave_up: bool,
}

/// Pick the logical resolution to size the grid for, or None to keep waiting.
/// `reported` is the latest size from a resize event, `window` is what the
/// window currently claims. Until winit reports back, a fullscreen window
/// still claims its requested size rather than the monitor's.
pub fn startup_resolution(
    reported: Option<(f32, f32)>,
    window: Option<(f32, f32)>,
    config: &SandConfig,
    frames_waited: u32,
) -> Option<(f32, f32)> {
    if let Some(size) = reported.filter(|(w, h)| *w >= 1.0 && *h >= 1.0) {
        return Some(size);
    }
    match window {
        None => Some(config.fallback_resolution),
        Some(size) if !config.fullscreen || frames_waited >= RESIZE_WAIT_FRAMES => Some(size),
        Some(_) => None,
    }
}

/// Paints straight into the pixel data of a bevy image
struct ImageSink<'a>(&'a mut Image);

impl RenderSink for ImageSink<'_> {
    fn draw_cell(&mut self, pos: Coord, color: Rgb, cell_size: usize) {
        let size = self.0.texture_descriptor.size;
        fill_cell_rgba(
            &mut self.0.data,
            size.width as usize,
            size.height as usize,
            pos,
            color,
            cell_size,
        );
    }
}

/// Bevy Systems
impl SandWorld {
    pub fn camera_system(mut commands: Commands) {
        commands.spawn(Camera2dBundle::default());
    }

    /// Size the grid to the window and put its texture on screen
    pub fn create_system(
        mut commands: Commands,
        mut resized: EventReader<WindowResized>,
        windows: Query<(Entity, &Window), With<PrimaryWindow>>,
        mut images: ResMut<Assets<Image>>,
        config: Res<SandConfig>,
        mut state: Local<CreateState>,
    ) {
        if state.gave_up {
            return;
        }
        let primary = windows.get_single().ok();
        let reported = resized
            .read()
            .filter(|event| primary.is_some_and(|(entity, _)| event.window == entity))
            .map(|event| (event.width, event.height))
            .last();
        let window = primary.map(|(_, window)| (window.width(), window.height()));
        let Some((width_px, height_px)) =
            startup_resolution(reported, window, &config, state.frames_waited)
        else {
            state.frames_waited += 1;
            return;
        };
        match (reported, window) {
            (Some(_), _) => debug!("Window reported {}x{}", width_px, height_px),
            (None, None) => warn!(
                "No primary window, sizing the grid for {:?}",
                config.fallback_resolution
            ),
            (None, Some(_)) if config.fullscreen => warn!(
                "Window never reported its size, using {}x{}",
                width_px, height_px
            ),
            (None, Some(_)) => {}
        }

        let mut grid = match ElementGridBuilder::new()
            .from_resolution(width_px as usize, height_px as usize, config.cell_scale)
            .build()
        {
            Ok(grid) => grid,
            Err(err) => {
                warn!("Not starting the simulation: {}", err);
                state.gave_up = true;
                return;
            }
        };
        // First frame paints the background everywhere
        grid.mark_all_dirty();

        let texture = images.add(
            RawImage::new(
                grid.get_width() * config.cell_scale,
                grid.get_height() * config.cell_scale,
            )
            .to_bevy_image(),
        );
        // Pin the texture's top left corner to the window's
        commands.spawn((
            SpriteBundle {
                texture: texture.clone(),
                sprite: Sprite {
                    anchor: Anchor::TopLeft,
                    ..Default::default()
                },
                transform: Transform::from_xyz(-width_px / 2.0, height_px / 2.0, 0.0),
                ..Default::default()
            },
            CanvasSprite,
        ));
        info!(
            "Simulating {}x{} cells at {} ticks per second",
            grid.get_width(),
            grid.get_height(),
            config.ticks_per_second
        );
        commands.insert_resource(CanvasImage(texture));
        commands.insert_resource(SandWorld::new(grid));
    }

    /// One simulation tick per fixed timestep
    pub fn step_system(
        world: Option<ResMut<SandWorld>>,
        pointer: Res<PointerInput>,
        config: Res<SandConfig>,
    ) {
        let Some(mut world) = world else {
            return;
        };
        let input = pointer.snapshot();
        let SandWorld { grid, rng } = &mut *world;
        process::step(grid, &input, config.cell_scale, rng);
    }

    /// Drain the change queue into the texture
    pub fn paint_system(
        world: Option<ResMut<SandWorld>>,
        canvas: Option<Res<CanvasImage>>,
        mut images: ResMut<Assets<Image>>,
        config: Res<SandConfig>,
    ) {
        let (Some(mut world), Some(canvas)) = (world, canvas) else {
            return;
        };
        if world.grid.pending_changes() == 0 {
            return;
        }
        let Some(image) = images.get_mut(&canvas.0) else {
            warn!("Canvas texture is missing");
            return;
        };
        let painted = world.grid.flush(&mut ImageSink(image), config.cell_scale);
        trace!("Painted {} cells", painted);
    }
}
