use bevy::app::{App, Update};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::Fixed;
use bevy::window::{close_on_esc, WindowMode};
use pixel_sand::config::SandConfig;
use pixel_sand::entities::canvas::SandCanvasPlugin;
use pixel_sand::gui::brush::BrushPlugin;

fn main() {
    let config = SandConfig::from_env();
    let mode = if config.fullscreen {
        WindowMode::BorderlessFullscreen
    } else {
        WindowMode::Windowed
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    level: config.log_level,
                    filter: config.log_filter.clone(),
                    ..Default::default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Pixel Sand".into(),
                        mode,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Time::<Fixed>::from_hz(config.ticks_per_second))
        .insert_resource(config)
        .add_plugins((BrushPlugin, SandCanvasPlugin))
        .add_systems(Update, close_on_esc)
        .run();
}
