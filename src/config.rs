//! Runtime settings for the sand window.

use std::str::FromStr;

use bevy::ecs::system::Resource;
use bevy::log::{warn, Level};

/// Settings read once at startup
#[derive(Resource, Debug, Clone)]
pub struct SandConfig {
    /// Screen pixels per grid cell along each axis
    pub cell_scale: usize,
    /// Simulation steps per second
    pub ticks_per_second: f64,
    /// Borderless fullscreen, or a plain window
    pub fullscreen: bool,
    /// Most verbose level that gets logged
    pub log_level: Level,
    /// Per crate overrides in `tracing` filter syntax, e.g. `wgpu=error,pixel_sand=debug`
    pub log_filter: String,
    /// Used to size the grid when no window can be found
    pub fallback_resolution: (f32, f32),
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            cell_scale: 8,
            ticks_per_second: 40.0,
            fullscreen: true,
            log_level: Level::INFO,
            log_filter: "wgpu=error,naga=warn".to_string(),
            fallback_resolution: (1280.0, 720.0),
        }
    }
}

impl SandConfig {
    /// Defaults, overridden by `SAND_CELL_SCALE`, `SAND_TICKS_PER_SECOND`,
    /// `SAND_WINDOWED` and `SAND_LOG_FILTER` when they are set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as from_env, with the variables coming from `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(cell_scale) = parse::<usize, _>(&lookup, "SAND_CELL_SCALE").filter(|s| *s > 0) {
            config.cell_scale = cell_scale;
        }
        if let Some(ticks) =
            parse::<f64, _>(&lookup, "SAND_TICKS_PER_SECOND").filter(|t| t.is_finite() && *t > 0.0)
        {
            config.ticks_per_second = ticks;
        }
        if let Some(windowed) = parse::<bool, _>(&lookup, "SAND_WINDOWED") {
            config.fullscreen = !windowed;
        }
        if let Some(filter) = lookup("SAND_LOG_FILTER").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter.trim().to_string();
        }
        config
    }
}

/// Parse one variable, warning and falling back to the default when it is malformed
fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}, it does not parse", key, raw);
            None
        }
    }
}
