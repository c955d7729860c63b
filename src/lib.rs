//! Gorbage Truck - a pseudo-3D lane runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projection, entities, spawning, collisions)
//! - `audio`: Procedural music sequencer and sound effects
//! - `renderer`: Procedural scene builder and WebGPU pipeline
//! - `game`: Frame loop orchestration and session state machine
//! - `input`: Keyboard/touch to lane and jump commands
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod storage;
pub mod theme;
pub mod tuning;

pub use error::{Error, Result};
pub use game::Game;
pub use highscores::{HighScores, ScoreSink};
pub use settings::{QualityPreset, Settings};
pub use theme::{Theme, TimeOfDay};

/// Screen and camera constants
pub mod consts {
    /// Logical canvas size (portrait, 2:3)
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 900.0;
    /// Screen row of the vanishing horizon
    pub const HORIZON_Y: f32 = 300.0;

    /// Pinhole camera
    pub const CAMERA_HEIGHT: f32 = 200.0;
    pub const CAMERA_DISTANCE: f32 = 150.0;
    pub const FOV: f32 = 400.0;
    /// Points with `z + CAMERA_DISTANCE` at or below this are not drawn
    pub const MIN_DEPTH: f32 = 10.0;

    /// Distance fog ramp (world z)
    pub const FOG_START: f32 = 1500.0;
    pub const FOG_END: f32 = 3000.0;

    /// Nominal tick rate; every timer in `tuning` counts these
    pub const TICKS_PER_SECOND: u32 = 60;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wall-clock hour (0-23) used to pick the session theme.
#[cfg(target_arch = "wasm32")]
pub fn local_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

/// Native builds have no timezone database; UTC is close enough.
#[cfg(not(target_arch = "wasm32"))]
pub fn local_hour() -> u32 {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ((secs / 3600) % 24) as u32
}
