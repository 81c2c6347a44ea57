//! Ball Chain - A drag-to-link ball matching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball registry, chain tracking, match resolution, session clock)
//! - `settings`: Data-driven game tuning
//! - `error`: Error types surfaced by the simulation and settings loading
//!
//! Rendering, physics and asset loading are left to the host. The host reads
//! ball fields and drains [`sim::GameEvent`]s each frame.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for a drag game)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of distinct ball categories
    pub const CATEGORY_COUNT: u8 = 5;
    /// Balls dropped into the field when a session starts
    pub const INITIAL_BALL_COUNT: u32 = 50;
    /// Score awarded per removed ball
    pub const POINTS_PER_BALL: u64 = 100;
    /// Session length in seconds
    pub const INITIAL_TIME_SECS: u32 = 60;
    /// Shortest chain that resolves into a match
    pub const MIN_CHAIN_LENGTH: usize = 3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 50.0;
    /// Max center distance between two consecutive balls in a chain
    pub const LINK_DISTANCE: f32 = 150.0;

    /// Opacity feedback
    pub const SELECTED_ALPHA: f32 = 0.5;
    pub const UNSELECTED_ALPHA: f32 = 1.0;

    /// Spawner defaults
    pub const SPAWN_MAX_RANGE: f32 = 400.0;
    pub const SPAWN_HEIGHT: f32 = 2000.0;
    pub const SPAWN_MAX_ROTATION_DEG: f32 = 35.0;
    pub const SPAWN_INTERVAL_SECS: f32 = 0.03;
}

/// Squared distance check without the sqrt
#[inline]
pub fn within_distance(a: Vec2, b: Vec2, max: f32) -> bool {
    a.distance_squared(b) < max * max
}
