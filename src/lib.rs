//! Star Shooter - A single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (spawning, movement, collisions, effects)
//! - `session`: Screen flow around the simulation (name entry, leaderboard, restart)
//! - `renderer`: Platform-neutral draw list plus the canvas backend
//! - `platform`: Raw input events decoded into game actions
//! - `persistence`: Key/value storage and the remembered player name
//! - `leaderboard`: Score submission and top-N fetch
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (quality preset, trails)
//! - `error`: Typed errors for storage, names, tuning and the leaderboard

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LeaderboardError, NameError, StorageError, TuningError};
pub use leaderboard::{LeaderboardEntry, LeaderboardService, LocalLeaderboard};
pub use session::{Action, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frames per second; every timer in the simulation counts frames
    pub const FRAME_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Reference canvas dimensions (2:3 portrait)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ship keeps this far from the left/right edges
    pub const SHIP_MARGIN_X: f32 = 10.0;
    /// Ship keeps this far from the top/bottom edges
    pub const SHIP_MARGIN_Y: f32 = 20.0;
    /// Ship spawns this far above the bottom edge
    pub const SHIP_START_OFFSET: f32 = 50.0;
    /// Half-height of the ship sprite (engine trail anchor)
    pub const SHIP_HALF_SIZE: f32 = 10.0;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 20;
    /// Rows shown on the leaderboard
    pub const LEADERBOARD_SIZE: usize = 10;
}

/// Whole seconds remaining for a frame countdown (rounded up)
#[inline]
pub fn frames_to_seconds(frames: u32) -> u32 {
    frames.div_ceil(consts::FRAME_RATE)
}
