//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` is one frame; every timer counts frames
//! - Seeded RNG only
//! - Stable iteration order (insertion order, scanned newest first for collisions)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod motion;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::touches;
pub use effects::ActivePowerups;
pub use spawn::{EnemyBand, enemy_band, powerup_interval};
pub use state::{
    Arena, Enemy, EnemyKind, FrameStats, GameEvent, GamePhase, GameState, Particle, ParticleKind,
    Powerup, PowerupKind, Projectile, Ship, Star, StarKind, StoreDelta,
};
pub use tick::{TickInput, tick};
