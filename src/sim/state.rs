//! Game state and core simulation types
//!
//! Everything one running game needs lives in [`GameState`]; the frame driver
//! in `tick` is the only thing that mutates it while playing.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::ActivePowerups;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current screen of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the begin action
    Start,
    /// Active gameplay
    Playing,
    /// Ship destroyed, waiting for name entry / restart
    GameOver,
}

/// Playfield dimensions in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl Arena {
    /// Largest 2:3 playfield that fits in 95% of the window, capped at the reference size
    pub fn fit(window_width: f32, window_height: f32) -> Self {
        let aspect = CANVAS_WIDTH / CANVAS_HEIGHT;
        if window_height <= 0.0 || window_width <= 0.0 {
            return Self::default();
        }
        if window_width / window_height > aspect {
            // Window is wider than the target ratio
            let height = (window_height * 0.95).min(CANVAS_HEIGHT);
            Self {
                width: height * aspect,
                height,
            }
        } else {
            let width = (window_width * 0.95).min(CANVAS_WIDTH);
            Self {
                width,
                height: width / aspect,
            }
        }
    }

    /// Scale of this arena relative to the 400x600 reference canvas
    pub fn scale(&self) -> f32 {
        self.width / CANVAS_WIDTH
    }

    /// True if the point lies inside the playfield (edges inclusive)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

/// The player's ship
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
}

impl Ship {
    /// Ship centred horizontally near the bottom edge
    pub fn new(arena: &Arena) -> Self {
        Self {
            pos: Vec2::new(arena.width / 2.0, arena.height - SHIP_START_OFFSET),
        }
    }

    /// Move by a relative delta (drag / arrow keys), staying inside the margins
    pub fn move_by(&mut self, delta: Vec2, arena: &Arena) {
        self.move_to(self.pos + delta, arena);
    }

    /// Jump to an absolute position (pointer), staying inside the margins
    pub fn move_to(&mut self, target: Vec2, arena: &Arena) {
        self.pos = Vec2::new(
            target.x.clamp(SHIP_MARGIN_X, (arena.width - SHIP_MARGIN_X).max(SHIP_MARGIN_X)),
            target.y.clamp(SHIP_MARGIN_Y, (arena.height - SHIP_MARGIN_Y).max(SHIP_MARGIN_Y)),
        );
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
}

/// What a star-store entry actually is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StarKind {
    /// Target drifting down the screen
    Falling,
    /// Aimed shot fired by a shooter enemy
    EnemyShot { vel: Vec2 },
}

/// A falling star or an enemy projectile (both hurt the ship and can be shot)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub kind: StarKind,
}

impl Star {
    pub fn is_enemy_projectile(&self) -> bool {
        matches!(self.kind, StarKind::EnemyShot { .. })
    }
}

/// Enemy behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slides toward the ship's column
    Chaser,
    /// Fires aimed shots at the ship
    Shooter,
    /// Bounces between the side margins
    Zigzag,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Chaser, EnemyKind::Shooter, EnemyKind::Zigzag];
}

/// An enemy entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Hits left; the enemy leaves its store as soon as this reaches zero
    pub health: u32,
    pub size: f32,
    pub vel: Vec2,
    /// Frame of the last shot (shooters only)
    pub last_shot: u64,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    RapidFire,
    TripleShot,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::RapidFire,
        PowerupKind::TripleShot,
        PowerupKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::RapidFire => "rapidfire",
            PowerupKind::TripleShot => "tripleshot",
            PowerupKind::Shield => "shield",
        }
    }
}

/// A collectible power-up drifting down
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub size: f32,
}

/// Particle flavours (draw identically, differ in emission parameters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Trail,
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: f32, // 1 → 0
    pub decay: f32,
    pub gravity: f32,
    pub color: [u8; 3],
    pub kind: ParticleKind,
}

/// Things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StarDestroyed { pos: Vec2 },
    EnemyHit { pos: Vec2 },
    EnemyDestroyed { kind: EnemyKind, pos: Vec2 },
    PowerupDropped { kind: PowerupKind },
    PowerupCollected { kind: PowerupKind },
    ShieldAbsorbed,
    GameOver { score: u32 },
}

/// Spawn/removal counts for one store during the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreDelta {
    pub spawned: usize,
    pub removed: usize,
}

/// Per-store bookkeeping for the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub projectiles: StoreDelta,
    pub stars: StoreDelta,
    pub enemies: StoreDelta,
    pub powerups: StoreDelta,
    pub particles: StoreDelta,
}

/// Complete simulation state for one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance constants
    pub tuning: Tuning,
    /// Playfield size
    pub arena: Arena,
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u32,
    /// Frames simulated since the game began
    pub frame: u64,
    /// Frame of the ship's last shot
    pub last_shot_frame: u64,
    /// Player ship
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    /// Falling stars and enemy shots
    pub stars: Vec<Star>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    /// Visual particles, oldest first
    pub particles: Vec<Particle>,
    /// Active power-up effects
    pub effects: ActivePowerups,
    /// Particle cap currently in force (tuning cap narrowed by settings)
    pub max_particles: usize,
    /// Emit cosmetic engine/projectile trails
    pub trails: bool,
    /// Events from the last tick
    pub events: Vec<GameEvent>,
    /// Store bookkeeping from the last tick
    pub stats: FrameStats,
    /// Seeded RNG driving every random decision
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new game with default tuning and the reference canvas
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), Arena::default())
    }

    /// Create a new game with explicit balance and playfield size
    pub fn with_tuning(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let max_particles = tuning.max_particles;
        Self {
            tuning,
            arena,
            phase: GamePhase::Start,
            score: 0,
            frame: 0,
            last_shot_frame: 0,
            ship: Ship::new(&arena),
            projectiles: Vec::new(),
            stars: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            effects: ActivePowerups::default(),
            max_particles,
            trails: true,
            events: Vec::new(),
            stats: FrameStats::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Back to the title screen with empty stores, zero score and fresh timers
    ///
    /// The RNG keeps running so consecutive games differ.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Start;
        self.score = 0;
        self.frame = 0;
        self.last_shot_frame = 0;
        self.ship = Ship::new(&self.arena);
        self.projectiles.clear();
        self.stars.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.particles.clear();
        self.effects.clear();
        self.events.clear();
        self.stats = FrameStats::default();
    }

    /// Resize the playfield, keeping the ship at the same relative position
    pub fn resize(&mut self, arena: Arena) {
        let rel = Vec2::new(
            self.ship.pos.x / self.arena.width,
            self.ship.pos.y / self.arena.height,
        );
        self.arena = arena;
        let target = Vec2::new(rel.x * arena.width, rel.y * arena.height);
        self.ship.move_to(target, &arena);
    }

    /// Narrow the particle cap (never above the tuning cap)
    pub fn set_particle_cap(&mut self, cap: usize) {
        self.max_particles = cap.min(self.tuning.max_particles);
    }

    /// Total live entities across all gameplay stores (particles excluded)
    pub fn entity_count(&self) -> usize {
        self.projectiles.len() + self.stars.len() + self.enemies.len() + self.powerups.len()
    }

    /// End the run; emits the event only on the first transition
    pub(crate) fn game_over(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over at frame {} with score {}", self.frame, self.score);
        }
    }
}
