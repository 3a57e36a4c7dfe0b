//! Data-driven game balance
//!
//! Every gameplay constant lives here so a difficulty curve can be swapped
//! without touching the simulation. `Tuning::default()` is the responsive
//! (touch) curve; JSON overrides may be partial.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Enemy spawn curve, piecewise in score
///
/// Bands:
/// - `score < warmup_score`: `base_interval`, speed x`speed_multipliers[0]`, health 1
/// - `< ramp_score`: interval shrinks by `warmup_interval_step` every
///   `warmup_score_step` points down to `warmup_floor`, x`speed_multipliers[1]`
/// - `< max_score`: interval shrinks by `ramp_interval_step` every
///   `ramp_score_step` points down to `min_interval`, x`speed_multipliers[2]`,
///   health grows by one every `health_score_step` points
/// - above: `min_interval`, x`speed_multipliers[2]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCurve {
    pub base_interval: u64,
    pub warmup_floor: u64,
    pub min_interval: u64,
    pub warmup_score: u32,
    pub ramp_score: u32,
    pub max_score: u32,
    pub warmup_score_step: u32,
    pub warmup_interval_step: u64,
    pub ramp_score_step: u32,
    pub ramp_interval_step: u64,
    pub health_score_step: u32,
    pub speed_multipliers: [f32; 3],
}

impl Default for EnemyCurve {
    fn default() -> Self {
        Self {
            base_interval: 180,
            warmup_floor: 100,
            min_interval: 30,
            warmup_score: 50,
            ramp_score: 100,
            max_score: 300,
            warmup_score_step: 10,
            warmup_interval_step: 10,
            ramp_score_step: 20,
            ramp_interval_step: 5,
            health_score_step: 50,
            speed_multipliers: [1.0, 1.5, 2.0],
        }
    }
}

/// Game balance values (all timers in frames, all distances in canvas pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Stars ===
    pub star_interval: u64,
    pub star_speed: f32,
    pub star_size_min: f32,
    pub star_size_max: f32,
    pub star_spawn_margin: f32,

    // === Ship weapons ===
    pub projectile_speed: f32,
    pub shot_cooldown: u64,
    pub rapidfire_cooldown: u64,
    /// Horizontal offset of the side shots in a triple shot
    pub triple_spread: f32,

    // === Enemies ===
    pub enemy_curve: EnemyCurve,
    pub enemy_base_speed: f32,
    pub enemy_spawn_margin: f32,
    pub enemy_size: f32,
    pub shooter_size: f32,
    pub chaser_step: f32,
    pub zigzag_speed: f32,
    pub zigzag_margin: f32,
    pub zigzag_bonus_health: u32,
    pub shooter_fire_interval: u64,
    pub enemy_shot_speed: f32,
    pub enemy_shot_size: f32,

    // === Powerups ===
    pub powerup_base_interval: u64,
    pub powerup_interval_step: u64,
    pub powerup_score_step: u32,
    pub powerup_min_interval: u64,
    pub powerup_speed: f32,
    pub powerup_size: f32,
    pub powerup_spawn_margin: f32,
    pub powerup_duration: u32,
    pub drop_chance_base: f64,
    pub drop_chance_score_divisor: f64,
    pub drop_chance_bonus_cap: f64,

    // === Collisions & scoring ===
    pub projectile_hit_margin: f32,
    pub ship_hit_margin: f32,
    pub star_points: u32,
    pub enemy_points: u32,

    // === Particles ===
    pub max_particles: usize,
    pub star_explosion: usize,
    pub hit_explosion: usize,
    pub kill_explosion: usize,
    pub engine_trail_every: u64,
    pub projectile_trail_every: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            star_interval: 60,
            star_speed: 2.0,
            star_size_min: 10.0,
            star_size_max: 20.0,
            star_spawn_margin: 20.0,

            projectile_speed: 10.0,
            shot_cooldown: 10,
            rapidfire_cooldown: 5,
            triple_spread: 8.0,

            enemy_curve: EnemyCurve::default(),
            enemy_base_speed: 1.5,
            enemy_spawn_margin: 30.0,
            enemy_size: 20.0,
            shooter_size: 25.0,
            chaser_step: 1.0,
            zigzag_speed: 1.5,
            zigzag_margin: 20.0,
            zigzag_bonus_health: 2,
            shooter_fire_interval: 120,
            enemy_shot_speed: 3.0,
            enemy_shot_size: 10.0,

            powerup_base_interval: 300,
            powerup_interval_step: 20,
            powerup_score_step: 75,
            powerup_min_interval: 120,
            powerup_speed: 1.5,
            powerup_size: 15.0,
            powerup_spawn_margin: 20.0,
            powerup_duration: 600, // 10 seconds
            drop_chance_base: 0.2,
            drop_chance_score_divisor: 500.0,
            drop_chance_bonus_cap: 0.3,

            projectile_hit_margin: 5.0,
            ship_hit_margin: 10.0,
            star_points: 1,
            enemy_points: 5,

            max_particles: 300,
            star_explosion: 10,
            hit_explosion: 5,
            kill_explosion: 20,
            engine_trail_every: 3,
            projectile_trail_every: 2,
        }
    }
}

impl Tuning {
    /// Parse (possibly partial) JSON overrides on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the frame loop (zero modulus, empty random ranges)
    pub fn validate(&self) -> Result<(), TuningError> {
        let curve = &self.enemy_curve;
        let intervals = [
            ("star_interval", self.star_interval),
            ("enemy_curve.min_interval", curve.min_interval),
            ("enemy_curve.warmup_floor", curve.warmup_floor),
            ("enemy_curve.base_interval", curve.base_interval),
            ("powerup_min_interval", self.powerup_min_interval),
            ("engine_trail_every", self.engine_trail_every),
            ("projectile_trail_every", self.projectile_trail_every),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, v)| *v == 0) {
            return Err(TuningError::Invalid(format!("{name} must be non-zero")));
        }
        if curve.warmup_score_step == 0
            || curve.ramp_score_step == 0
            || curve.health_score_step == 0
            || self.powerup_score_step == 0
        {
            return Err(TuningError::Invalid("score steps must be non-zero".into()));
        }
        if !(curve.warmup_score <= curve.ramp_score && curve.ramp_score <= curve.max_score) {
            return Err(TuningError::Invalid("enemy score bands must be ascending".into()));
        }
        if self.star_size_min >= self.star_size_max {
            return Err(TuningError::Invalid("star_size_min must be below star_size_max".into()));
        }
        if self.drop_chance_base < 0.0
            || self.drop_chance_bonus_cap < 0.0
            || self.drop_chance_base + self.drop_chance_bonus_cap > 1.0
            || self.drop_chance_score_divisor <= 0.0
        {
            return Err(TuningError::Invalid("drop chance must stay within [0, 1]".into()));
        }
        let speeds = [
            self.star_speed,
            self.projectile_speed,
            self.enemy_base_speed,
            self.powerup_speed,
            self.enemy_shot_speed,
        ];
        if speeds.iter().any(|s| *s < 0.0 || !s.is_finite()) {
            return Err(TuningError::Invalid("speeds must be finite and non-negative".into()));
        }
        Ok(())
    }

    /// Cooldown between shots, shortened while rapid fire is active
    pub fn cooldown(&self, rapidfire: bool) -> u64 {
        if rapidfire {
            self.rapidfire_cooldown
        } else {
            self.shot_cooldown
        }
    }

    /// Probability that a destroyed enemy drops a powerup at the given score
    pub fn drop_chance(&self, score: u32) -> f64 {
        self.drop_chance_base
            + (score as f64 / self.drop_chance_score_divisor).min(self.drop_chance_bonus_cap)
    }
}
