//! Frame-driven spawning with score-based difficulty
//!
//! Each entity class spawns when the frame counter is a multiple of its
//! current interval.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameState, Powerup, PowerupKind, Star, StarKind};
use crate::tuning::{EnemyCurve, Tuning};

/// Enemy spawn parameters for a score band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBand {
    /// Frames between spawns
    pub interval: u64,
    /// Multiplier on the base fall speed
    pub speed_multiplier: f32,
    /// Health before the zigzag bonus
    pub base_health: u32,
}

/// Enemy spawn interval, speed and health for the given score
pub fn enemy_band(score: u32, curve: &EnemyCurve) -> EnemyBand {
    let base_health = if score < curve.ramp_score {
        1
    } else {
        1 + (score - curve.ramp_score) / curve.health_score_step
    };

    if score < curve.warmup_score {
        EnemyBand {
            interval: curve.base_interval,
            speed_multiplier: curve.speed_multipliers[0],
            base_health,
        }
    } else if score < curve.ramp_score {
        let steps = ((score - curve.warmup_score) / curve.warmup_score_step) as u64;
        EnemyBand {
            interval: curve
                .base_interval
                .saturating_sub(steps * curve.warmup_interval_step)
                .max(curve.warmup_floor),
            speed_multiplier: curve.speed_multipliers[1],
            base_health,
        }
    } else if score < curve.max_score {
        let steps = ((score - curve.ramp_score) / curve.ramp_score_step) as u64;
        EnemyBand {
            interval: curve
                .warmup_floor
                .saturating_sub(steps * curve.ramp_interval_step)
                .max(curve.min_interval),
            speed_multiplier: curve.speed_multipliers[2],
            base_health,
        }
    } else {
        EnemyBand {
            interval: curve.min_interval,
            speed_multiplier: curve.speed_multipliers[2],
            base_health,
        }
    }
}

/// Frames between random power-up spawns at the given score
pub fn powerup_interval(score: u32, tuning: &Tuning) -> u64 {
    let steps = (score / tuning.powerup_score_step) as u64;
    tuning
        .powerup_base_interval
        .saturating_sub(steps * tuning.powerup_interval_step)
        .max(tuning.powerup_min_interval)
}

/// Uniform x inside `[margin, width - margin)`, collapsing to the centre on tiny arenas
fn random_x<R: Rng>(rng: &mut R, width: f32, margin: f32) -> f32 {
    let hi = width - margin;
    if hi > margin {
        rng.random_range(margin..hi)
    } else {
        width / 2.0
    }
}

pub fn random_powerup_kind<R: Rng>(rng: &mut R) -> PowerupKind {
    PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())]
}

/// Run every spawner for the current frame
pub fn spawn(state: &mut GameState) {
    let frame = state.frame;

    if frame % state.tuning.star_interval == 0 {
        spawn_star(state);
    }

    let band = enemy_band(state.score, &state.tuning.enemy_curve);
    if frame % band.interval == 0 {
        spawn_enemy(state, band);
    }

    if frame % powerup_interval(state.score, &state.tuning) == 0 {
        let x = random_x(&mut state.rng, state.arena.width, state.tuning.powerup_spawn_margin);
        let kind = random_powerup_kind(&mut state.rng);
        spawn_powerup(state, Vec2::new(x, 0.0), kind);
    }
}

/// Add a falling star along the top edge
pub fn spawn_star(state: &mut GameState) {
    let tuning = &state.tuning;
    let x = random_x(&mut state.rng, state.arena.width, tuning.star_spawn_margin);
    let size = state.rng.random_range(tuning.star_size_min..tuning.star_size_max);
    state.stars.push(Star {
        pos: Vec2::new(x, 0.0),
        size,
        kind: StarKind::Falling,
    });
    state.stats.stars.spawned += 1;
}

/// Add a random enemy along the top edge using the band's speed and health
pub fn spawn_enemy(state: &mut GameState, band: EnemyBand) {
    let tuning = &state.tuning;
    let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
    let x = random_x(&mut state.rng, state.arena.width, tuning.enemy_spawn_margin);

    let (health, size, vel_x) = match kind {
        EnemyKind::Chaser => (band.base_health, tuning.enemy_size, 0.0),
        EnemyKind::Shooter => (band.base_health, tuning.shooter_size, 0.0),
        EnemyKind::Zigzag => {
            let dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            (
                band.base_health + tuning.zigzag_bonus_health,
                tuning.enemy_size,
                tuning.zigzag_speed * dir,
            )
        }
    };

    log::debug!("Spawning {:?} (health {}) at frame {}", kind, health, state.frame);
    state.enemies.push(Enemy {
        pos: Vec2::new(x, 0.0),
        kind,
        health,
        size,
        vel: Vec2::new(vel_x, tuning.enemy_base_speed * band.speed_multiplier),
        last_shot: state.frame,
    });
    state.stats.enemies.spawned += 1;
}

/// Add a power-up at an explicit position (random spawn or enemy drop)
pub fn spawn_powerup(state: &mut GameState, pos: Vec2, kind: PowerupKind) {
    state.powerups.push(Powerup {
        pos,
        kind,
        size: state.tuning.powerup_size,
    });
    state.stats.powerups.spawned += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_enemy_band_boundaries() {
        let curve = EnemyCurve::default();

        let band = enemy_band(0, &curve);
        assert_eq!(band, EnemyBand { interval: 180, speed_multiplier: 1.0, base_health: 1 });

        let band = enemy_band(49, &curve);
        assert_eq!(band.interval, 180);

        let band = enemy_band(50, &curve);
        assert_eq!(band, EnemyBand { interval: 180, speed_multiplier: 1.5, base_health: 1 });

        let band = enemy_band(75, &curve);
        assert_eq!(band.interval, 160);

        let band = enemy_band(99, &curve);
        assert_eq!(band.interval, 140);

        let band = enemy_band(100, &curve);
        assert_eq!(band, EnemyBand { interval: 100, speed_multiplier: 2.0, base_health: 1 });

        let band = enemy_band(160, &curve);
        assert_eq!(band.interval, 85);
        assert_eq!(band.base_health, 2);

        let band = enemy_band(299, &curve);
        assert_eq!(band.interval, 55);
        assert_eq!(band.base_health, 4);

        let band = enemy_band(300, &curve);
        assert_eq!(band, EnemyBand { interval: 30, speed_multiplier: 2.0, base_health: 5 });
    }

    #[test]
    fn test_powerup_interval_steps() {
        let tuning = Tuning::default();
        assert_eq!(powerup_interval(0, &tuning), 300);
        assert_eq!(powerup_interval(74, &tuning), 300);
        assert_eq!(powerup_interval(75, &tuning), 280);
        assert_eq!(powerup_interval(600, &tuning), 140);
        assert_eq!(powerup_interval(10_000, &tuning), 120);
    }

    #[test]
    fn test_star_spawns_every_sixty_frames() {
        let mut state = GameState::new(5);
        for frame in 1..=120 {
            state.frame = frame;
            spawn(&mut state);
        }
        assert_eq!(state.stars.len(), 2);
        for star in &state.stars {
            assert_eq!(star.pos.y, 0.0);
            assert!(star.pos.x >= 20.0 && star.pos.x < 380.0);
            assert!(star.size >= 10.0 && star.size < 20.0);
            assert_eq!(star.kind, StarKind::Falling);
        }
    }

    #[test]
    fn test_spawned_enemy_shape() {
        let mut state = GameState::new(11);
        state.frame = 180;
        let band = enemy_band(0, &state.tuning.enemy_curve);
        for _ in 0..30 {
            spawn_enemy(&mut state, band);
        }
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= 30.0 && enemy.pos.x < 370.0);
            assert_eq!(enemy.last_shot, 180);
            assert_eq!(enemy.vel.y, 1.5);
            match enemy.kind {
                EnemyKind::Chaser => {
                    assert_eq!(enemy.health, 1);
                    assert_eq!(enemy.size, 20.0);
                    assert_eq!(enemy.vel.x, 0.0);
                }
                EnemyKind::Shooter => {
                    assert_eq!(enemy.health, 1);
                    assert_eq!(enemy.size, 25.0);
                }
                EnemyKind::Zigzag => {
                    assert_eq!(enemy.health, 3);
                    assert_eq!(enemy.vel.x.abs(), 1.5);
                }
            }
        }
        assert_eq!(state.stats.enemies.spawned, 30);
    }

    proptest! {
        #[test]
        fn prop_enemy_interval_never_grows_with_score(a in 0u32..1000, b in 0u32..1000) {
            let curve = EnemyCurve::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let easy = enemy_band(lo, &curve);
            let hard = enemy_band(hi, &curve);
            prop_assert!(hard.interval <= easy.interval);
            prop_assert!(hard.speed_multiplier >= easy.speed_multiplier);
            prop_assert!(hard.base_health >= easy.base_health);
            prop_assert!(hard.interval >= curve.min_interval);
        }

        #[test]
        fn prop_powerup_interval_clamped(score in 0u32..100_000) {
            let tuning = Tuning::default();
            let interval = powerup_interval(score, &tuning);
            prop_assert!(interval >= 120 && interval <= 300);
        }
    }
}
