//! Per-frame movement and lifecycle for every store
//!
//! Each entity class has one motion rule and one removal predicate. Stores
//! are compacted with `retain` so no holes survive the frame.

use glam::Vec2;

use super::particles::{self, Palette};
use super::state::{EnemyKind, GameState, PowerupKind, Projectile, Star, StarKind};
use crate::consts::SHIP_HALF_SIZE;

/// Advance all stores by one frame (ship trail, shots, stars, enemies, power-ups, particles)
pub fn advance(state: &mut GameState) {
    ship_trail(state);
    move_projectiles(state);
    move_stars(state);
    move_enemies(state);
    move_powerups(state);

    let removed = particles::update(&mut state.particles, state.max_particles);
    state.stats.particles.removed += removed;
}

/// Engine exhaust behind the ship
fn ship_trail(state: &mut GameState) {
    if !state.trails || state.frame % state.tuning.engine_trail_every != 0 {
        return;
    }
    let pos = state.ship.pos + Vec2::new(0.0, SHIP_HALF_SIZE * state.arena.scale());
    state.stats.particles.spawned +=
        particles::trail(&mut state.particles, &mut state.rng, state.max_particles, pos, Palette::Engine);
}

pub fn move_projectiles(state: &mut GameState) {
    let speed = state.tuning.projectile_speed;
    let emit_trail = state.trails && state.frame % state.tuning.projectile_trail_every == 0;

    for shot in state.projectiles.iter_mut() {
        shot.pos.y -= speed;
        if emit_trail {
            state.stats.particles.spawned += particles::trail(
                &mut state.particles,
                &mut state.rng,
                state.max_particles,
                shot.pos,
                Palette::Projectile,
            );
        }
    }

    let before = state.projectiles.len();
    state.projectiles.retain(|p| p.pos.y >= 0.0);
    state.stats.projectiles.removed += before - state.projectiles.len();
}

pub fn move_stars(state: &mut GameState) {
    let fall = state.tuning.star_speed;
    for star in state.stars.iter_mut() {
        match star.kind {
            StarKind::Falling => star.pos.y += fall,
            StarKind::EnemyShot { vel } => star.pos += vel,
        }
    }

    let arena = state.arena;
    let before = state.stars.len();
    state.stars.retain(|s| arena.contains(s.pos));
    state.stats.stars.removed += before - state.stars.len();
}

pub fn move_enemies(state: &mut GameState) {
    let GameState {
        tuning,
        arena,
        ship,
        frame,
        enemies,
        stars,
        stats,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        match enemy.kind {
            EnemyKind::Chaser => {
                if enemy.pos.x < ship.pos.x {
                    enemy.pos.x += tuning.chaser_step;
                } else if enemy.pos.x > ship.pos.x {
                    enemy.pos.x -= tuning.chaser_step;
                }
                enemy.pos.y += enemy.vel.y;
            }
            EnemyKind::Shooter => {
                enemy.pos.y += enemy.vel.y;
                if frame.saturating_sub(enemy.last_shot) > tuning.shooter_fire_interval {
                    let to_ship = ship.pos - enemy.pos;
                    let angle = to_ship.y.atan2(to_ship.x);
                    stars.push(Star {
                        pos: enemy.pos,
                        size: tuning.enemy_shot_size,
                        kind: StarKind::EnemyShot {
                            vel: Vec2::new(angle.cos(), angle.sin()) * tuning.enemy_shot_speed,
                        },
                    });
                    stats.stars.spawned += 1;
                    enemy.last_shot = *frame;
                }
            }
            EnemyKind::Zigzag => {
                enemy.pos += enemy.vel;
                if enemy.pos.x < tuning.zigzag_margin
                    || enemy.pos.x > arena.width - tuning.zigzag_margin
                {
                    enemy.vel.x = -enemy.vel.x;
                }
            }
        }
    }

    let before = enemies.len();
    let bottom = arena.height;
    enemies.retain(|e| e.pos.y <= bottom);
    stats.enemies.removed += before - enemies.len();
}

pub fn move_powerups(state: &mut GameState) {
    let fall = state.tuning.powerup_speed;
    for powerup in state.powerups.iter_mut() {
        powerup.pos.y += fall;
    }

    let bottom = state.arena.height;
    let before = state.powerups.len();
    state.powerups.retain(|p| p.pos.y <= bottom);
    state.stats.powerups.removed += before - state.powerups.len();
}

/// Fire from the ship if the trigger is held and the cooldown has elapsed
///
/// Returns the number of projectiles fired.
pub fn fire(state: &mut GameState, trigger_held: bool) -> usize {
    if !trigger_held {
        return 0;
    }
    let cooldown = state
        .tuning
        .cooldown(state.effects.is_active(PowerupKind::RapidFire));
    if state.frame.saturating_sub(state.last_shot_frame) <= cooldown {
        return 0;
    }

    let ship = state.ship.pos;
    let before = state.projectiles.len();
    state.projectiles.push(Projectile {
        pos: ship - Vec2::new(0.0, 10.0),
    });
    if state.effects.is_active(PowerupKind::TripleShot) {
        let spread = state.tuning.triple_spread;
        state.projectiles.push(Projectile {
            pos: ship + Vec2::new(-spread, -5.0),
        });
        state.projectiles.push(Projectile {
            pos: ship + Vec2::new(spread, -5.0),
        });
    }
    state.last_shot_frame = state.frame;

    let fired = state.projectiles.len() - before;
    state.stats.projectiles.spawned += fired;
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, Enemy, Powerup};
    use crate::tuning::Tuning;

    fn enemy(kind: EnemyKind, pos: Vec2, vel: Vec2) -> Enemy {
        Enemy {
            pos,
            kind,
            health: 1,
            size: 20.0,
            vel,
            last_shot: 0,
        }
    }

    fn quiet_state() -> GameState {
        let mut state = GameState::new(9);
        state.trails = false;
        state
    }

    #[test]
    fn test_engine_trail_sits_below_scaled_ship() {
        let arena = Arena { width: 200.0, height: 300.0 };
        let mut state = GameState::with_tuning(4, Tuning::default(), arena);
        state.frame = 3;
        ship_trail(&mut state);

        assert_eq!(state.particles.len(), 1);
        let expected = state.ship.pos.y + SHIP_HALF_SIZE * 0.5;
        assert!((state.particles[0].pos.y - expected).abs() <= 2.0);
    }

    #[test]
    fn test_projectiles_move_up_and_leave() {
        let mut state = quiet_state();
        state.projectiles.push(Projectile { pos: Vec2::new(100.0, 25.0) });
        state.projectiles.push(Projectile { pos: Vec2::new(100.0, 5.0) });
        move_projectiles(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.y, 15.0);
        assert_eq!(state.stats.projectiles.removed, 1);
    }

    #[test]
    fn test_enemy_shot_follows_velocity() {
        let mut state = quiet_state();
        state.stars.push(Star {
            pos: Vec2::new(100.0, 100.0),
            size: 10.0,
            kind: StarKind::EnemyShot { vel: Vec2::new(-3.0, 0.0) },
        });
        state.stars.push(Star {
            pos: Vec2::new(1.0, 100.0),
            size: 10.0,
            kind: StarKind::EnemyShot { vel: Vec2::new(-3.0, 0.0) },
        });
        state.stars.push(Star {
            pos: Vec2::new(50.0, 599.0),
            size: 12.0,
            kind: StarKind::Falling,
        });
        move_stars(&mut state);
        assert_eq!(state.stars.len(), 1);
        assert_eq!(state.stars[0].pos, Vec2::new(97.0, 100.0));
        assert_eq!(state.stats.stars.removed, 2);
    }

    #[test]
    fn test_chaser_steps_toward_ship() {
        let mut state = quiet_state();
        state.ship.pos = Vec2::new(200.0, 550.0);
        state.enemies.push(enemy(EnemyKind::Chaser, Vec2::new(100.0, 0.0), Vec2::new(0.0, 1.5)));
        state.enemies.push(enemy(EnemyKind::Chaser, Vec2::new(300.0, 0.0), Vec2::new(0.0, 1.5)));
        state.enemies.push(enemy(EnemyKind::Chaser, Vec2::new(200.0, 0.0), Vec2::new(0.0, 1.5)));
        move_enemies(&mut state);
        assert_eq!(state.enemies[0].pos, Vec2::new(101.0, 1.5));
        assert_eq!(state.enemies[1].pos, Vec2::new(299.0, 1.5));
        assert_eq!(state.enemies[2].pos, Vec2::new(200.0, 1.5));
    }

    #[test]
    fn test_zigzag_bounces_off_margin() {
        let mut state = quiet_state();
        state.enemies.push(enemy(EnemyKind::Zigzag, Vec2::new(21.0, 50.0), Vec2::new(-1.5, 1.5)));
        move_enemies(&mut state);
        assert_eq!(state.enemies[0].pos, Vec2::new(19.5, 51.5));
        assert_eq!(state.enemies[0].vel.x, 1.5);
    }

    #[test]
    fn test_shooter_fires_after_interval() {
        let mut state = quiet_state();
        state.ship.pos = Vec2::new(100.0, 500.0);
        state.enemies.push(enemy(EnemyKind::Shooter, Vec2::new(100.0, 100.0), Vec2::new(0.0, 1.0)));

        state.frame = 120;
        move_enemies(&mut state);
        assert!(state.stars.is_empty());

        state.frame = 121;
        move_enemies(&mut state);
        assert_eq!(state.stars.len(), 1);
        assert_eq!(state.enemies[0].last_shot, 121);
        let shot = state.stars[0];
        assert!(shot.is_enemy_projectile());
        assert_eq!(shot.size, 10.0);
        if let StarKind::EnemyShot { vel } = shot.kind {
            assert!(vel.x.abs() < 1e-4);
            assert!((vel.y - 3.0).abs() < 1e-4);
        }
        assert_eq!(state.stats.stars.spawned, 1);
    }

    #[test]
    fn test_enemies_removed_below_bottom() {
        let mut state = quiet_state();
        state.enemies.push(enemy(EnemyKind::Chaser, Vec2::new(200.0, 599.0), Vec2::new(0.0, 2.0)));
        move_enemies(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.enemies.removed, 1);
    }

    #[test]
    fn test_powerups_fall() {
        let mut state = quiet_state();
        state.powerups.push(Powerup {
            pos: Vec2::new(50.0, 0.0),
            kind: PowerupKind::Shield,
            size: 15.0,
        });
        move_powerups(&mut state);
        assert_eq!(state.powerups[0].pos.y, 1.5);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = quiet_state();
        state.frame = 11;
        assert_eq!(fire(&mut state, true), 1);
        assert_eq!(state.projectiles[0].pos, state.ship.pos - Vec2::new(0.0, 10.0));

        state.frame = 21;
        assert_eq!(fire(&mut state, true), 0);
        state.frame = 22;
        assert_eq!(fire(&mut state, true), 1);
        state.frame = 40;
        assert_eq!(fire(&mut state, false), 0);
    }

    #[test]
    fn test_rapidfire_halves_cooldown() {
        let mut state = quiet_state();
        state.effects.activate(PowerupKind::RapidFire, 600);
        state.frame = 6;
        assert_eq!(fire(&mut state, true), 1);
        state.frame = 12;
        assert_eq!(fire(&mut state, true), 1);
    }

    #[test]
    fn test_tripleshot_pattern() {
        let mut state = quiet_state();
        state.effects.activate(PowerupKind::TripleShot, 600);
        state.frame = 20;
        assert_eq!(fire(&mut state, true), 3);
        let ship = state.ship.pos;
        let positions: Vec<Vec2> = state.projectiles.iter().map(|p| p.pos).collect();
        assert_eq!(
            positions,
            vec![
                ship + Vec2::new(0.0, -10.0),
                ship + Vec2::new(-8.0, -5.0),
                ship + Vec2::new(8.0, -5.0),
            ]
        );
    }

    #[test]
    fn test_trails_spawn_particles() {
        let mut state = GameState::new(1);
        state.frame = 6; // multiple of both trail periods
        state.projectiles.push(Projectile { pos: Vec2::new(100.0, 300.0) });
        advance(&mut state);
        assert_eq!(state.stats.particles.spawned, 2);
        assert_eq!(state.particles.len(), 2);
    }
}
