//! Collision detection and response
//!
//! Runs once per frame over already-moved positions. Every test is a circle
//! proximity check: `distance < size / 2 + margin`. Stores are scanned newest
//! to oldest and the first match consumes the projectile.

use glam::Vec2;
use rand::Rng;

use super::particles::{self, Palette};
use super::spawn::{random_powerup_kind, spawn_powerup};
use super::state::{GameEvent, GameState, PowerupKind};

/// Proximity test shared by every collision pair
#[inline]
pub fn touches(a: Vec2, b: Vec2, size: f32, margin: f32) -> bool {
    a.distance(b) < size / 2.0 + margin
}

/// Resolve every collision pair in priority order
///
/// A game-over triggered midway does not stop the remaining checks.
pub fn resolve(state: &mut GameState) {
    projectile_hits(state);
    collect_powerups(state);
    star_ship_hits(state);
    enemy_ship_hits(state);
}

/// Player shots against stars first, then enemies
fn projectile_hits(state: &mut GameState) {
    let margin = state.tuning.projectile_hit_margin;

    let mut i = state.projectiles.len();
    while i > 0 {
        i -= 1;
        let shot = state.projectiles[i].pos;

        if let Some(j) = state
            .stars
            .iter()
            .rposition(|s| touches(shot, s.pos, s.size, margin))
        {
            let star = state.stars.remove(j);
            state.stats.stars.removed += 1;
            state.stats.particles.spawned += particles::explosion(
                &mut state.particles,
                &mut state.rng,
                state.max_particles,
                star.pos,
                Palette::Yellow,
                state.tuning.star_explosion,
            );
            state.projectiles.remove(i);
            state.stats.projectiles.removed += 1;
            state.score += state.tuning.star_points;
            state.events.push(GameEvent::StarDestroyed { pos: star.pos });
            continue;
        }

        if let Some(j) = state
            .enemies
            .iter()
            .rposition(|e| touches(shot, e.pos, e.size, margin))
        {
            hit_enemy(state, j, shot);
            state.projectiles.remove(i);
            state.stats.projectiles.removed += 1;
        }
    }
}

/// Apply one point of damage to enemy `j`; destroy it when health runs out
fn hit_enemy(state: &mut GameState, j: usize, shot: Vec2) {
    let enemy = &mut state.enemies[j];
    enemy.health = enemy.health.saturating_sub(1);
    let (enemy_pos, enemy_kind, dead) = (enemy.pos, enemy.kind, enemy.health == 0);

    state.stats.particles.spawned += particles::explosion(
        &mut state.particles,
        &mut state.rng,
        state.max_particles,
        shot,
        Palette::Red,
        state.tuning.hit_explosion,
    );
    state.events.push(GameEvent::EnemyHit { pos: shot });

    if !dead {
        return;
    }

    state.stats.particles.spawned += particles::explosion(
        &mut state.particles,
        &mut state.rng,
        state.max_particles,
        enemy_pos,
        Palette::Red,
        state.tuning.kill_explosion,
    );

    // Drop chance uses the score before this kill is counted
    let chance = state.tuning.drop_chance(state.score);
    if state.rng.random::<f64>() < chance {
        let kind = random_powerup_kind(&mut state.rng);
        spawn_powerup(state, enemy_pos, kind);
        state.events.push(GameEvent::PowerupDropped { kind });
    }

    state.enemies.remove(j);
    state.stats.enemies.removed += 1;
    state.score += state.tuning.enemy_points;
    state.events.push(GameEvent::EnemyDestroyed {
        kind: enemy_kind,
        pos: enemy_pos,
    });
}

/// Ship picks up power-ups it touches
fn collect_powerups(state: &mut GameState) {
    let ship = state.ship.pos;
    let margin = state.tuning.ship_hit_margin;

    let mut i = state.powerups.len();
    while i > 0 {
        i -= 1;
        let powerup = state.powerups[i];
        if touches(ship, powerup.pos, powerup.size, margin) {
            state.powerups.remove(i);
            state.stats.powerups.removed += 1;
            state
                .effects
                .activate(powerup.kind, state.tuning.powerup_duration);
            state.events.push(GameEvent::PowerupCollected { kind: powerup.kind });
        }
    }
}

/// Shield absorbs one hit; returns false if the ship had no shield
fn absorb_hit(state: &mut GameState) -> bool {
    if state.effects.consume(PowerupKind::Shield) {
        state.events.push(GameEvent::ShieldAbsorbed);
        true
    } else {
        false
    }
}

fn star_ship_hits(state: &mut GameState) {
    let ship = state.ship.pos;
    let margin = state.tuning.ship_hit_margin;

    let mut i = state.stars.len();
    while i > 0 {
        i -= 1;
        let star = state.stars[i];
        if !touches(ship, star.pos, star.size, margin) {
            continue;
        }
        if absorb_hit(state) {
            state.stars.remove(i);
            state.stats.stars.removed += 1;
        } else {
            state.game_over();
        }
    }
}

fn enemy_ship_hits(state: &mut GameState) {
    let ship = state.ship.pos;
    let margin = state.tuning.ship_hit_margin;

    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;
        let enemy = state.enemies[i];
        if !touches(ship, enemy.pos, enemy.size, margin) {
            continue;
        }
        if absorb_hit(state) {
            state.enemies.remove(i);
            state.stats.enemies.removed += 1;
        } else {
            state.game_over();
        }
    }
}
