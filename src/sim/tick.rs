//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame:
//! steer → spawn → move → collide → fire → age effects.

use glam::Vec2;

use super::state::{FrameStats, GamePhase, GameState};
use super::{collision, motion, spawn};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Relative ship movement (drag delta or held arrow keys)
    pub ship_delta: Vec2,
    /// Absolute ship position (pointer), applied after the delta
    pub ship_target: Option<Vec2>,
    /// Fire button / touch-on-ship held
    pub shooting: bool,
    /// Leave the start screen
    pub begin: bool,
}

/// Advance the game state by one frame
///
/// Outside `Playing` nothing moves; the only transition handled here besides
/// collisions is `Start → Playing` on `begin`.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.stats = FrameStats::default();

    if input.begin && state.phase == GamePhase::Start {
        state.phase = GamePhase::Playing;
        log::info!("Game started");
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;

    // Steer the ship
    if input.ship_delta != Vec2::ZERO {
        state.ship.move_by(input.ship_delta, &state.arena);
    }
    if let Some(target) = input.ship_target {
        state.ship.move_to(target, &state.arena);
    }

    spawn::spawn(state);
    motion::advance(state);
    collision::resolve(state);

    if state.phase == GamePhase::Playing {
        motion::fire(state, input.shooting);
    }

    state.effects.tick();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GameEvent, PowerupKind, Star, StarKind};
    use proptest::prelude::*;

    fn begin() -> TickInput {
        TickInput {
            begin: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_start_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Start);

        // Tick without begin - should stay on the title screen
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.frame, 0);

        tick(&mut state, &begin());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut state = GameState::new(4);
        tick(&mut state, &begin());
        let ship = state.ship.pos;
        state.stars.push(Star {
            pos: ship - Vec2::new(0.0, 2.0),
            size: 12.0,
            kind: StarKind::Falling,
        });

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));

        let frame = state.frame;
        let stars = state.stars.len();
        for _ in 0..100 {
            tick(&mut state, &begin());
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.frame, frame);
        assert_eq!(state.stars.len(), stars);
    }

    #[test]
    fn test_rapidfire_expires_after_600_frames() {
        let mut state = GameState::new(77);
        state.tuning.star_interval = 1_000_000;
        state.tuning.enemy_curve.base_interval = 1_000_000;
        state.tuning.powerup_base_interval = 1_000_000;
        state.tuning.powerup_min_interval = 1_000_000;
        tick(&mut state, &begin());

        state.effects.activate(PowerupKind::RapidFire, 600);
        assert_eq!(state.tuning.cooldown(state.effects.is_active(PowerupKind::RapidFire)), 5);

        for _ in 0..599 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.effects.is_active(PowerupKind::RapidFire));

        tick(&mut state, &TickInput::default());
        assert!(!state.effects.is_active(PowerupKind::RapidFire));
        assert_eq!(state.tuning.cooldown(state.effects.is_active(PowerupKind::RapidFire)), 10);
    }

    #[test]
    fn test_held_fire_respects_cooldown() {
        let mut state = GameState::new(8);
        state.trails = false;
        tick(&mut state, &begin());
        let fire = TickInput {
            shooting: true,
            ..Default::default()
        };
        let mut fired = 0;
        for _ in 0..30 {
            tick(&mut state, &fire);
            fired += state.stats.projectiles.spawned;
        }
        // Frames 11 and 22 (frame - last_shot must exceed 10)
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_ship_steering_is_clamped() {
        let mut state = GameState::new(2);
        tick(&mut state, &begin());
        tick(
            &mut state,
            &TickInput {
                ship_delta: Vec2::new(-500.0, 0.0),
                ..Default::default()
            },
        );
        assert_eq!(state.ship.pos.x, 10.0);
        tick(
            &mut state,
            &TickInput {
                ship_target: Some(Vec2::new(123.0, 456.0)),
                ..Default::default()
            },
        );
        assert_eq!(state.ship.pos, Vec2::new(123.0, 456.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            begin(),
            TickInput {
                shooting: true,
                ..Default::default()
            },
            TickInput {
                ship_delta: Vec2::new(3.0, 0.0),
                shooting: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.stars.len(), state2.stars.len());
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.particles.len(), state2.particles.len());
        assert_eq!(state1.ship.pos, state2.ship.pos);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_store_sizes_are_accounted(
            seed in any::<u64>(),
            moves in prop::collection::vec((-6.0f32..6.0, -6.0f32..6.0, any::<bool>()), 1..400),
        ) {
            let mut state = GameState::new(seed);
            tick(&mut state, &begin());

            for (dx, dy, shooting) in moves {
                if state.phase != GamePhase::Playing {
                    break;
                }
                let before = [
                    state.projectiles.len(),
                    state.stars.len(),
                    state.enemies.len(),
                    state.powerups.len(),
                    state.particles.len(),
                ];
                tick(&mut state, &TickInput {
                    ship_delta: Vec2::new(dx, dy),
                    shooting,
                    ..Default::default()
                });
                let stats = state.stats;
                let deltas = [stats.projectiles, stats.stars, stats.enemies, stats.powerups, stats.particles];
                let after = [
                    state.projectiles.len(),
                    state.stars.len(),
                    state.enemies.len(),
                    state.powerups.len(),
                    state.particles.len(),
                ];
                for k in 0..5 {
                    prop_assert_eq!(after[k], before[k] + deltas[k].spawned - deltas[k].removed);
                }
                prop_assert!(state.enemies.iter().all(|e| e.health >= 1));
            }
        }
    }
}
