//! Scene building: session state in, draw list out
//!
//! Nothing here mutates the game. The scene only keeps the backdrop
//! starfield and its own frame counter for UI animation (cursor blink).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_4, PI, TAU};

use super::draw::{Color, DrawCmd, Stroke, TextAlign, colors};
use super::layout::Layout;
use crate::leaderboard::display_name;
use crate::session::Session;
use crate::sim::{Enemy, EnemyKind, GamePhase, GameState, Powerup, PowerupKind, Star, StarKind};

/// Dots in the static backdrop
const BACKDROP_STARS: usize = 100;
/// Backdrop dot diameter
const BACKDROP_DOT: f32 = 2.0;
/// Ship triangle half-size before scaling
const SHIP_SIZE: f32 = 10.0;

/// Draw-list builder for one canvas
#[derive(Debug, Clone)]
pub struct Scene {
    /// Backdrop dots in unit coordinates so they survive resizes
    backdrop: Vec<Vec2>,
    /// Frames drawn so far
    ticks: u64,
    /// Measured frame rate shown when the setting is on
    pub fps: Option<u32>,
}

impl Scene {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let backdrop = (0..BACKDROP_STARS)
            .map(|_| Vec2::new(rng.random::<f32>(), rng.random::<f32>()))
            .collect();
        Self {
            backdrop,
            ticks: 0,
            fps: None,
        }
    }

    /// Build the draw list for the session's current screen
    pub fn build(&mut self, session: &Session) -> Vec<DrawCmd> {
        self.ticks += 1;
        let state = &session.state;
        let arena = state.arena;
        let layout = Layout::new(&arena);
        let mut cmds = Vec::with_capacity(64 + state.particles.len() + state.entity_count());

        cmds.push(DrawCmd::Clear(colors::BACKGROUND));

        if session.frame_error().is_some() {
            cmds.push(DrawCmd::text(
                "Game Error! Check console.",
                Vec2::new(arena.width / 2.0, arena.height / 2.0),
                20.0 * layout.scale,
                colors::ERROR,
                TextAlign::Center,
            ));
            return cmds;
        }

        for dot in &self.backdrop {
            let pos = Vec2::new(dot.x * arena.width, dot.y * arena.height);
            cmds.push(DrawCmd::circle(pos, BACKDROP_DOT, colors::WHITE));
        }

        match state.phase {
            GamePhase::Start => start_screen(&mut cmds, &layout, state),
            GamePhase::Playing => {
                playfield(&mut cmds, state, layout.scale);
                hud(&mut cmds, session, layout.scale);
            }
            GamePhase::GameOver => {
                if session.awaiting_name() {
                    self.name_prompt(&mut cmds, session, &layout);
                } else if session.showing_leaderboard() {
                    leaderboard_panel(&mut cmds, session, &layout);
                } else {
                    game_over_screen(&mut cmds, &layout, state);
                }
            }
        }

        if session.settings().show_fps {
            if let Some(fps) = self.fps {
                cmds.push(DrawCmd::text(
                    format!("{fps} fps"),
                    Vec2::new(arena.width - 50.0 * layout.scale, 20.0 * layout.scale),
                    12.0 * layout.scale,
                    colors::MUTED,
                    TextAlign::Left,
                ));
            }
        }

        cmds
    }

    fn name_prompt(&self, cmds: &mut Vec<DrawCmd>, session: &Session, layout: &Layout) {
        let s = layout.scale;
        let cx = session.state.arena.width / 2.0;

        cmds.push(DrawCmd::Rect {
            min: layout.name_panel.min,
            size: layout.name_panel.size,
            radius: 10.0 * s,
            fill: colors::PANEL,
        });
        cmds.push(DrawCmd::text(
            "Enter Your Name",
            Vec2::new(cx, 230.0 * s),
            24.0 * s,
            colors::WHITE,
            TextAlign::Center,
        ));

        let box_shade = if session.is_entering_name() { 220 } else { 180 };
        cmds.push(DrawCmd::Rect {
            min: layout.name_box.min,
            size: layout.name_box.size,
            radius: 5.0 * s,
            fill: Color::rgb(box_shade, box_shade, box_shade),
        });

        let cursor = if session.is_entering_name() && self.ticks % 30 < 15 {
            "|"
        } else {
            ""
        };
        cmds.push(DrawCmd::text(
            format!("{}{}", session.player_name(), cursor),
            Vec2::new(80.0 * s, 285.0 * s),
            18.0 * s,
            colors::BLACK,
            TextAlign::Left,
        ));

        if !session.player_name().trim().is_empty() {
            button(cmds, layout.submit_button.min, layout.submit_button.size, 5.0 * s, colors::BUTTON_START, "Submit", 16.0 * s);
        }

        cmds.push(DrawCmd::text(
            "Tap the box to enter your name",
            Vec2::new(cx, 380.0 * s),
            14.0 * s,
            colors::MUTED,
            TextAlign::Center,
        ));
    }
}

fn button(cmds: &mut Vec<DrawCmd>, min: Vec2, size: Vec2, radius: f32, fill: Color, label: &str, text_size: f32) {
    cmds.push(DrawCmd::Rect {
        min,
        size,
        radius,
        fill,
    });
    cmds.push(DrawCmd::text(label, min + size / 2.0, text_size, colors::WHITE, TextAlign::Center));
}

fn start_screen(cmds: &mut Vec<DrawCmd>, layout: &Layout, state: &GameState) {
    let s = layout.scale;
    cmds.push(DrawCmd::text(
        "Star Shooting Game",
        Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0 - 20.0 * s),
        24.0 * s,
        colors::WHITE,
        TextAlign::Center,
    ));
    let b = layout.start_button;
    button(cmds, b.min, b.size, 10.0 * s, colors::BUTTON_START, "START", 20.0 * s);
}

fn game_over_screen(cmds: &mut Vec<DrawCmd>, layout: &Layout, state: &GameState) {
    let s = layout.scale;
    let center = Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0);
    cmds.push(DrawCmd::text("Game Over", center - Vec2::new(0.0, 55.0 * s), 24.0 * s, colors::WHITE, TextAlign::Center));
    cmds.push(DrawCmd::text(
        format!("Final Score: {}", state.score),
        center - Vec2::new(0.0, 25.0 * s),
        24.0 * s,
        colors::WHITE,
        TextAlign::Center,
    ));

    let b = layout.start_button;
    button(cmds, b.min, b.size, 10.0 * s, colors::BUTTON_RESTART, "RESTART", 20.0 * s);
    let b = layout.leaderboard_button;
    button(cmds, b.min, b.size, 10.0 * s, colors::BUTTON_LEADERBOARD, "LEADERBOARD", 20.0 * s);
}

fn leaderboard_panel(cmds: &mut Vec<DrawCmd>, session: &Session, layout: &Layout) {
    let s = layout.scale;
    let cx = session.state.arena.width / 2.0;
    let at = |x: f32, y: f32| Vec2::new(x * s, y * s);

    cmds.push(DrawCmd::Rect {
        min: layout.board_panel.min,
        size: layout.board_panel.size,
        radius: 10.0 * s,
        fill: colors::PANEL_DARK,
    });
    cmds.push(DrawCmd::text("Leaderboard", Vec2::new(cx, 130.0 * s), 24.0 * s, colors::WHITE, TextAlign::Center));
    cmds.push(DrawCmd::text(
        format!("Your Score: {}", session.state.score),
        Vec2::new(cx, 155.0 * s),
        14.0 * s,
        colors::HIGHLIGHT,
        TextAlign::Center,
    ));

    let rows = session.leaderboard_rows();
    if rows.is_empty() {
        cmds.push(DrawCmd::text("No scores yet", Vec2::new(cx, 250.0 * s), 16.0 * s, colors::HIGHLIGHT, TextAlign::Center));
    } else {
        for (label, x) in [("Rank", 70.0), ("Player", 120.0), ("Score", 280.0)] {
            cmds.push(DrawCmd::text(label, at(x, 170.0), 16.0 * s, colors::MUTED, TextAlign::Left));
        }
        cmds.push(DrawCmd::Line {
            from: at(70.0, 180.0),
            to: at(330.0, 180.0),
            stroke: Stroke::new(colors::RULE, 1.0),
        });

        for (i, entry) in rows.iter().enumerate() {
            let y = 210.0 + i as f32 * 30.0;
            let color = if entry.name == session.player_name() {
                cmds.push(DrawCmd::Rect {
                    min: at(60.0, y - 15.0),
                    size: at(280.0, 22.0),
                    radius: 5.0 * s,
                    fill: colors::HIGHLIGHT_ROW,
                });
                colors::HIGHLIGHT
            } else {
                colors::WHITE
            };
            cmds.push(DrawCmd::text((i + 1).to_string(), at(70.0, y), 14.0 * s, color, TextAlign::Left));
            cmds.push(DrawCmd::text(display_name(&entry.name), at(120.0, y), 14.0 * s, color, TextAlign::Left));
            cmds.push(DrawCmd::text(entry.score.to_string(), at(280.0, y), 14.0 * s, color, TextAlign::Left));
        }
    }

    let b = layout.back_button;
    button(cmds, b.min, b.size, 5.0 * s, colors::BUTTON_START, "Back", 14.0 * s);
    cmds.push(DrawCmd::text("Press SPACE to Restart", Vec2::new(cx, 490.0 * s), 16.0 * s, colors::PROMPT, TextAlign::Center));
}

/// Entities and particles, back to front
fn playfield(cmds: &mut Vec<DrawCmd>, state: &GameState, scale: f32) {
    ship(cmds, state, scale);

    for shot in &state.projectiles {
        cmds.push(DrawCmd::rect(shot.pos - Vec2::new(1.0, 5.0), Vec2::new(2.0, 10.0), colors::WHITE));
    }
    for s in &state.stars {
        star(cmds, s);
    }
    for e in &state.enemies {
        enemy(cmds, e);
    }
    let pulse = (state.frame as f32 * 0.1).sin();
    for p in &state.powerups {
        powerup(cmds, p, pulse);
    }
    for p in &state.particles {
        let life = p.life.clamp(0.0, 1.0);
        cmds.push(DrawCmd::circle(p.pos, p.size * life, Color::from_rgb(p.color).with_alpha(life)));
    }
}

fn ship(cmds: &mut Vec<DrawCmd>, state: &GameState, scale: f32) {
    let pos = state.ship.pos;
    let size = SHIP_SIZE * scale;
    cmds.push(DrawCmd::triangle(
        pos + Vec2::new(0.0, -size),
        pos + Vec2::new(-size, size),
        pos + Vec2::new(size, size),
        colors::SHIP,
    ));
    cmds.push(DrawCmd::circle(pos, 5.0 * scale, colors::COCKPIT));
    if state.effects.is_active(PowerupKind::Shield) {
        cmds.push(DrawCmd::ring(pos, 30.0 * scale, Stroke::new(colors::SHIELD, 1.0)));
    }
}

fn star(cmds: &mut Vec<DrawCmd>, star: &Star) {
    match star.kind {
        StarKind::EnemyShot { .. } => cmds.push(DrawCmd::circle(star.pos, star.size, colors::ENEMY_SHOT)),
        StarKind::Falling => {
            let half = star.size / 2.0;
            let glint = Stroke::new(colors::STAR_GLINT, 1.0);
            cmds.push(DrawCmd::circle(star.pos, star.size, colors::STAR));
            cmds.push(DrawCmd::Line {
                from: star.pos - Vec2::new(0.0, half),
                to: star.pos + Vec2::new(0.0, half),
                stroke: glint,
            });
            cmds.push(DrawCmd::Line {
                from: star.pos - Vec2::new(half, 0.0),
                to: star.pos + Vec2::new(half, 0.0),
                stroke: glint,
            });
        }
    }
}

fn enemy(cmds: &mut Vec<DrawCmd>, enemy: &Enemy) {
    let p = enemy.pos;
    match enemy.kind {
        EnemyKind::Chaser => cmds.push(DrawCmd::triangle(
            p + Vec2::new(0.0, -10.0),
            p + Vec2::new(-10.0, 10.0),
            p + Vec2::new(10.0, 10.0),
            colors::CHASER,
        )),
        EnemyKind::Shooter => {
            cmds.push(DrawCmd::circle(p, enemy.size, colors::SHOOTER));
            cmds.push(DrawCmd::circle(p, 10.0, colors::WHITE));
        }
        EnemyKind::Zigzag => cmds.push(DrawCmd::Polygon {
            points: vec![
                p + Vec2::new(0.0, -10.0),
                p + Vec2::new(10.0, 0.0),
                p + Vec2::new(0.0, 10.0),
                p + Vec2::new(-10.0, 0.0),
            ],
            fill: colors::ZIGZAG,
        }),
    }
}

/// Power-up icon with a pulsing glow ring
fn powerup(cmds: &mut Vec<DrawCmd>, powerup: &Powerup, pulse: f32) {
    let p = powerup.pos;
    let size = powerup.size;

    let glow_alpha = (100.0 + pulse * 50.0) / 255.0;
    cmds.push(DrawCmd::ring(
        p,
        size + 5.0 + pulse * 3.0,
        Stroke::new(colors::WHITE.with_alpha(glow_alpha), 2.0),
    ));

    match powerup.kind {
        PowerupKind::RapidFire => {
            let third = size / 3.0;
            cmds.push(DrawCmd::Polygon {
                points: vec![
                    p + Vec2::new(0.0, -size),
                    p + Vec2::new(-third, -third),
                    p,
                    p + Vec2::new(-third, third),
                    p + Vec2::new(0.0, size),
                    p + Vec2::new(third, third),
                    p,
                    p + Vec2::new(third, -third),
                ],
                fill: colors::RAPID_FIRE,
            });
        }
        PowerupKind::TripleShot => {
            let half = size / 2.0;
            let side_len = size / 1.5;
            cmds.push(DrawCmd::rect(p + Vec2::new(-1.0, -half), Vec2::new(2.0, size), colors::TRIPLE_SHOT));
            cmds.push(DrawCmd::rect(p + Vec2::new(-half - 1.0, -size / 3.0), Vec2::new(2.0, side_len), colors::TRIPLE_SHOT));
            cmds.push(DrawCmd::rect(p + Vec2::new(half - 1.0, -size / 3.0), Vec2::new(2.0, side_len), colors::TRIPLE_SHOT));
            cmds.push(DrawCmd::Ellipse {
                center: p + Vec2::new(0.0, size / 3.0),
                radii: Vec2::new(half, size / 6.0),
                fill: Some(colors::TRIPLE_SHOT),
                stroke: None,
            });
        }
        PowerupKind::Shield => {
            let start = PI + FRAC_PI_4;
            let end = TAU + FRAC_PI_4;
            cmds.push(DrawCmd::Arc {
                center: p,
                radius: size * 0.75,
                start,
                end,
                fill: Some(colors::SHIELD_PICKUP),
                stroke: None,
            });
            cmds.push(DrawCmd::Arc {
                center: p,
                radius: size * 0.9,
                start,
                end,
                fill: None,
                stroke: Some(Stroke::new(colors::SHIELD_PICKUP, 2.0)),
            });
            cmds.push(DrawCmd::circle(p, size / 3.0, colors::WHITE));
        }
    }
}

/// Score line and active power-up countdowns
fn hud(cmds: &mut Vec<DrawCmd>, session: &Session, scale: f32) {
    let state = &session.state;
    cmds.push(DrawCmd::text(
        format!("Score: {}", state.score),
        Vec2::new(state.arena.width / 2.0, 30.0 * scale),
        20.0 * scale,
        colors::WHITE,
        TextAlign::Center,
    ));

    for (i, (kind, secs)) in session.active_powerups().into_iter().enumerate() {
        cmds.push(DrawCmd::text(
            format!("{}: {}s", kind.as_str(), secs),
            Vec2::new(10.0, 60.0 + 20.0 * i as f32),
            12.0 * scale,
            colors::WHITE,
            TextAlign::Left,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LocalLeaderboard;
    use crate::persistence::{KeyValueStore, MemoryStore, PLAYER_NAME_KEY};
    use crate::session::Action;
    use crate::sim::{Arena, Projectile};
    use crate::tuning::Tuning;

    fn session(store: MemoryStore) -> Session {
        Session::new(3, Tuning::default(), Arena::default(), Box::new(LocalLeaderboard::new()), Box::new(store))
    }

    fn texts(cmds: &[DrawCmd]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn crash(session: &mut Session) {
        let ship = session.state.ship.pos;
        session.state.stars.push(Star {
            pos: ship - Vec2::new(0.0, 2.0),
            size: 12.0,
            kind: StarKind::Falling,
        });
        session.frame();
    }

    #[test]
    fn test_start_screen() {
        let mut scene = Scene::new(1);
        let cmds = scene.build(&session(MemoryStore::new()));
        assert_eq!(cmds[0], DrawCmd::Clear(colors::BACKGROUND));
        let t = texts(&cmds);
        assert!(t.contains(&"Star Shooting Game".to_string()));
        assert!(t.contains(&"START".to_string()));
    }

    #[test]
    fn test_playing_draws_entities_and_hud() {
        let mut s = session(MemoryStore::new());
        s.handle(Action::BeginGame);
        s.frame();
        s.state.projectiles.push(Projectile { pos: Vec2::new(100.0, 100.0) });
        s.state.effects.activate(PowerupKind::RapidFire, 120);

        let mut scene = Scene::new(1);
        let cmds = scene.build(&s);
        let t = texts(&cmds);
        assert!(t.contains(&"Score: 0".to_string()));
        assert!(t.contains(&"rapidfire: 2s".to_string()));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Rect { size, .. } if *size == Vec2::new(2.0, 10.0))));
    }

    #[test]
    fn test_game_over_prompts_for_name() {
        let mut s = session(MemoryStore::new());
        s.handle(Action::BeginGame);
        s.frame();
        crash(&mut s);

        let mut scene = Scene::new(1);
        let t = texts(&scene.build(&s));
        assert!(t.contains(&"Enter Your Name".to_string()));
        // No submit button for an empty name
        assert!(!t.contains(&"Submit".to_string()));
    }

    #[test]
    fn test_leaderboard_highlights_player() {
        let mut store = MemoryStore::new();
        store.set(PLAYER_NAME_KEY, "AVeryLongPlayerName").unwrap();
        let mut s = session(store);
        s.handle(Action::BeginGame);
        s.frame();
        s.state.score = 40;
        crash(&mut s);
        assert!(s.showing_leaderboard());

        let mut scene = Scene::new(1);
        let cmds = scene.build(&s);
        let t = texts(&cmds);
        assert!(t.contains(&"AVeryLongPla...".to_string()));
        assert!(t.contains(&"Your Score: 40".to_string()));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Rect { fill, .. } if *fill == colors::HIGHLIGHT_ROW)));

        s.handle(Action::CloseLeaderboard);
        let t = texts(&scene.build(&s));
        assert!(t.contains(&"RESTART".to_string()));
        assert!(t.contains(&"Final Score: 40".to_string()));
    }

    #[test]
    fn test_frame_error_replaces_screen() {
        let mut s = session(MemoryStore::new());
        s.state.tuning.star_interval = 0;
        s.handle(Action::BeginGame);
        s.frame();

        let mut scene = Scene::new(1);
        let cmds = scene.build(&s);
        assert_eq!(cmds.len(), 2);
        assert_eq!(texts(&cmds), vec!["Game Error! Check console.".to_string()]);
    }
}
