//! Platform abstraction layer
//!
//! Turns raw browser input (key names, pointer and touch positions in canvas
//! pixels) into session [`Action`]s. Mouse and touch share one path: press,
//! drag and release.

use glam::Vec2;

use crate::renderer::Layout;
use crate::session::{Action, Session};
use crate::sim::GamePhase;

/// Ship movement per frame while a direction key is held
pub const KEY_MOVE_STEP: f32 = 5.0;
/// Touch radius around the ship (reference pixels) that starts firing
pub const SHOOT_TOUCH_RADIUS: f32 = 30.0;

/// Direction and fire keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

fn direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        _ => None,
    }
}

fn is_fire_key(key: &str) -> bool {
    matches!(key, "z" | "Z" | "j" | "J")
}

/// Stateful decoder from raw events to actions
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    held: HeldKeys,
    /// Last pointer position of an active drag
    anchor: Option<Vec2>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed (`KeyboardEvent.key` names)
    pub fn key_down(&mut self, key: &str, session: &Session) -> Vec<Action> {
        if session.awaiting_name() {
            return name_key(key, session);
        }

        if let Some(dir) = direction(key) {
            self.set_held(dir, true);
            return Vec::new();
        }
        if is_fire_key(key) {
            return vec![Action::StartShooting];
        }

        match (key, session.phase()) {
            (" ", GamePhase::Start) => vec![Action::BeginGame],
            (" ", GamePhase::GameOver) => vec![Action::RestartGame],
            ("l" | "L", GamePhase::GameOver) => vec![Action::ToggleLeaderboard],
            ("q" | "Q", _) => vec![Action::CycleQuality],
            ("f" | "F", _) => vec![Action::ToggleFps],
            _ => Vec::new(),
        }
    }

    /// Key released
    pub fn key_up(&mut self, key: &str) -> Vec<Action> {
        if let Some(dir) = direction(key) {
            self.set_held(dir, false);
        } else if is_fire_key(key) {
            return vec![Action::StopShooting];
        }
        Vec::new()
    }

    /// Movement from held direction keys, called once per simulation frame
    pub fn held_actions(&self) -> Option<Action> {
        let h = self.held;
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        let delta = Vec2::new(axis(h.left, h.right), axis(h.up, h.down)) * KEY_MOVE_STEP;
        (delta != Vec2::ZERO).then_some(Action::MoveBy(delta))
    }

    /// Mouse button or touch pressed at `pos` (canvas pixels)
    pub fn pointer_down(&mut self, pos: Vec2, session: &Session) -> Vec<Action> {
        let layout = Layout::new(&session.state.arena);
        match session.phase() {
            GamePhase::Start => {
                if layout.start_button.contains(pos) {
                    vec![Action::BeginGame]
                } else {
                    Vec::new()
                }
            }
            GamePhase::Playing => {
                self.anchor = Some(pos);
                if pos.distance(session.state.ship.pos) < SHOOT_TOUCH_RADIUS * layout.scale {
                    vec![Action::StartShooting]
                } else {
                    Vec::new()
                }
            }
            GamePhase::GameOver => {
                if session.awaiting_name() {
                    if layout.name_box.contains(pos) {
                        vec![Action::StartNameEntry]
                    } else if layout.submit_button.contains(pos) {
                        vec![Action::ConfirmName]
                    } else {
                        Vec::new()
                    }
                } else if session.showing_leaderboard() {
                    if layout.back_button.contains(pos) {
                        vec![Action::CloseLeaderboard]
                    } else {
                        Vec::new()
                    }
                } else if layout.start_button.contains(pos) {
                    vec![Action::RestartGame]
                } else if layout.leaderboard_button.contains(pos) {
                    vec![Action::ToggleLeaderboard]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Pointer moved; drags steer the ship by the pointer delta
    pub fn pointer_move(&mut self, pos: Vec2, session: &Session) -> Vec<Action> {
        if session.phase() != GamePhase::Playing {
            return Vec::new();
        }
        let Some(prev) = self.anchor else {
            return Vec::new();
        };
        self.anchor = Some(pos);
        if prev == pos {
            Vec::new()
        } else {
            vec![Action::MoveBy(pos - prev)]
        }
    }

    /// Mouse button or touch released
    pub fn pointer_up(&mut self) -> Vec<Action> {
        self.anchor = None;
        vec![Action::StopShooting]
    }

    /// Forget held keys and drags (focus lost)
    pub fn release_all(&mut self) -> Vec<Action> {
        self.held = HeldKeys::default();
        self.pointer_up()
    }

    fn set_held(&mut self, dir: Direction, down: bool) {
        match dir {
            Direction::Left => self.held.left = down,
            Direction::Right => self.held.right = down,
            Direction::Up => self.held.up = down,
            Direction::Down => self.held.down = down,
        }
    }
}

/// Keys while the name prompt is up
fn name_key(key: &str, session: &Session) -> Vec<Action> {
    if !session.is_entering_name() {
        return match key {
            "Enter" => vec![Action::StartNameEntry],
            _ => Vec::new(),
        };
    }
    match key {
        "Backspace" => vec![Action::Backspace],
        "Enter" => vec![Action::ConfirmName],
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => vec![Action::TypeChar(c)],
                // Named keys like "Shift" or "Tab"
                _ => Vec::new(),
            }
        }
    }
}
