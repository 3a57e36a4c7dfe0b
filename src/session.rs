//! Game session: the screen flow wrapped around the simulation
//!
//! The session owns the [`GameState`] plus everything that is not gameplay:
//! the player name, the leaderboard view and its backend, local storage and
//! settings. Platform code feeds it [`Action`]s and calls [`Session::frame`]
//! once per simulation step.

use std::panic::{self, AssertUnwindSafe};

use glam::Vec2;
use rand::Rng;

use crate::consts::{LEADERBOARD_SIZE, MAX_NAME_LEN};
use crate::frames_to_seconds;
use crate::leaderboard::{LeaderboardEntry, LeaderboardService};
use crate::persistence::{self, KeyValueStore};
use crate::settings::Settings;
use crate::sim::{Arena, GameEvent, GamePhase, GameState, PowerupKind, TickInput, tick};
use crate::tuning::Tuning;

/// Decoded player intents
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Relative ship movement, accumulated until the next frame
    MoveBy(Vec2),
    /// Absolute ship position (pointer)
    MoveTo(Vec2),
    StartShooting,
    StopShooting,
    /// Leave the title screen
    BeginGame,
    /// Back to the title screen after game over
    RestartGame,
    ToggleLeaderboard,
    CloseLeaderboard,
    /// Focus the name field
    StartNameEntry,
    TypeChar(char),
    Backspace,
    /// Confirm the name typed so far
    ConfirmName,
    /// Replace the name and confirm it (text field submit)
    SubmitName(String),
    /// Step to the next graphics quality preset
    CycleQuality,
    ToggleFps,
}

/// One player's run of games
pub struct Session {
    pub state: GameState,
    settings: Settings,
    player_name: String,
    name_confirmed: bool,
    entering_name: bool,
    show_leaderboard: bool,
    leaderboard_rows: Vec<LeaderboardEntry>,
    score_submitted: bool,
    frame_error: Option<String>,
    shooting: bool,
    pending_delta: Vec2,
    pending_target: Option<Vec2>,
    begin_requested: bool,
    board: Box<dyn LeaderboardService>,
    store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Start a session on the title screen
    ///
    /// A name already saved in `store` counts as confirmed, so the first game
    /// over goes straight to the leaderboard.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        arena: Arena,
        board: Box<dyn LeaderboardService>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut state = GameState::with_tuning(seed, tuning, arena);
        let settings = Settings::load(store.as_ref());
        settings.apply_to(&mut state);

        let saved_name = persistence::load_name(store.as_ref());
        let name_confirmed = saved_name.is_some();

        Self {
            state,
            settings,
            player_name: saved_name.unwrap_or_default(),
            name_confirmed,
            entering_name: false,
            show_leaderboard: true,
            leaderboard_rows: Vec::new(),
            score_submitted: false,
            frame_error: None,
            shooting: false,
            pending_delta: Vec2::ZERO,
            pending_target: None,
            begin_requested: false,
            board,
            store,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn name_confirmed(&self) -> bool {
        self.name_confirmed
    }

    pub fn is_entering_name(&self) -> bool {
        self.entering_name
    }

    /// Leaderboard overlay is visible (only meaningful after game over)
    pub fn showing_leaderboard(&self) -> bool {
        self.state.phase == GamePhase::GameOver && self.name_confirmed && self.show_leaderboard
    }

    /// Last fetched leaderboard rows
    pub fn leaderboard_rows(&self) -> &[LeaderboardEntry] {
        &self.leaderboard_rows
    }

    pub fn score_submitted(&self) -> bool {
        self.score_submitted
    }

    /// Panic message from the last frame, if it failed
    pub fn frame_error(&self) -> Option<&str> {
        self.frame_error.as_deref()
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change settings, apply them to the running game and persist them
    fn update_settings(&mut self, settings: Settings) {
        settings.apply_to(&mut self.state);
        settings.save(self.store.as_mut());
        self.settings = settings;
    }

    pub fn resize(&mut self, arena: Arena) {
        self.state.resize(arena);
    }

    /// Active power-ups with whole seconds remaining, for the HUD
    pub fn active_powerups(&self) -> Vec<(PowerupKind, u32)> {
        self.state
            .effects
            .active()
            .map(|(kind, frames)| (kind, frames_to_seconds(frames)))
            .collect()
    }

    /// Apply one decoded input action
    pub fn handle(&mut self, action: Action) {
        match action {
            Action::MoveBy(delta) => {
                if self.state.phase == GamePhase::Playing {
                    self.pending_delta += delta;
                }
            }
            Action::MoveTo(pos) => {
                if self.state.phase == GamePhase::Playing {
                    self.pending_target = Some(pos);
                }
            }
            Action::StartShooting => self.shooting = true,
            Action::StopShooting => self.shooting = false,
            Action::BeginGame => {
                if self.state.phase == GamePhase::Start {
                    self.begin_requested = true;
                }
            }
            Action::RestartGame => self.restart(),
            Action::ToggleLeaderboard => self.toggle_leaderboard(),
            Action::CloseLeaderboard => self.show_leaderboard = false,
            Action::StartNameEntry => {
                if self.awaiting_name() {
                    self.entering_name = true;
                }
            }
            Action::TypeChar(c) => {
                if self.awaiting_name()
                    && !c.is_control()
                    && self.player_name.chars().count() < MAX_NAME_LEN
                {
                    self.player_name.push(c);
                }
            }
            Action::Backspace => {
                if self.awaiting_name() {
                    self.player_name.pop();
                }
            }
            Action::ConfirmName => self.confirm_name(),
            Action::SubmitName(name) => {
                if self.awaiting_name() {
                    self.player_name = name.chars().take(MAX_NAME_LEN).collect();
                    self.confirm_name();
                }
            }
            Action::CycleQuality => {
                let preset = self.settings.quality.next();
                log::info!("Quality set to {}", preset.as_str());
                let mut settings = self.settings.clone();
                settings.apply_preset(preset);
                self.update_settings(settings);
            }
            Action::ToggleFps => {
                let mut settings = self.settings.clone();
                settings.show_fps = !settings.show_fps;
                self.update_settings(settings);
            }
        }
    }

    /// Name prompt is on screen
    pub fn awaiting_name(&self) -> bool {
        self.state.phase == GamePhase::GameOver && !self.name_confirmed
    }

    /// Run one simulation frame, then the post-frame leaderboard work
    ///
    /// A panic inside the simulation is caught here. The state is rolled back
    /// to before the frame and the message is kept for display.
    pub fn frame(&mut self) {
        let input = TickInput {
            ship_delta: std::mem::take(&mut self.pending_delta),
            ship_target: self.pending_target.take(),
            shooting: self.shooting,
            begin: std::mem::take(&mut self.begin_requested),
        };

        let snapshot = self.state.clone();
        let state = &mut self.state;
        // wasm32-unknown-unknown aborts on panic, so this only catches natively
        let result = panic::catch_unwind(AssertUnwindSafe(|| tick(state, &input)));
        match result {
            Ok(()) => self.frame_error = None,
            Err(payload) => {
                self.state = snapshot;
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown error".to_string());
                log::error!("Frame {} failed: {}", self.state.frame, message);
                self.frame_error = Some(message);
                return;
            }
        }

        if self
            .state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            self.shooting = false;
        }

        if self.state.phase == GamePhase::GameOver && self.name_confirmed && !self.score_submitted {
            self.submit_score();
        }
    }

    /// Post the final score once; failures are logged and not retried
    fn submit_score(&mut self) {
        self.score_submitted = true;
        let score = self.state.score;
        log::info!("Submitting score {} for {}", score, self.player_name);
        match self.board.submit(&self.player_name, score) {
            Ok(()) => self.fetch_leaderboard(),
            Err(e) => log::error!("Error submitting score: {}", e),
        }
    }

    /// Refresh the displayed rows; on failure the old rows stay
    pub fn fetch_leaderboard(&mut self) {
        match self.board.fetch_top(LEADERBOARD_SIZE) {
            Ok(rows) => self.leaderboard_rows = rows,
            Err(e) => log::error!("Error fetching leaderboard: {}", e),
        }
    }

    fn toggle_leaderboard(&mut self) {
        if self.state.phase != GamePhase::GameOver || !self.name_confirmed {
            return;
        }
        self.show_leaderboard = !self.show_leaderboard;
        if self.show_leaderboard {
            self.fetch_leaderboard();
        }
    }

    fn confirm_name(&mut self) {
        if !self.awaiting_name() {
            return;
        }
        match persistence::validate_name(&self.player_name) {
            Ok(name) => {
                log::info!("Player name set to {:?}", name);
                if let Err(e) = persistence::save_name(self.store.as_mut(), &name) {
                    log::warn!("Player name not saved: {}", e);
                }
                self.player_name = name;
                self.name_confirmed = true;
                self.entering_name = false;
                self.show_leaderboard = true;
            }
            Err(e) => log::debug!("Name not accepted: {}", e),
        }
    }

    /// Reset the game after game over
    ///
    /// Only once the name is confirmed, so the finished game's score has been
    /// submitted. Keeps the player name (generating a placeholder if there is
    /// none) but asks for it to be confirmed again next time.
    fn restart(&mut self) {
        if self.state.phase != GamePhase::GameOver || !self.name_confirmed {
            return;
        }
        self.state.reset();
        self.shooting = false;
        self.pending_delta = Vec2::ZERO;
        self.pending_target = None;
        self.begin_requested = false;
        self.score_submitted = false;
        self.name_confirmed = false;
        self.entering_name = false;
        self.show_leaderboard = true;
        self.frame_error = None;

        if self.player_name.trim().is_empty() {
            let n: u32 = self.state.rng.random_range(0..10_000);
            self.player_name = format!("Player{n}");
        }
        log::info!("Game reset");
    }
}
