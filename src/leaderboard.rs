//! Leaderboard service
//!
//! The session only talks to [`LeaderboardService`]; where scores actually go
//! (browser storage, a remote table) is up to the implementation. The bundled
//! [`LocalLeaderboard`] keeps the top scores and can persist them as JSON.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::error::LeaderboardError;
use crate::persistence::KeyValueStore;

/// Names longer than this are shortened on screen
const DISPLAY_NAME_MAX: usize = 15;
/// Characters kept when shortening a name
const DISPLAY_NAME_KEEP: usize = 12;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Score submission and ranking backend
pub trait LeaderboardService {
    /// Record a finished game
    fn submit(&mut self, name: &str, score: u32) -> Result<(), LeaderboardError>;

    /// Best `n` scores, highest first
    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// Top-N leaderboard kept in memory, optionally mirrored to a key/value store
pub struct LocalLeaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
    store: Option<Box<dyn KeyValueStore>>,
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalLeaderboard {
    /// Storage key for the persisted board
    pub const STORAGE_KEY: &'static str = "star_shooter_leaderboard";

    /// Create empty in-memory leaderboard
    pub fn new() -> Self {
        Self::with_capacity(LEADERBOARD_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            store: None,
        }
    }

    /// Load the board from `store` and write every change back to it
    ///
    /// Unreadable data is logged and replaced by an empty board.
    pub fn persistent(store: Box<dyn KeyValueStore>) -> Self {
        let mut board = Self::new();
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
                Ok(mut entries) => {
                    entries.sort_by(|a, b| b.score.cmp(&a.score));
                    entries.truncate(board.capacity);
                    log::info!("Loaded {} leaderboard entries", entries.len());
                    board.entries = entries;
                }
                Err(e) => log::warn!("Discarding unreadable leaderboard: {}", e),
            }
        } else {
            log::info!("No leaderboard found, starting fresh");
        }
        board.store = Some(store);
        board
    }

    /// Check if a score would make the board
    fn qualifies(&self, score: u32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score (after any equal scores); returns the rank achieved
    fn add_score(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry {
            name: name.to_string(),
            score,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(self.capacity);

        Some(rank)
    }

    fn save(&mut self) -> Result<(), LeaderboardError> {
        if let Some(store) = self.store.as_mut() {
            let json = serde_json::to_string(&self.entries)?;
            store.set(Self::STORAGE_KEY, &json)?;
            log::info!("Leaderboard saved ({} entries)", self.entries.len());
        }
        Ok(())
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn submit(&mut self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        if name.trim().is_empty() {
            return Err(LeaderboardError::Rejected("empty name".into()));
        }
        match self.add_score(name, score) {
            Some(rank) => {
                log::info!("{} placed #{} with {}", name, rank, score);
                self.save()
            }
            None => Ok(()),
        }
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

/// Stand-in for an unreachable remote board: every call fails
#[derive(Debug, Clone, Default)]
pub struct OfflineLeaderboard;

impl LeaderboardService for OfflineLeaderboard {
    fn submit(&mut self, _name: &str, _score: u32) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unavailable("offline".into()))
    }

    fn fetch_top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Err(LeaderboardError::Unavailable("offline".into()))
    }
}

/// Shorten long names for the leaderboard table
pub fn display_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX {
        let kept: String = name.chars().take(DISPLAY_NAME_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}
