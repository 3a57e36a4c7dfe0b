//! Error types
//!
//! None of these are fatal to the simulation: the session logs them and
//! carries on with stale or default data.

use thiserror::Error;

/// Leaderboard submit/fetch failures
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard service unavailable: {0}")]
    Unavailable(String),
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error("leaderboard storage failed")]
    Storage(#[from] StorageError),
    #[error("leaderboard data malformed")]
    Serialization(#[from] serde_json::Error),
}

/// Player name validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name is longer than {max} characters")]
    TooLong { max: usize },
}

/// Invalid balance configuration
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Key/value storage failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("could not write key {0}")]
    Write(String),
}
