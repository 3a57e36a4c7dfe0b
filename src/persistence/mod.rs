//! Local key/value persistence
//!
//! Only small strings are persisted: the player name, settings JSON and the
//! local leaderboard JSON. Browsers use LocalStorage; native builds and tests
//! use the in-memory store.

use std::collections::HashMap;

use crate::consts::MAX_NAME_LEN;
use crate::error::{NameError, StorageError};

/// Storage key for the remembered player name
pub const PLAYER_NAME_KEY: &str = "star_shooter_player_name";

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

/// Trim and check a player name
pub fn validate_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong { max: MAX_NAME_LEN });
    }
    Ok(trimmed.to_string())
}

/// Remembered player name, if a usable one was saved
pub fn load_name(store: &dyn KeyValueStore) -> Option<String> {
    let name = store.get(PLAYER_NAME_KEY)?;
    match validate_name(&name) {
        Ok(name) => {
            log::info!("Loaded player name {:?}", name);
            Some(name)
        }
        Err(e) => {
            log::warn!("Ignoring stored player name: {}", e);
            None
        }
    }
}

/// Remember the player name for future sessions
pub fn save_name(store: &mut dyn KeyValueStore, name: &str) -> Result<(), StorageError> {
    store.set(PLAYER_NAME_KEY, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_name(&store), None);
        save_name(&mut store, "Ace").unwrap();
        assert_eq!(load_name(&store), Some("Ace".to_string()));
    }

    #[test]
    fn test_blank_stored_name_ignored() {
        let mut store = MemoryStore::new();
        store.set(PLAYER_NAME_KEY, "   ").unwrap();
        assert_eq!(load_name(&store), None);
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Nova "), Ok("Nova".to_string()));
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert_eq!(validate_name("\t"), Err(NameError::Empty));
        assert_eq!(
            validate_name(&"x".repeat(21)),
            Err(NameError::TooLong { max: 20 })
        );
        assert!(validate_name(&"x".repeat(20)).is_ok());
    }
}
