//! Game settings and preferences
//!
//! Persisted separately from the leaderboard under their own storage key.
//! None of these change gameplay rules; they only trim cosmetic work.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::GameState;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 300,
            QualityPreset::High => 600,
        }
    }

    /// Whether engine and projectile trails are drawn
    pub fn trails_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions, trails)
    pub particles: bool,
    /// Engine and projectile trails
    pub trails: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            trails: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "star_shooter_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.trails = preset.trails_enabled();
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail toggle (no trails without particles)
    pub fn effective_trails(&self) -> bool {
        self.particles && self.trails
    }

    /// Push the cosmetic limits into a running simulation
    pub fn apply_to(&self, state: &mut GameState) {
        state.set_particle_cap(self.max_particles());
        state.trails = self.effective_trails();
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Unreadable settings, using defaults: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged only
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_low_preset_disables_trails() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 100);
        assert!(!settings.effective_trails());
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert!(!settings.effective_trails());
    }

    #[test]
    fn test_apply_to_state_respects_tuning_cap() {
        let mut state = GameState::new(1);
        Settings::from_preset(QualityPreset::High).apply_to(&mut state);
        assert_eq!(state.max_particles, 300);
        Settings::from_preset(QualityPreset::Low).apply_to(&mut state);
        assert_eq!(state.max_particles, 100);
        assert!(!state.trails);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            show_fps: true,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_preset_cycle() {
        assert_eq!(QualityPreset::Low.next(), QualityPreset::Medium);
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
