//! Active power-up tracker
//!
//! One countdown slot per power-up kind; a slot is `None` when the effect is off.

use serde::{Deserialize, Serialize};

use super::state::PowerupKind;

/// Remaining frames for each active power-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerups {
    pub rapid_fire: Option<u32>,
    pub triple_shot: Option<u32>,
    pub shield: Option<u32>,
}

impl ActivePowerups {
    fn slot(&self, kind: PowerupKind) -> Option<u32> {
        match kind {
            PowerupKind::RapidFire => self.rapid_fire,
            PowerupKind::TripleShot => self.triple_shot,
            PowerupKind::Shield => self.shield,
        }
    }

    fn slot_mut(&mut self, kind: PowerupKind) -> &mut Option<u32> {
        match kind {
            PowerupKind::RapidFire => &mut self.rapid_fire,
            PowerupKind::TripleShot => &mut self.triple_shot,
            PowerupKind::Shield => &mut self.shield,
        }
    }

    /// Start (or restart) an effect for `duration` frames
    pub fn activate(&mut self, kind: PowerupKind, duration: u32) {
        *self.slot_mut(kind) = (duration > 0).then_some(duration);
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Frames left on an effect
    pub fn remaining(&self, kind: PowerupKind) -> Option<u32> {
        self.slot(kind)
    }

    /// Use up an effect immediately; returns whether it was active
    pub fn consume(&mut self, kind: PowerupKind) -> bool {
        self.slot_mut(kind).take().is_some()
    }

    /// Age every active effect by one frame, dropping those that run out
    pub fn tick(&mut self) {
        for kind in PowerupKind::ALL {
            let slot = self.slot_mut(kind);
            if let Some(frames) = *slot {
                *slot = frames.checked_sub(1).filter(|left| *left > 0);
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any_active(&self) -> bool {
        PowerupKind::ALL.iter().any(|k| self.is_active(*k))
    }

    /// Active effects in display order
    pub fn active(&self) -> impl Iterator<Item = (PowerupKind, u32)> + '_ {
        PowerupKind::ALL
            .into_iter()
            .filter_map(move |kind| self.slot(kind).map(|frames| (kind, frames)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut effects = ActivePowerups::default();
        effects.activate(PowerupKind::RapidFire, 3);
        assert!(effects.is_active(PowerupKind::RapidFire));

        effects.tick();
        effects.tick();
        assert_eq!(effects.remaining(PowerupKind::RapidFire), Some(1));

        effects.tick();
        assert!(!effects.is_active(PowerupKind::RapidFire));
        assert!(!effects.any_active());
    }

    #[test]
    fn test_refresh_resets_duration() {
        let mut effects = ActivePowerups::default();
        effects.activate(PowerupKind::TripleShot, 600);
        for _ in 0..500 {
            effects.tick();
        }
        effects.activate(PowerupKind::TripleShot, 600);
        assert_eq!(effects.remaining(PowerupKind::TripleShot), Some(600));
    }

    #[test]
    fn test_consume_shield() {
        let mut effects = ActivePowerups::default();
        assert!(!effects.consume(PowerupKind::Shield));
        effects.activate(PowerupKind::Shield, 600);
        assert!(effects.consume(PowerupKind::Shield));
        assert!(!effects.is_active(PowerupKind::Shield));
    }

    #[test]
    fn test_effects_age_independently() {
        let mut effects = ActivePowerups::default();
        effects.activate(PowerupKind::Shield, 2);
        effects.activate(PowerupKind::RapidFire, 5);
        effects.tick();
        effects.tick();
        let active: Vec<_> = effects.active().collect();
        assert_eq!(active, vec![(PowerupKind::RapidFire, 3)]);
    }

    #[test]
    fn test_zero_duration_is_inactive() {
        let mut effects = ActivePowerups::default();
        effects.activate(PowerupKind::Shield, 0);
        assert!(!effects.is_active(PowerupKind::Shield));
    }
}
