//! Particle emitters and lifecycle
//!
//! Purely cosmetic: nothing here feeds back into gameplay. The store is kept
//! oldest-first so cap eviction can drop from the front.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleKind};

/// Gravity applied to explosion debris
const EXPLOSION_GRAVITY: f32 = 0.01;
/// Explosions shrink to this many particles when the store is nearly full
const REDUCED_EXPLOSION: usize = 5;
/// Headroom below the cap at which explosions shrink
const EXPLOSION_HEADROOM: usize = 20;
/// Headroom below the cap at which trails stop
const TRAIL_HEADROOM: usize = 10;

/// Colour schemes for emitted particles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Destroyed star
    Yellow,
    /// Enemy hits and kills
    Red,
    /// Ship exhaust
    Engine,
    /// Player shot streak
    Projectile,
}

impl Palette {
    fn sample<R: Rng>(self, rng: &mut R) -> [u8; 3] {
        match self {
            Palette::Yellow => [255, 255, 0],
            Palette::Red => [255, rng.random_range(50..150), 0],
            Palette::Engine => [255, rng.random_range(100..200), 0],
            Palette::Projectile => [100, 100, 255],
        }
    }
}

/// Burst of debris flying out in random directions
///
/// Returns the number of particles created.
pub fn explosion<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    cap: usize,
    pos: Vec2,
    palette: Palette,
    count: usize,
) -> usize {
    if cap == 0 {
        return 0;
    }
    let count = if particles.len() > cap.saturating_sub(EXPLOSION_HEADROOM) {
        count.min(REDUCED_EXPLOSION)
    } else {
        count
    };

    for _ in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(0.5..2.0);
        let color = palette.sample(rng);
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            size: rng.random_range(3.0..8.0),
            life: 1.0,
            decay: rng.random_range(0.01..0.03),
            gravity: EXPLOSION_GRAVITY,
            color,
            kind: ParticleKind::Explosion,
        });
    }
    count
}

/// Single short-lived puff behind a moving object
///
/// Skipped entirely when the store is close to the cap. Returns the number
/// of particles created (0 or 1).
pub fn trail<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    cap: usize,
    pos: Vec2,
    palette: Palette,
) -> usize {
    if cap == 0 || particles.len() > cap.saturating_sub(TRAIL_HEADROOM) {
        return 0;
    }

    let jitter = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
    let vel = Vec2::new(rng.random_range(-0.3..0.3), rng.random_range(-0.3..0.3));
    let color = palette.sample(rng);
    particles.push(Particle {
        pos: pos + jitter,
        vel,
        size: rng.random_range(2.0..4.0),
        life: 1.0,
        decay: rng.random_range(0.05..0.1),
        gravity: 0.0,
        color,
        kind: ParticleKind::Trail,
    });
    1
}

/// Evict over-cap particles (oldest first), then age and drop dead ones
///
/// Returns the number of particles removed.
pub fn update(particles: &mut Vec<Particle>, cap: usize) -> usize {
    let before = particles.len();

    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }

    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += p.gravity;
        p.life -= p.decay;
    }
    particles.retain(|p| p.life > 0.0);

    before - particles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_explosion_full_size() {
        let mut particles = Vec::new();
        let created = explosion(&mut particles, &mut rng(), 300, Vec2::ZERO, Palette::Red, 20);
        assert_eq!(created, 20);
        assert_eq!(particles.len(), 20);
        assert!(particles.iter().all(|p| p.kind == ParticleKind::Explosion));
        assert!(particles.iter().all(|p| p.color[0] == 255 && p.color[2] == 0));
    }

    #[test]
    fn test_explosion_shrinks_near_cap() {
        let mut particles = Vec::new();
        let mut rng = rng();
        explosion(&mut particles, &mut rng, 300, Vec2::ZERO, Palette::Yellow, 281);
        let created = explosion(&mut particles, &mut rng, 300, Vec2::ZERO, Palette::Yellow, 20);
        assert_eq!(created, 5);
    }

    #[test]
    fn test_trail_skipped_near_cap() {
        let mut particles = Vec::new();
        let mut rng = rng();
        explosion(&mut particles, &mut rng, 300, Vec2::ZERO, Palette::Yellow, 291);
        assert_eq!(trail(&mut particles, &mut rng, 300, Vec2::ZERO, Palette::Engine), 0);
        assert_eq!(particles.len(), 291);
    }

    #[test]
    fn test_disabled_particles_emit_nothing() {
        let mut particles = Vec::new();
        let mut rng = rng();
        assert_eq!(explosion(&mut particles, &mut rng, 0, Vec2::ZERO, Palette::Red, 20), 0);
        assert_eq!(trail(&mut particles, &mut rng, 0, Vec2::ZERO, Palette::Projectile), 0);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_update_moves_and_decays() {
        let mut particles = vec![Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -1.0),
            size: 4.0,
            life: 1.0,
            decay: 0.25,
            gravity: 0.5,
            color: [255, 255, 255],
            kind: ParticleKind::Explosion,
        }];
        update(&mut particles, 300);
        assert_eq!(particles[0].pos, Vec2::new(11.0, 9.0));
        assert_eq!(particles[0].vel, Vec2::new(1.0, -0.5));
        assert!((particles[0].life - 0.75).abs() < 1e-6);

        for _ in 0..3 {
            update(&mut particles, 300);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_update_evicts_oldest_first() {
        let mut particles: Vec<Particle> = (0..5)
            .map(|i| Particle {
                pos: Vec2::new(i as f32, 0.0),
                vel: Vec2::ZERO,
                size: 1.0,
                life: 1.0,
                decay: 0.0,
                gravity: 0.0,
                color: [0, 0, 0],
                kind: ParticleKind::Trail,
            })
            .collect();
        let removed = update(&mut particles, 3);
        assert_eq!(removed, 2);
        let xs: Vec<f32> = particles.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    proptest! {
        #[test]
        fn prop_update_respects_cap(
            cap in 0usize..400,
            bursts in prop::collection::vec((1usize..40, any::<bool>()), 0..60),
        ) {
            let mut particles = Vec::new();
            let mut rng = rng();
            for (count, is_trail) in bursts {
                if is_trail {
                    trail(&mut particles, &mut rng, cap, Vec2::ZERO, Palette::Engine);
                } else {
                    explosion(&mut particles, &mut rng, cap, Vec2::ZERO, Palette::Red, count);
                }
                let before = particles.len();
                let removed = update(&mut particles, cap);
                prop_assert!(particles.len() <= cap);
                prop_assert_eq!(before - removed, particles.len());
            }
        }
    }
}
