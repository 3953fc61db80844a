//! Explosion particle field fed by the world's explosion requests.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilebreaker_core::{ExplosionSpec, SpriteKey};

/// Scale of a particle before its first update.
const INITIAL_SCALE: f32 = 0.25;

#[derive(Clone, Debug)]
struct Particle {
    age: Duration,
    max_age: Duration,
    origin: Vec2,
    direction: Vec2,
    acceleration: Vec2,
    position: Vec2,
    scale: f32,
    alpha: f32,
    texture: SpriteKey,
}

/// Drawable state of a single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleInstance {
    /// World-space centre of the particle.
    pub position: Vec2,
    /// Uniform scale applied to the particle sprite.
    pub scale: f32,
    /// Opacity in the range 0.0..=1.0.
    pub alpha: f32,
    /// Sprite drawn for the particle.
    pub texture: SpriteKey,
}

/// Collection of live particles driven by a seeded random source.
#[derive(Clone, Debug)]
pub struct ParticleField {
    rng: ChaCha8Rng,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Creates an empty field whose spread is reproducible for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            particles: Vec::new(),
        }
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Reports whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Emits the particles described by `explosion`.
    ///
    /// Each particle is thrown a random distance up to the explosion size in
    /// a random whole-degree direction within the requested angle range.
    pub fn spawn(&mut self, explosion: &ExplosionSpec) {
        let texture = explosion.texture.unwrap_or(SpriteKey::Explosion);
        for _ in 0..explosion.particle_count {
            let distance = self.rng.gen::<f32>() * explosion.size;
            let degrees = if explosion.max_angle > explosion.min_angle {
                self.rng.gen_range(explosion.min_angle..explosion.max_angle)
            } else {
                explosion.min_angle
            };
            let direction = Vec2::from_angle((degrees as f32).to_radians())
                .rotate(Vec2::new(distance, 0.0))
                * 2.0;

            self.particles.push(Particle {
                age: Duration::ZERO,
                max_age: explosion.max_age,
                origin: explosion.position,
                direction,
                acceleration: -direction,
                position: explosion.position,
                scale: INITIAL_SCALE,
                alpha: 1.0,
                texture,
            });
        }
    }

    /// Ages every particle by `dt`, dropping those older than their lifetime.
    pub fn update(&mut self, dt: Duration) {
        self.particles.retain_mut(|particle| {
            particle.age = particle.age.saturating_add(dt);
            if particle.age > particle.max_age {
                return false;
            }

            let relative_age = if particle.max_age.is_zero() {
                1.0
            } else {
                particle.age.as_secs_f32() / particle.max_age.as_secs_f32()
            };
            particle.position = 0.5 * particle.acceleration * relative_age * relative_age
                + particle.direction * relative_age
                + particle.origin;
            particle.alpha = 1.0 - relative_age;
            particle.scale = (50.0 + particle.position.distance(particle.origin)) / 200.0;
            true
        });
    }

    /// Drawable snapshot of every live particle.
    pub fn instances(&self) -> impl Iterator<Item = ParticleInstance> + '_ {
        self.particles.iter().map(|particle| ParticleInstance {
            position: particle.position,
            scale: particle.scale,
            alpha: particle.alpha,
            texture: particle.texture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explosion(count: u32, angles: (i32, i32), max_age_ms: u64) -> ExplosionSpec {
        ExplosionSpec {
            position: Vec2::new(100.0, 50.0),
            particle_count: count,
            size: 20.0,
            min_angle: angles.0,
            max_angle: angles.1,
            max_age: Duration::from_millis(max_age_ms),
            texture: None,
        }
    }

    #[test]
    fn particles_expire_after_max_age() {
        let mut field = ParticleField::new(7);
        field.spawn(&explosion(10, (0, 360), 100));
        assert_eq!(field.len(), 10);

        field.update(Duration::from_millis(100));
        assert_eq!(field.len(), 10);
        field.update(Duration::from_millis(1));
        assert!(field.is_empty());
    }

    #[test]
    fn particles_fade_and_return_toward_origin() {
        let mut field = ParticleField::new(3);
        field.spawn(&explosion(5, (0, 360), 200));
        field.update(Duration::from_millis(100));

        for particle in field.instances() {
            assert!((particle.alpha - 0.5).abs() < 1e-4);
            assert_eq!(particle.texture, SpriteKey::Explosion);
            assert!(particle.position.distance(Vec2::new(100.0, 50.0)) <= 30.0 + 1e-3);
        }

        field.update(Duration::from_millis(100));
        for particle in field.instances() {
            assert!(particle.alpha.abs() < 1e-4);
            assert!(particle.position.distance(Vec2::new(100.0, 50.0)) <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn narrow_angle_range_keeps_direction() {
        let mut field = ParticleField::new(11);
        field.spawn(&explosion(8, (90, 90), 100));
        field.update(Duration::from_millis(50));

        for particle in field.instances() {
            let offset = particle.position - Vec2::new(100.0, 50.0);
            assert!(offset.x.abs() < 1e-3);
            assert!(offset.y >= 0.0);
        }
    }

    #[test]
    fn same_seed_replays_the_same_spread() {
        let mut first = ParticleField::new(42);
        let mut second = ParticleField::new(42);
        first.spawn(&explosion(16, (0, 360), 300));
        second.spawn(&explosion(16, (0, 360), 300));
        first.update(Duration::from_millis(120));
        second.update(Duration::from_millis(120));

        let first: Vec<ParticleInstance> = first.instances().collect();
        let second: Vec<ParticleInstance> = second.instances().collect();
        assert_eq!(first, second);
    }
}
