//! CPU particle emitter.
//!
//! Particles live in the emitter node's local space. Each update integrates
//! velocity under constant gravity, ages particles and drops expired ones,
//! then spawns new particles from an accumulated emission budget.

use std::f32::consts::FRAC_PI_8;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Particles spawned per second. Default: 10.
    pub rate: f32,
    /// Seconds each particle lives. Default: 1.
    pub lifetime: f32,
    /// Default: 20.
    pub speed_min: f32,
    /// Default: 60.
    pub speed_max: f32,
    /// Mean emission angle in radians. Default: 0 (+X).
    pub direction: f32,
    /// Full width of the emission cone in radians. Default: π/4.
    pub spread: f32,
    /// Constant acceleration. Default: zero.
    pub gravity: Vec2,
    /// Default: 256.
    pub max_particles: usize,
    /// Default: 1.
    pub start_alpha: f32,
    /// Default: 0.
    pub end_alpha: f32,
    /// Seed of the emitter's random stream. Default: 0.
    pub seed: u64,
    /// Continuous emission on. Default: `true`.
    pub emitting: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            rate: 10.0,
            lifetime: 1.0,
            speed_min: 20.0,
            speed_max: 60.0,
            direction: 0.0,
            spread: FRAC_PI_8 * 2.0,
            gravity: Vec2::ZERO,
            max_particles: 256,
            start_alpha: 1.0,
            end_alpha: 0.0,
            seed: 0,
            emitting: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Fraction of the lifetime already spent, in `0..=1`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    config: EmitterConfig,
    particles: Vec<Particle>,
    spawn_budget: f32,
    rng: StdRng,
}

impl ParticleEmitter {
    #[must_use]
    pub fn new(config: EmitterConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            particles: Vec::with_capacity(config.max_particles.min(1024)),
            config,
            spawn_budget: 0.0,
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn set_emitting(&mut self, emitting: bool) {
        self.config.emitting = emitting;
        if !emitting {
            self.spawn_budget = 0.0;
        }
    }

    /// Interpolated alpha of `particle` between start and end alpha.
    #[must_use]
    pub fn particle_alpha(&self, particle: &Particle) -> f32 {
        let t = particle.progress();
        self.config.start_alpha + (self.config.end_alpha - self.config.start_alpha) * t
    }

    /// Spawns up to `count` particles immediately, respecting `max_particles`.
    pub fn burst(&mut self, count: usize) {
        let room = self.config.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let particle = self.spawn();
            self.particles.push(particle);
        }
    }

    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let gravity = self.config.gravity;

        for p in &mut self.particles {
            p.velocity += gravity * dt;
            p.position += p.velocity * dt;
            p.age += dt;
        }
        self.particles.retain(|p| p.age < p.lifetime);

        if self.config.emitting && self.config.rate > 0.0 {
            self.spawn_budget += self.config.rate * dt;
            let whole = self.spawn_budget.floor();
            self.spawn_budget -= whole;
            self.burst(whole as usize);
        }
    }

    /// Local-space box around the live particles.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.particles.iter().map(|p| p.position))
    }

    fn spawn(&mut self) -> Particle {
        let half_spread = self.config.spread.abs() * 0.5;
        let angle = if half_spread > 0.0 {
            self.config.direction + self.rng.random_range(-half_spread..=half_spread)
        } else {
            self.config.direction
        };
        let (lo, hi) = (
            self.config.speed_min.min(self.config.speed_max),
            self.config.speed_min.max(self.config.speed_max),
        );
        let speed = if hi > lo {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        };

        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::from_angle(angle) * speed,
            age: 0.0,
            lifetime: self.config.lifetime,
        }
    }
}
