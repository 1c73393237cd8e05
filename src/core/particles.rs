//! Bass-reactive ash particle field.
//!
//! Particles go Spawned -> Active -> Expired and are never revived. Each tick
//! runs burst spawning, physics, culling, drawing and replenishment in that
//! order; only particles that survive the cull are handed to the canvas.

use crate::core::constants::{ALPHA_CULL_FLOOR, CULL_TOP_MARGIN, INTENSE_SPAWN_BELOW};
use crate::core::presets::ParticlePreset;
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;
use std::f32::consts::TAU;

pub type Outline = SmallVec<[Vec2; 10]>;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub velocity: Vec2,
    pub alpha: f32,
    /// Closed polygon in local space around the particle center.
    pub outline: Outline,
    pub born_intense: bool,
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        self.position.y < CULL_TOP_MARGIN || self.alpha < ALPHA_CULL_FLOOR
    }

    fn advance(&mut self, bass: f32, preset: &ParticlePreset) {
        self.position.y += self.velocity.y * (1.0 + bass * preset.rise_bass_gain);
        self.position.x += self.velocity.x * (1.0 + bass * preset.drift_bass_gain);
        self.rotation += self.rotation_speed;
        self.alpha *= preset.alpha_decay;
        self.velocity.y *= preset.rise_damping + bass * preset.rise_damping_bass;
        self.rotation_speed *= preset.spin_damping + bass * preset.spin_damping_bass;
    }
}

/// Render target for particles, drawn after the video frame.
pub trait ParticleCanvas {
    /// Called once per tick before any particle is drawn.
    fn begin_particles(&mut self);
    fn draw_particle(&mut self, particle: &Particle);
}

/// Unordered particle storage with O(1) removal.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
    items: Vec<Particle>,
}

impl ParticlePool {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.items.push(particle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.items.iter_mut()
    }

    /// Drop every particle matching `dead` by swapping it with the tail.
    /// Returns how many were removed.
    pub fn cull(&mut self, mut dead: impl FnMut(&Particle) -> bool) -> usize {
        let before = self.items.len();
        let mut i = 0;
        while i < self.items.len() {
            if dead(&self.items[i]) {
                self.items.swap_remove(i);
            } else {
                i += 1;
            }
        }
        before - self.items.len()
    }
}

/// Counters from one [`ParticleField::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub burst: usize,
    pub culled: usize,
    pub drawn: usize,
    pub replenished: usize,
}

pub struct ParticleField<R> {
    pool: ParticlePool,
    preset: ParticlePreset,
    rng: R,
    width: f32,
    height: f32,
    last_burst_ms: Option<f64>,
}

impl<R: Rng> ParticleField<R> {
    /// Create a field filled to the preset floor with ambient particles.
    pub fn new(preset: ParticlePreset, width: f32, height: f32, rng: R) -> Self {
        let mut field = Self {
            pool: ParticlePool::with_capacity(preset.floor * 2),
            preset,
            rng,
            width: width.max(0.0),
            height: height.max(0.0),
            last_burst_ms: None,
        };
        field.replenish();
        field
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    pub fn preset(&self) -> &ParticlePreset {
        &self.preset
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn last_burst_ms(&self) -> Option<f64> {
        self.last_burst_ms
    }

    /// Idempotent; only affects where future particles spawn.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn spawn(&mut self, intense: bool) -> Particle {
        let p = &self.preset;
        let rng = &mut self.rng;
        let size = uniform(rng, if intense { p.intense_size } else { p.normal_size });
        let x = uniform(rng, (0.0, self.width));
        let y = if intense {
            self.height + INTENSE_SPAWN_BELOW
        } else {
            uniform(rng, (0.0, self.height))
        };
        let spread = if intense {
            p.intense_rotation_spread
        } else {
            p.rotation_spread
        };
        let rotation = rng.gen_range(0.0..TAU);
        let rotation_speed = uniform(rng, (-spread, spread));
        let drift = uniform(rng, (-1.0, 1.0)) * if intense { p.intense_drift_scale } else { 1.0 };
        let rise = uniform(rng, if intense { p.intense_rise } else { p.normal_rise });
        let alpha = uniform(rng, p.alpha);
        let outline = ash_outline(rng, size, p.outline_vertices, p.outline_radius);
        Particle {
            position: Vec2::new(x, y),
            size,
            rotation,
            rotation_speed,
            velocity: Vec2::new(drift, -rise),
            alpha,
            outline,
            born_intense: intense,
        }
    }

    /// Spawn a burst of `floor(bass * scale)` intense particles if `bass`
    /// crosses the threshold and the cooldown has elapsed.
    pub fn try_burst(&mut self, bass: f32, now_ms: f64) -> usize {
        if bass <= self.preset.burst_threshold {
            return 0;
        }
        if let Some(last) = self.last_burst_ms {
            if now_ms - last < self.preset.burst_cooldown_ms {
                return 0;
            }
        }
        let count = (bass * self.preset.burst_scale).floor() as usize;
        for _ in 0..count {
            let particle = self.spawn(true);
            self.pool.push(particle);
        }
        self.last_burst_ms = Some(now_ms);
        log::debug!("[particles] burst of {} at bass {:.2}", count, bass);
        count
    }

    /// Top the pool up to the floor with ambient particles.
    pub fn replenish(&mut self) -> usize {
        let missing = self.preset.floor.saturating_sub(self.pool.len());
        for _ in 0..missing {
            let particle = self.spawn(false);
            self.pool.push(particle);
        }
        missing
    }

    /// Run one tick. When `active` is false particles are frozen: no bursts,
    /// no motion, no aging, but they are still drawn and the floor is kept.
    pub fn step<C: ParticleCanvas + ?Sized>(
        &mut self,
        bass: f32,
        active: bool,
        now_ms: f64,
        canvas: &mut C,
    ) -> StepReport {
        let bass = if bass.is_finite() { bass.clamp(0.0, 1.0) } else { 0.0 };
        let mut report = StepReport::default();
        if active {
            report.burst = self.try_burst(bass, now_ms);
            let preset = &self.preset;
            for p in self.pool.iter_mut() {
                p.advance(bass, preset);
            }
        }
        report.culled = self.pool.cull(Particle::is_expired);
        canvas.begin_particles();
        for p in self.pool.iter() {
            canvas.draw_particle(p);
        }
        report.drawn = self.pool.len();
        report.replenished = self.replenish();
        report
    }
}

fn uniform<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Irregular polygon: evenly spaced angles, randomized radius per vertex.
fn ash_outline<R: Rng>(
    rng: &mut R,
    size: f32,
    (min_vertices, max_vertices): (usize, usize),
    radius: (f32, f32),
) -> Outline {
    let n = rng.gen_range(min_vertices..=max_vertices.max(min_vertices)).max(3);
    (0..n)
        .map(|i| {
            let angle = i as f32 / n as f32 * TAU;
            let r = size * uniform(rng, radius);
            Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}
