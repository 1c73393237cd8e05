// Host-side tests for the ash particle field.

use ashen_web::core::constants::INTENSE_SPAWN_BELOW;
use ashen_web::core::{
    Clock, ManualClock, Outline, Particle, ParticleCanvas, ParticleField, ParticlePreset,
    StepReport,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct CountingCanvas {
    begins: usize,
    drawn: Vec<Particle>,
}

impl ParticleCanvas for CountingCanvas {
    fn begin_particles(&mut self) {
        self.begins += 1;
        self.drawn.clear();
    }

    fn draw_particle(&mut self, particle: &Particle) {
        self.drawn.push(particle.clone());
    }
}

const W: f32 = 800.0;
const H: f32 = 600.0;

fn field(preset: ParticlePreset) -> ParticleField<StdRng> {
    ParticleField::new(preset, W, H, StdRng::seed_from_u64(42))
}

fn particle_at(y: f32, alpha: f32) -> Particle {
    Particle {
        position: Vec2::new(100.0, y),
        size: 3.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        velocity: Vec2::new(0.0, -1.0),
        alpha,
        outline: Outline::new(),
        born_intense: false,
    }
}

#[test]
fn new_field_is_filled_to_floor() {
    let f = field(ParticlePreset::ash());
    assert_eq!(f.pool().len(), 500);
    assert!(f.pool().iter().all(|p| !p.born_intense));

    let f = field(ParticlePreset::drift());
    assert_eq!(f.pool().len(), 200);
}

#[test]
fn strong_bass_spawns_proportional_burst() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    let mut canvas = CountingCanvas::default();
    let report = f.step(0.8, true, 1000.0, &mut canvas);

    assert_eq!(report.burst, 40);
    assert_eq!(f.pool().len(), 40);
    assert_eq!(canvas.drawn.len(), 40);
    assert!(f.pool().iter().all(|p| p.born_intense));
    assert_eq!(f.last_burst_ms(), Some(1000.0));
}

#[test]
fn bursts_respect_cooldown() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    let mut canvas = CountingCanvas::default();
    let clock = ManualClock::new(0.0);
    assert_eq!(f.step(0.8, true, clock.now_ms(), &mut canvas).burst, 40);
    clock.advance(16.0);
    assert_eq!(f.step(0.8, true, clock.now_ms(), &mut canvas).burst, 0);
    clock.advance(33.0);
    assert_eq!(f.step(0.8, true, clock.now_ms(), &mut canvas).burst, 0);
    clock.advance(1.0);
    assert_eq!(f.step(0.8, true, clock.now_ms(), &mut canvas).burst, 40);
    assert_eq!(f.last_burst_ms(), Some(50.0));
}

#[test]
fn burst_needs_bass_above_threshold_and_active_audio() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    let mut canvas = CountingCanvas::default();
    assert_eq!(f.step(0.5, true, 0.0, &mut canvas).burst, 0);
    assert_eq!(f.step(0.9, false, 100.0, &mut canvas).burst, 0);
    assert!(f.pool().is_empty());
    assert_eq!(f.last_burst_ms(), None);
}

#[test]
fn out_of_range_bass_is_clamped() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    let mut canvas = CountingCanvas::default();
    assert_eq!(f.step(7.0, true, 0.0, &mut canvas).burst, 50);
    assert_eq!(f.step(f32::NAN, true, 100.0, &mut canvas).burst, 0);
}

#[test]
fn particle_above_top_margin_is_culled_before_drawing() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    f.pool_mut().push(particle_at(-25.0, 0.5));
    f.pool_mut().push(particle_at(300.0, 0.5));
    let mut canvas = CountingCanvas::default();
    let report = f.step(0.0, false, 0.0, &mut canvas);

    assert_eq!(report.culled, 1);
    assert_eq!(report.drawn, 1);
    assert_eq!(canvas.drawn.len(), 1);
    assert_eq!(canvas.drawn[0].position.y, 300.0);
}

#[test]
fn faded_particles_are_never_drawn() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    f.pool_mut().push(particle_at(100.0, 0.005));
    let mut canvas = CountingCanvas::default();
    f.step(0.0, false, 0.0, &mut canvas);
    assert_eq!(canvas.begins, 1);
    assert!(canvas.drawn.is_empty());
}

#[test]
fn inactive_field_is_frozen_but_drawn() {
    let mut f = field(ParticlePreset::drift());
    let before: Vec<Particle> = f.pool().iter().cloned().collect();
    let mut canvas = CountingCanvas::default();
    let report = f.step(0.9, false, 0.0, &mut canvas);

    assert_eq!(
        report,
        StepReport {
            drawn: 200,
            ..StepReport::default()
        }
    );
    let after: Vec<Particle> = f.pool().iter().cloned().collect();
    assert_eq!(before, after);
    assert_eq!(canvas.drawn.len(), 200);
}

#[test]
fn floor_is_restored_after_mass_cull() {
    let mut f = field(ParticlePreset::ash().with_floor(50));
    for p in f.pool_mut().iter_mut() {
        p.alpha = 0.0;
    }
    let mut canvas = CountingCanvas::default();
    let report = f.step(0.0, true, 0.0, &mut canvas);

    assert_eq!(report.culled, 50);
    assert_eq!(report.drawn, 0);
    assert_eq!(report.replenished, 50);
    assert_eq!(f.pool().len(), 50);
}

#[test]
fn ambient_spawns_fall_in_preset_ranges() {
    let mut f = field(ParticlePreset::drift());
    let p = f.preset().clone();
    for _ in 0..300 {
        let s = f.spawn(false);
        assert!(s.size >= p.normal_size.0 && s.size < p.normal_size.1);
        assert!(s.position.x >= 0.0 && s.position.x < W);
        assert!(s.position.y >= 0.0 && s.position.y < H);
        assert!(s.alpha >= p.alpha.0 && s.alpha < p.alpha.1);
        assert!(s.rotation_speed.abs() <= p.rotation_spread);
        assert!(-s.velocity.y >= p.normal_rise.0 && -s.velocity.y <= p.normal_rise.1);
        assert!(s.velocity.x.abs() <= 1.0);
        assert!(s.outline.len() >= p.outline_vertices.0 && s.outline.len() <= p.outline_vertices.1);
    }
}

#[test]
fn intense_spawns_start_below_the_viewport() {
    let mut f = field(ParticlePreset::ash());
    let p = f.preset().clone();
    for _ in 0..300 {
        let s = f.spawn(true);
        assert!(s.born_intense);
        assert_eq!(s.position.y, H + INTENSE_SPAWN_BELOW);
        assert!(s.size >= p.intense_size.0 && s.size < p.intense_size.1);
        assert!(-s.velocity.y >= p.intense_rise.0 && -s.velocity.y <= p.intense_rise.1);
        assert!(s.velocity.x.abs() <= p.intense_drift_scale);
    }
}

#[test]
fn physics_follow_bass_modulated_update() {
    let mut f = field(ParticlePreset::ash().with_floor(0));
    let mut p = particle_at(400.0, 0.5);
    p.velocity = Vec2::new(2.0, -3.0);
    p.rotation = 1.0;
    p.rotation_speed = 0.02;
    f.pool_mut().push(p);

    let mut canvas = CountingCanvas::default();
    f.step(0.5, true, 0.0, &mut canvas);
    let q = &canvas.drawn[0];

    assert!((q.position.y - (400.0 - 3.0 * 1.35)).abs() < 1e-4);
    assert!((q.position.x - (100.0 + 2.0 * 1.5)).abs() < 1e-4);
    assert!((q.rotation - 1.02).abs() < 1e-6);
    assert!((q.alpha - 0.5 * 0.997).abs() < 1e-6);
    assert!((q.velocity.y - (-3.0 * 1.45)).abs() < 1e-4);
    assert!((q.rotation_speed - 0.02 * 0.8).abs() < 1e-6);
    // horizontal velocity is never damped
    assert_eq!(q.velocity.x, 2.0);
}

#[test]
fn resize_moves_future_spawns_only() {
    let mut f = field(ParticlePreset::ash().with_floor(10));
    let before: Vec<Particle> = f.pool().iter().cloned().collect();
    f.resize(100.0, 50.0);
    f.resize(100.0, 50.0);
    assert_eq!(f.bounds(), (100.0, 50.0));
    assert_eq!(before, f.pool().iter().cloned().collect::<Vec<_>>());
    assert_eq!(f.spawn(true).position.y, 50.0 + INTENSE_SPAWN_BELOW);
}
