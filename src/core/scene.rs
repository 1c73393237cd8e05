//! Per-tick orchestration.
//!
//! Ordering within a tick: limiter -> scrub integration -> seek + frame
//! composite -> bass sample -> particle step. Each stage hands its result to
//! the next as a value; nothing is shared through mutable fields.

use crate::core::bass::BassSampler;
use crate::core::clock::FrameLimiter;
use crate::core::compositor::{Compositor, DistortionState, FrameSurface};
use crate::core::config::SceneConfig;
use crate::core::error::SceneError;
use crate::core::media::{LoadingState, MediaEvent, MediaSource, MediaStatus};
use crate::core::particles::{ParticleCanvas, ParticleField, StepReport};
use crate::core::scrub::{ScrubController, ScrubStep, TimelineCursor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Outputs of one processed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub elapsed_ms: f64,
    pub step: ScrubStep,
    pub distortion: DistortionState,
    pub frame_drawn: bool,
    pub bass: f32,
    pub particles: StepReport,
}

/// Read-only values exposed to the host UI.
#[derive(Clone, Debug, PartialEq)]
pub struct Telemetry {
    pub duration: f64,
    pub current_time: f64,
    pub target_time: f64,
    pub distortion_percent: f64,
    pub pointer: Option<[f32; 2]>,
    pub audio_active: bool,
    pub seeking: bool,
    pub loading: String,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Duration: {:.2}s", self.duration)?;
        writeln!(f, "Current: {:.2}s", self.current_time)?;
        writeln!(f, "Target: {:.2}s", self.target_time)?;
        writeln!(f, "Distortion: {:.0}%", self.distortion_percent)?;
        match self.pointer {
            Some([x, y]) => writeln!(f, "Pointer: {x:.2}, {y:.2}")?,
            None => writeln!(f, "Pointer: -")?,
        }
        writeln!(f, "Audio: {}", if self.audio_active { "on" } else { "off" })?;
        write!(f, "State: {}", if self.seeking { "Seeking" } else { "Ready" })
    }
}

pub struct Scene<R> {
    scrub: ScrubController,
    compositor: Compositor<R>,
    particles: ParticleField<R>,
    limiter: FrameLimiter,
    status: MediaStatus,
    pointer: Option<[f32; 2]>,
    last_bass: f32,
}

impl Scene<StdRng> {
    /// Build from configuration; `seed` makes particles and noise reproducible.
    pub fn from_config(config: &SceneConfig, viewport: (f32, f32)) -> Self {
        let mut seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise_rng = StdRng::seed_from_u64(seeder.gen());
        let particle_rng = StdRng::seed_from_u64(seeder.gen());
        let mut distortion = config.distortion;
        if let Some(scale) = config.density_scale {
            distortion.density_scale = scale;
        }
        Scene::new(
            ScrubController::new(config.smoothing),
            Compositor::new(distortion, config.pixel_noise, noise_rng),
            ParticleField::new(config.preset.preset(), viewport.0, viewport.1, particle_rng),
            FrameLimiter::new(config.frame_rate),
        )
    }
}

impl<R: Rng> Scene<R> {
    pub fn new(
        scrub: ScrubController,
        compositor: Compositor<R>,
        particles: ParticleField<R>,
        limiter: FrameLimiter,
    ) -> Self {
        Self {
            scrub,
            compositor,
            particles,
            limiter,
            status: MediaStatus::default(),
            pointer: None,
            last_bass: 0.0,
        }
    }

    pub fn cursor(&self) -> TimelineCursor {
        self.scrub.cursor()
    }

    pub fn status(&self) -> &MediaStatus {
        &self.status
    }

    pub fn particles(&self) -> &ParticleField<R> {
        &self.particles
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor<R> {
        &mut self.compositor
    }

    pub fn last_bass(&self) -> f32 {
        self.last_bass
    }

    /// Normalized pointer position over the surface.
    pub fn pointer_moved(&mut self, uv: [f32; 2]) {
        self.pointer = Some(uv);
        if self.status.duration > 0.0 {
            self.scrub.set_target(f64::from(uv[0]));
        }
    }

    /// The target stays where the pointer left it.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<[f32; 2]> {
        self.pointer
    }

    /// Recompute viewport-derived state; safe to call any number of times.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.particles.resize(width, height);
    }

    /// Fold a media lifecycle signal into the scene.
    pub fn handle_media_event<M, S>(
        &mut self,
        event: &MediaEvent,
        media: &mut M,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        M: MediaSource + ?Sized,
        S: FrameSurface + ?Sized,
    {
        if matches!(self.status.loading, LoadingState::Error(_)) {
            return Ok(());
        }
        self.status.apply(event);
        match event {
            MediaEvent::MetadataReady {
                duration,
                width,
                height,
            } => {
                log::info!(
                    "[media] metadata duration={:.2}s size={}x{}",
                    duration,
                    width,
                    height
                );
                self.scrub.set_duration(*duration);
                surface.resize(*width, *height);
                media.seek(0.0)?;
            }
            MediaEvent::FrameReady => {
                log::info!("[media] ready");
                self.limiter.reset();
                surface.draw_frame(0.0)?;
            }
            MediaEvent::SeekFinished => {
                if self.status.loading.is_ready() {
                    surface.draw_frame(0.0)?;
                }
            }
            MediaEvent::SeekStarted => {}
            MediaEvent::DecodeError(msg) => {
                log::error!("[media] decode error: {}", msg);
                return Err(SceneError::SourceLoad(msg.clone()));
            }
        }
        Ok(())
    }

    /// Run one tick at `now_ms`. Returns `None` when the source is not ready
    /// or the callback arrived before the minimum frame interval.
    pub fn tick<M, S, B>(
        &mut self,
        now_ms: f64,
        active: bool,
        media: &mut M,
        surface: &mut S,
        bass: &mut B,
    ) -> Option<TickReport>
    where
        M: MediaSource + ?Sized,
        S: FrameSurface + ParticleCanvas + ?Sized,
        B: BassSampler + ?Sized,
    {
        if !self.status.loading.is_ready() {
            return None;
        }
        let elapsed_ms = self.limiter.poll(now_ms)?;
        self.limiter.commit(now_ms);

        let mut step = self.scrub.tick(elapsed_ms, self.status.seeking);
        if step.apply_to_source {
            if let Err(e) = media.seek(step.current_time) {
                log::warn!("[frame] seek skipped: {}", e);
                step.apply_to_source = false;
            }
        }
        let frame_drawn = match self.compositor.composite(surface, &step) {
            Ok(drawn) => drawn.is_some(),
            Err(e) => {
                log::warn!("[frame] draw skipped: {}", e);
                false
            }
        };
        let distortion = self.compositor.distortion();

        let bass_value = bass.sample(active);
        self.last_bass = bass_value;
        let particles = self.particles.step(bass_value, active, now_ms, surface);

        Some(TickReport {
            elapsed_ms,
            step,
            distortion,
            frame_drawn,
            bass: bass_value,
            particles,
        })
    }

    pub fn telemetry(&self, audio_active: bool) -> Telemetry {
        let cursor = self.scrub.cursor();
        Telemetry {
            duration: self.scrub.duration(),
            current_time: cursor.current_time,
            target_time: cursor.target_time,
            distortion_percent: self.compositor.distortion().percent(),
            pointer: self.pointer,
            audio_active,
            seeking: self.status.seeking,
            loading: self.status.loading.to_string(),
        }
    }

    pub fn loading(&self) -> &LoadingState {
        &self.status.loading
    }
}
