//! Frame presentation with motion-coupled distortion.
//!
//! Scrub velocity (the pre-easing delta) drives two effects: a pair of
//! horizontally offset "ghost" copies drawn with additive blending, and
//! symmetric per-channel pixel noise.

use crate::core::constants::{
    DISTORTION_GAIN, GHOST_DELTA_THRESHOLD, GHOST_OFFSET_GAIN, NOISE_MIN_AMPLITUDE,
};
use crate::core::error::DrawError;
use crate::core::scrub::ScrubStep;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    Lighter,
}

/// Destination the compositor draws video frames into.
pub trait FrameSurface {
    fn size(&self) -> (u32, u32);
    /// Match the backing store to the source's natural size.
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    /// Draw the source's current frame at a horizontal offset (device pixels).
    fn draw_frame(&mut self, offset_x: f64) -> Result<(), DrawError>;
    fn set_blend(&mut self, mode: BlendMode);
    /// Run `f` over the RGBA bytes of the surface and write them back.
    fn with_pixels(&mut self, f: &mut dyn FnMut(&mut [u8])) -> Result<(), DrawError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionParams {
    pub distortion_gain: f64,
    pub offset_gain: f64,
    pub ghost_threshold: f64,
    /// Scales noise amplitude and ghost offset for high-density displays.
    pub density_scale: f64,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            distortion_gain: DISTORTION_GAIN,
            offset_gain: GHOST_OFFSET_GAIN,
            ghost_threshold: GHOST_DELTA_THRESHOLD,
            density_scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistortionState {
    pub velocity_magnitude: f64,
    pub distortion_level: f64,
}

impl DistortionState {
    pub fn from_delta(delta: f64, params: &DistortionParams) -> Self {
        let velocity_magnitude = if delta.is_finite() { delta.abs() } else { 0.0 };
        Self {
            velocity_magnitude,
            distortion_level: velocity_magnitude * params.distortion_gain,
        }
    }

    /// Ghost offset in pixels, or `None` below the velocity threshold.
    pub fn ghost_offset(&self, params: &DistortionParams) -> Option<f64> {
        (self.velocity_magnitude > params.ghost_threshold)
            .then(|| self.velocity_magnitude * params.offset_gain * params.density_scale)
    }

    pub fn noise_amplitude(&self, params: &DistortionParams) -> f64 {
        self.distortion_level * params.density_scale
    }

    /// Host-facing percentage, clamped to `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.distortion_level.clamp(0.0, 100.0)
    }
}

pub struct Compositor<R> {
    params: DistortionParams,
    pixel_noise: bool,
    rng: R,
    last: DistortionState,
}

impl<R: Rng> Compositor<R> {
    pub fn new(params: DistortionParams, pixel_noise: bool, rng: R) -> Self {
        Self {
            params,
            pixel_noise,
            rng,
            last: DistortionState::default(),
        }
    }

    pub fn params(&self) -> &DistortionParams {
        &self.params
    }

    pub fn set_density_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.params.density_scale = scale;
        }
    }

    /// False once the surface refused pixel access.
    pub fn pixel_noise(&self) -> bool {
        self.pixel_noise
    }

    /// Distortion computed by the most recent tick.
    pub fn distortion(&self) -> DistortionState {
        self.last
    }

    /// Present the frame for `step` onto `surface`.
    ///
    /// The distortion state is always updated from `step.delta`; drawing is
    /// skipped (returning `Ok(None)`) while the source is mid-seek.
    pub fn composite<S: FrameSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        step: &ScrubStep,
    ) -> Result<Option<DistortionState>, DrawError> {
        let state = DistortionState::from_delta(step.delta, &self.params);
        self.last = state;
        if !step.apply_to_source {
            return Ok(None);
        }
        let (w, h) = surface.size();
        if w == 0 || h == 0 {
            return Err(DrawError::ZeroSize {
                width: w,
                height: h,
            });
        }

        surface.clear();
        surface.draw_frame(0.0)?;

        if let Some(offset) = state.ghost_offset(&self.params) {
            surface.set_blend(BlendMode::Lighter);
            let ghosts = surface
                .draw_frame(offset)
                .and_then(|()| surface.draw_frame(-offset));
            surface.set_blend(BlendMode::SourceOver);
            ghosts?;
        }

        let amplitude = state.noise_amplitude(&self.params);
        if self.pixel_noise && amplitude >= NOISE_MIN_AMPLITUDE {
            let rng = &mut self.rng;
            let noise = surface.with_pixels(&mut |pixels: &mut [u8]| {
                apply_noise(pixels, amplitude as f32, &mut *rng);
            });
            match noise {
                Ok(()) => {}
                // e.g. a cross-origin source taints the canvas; the frame itself is fine
                Err(DrawError::Surface(e)) => {
                    log::warn!("[frame] pixel noise disabled: {}", e);
                    self.pixel_noise = false;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Some(state))
    }
}

/// Perturb RGB channels by `U(-amplitude, amplitude)`, leaving alpha untouched.
pub fn apply_noise<R: Rng>(rgba: &mut [u8], amplitude: f32, rng: &mut R) {
    if !(amplitude > 0.0) {
        return;
    }
    for px in rgba.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            let n = rng.gen_range(-amplitude..=amplitude);
            *c = (f32::from(*c) + n).round().clamp(0.0, 255.0) as u8;
        }
    }
}
