/// Timing, analysis and compositing constants.
///
/// These express intended behavior (reference cadences, gains, thresholds)
/// and keep magic numbers out of the per-tick code.
// Reference frame interval the easing constant is normalized to (60 Hz)
pub const EASE_REFERENCE_MS: f64 = 16.67;

// Scrub target is kept this far inside the end of the timeline (seconds)
pub const TARGET_END_EPSILON_SEC: f64 = 0.01;

// Default smoothing factor k (closer to 1 = slower approach)
pub const DEFAULT_SMOOTHING: f64 = 0.99;
pub const DEFAULT_FRAME_RATE: f64 = 60.0;
pub const FRAME_RATE_MIN: f64 = 1.0;
pub const FRAME_RATE_MAX: f64 = 240.0;

// Audio graph
pub const BASS_LOWPASS_HZ: f32 = 150.0;
pub const BASS_LOWPASS_Q: f32 = 1.0;
pub const BASS_GAIN: f32 = 2.0;
pub const ANALYSER_FFT_SIZE: u32 = 1024;
pub const BASS_BIN_FRACTION: f32 = 0.1;

// Distortion mapping
pub const DISTORTION_GAIN: f64 = 50.0;
pub const GHOST_OFFSET_GAIN: f64 = 10.0;
pub const GHOST_DELTA_THRESHOLD: f64 = 0.01;
// Below this amplitude rounding to u8 leaves every channel unchanged
pub const NOISE_MIN_AMPLITUDE: f64 = 0.5;

// Particle lifecycle
pub const CULL_TOP_MARGIN: f32 = -20.0;
pub const ALPHA_CULL_FLOOR: f32 = 0.01;
pub const INTENSE_SPAWN_BELOW: f32 = 10.0;

// Burst trigger
pub const BURST_BASS_THRESHOLD: f32 = 0.5;
pub const BURST_SCALE: f32 = 50.0;
pub const BURST_COOLDOWN_MS: f64 = 50.0;

// Particle rendering
pub const CORE_GRADIENT_RADIUS: f32 = 1.5;
pub const HALO_GRADIENT_RADIUS: f32 = 2.5;
pub const HALO_ALPHA_SCALE: f32 = 0.6;
