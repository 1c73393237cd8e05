//! Scene configuration with defaults and string-attribute parsing.

use crate::core::compositor::DistortionParams;
use crate::core::constants::{
    DEFAULT_FRAME_RATE, DEFAULT_SMOOTHING, FRAME_RATE_MAX, FRAME_RATE_MIN,
};
use crate::core::presets::PresetName;

// Attribute names read from the host element
pub const ATTR_SMOOTHING: &str = "data-smoothing";
pub const ATTR_FRAME_RATE: &str = "data-frame-rate";
pub const ATTR_PRESET: &str = "data-preset";
pub const ATTR_PIXEL_NOISE: &str = "data-pixel-noise";
pub const ATTR_DENSITY_SCALE: &str = "data-density-scale";
pub const ATTR_SEED: &str = "data-seed";

// Keeps k strictly inside (0, 1)
const SMOOTHING_MIN: f64 = 1e-6;
const SMOOTHING_MAX: f64 = 1.0 - 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub smoothing: f64,
    pub frame_rate: f64,
    pub preset: PresetName,
    pub distortion: DistortionParams,
    pub pixel_noise: bool,
    /// Explicit density scale; `None` lets the host use its pixel ratio.
    pub density_scale: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            frame_rate: DEFAULT_FRAME_RATE,
            preset: PresetName::default(),
            distortion: DistortionParams::default(),
            pixel_noise: true,
            density_scale: None,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Build from optional string attributes. Unparseable values are logged
    /// and the default kept.
    pub fn from_attrs(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = parse_attr::<f64>(&lookup, ATTR_SMOOTHING) {
            cfg.smoothing = v;
        }
        if let Some(v) = parse_attr::<f64>(&lookup, ATTR_FRAME_RATE) {
            cfg.frame_rate = v;
        }
        if let Some(v) = parse_attr(&lookup, ATTR_PRESET) {
            cfg.preset = v;
        }
        if let Some(raw) = lookup(ATTR_PIXEL_NOISE) {
            match parse_flag(&raw) {
                Some(b) => cfg.pixel_noise = b,
                None => log::warn!("[config] ignoring {}='{}'", ATTR_PIXEL_NOISE, raw),
            }
        }
        if let Some(v) = parse_attr::<f64>(&lookup, ATTR_DENSITY_SCALE) {
            cfg.density_scale = Some(v);
        }
        if let Some(v) = parse_attr::<u64>(&lookup, ATTR_SEED) {
            cfg.seed = Some(v);
        }
        cfg.sanitized()
    }

    /// Clamp values into their valid domains.
    pub fn sanitized(mut self) -> Self {
        self.smoothing = if self.smoothing.is_finite() {
            self.smoothing.clamp(SMOOTHING_MIN, SMOOTHING_MAX)
        } else {
            DEFAULT_SMOOTHING
        };
        self.frame_rate = if self.frame_rate.is_finite() {
            self.frame_rate.clamp(FRAME_RATE_MIN, FRAME_RATE_MAX)
        } else {
            DEFAULT_FRAME_RATE
        };
        self.density_scale = self.density_scale.filter(|s| s.is_finite() && *s > 0.0);
        self
    }
}

fn parse_attr<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("[config] ignoring {}='{}'", name, raw);
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
