//! Named tuning profiles for the ash particle field.

use crate::core::constants::{BURST_BASS_THRESHOLD, BURST_COOLDOWN_MS, BURST_SCALE};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresetName {
    /// Dense field with larger flakes and a gentle spin.
    Ash,
    /// Sparser field with finer flakes and livelier spin.
    #[default]
    Drift,
}

impl PresetName {
    pub const ALL: [PresetName; 2] = [PresetName::Ash, PresetName::Drift];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::Ash => "ash",
            PresetName::Drift => "drift",
        }
    }

    pub fn preset(self) -> ParticlePreset {
        match self {
            PresetName::Ash => ParticlePreset::ash(),
            PresetName::Drift => ParticlePreset::drift(),
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ash" => Ok(PresetName::Ash),
            "drift" => Ok(PresetName::Drift),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// Spawn ranges and physics gains. Ranges are half-open `(lo, hi)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePreset {
    pub name: PresetName,
    /// Pool size maintained by replenishment.
    pub floor: usize,

    pub normal_size: (f32, f32),
    pub intense_size: (f32, f32),
    pub rotation_spread: f32,
    pub intense_rotation_spread: f32,
    /// Upward speed magnitudes; applied as negative `vy`.
    pub normal_rise: (f32, f32),
    pub intense_rise: (f32, f32),
    pub intense_drift_scale: f32,
    pub alpha: (f32, f32),
    /// Inclusive vertex count range of the ash outline.
    pub outline_vertices: (usize, usize),
    pub outline_radius: (f32, f32),

    pub alpha_decay: f32,
    pub rise_bass_gain: f32,
    pub drift_bass_gain: f32,
    pub rise_damping: f32,
    pub rise_damping_bass: f32,
    pub spin_damping: f32,
    pub spin_damping_bass: f32,

    pub burst_threshold: f32,
    pub burst_scale: f32,
    pub burst_cooldown_ms: f64,
}

impl ParticlePreset {
    fn base(name: PresetName) -> Self {
        Self {
            name,
            floor: 500,
            normal_size: (2.0, 5.0),
            intense_size: (3.0, 7.0),
            rotation_spread: 0.025,
            intense_rotation_spread: 0.025,
            normal_rise: (0.5, 2.0),
            intense_rise: (4.0, 10.0),
            intense_drift_scale: 3.0,
            alpha: (0.2, 0.6),
            outline_vertices: (6, 9),
            outline_radius: (0.3, 1.0),
            alpha_decay: 0.997,
            rise_bass_gain: 0.7,
            drift_bass_gain: 1.0,
            rise_damping: 0.7,
            rise_damping_bass: 1.5,
            spin_damping: 0.6,
            spin_damping_bass: 0.4,
            burst_threshold: BURST_BASS_THRESHOLD,
            burst_scale: BURST_SCALE,
            burst_cooldown_ms: BURST_COOLDOWN_MS,
        }
    }

    pub fn ash() -> Self {
        Self::base(PresetName::Ash)
    }

    pub fn drift() -> Self {
        Self {
            floor: 200,
            normal_size: (1.0, 4.0),
            intense_size: (2.0, 5.0),
            rotation_spread: 0.05,
            intense_rotation_spread: 0.1,
            alpha: (0.2, 0.7),
            outline_vertices: (5, 10),
            ..Self::base(PresetName::Drift)
        }
    }

    pub fn with_floor(mut self, floor: usize) -> Self {
        self.floor = floor;
        self
    }
}

impl Default for ParticlePreset {
    fn default() -> Self {
        Self::drift()
    }
}
