// Host-side tests for attribute parsing, presets and tuning constants.

use ashen_web::core::config::{
    ATTR_DENSITY_SCALE, ATTR_FRAME_RATE, ATTR_PIXEL_NOISE, ATTR_PRESET, ATTR_SEED, ATTR_SMOOTHING,
};
use ashen_web::core::constants as k;
use ashen_web::core::{FrameLimiter, LoadingState, ParticlePreset, PresetName, SceneConfig};
use std::collections::HashMap;

fn from_pairs(pairs: &[(&str, &str)]) -> SceneConfig {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    SceneConfig::from_attrs(|name| map.get(name).cloned())
}

#[test]
fn no_attributes_gives_defaults() {
    let cfg = from_pairs(&[]);
    assert_eq!(cfg, SceneConfig::default());
    assert_eq!(cfg.smoothing, 0.99);
    assert_eq!(cfg.frame_rate, 60.0);
    assert_eq!(cfg.preset, PresetName::Drift);
    assert!(cfg.pixel_noise);
    assert_eq!(cfg.density_scale, None);
    assert_eq!(cfg.seed, None);
}

#[test]
fn attributes_override_defaults() {
    let cfg = from_pairs(&[
        (ATTR_SMOOTHING, "0.95"),
        (ATTR_FRAME_RATE, " 30 "),
        (ATTR_PRESET, "ASH"),
        (ATTR_PIXEL_NOISE, "off"),
        (ATTR_DENSITY_SCALE, "2"),
        (ATTR_SEED, "1234"),
    ]);
    assert_eq!(cfg.smoothing, 0.95);
    assert_eq!(cfg.frame_rate, 30.0);
    assert_eq!(cfg.preset, PresetName::Ash);
    assert!(!cfg.pixel_noise);
    assert_eq!(cfg.density_scale, Some(2.0));
    assert_eq!(cfg.seed, Some(1234));
}

#[test]
fn garbage_values_keep_defaults() {
    let cfg = from_pairs(&[
        (ATTR_SMOOTHING, "smooth"),
        (ATTR_FRAME_RATE, ""),
        (ATTR_PRESET, "embers"),
        (ATTR_PIXEL_NOISE, "maybe"),
        (ATTR_DENSITY_SCALE, "-3"),
        (ATTR_SEED, "-1"),
    ]);
    assert_eq!(cfg, SceneConfig::default());
}

#[test]
fn bare_flag_attribute_enables_noise() {
    let cfg = from_pairs(&[(ATTR_PIXEL_NOISE, "")]);
    assert!(cfg.pixel_noise);
}

#[test]
fn out_of_range_values_are_clamped() {
    let cfg = from_pairs(&[(ATTR_SMOOTHING, "1.5"), (ATTR_FRAME_RATE, "1000")]);
    assert!(cfg.smoothing < 1.0);
    assert_eq!(cfg.frame_rate, k::FRAME_RATE_MAX);

    let cfg = from_pairs(&[(ATTR_SMOOTHING, "0"), (ATTR_FRAME_RATE, "0")]);
    assert!(cfg.smoothing > 0.0);
    assert_eq!(cfg.frame_rate, k::FRAME_RATE_MIN);

    let cfg = SceneConfig {
        smoothing: f64::NAN,
        frame_rate: f64::INFINITY,
        density_scale: Some(0.0),
        ..SceneConfig::default()
    }
    .sanitized();
    assert_eq!(cfg.smoothing, k::DEFAULT_SMOOTHING);
    assert_eq!(cfg.frame_rate, k::DEFAULT_FRAME_RATE);
    assert_eq!(cfg.density_scale, None);
}

#[test]
fn preset_names_parse_case_insensitively() {
    for name in PresetName::ALL {
        assert_eq!(name.as_str().to_uppercase().parse::<PresetName>(), Ok(name));
        assert_eq!(name.to_string(), name.as_str());
        assert_eq!(name.preset().name, name);
    }
    assert!("".parse::<PresetName>().is_err());
}

#[test]
fn presets_differ_in_density_and_shape() {
    let ash = ParticlePreset::ash();
    let drift = ParticlePreset::drift();
    assert_eq!(drift, ParticlePreset::default());
    assert_eq!(PresetName::default().preset(), drift);
    assert_eq!(ash.floor, 500);
    assert_eq!(ash.alpha, (0.2, 0.6));
    assert_eq!(drift.floor, 200);
    assert_eq!(drift.alpha, (0.2, 0.7));
    assert_eq!(drift.outline_vertices, (5, 10));
    // shared physics
    assert_eq!(ash.alpha_decay, drift.alpha_decay);
    assert_eq!(ash.burst_scale, drift.burst_scale);
    assert_eq!(ParticlePreset::drift().with_floor(3).floor, 3);
}

#[test]
fn limiter_enforces_minimum_interval() {
    let mut limiter = FrameLimiter::new(60.0);
    assert!((limiter.interval_ms() - 1000.0 / 60.0).abs() < 1e-9);
    assert_eq!(limiter.poll(10.0), None);
    assert_eq!(limiter.poll(20.0), Some(20.0));
    limiter.commit(20.0);
    assert_eq!(limiter.poll(30.0), None);
    assert_eq!(limiter.poll(40.0), Some(20.0));
    limiter.reset();
    assert_eq!(limiter.poll(40.0), Some(40.0));
}

#[test]
fn loading_state_labels() {
    assert_eq!(LoadingState::Initializing.to_string(), "initializing");
    assert_eq!(LoadingState::MetadataLoaded.to_string(), "metadata_loaded");
    assert_eq!(LoadingState::Ready.to_string(), "ready");
    assert_eq!(LoadingState::Error("404".into()).to_string(), "error: 404");
}
