// DOM wiring shared by the web frontend.

// Elements
pub const FRAME_CANVAS_ID: &str = "scrub-canvas"; // video frames + distortion
pub const OVERLAY_CANVAS_ID: &str = "ash-canvas"; // particle layer, full viewport
pub const VIDEO_ID: &str = "scrub-video";
pub const AUDIO_ID: &str = "scrub-audio";
pub const TELEMETRY_ID: &str = "telemetry";
pub const LOADING_ID: &str = "loading-overlay";

// Source paths on the frame canvas
pub const ATTR_VIDEO_SRC: &str = "data-video";
pub const ATTR_AUDIO_SRC: &str = "data-audio";
