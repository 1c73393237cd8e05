//! Failure taxonomy for the scrub/composite/particle pipeline.
//!
//! None of these are fatal: the frame loop logs them and degrades to a static
//! or non-reactive state.

use thiserror::Error;

/// Per-tick drawing failure. The tick is skipped and the loop continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    #[error("media source is not ready to present a frame")]
    SourceNotReady,
    #[error("surface has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("surface error: {0}")]
    Surface(String),
}

/// Audio graph construction failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("audio graph requires a prior user gesture")]
    GestureRequired,
    #[error("audio graph error: {0}")]
    Graph(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("failed to load source: {0}")]
    SourceLoad(String),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Audio(#[from] AudioError),
}
