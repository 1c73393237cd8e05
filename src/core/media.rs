//! Media source seam and its lifecycle state.

use crate::core::error::DrawError;
use std::fmt;

/// An addressable video source with a readable time cursor.
pub trait MediaSource {
    fn duration_seconds(&self) -> f64;
    fn natural_size(&self) -> (u32, u32);
    /// Request presentation of the frame at `time` seconds. May complete
    /// asynchronously; completion arrives as [`MediaEvent::SeekFinished`].
    fn seek(&mut self, time: f64) -> Result<(), DrawError>;
}

/// Lifecycle signals emitted by the media source, consumed on the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    MetadataReady {
        duration: f64,
        width: u32,
        height: u32,
    },
    FrameReady,
    SeekStarted,
    SeekFinished,
    DecodeError(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadingState {
    #[default]
    Initializing,
    MetadataLoaded,
    Ready,
    Error(String),
}

impl LoadingState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadingState::Ready)
    }
}

impl fmt::Display for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingState::Initializing => f.write_str("initializing"),
            LoadingState::MetadataLoaded => f.write_str("metadata_loaded"),
            LoadingState::Ready => f.write_str("ready"),
            LoadingState::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaStatus {
    pub loading: LoadingState,
    pub seeking: bool,
    pub duration: f64,
    pub natural_size: (u32, u32),
}

impl MediaStatus {
    /// Fold one lifecycle event into the status. A decode error is terminal
    /// for the current source.
    pub fn apply(&mut self, event: &MediaEvent) {
        if matches!(self.loading, LoadingState::Error(_)) {
            return;
        }
        match event {
            MediaEvent::MetadataReady {
                duration,
                width,
                height,
            } => {
                self.duration = *duration;
                self.natural_size = (*width, *height);
                if !self.loading.is_ready() {
                    self.loading = LoadingState::MetadataLoaded;
                }
            }
            MediaEvent::FrameReady => self.loading = LoadingState::Ready,
            MediaEvent::SeekStarted => self.seeking = true,
            MediaEvent::SeekFinished => self.seeking = false,
            MediaEvent::DecodeError(msg) => {
                self.loading = LoadingState::Error(msg.clone());
                self.seeking = false;
            }
        }
    }
}
