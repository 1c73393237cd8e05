//! Pointer-scrubbed video with motion distortion and a bass-reactive ash
//! particle field.
//!
//! `core` is platform-free and runs anywhere; everything else binds it to the
//! browser (Canvas 2D, WebAudio, DOM events) and is only built for wasm32.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod media;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod surface;

#[cfg(target_arch = "wasm32")]
pub use app::{load_sources, start, teardown};
