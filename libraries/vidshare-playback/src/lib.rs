//! Vidshare - Playback Control
//!
//! Platform-agnostic control surface for a single video element.
//!
//! This crate provides:
//! - Play/pause driven by element notifications (no optimistic state)
//! - Seek by percentage and relative skip
//! - Volume (0-100%) with mute tied to the zero boundary
//! - Fullscreen requests confirmed by environment notifications
//! - Auto-hiding controls with a single debounced hide timer
//! - Buffering detection
//!
//! # Architecture
//!
//! `vidshare-playback` has no dependency on a browser. The element and the
//! fullscreen API are supplied through the [`MediaElement`] and
//! [`FullscreenHost`] traits; the `wasm` feature implements them over
//! `web-sys` and exports a `WasmVideoPlayer` for JavaScript.
//!
//! # Example
//!
//! ```rust
//! use vidshare_playback::{
//!     FullscreenHost, MediaElement, MediaEvent, PlaybackController, PlayerConfig, Result,
//! };
//!
//! #[derive(Default)]
//! struct Element { time: f64 }
//!
//! impl MediaElement for Element {
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { self.time }
//!     fn set_current_time(&mut self, seconds: f64) { self.time = seconds; }
//!     fn set_volume(&mut self, _volume: f64) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! struct Screen;
//!
//! impl FullscreenHost for Screen {
//!     fn is_fullscreen(&self) -> bool { false }
//!     fn request_fullscreen(&mut self) -> Result<()> { Ok(()) }
//!     fn exit_fullscreen(&mut self) -> Result<()> { Ok(()) }
//! }
//!
//! let mut player = PlaybackController::new(
//!     "https://cdn.example.com/clip.mp4",
//!     Element::default(),
//!     Screen,
//!     PlayerConfig::default(),
//! );
//!
//! // Element reports its metadata, then the user drags the seek bar
//! player.handle_event(MediaEvent::LoadedMetadata { duration: 200.0 });
//! player.seek(25.0).unwrap();
//! assert_eq!(player.position_seconds(), 50.0);
//!
//! // Dragging volume to zero mutes
//! player.set_volume(0.0).unwrap();
//! assert!(player.is_muted());
//! ```

mod controller;
mod controls;
mod element;
mod error;
mod events;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::{EndedListener, PlaybackController};
pub use controls::{ControlsState, ControlsVisibility};
pub use element::{FullscreenHost, MediaElement};
pub use error::{PlaybackError, Result};
pub use events::{MediaEvent, PlayerEvent};
pub use types::{format_timestamp, PlaybackState, PlayerConfig};
pub use volume::Volume;
