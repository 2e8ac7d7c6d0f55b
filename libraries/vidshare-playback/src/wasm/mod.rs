//! WASM bindings for vidshare-playback
//!
//! Implements the element and fullscreen capabilities over `web-sys` and
//! exposes a `WasmVideoPlayer` that wires DOM listeners to the controller.

pub mod element;
pub mod player;

pub use element::{DocumentFullscreen, DomMediaElement};
pub use player::WasmVideoPlayer;
