//! Capabilities supplied by the rendering environment
//!
//! A browser provides these through `HTMLMediaElement` and the Fullscreen API
//! (see the `wasm` feature); tests provide recording fakes.

use crate::error::Result;

/// Transport commands on a single media element
///
/// Commands are requests. The element confirms what actually happened by
/// emitting [`MediaEvent`](crate::MediaEvent)s, which the host forwards to
/// the controller.
pub trait MediaElement {
    /// Request playback
    ///
    /// # Returns
    /// * `Ok(())` - Request issued (playback may still be refused later)
    /// * `Err(_)` - Request refused immediately
    fn play(&mut self) -> Result<()>;

    /// Request pause
    fn pause(&mut self);

    /// Current position in seconds, as the element reports it
    fn current_time(&self) -> f64;

    /// Set position in seconds
    ///
    /// The element clamps to `[0, duration]`.
    fn set_current_time(&mut self, seconds: f64);

    /// Set output volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Suppress or restore audible output
    fn set_muted(&mut self, muted: bool);
}

/// Fullscreen control on the player container
pub trait FullscreenHost {
    /// Whether any element is currently fullscreen
    fn is_fullscreen(&self) -> bool;

    /// Ask the environment to make the container fullscreen
    ///
    /// Success only means the request was issued; the environment reports
    /// the outcome through a fullscreen-change notification.
    fn request_fullscreen(&mut self) -> Result<()>;

    /// Leave fullscreen
    fn exit_fullscreen(&mut self) -> Result<()>;
}
