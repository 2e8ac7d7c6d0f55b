//! Auto-hiding control overlay
//!
//! Single-threaded, timer-driven visibility state. Time is passed in as a
//! monotonic offset (`Duration` since mount) so the host decides where the
//! clock comes from (`performance.now()` in a browser, a fake clock in tests).
//!
//! At most one hide deadline is armed at a time; arming again replaces it.

use std::time::Duration;

/// Visibility of the control overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsState {
    /// Shown, no timer armed
    Visible,

    /// Shown, will hide at `deadline` unless activity re-arms it
    Hiding { deadline: Duration },

    /// Hidden after the timer fired during playback
    Hidden,
}

/// Control visibility state machine
#[derive(Debug, Clone)]
pub struct ControlsVisibility {
    state: ControlsState,
    hide_after: Duration,
}

impl ControlsVisibility {
    /// Create a visible overlay that hides after `hide_after` of inactivity
    pub fn new(hide_after: Duration) -> Self {
        Self {
            state: ControlsState::Visible,
            hide_after,
        }
    }

    /// Pointer moved or clicked inside the player
    ///
    /// Shows the controls. While playing, (re-)arms the hide deadline;
    /// while paused, any armed deadline is dropped.
    ///
    /// Returns `true` if visibility changed.
    pub fn on_activity(&mut self, now: Duration, is_playing: bool) -> bool {
        let was_visible = self.is_visible();
        self.state = if is_playing {
            ControlsState::Hiding {
                deadline: now + self.hide_after,
            }
        } else {
            ControlsState::Visible
        };
        !was_visible
    }

    /// Playback stopped: force visible and cancel the pending deadline
    ///
    /// Returns `true` if visibility changed.
    pub fn on_playback_stopped(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.state = ControlsState::Visible;
        !was_visible
    }

    /// Advance the clock; fires the hide deadline if it has passed
    ///
    /// Returns `true` if the controls just became hidden.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.state {
            ControlsState::Hiding { deadline } if now >= deadline => {
                self.state = ControlsState::Hidden;
                true
            }
            _ => false,
        }
    }

    /// Drop any armed deadline without changing what is shown
    pub fn cancel(&mut self) {
        if let ControlsState::Hiding { .. } = self.state {
            self.state = ControlsState::Visible;
        }
    }

    /// Armed deadline, if any
    pub fn pending_deadline(&self) -> Option<Duration> {
        match self.state {
            ControlsState::Hiding { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Current state
    pub fn state(&self) -> ControlsState {
        self.state
    }

    /// Whether the overlay is currently shown
    pub fn is_visible(&self) -> bool {
        self.state != ControlsState::Hidden
    }
}
