//! Volume and mute state
//!
//! Volume is stored linearly in `[0, 1]`, the range media elements accept.
//! Mute is tied to the zero boundary: setting volume to 0 mutes, any other
//! level unmutes. Muting by toggle keeps the stored level.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Stored level (0.0-1.0), preserved while muted
    level: f64,

    /// Mute state
    muted: bool,

    /// Level substituted when unmuting at zero
    unmute_fallback: f64,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (clamped to 0.0-1.0)
    /// * `unmute_fallback` - Level restored when unmuting a silent volume
    pub fn new(level: f64, unmute_fallback: f64) -> Self {
        let level = clamp_unit(level);
        Self {
            level,
            muted: level == 0.0,
            unmute_fallback: clamp_unit(unmute_fallback),
        }
    }

    /// Set volume from a slider percentage (0-100)
    ///
    /// Exactly 0 mutes; anything above unmutes.
    pub fn set_percent(&mut self, percent: f64) {
        self.level = clamp_unit(percent / 100.0);
        self.muted = self.level == 0.0;
    }

    /// Get stored level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Toggle mute state
    ///
    /// Unmuting with a stored level of 0 restores the fallback level so the
    /// result is never silent.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            if self.level == 0.0 {
                self.level = self.unmute_fallback;
            }
        } else {
            self.muted = true;
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level that is actually audible
    pub fn effective(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Value the volume slider should show (0 while muted)
    pub fn display_percent(&self) -> f64 {
        self.effective() * 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8, 0.5);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_percent_clamps() {
        let mut vol = Volume::default();

        vol.set_percent(75.0);
        assert!((vol.level() - 0.75).abs() < 1e-9);

        vol.set_percent(150.0);
        assert_eq!(vol.level(), 1.0);

        vol.set_percent(-20.0);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn zero_percent_mutes() {
        let mut vol = Volume::default();
        vol.set_percent(0.0);
        assert!(vol.is_muted());

        vol.set_percent(1.0);
        assert!(!vol.is_muted());
    }

    #[test]
    fn toggle_mute_preserves_level() {
        let mut vol = Volume::new(0.6, 0.5);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.6);
        assert_eq!(vol.effective(), 0.0);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.6);
    }

    #[test]
    fn unmute_at_zero_uses_fallback() {
        let mut vol = Volume::default();
        vol.set_percent(0.0);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.5);
    }

    #[test]
    fn display_percent_is_zero_while_muted() {
        let mut vol = Volume::new(0.4, 0.5);
        assert!((vol.display_percent() - 40.0).abs() < 1e-9);

        vol.toggle_mute();
        assert_eq!(vol.display_percent(), 0.0);
    }

    #[test]
    fn nan_level_is_treated_as_silence() {
        let mut vol = Volume::default();
        vol.set_percent(f64::NAN);
        assert_eq!(vol.level(), 0.0);
        assert!(vol.is_muted());
    }
}
