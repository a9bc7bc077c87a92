#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    io::converter::CONTROLLER_OFFSETS,
    tuning::ExploreBounds,
    FADE_TIME_MAX, ROOT_MAX_HZ, ROOT_MIN_HZ,
};

/// Upper limit on the voice pool size.
pub const MAX_VOICES: usize = 64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Subtracted from incoming controller numbers before mapping (0 or 32).
    pub controller_offset: u8,
    pub voice_count: usize,
    /// Initial fade time in seconds.
    pub fade_time_default: f64,
    /// Initial root in Hz.
    pub root_default: f64,
    /// Per-voice fader amplitude before any fader has moved.
    pub voice_amplitude_default: f64,
    /// Control events the input queue holds before dropping.
    pub queue_capacity: usize,
    pub explore_bounds: ExploreBounds,
    /// Onset spacing in seconds when auditioning an exploration.
    pub audition_spacing: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            controller_offset: 0,
            voice_count: 8,
            fade_time_default: 0.5,
            root_default: 220.0,
            voice_amplitude_default: 0.5,
            queue_capacity: 1024,
            explore_bounds: ExploreBounds::default(),
            audition_spacing: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn with_controller_offset(mut self, offset: u8) -> Self {
        self.controller_offset = offset;
        self
    }

    pub fn with_voice_count(mut self, voices: usize) -> Self {
        self.voice_count = voices;
        self
    }

    pub fn with_fade_time(mut self, seconds: f64) -> Self {
        self.fade_time_default = seconds;
        self
    }

    pub fn with_root(mut self, hz: f64) -> Self {
        self.root_default = hz;
        self
    }

    pub fn with_voice_amplitude(mut self, amplitude: f64) -> Self {
        self.voice_amplitude_default = amplitude;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_explore_bounds(mut self, bounds: ExploreBounds) -> Self {
        self.explore_bounds = bounds;
        self
    }

    pub fn with_audition_spacing(mut self, seconds: f64) -> Self {
        self.audition_spacing = seconds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidConfig(msg));

        if !CONTROLLER_OFFSETS.contains(&self.controller_offset) {
            return fail(format!(
                "controller offset must be 0 or 32, got {}",
                self.controller_offset
            ));
        }
        if self.voice_count == 0 || self.voice_count > MAX_VOICES {
            return fail(format!(
                "voice count must be 1..={MAX_VOICES}, got {}",
                self.voice_count
            ));
        }
        if !(0.0..=FADE_TIME_MAX).contains(&self.fade_time_default) {
            return fail(format!(
                "fade time must be 0..={FADE_TIME_MAX} s, got {}",
                self.fade_time_default
            ));
        }
        if !(ROOT_MIN_HZ..=ROOT_MAX_HZ).contains(&self.root_default) {
            return fail(format!(
                "root must be {ROOT_MIN_HZ}..={ROOT_MAX_HZ} Hz, got {}",
                self.root_default
            ));
        }
        if !(0.0..=1.0).contains(&self.voice_amplitude_default) {
            return fail(format!(
                "voice amplitude must be 0..=1, got {}",
                self.voice_amplitude_default
            ));
        }
        if self.queue_capacity == 0 {
            return fail("queue capacity must be non-zero".to_string());
        }
        if !(self.audition_spacing.is_finite() && self.audition_spacing >= 0.0) {
            return fail(format!(
                "audition spacing must be a non-negative number of seconds, got {}",
                self.audition_spacing
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_unknown_offset() {
        let config = EngineConfig::default().with_controller_offset(16);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        EngineConfig::default()
            .with_controller_offset(32)
            .validate()
            .unwrap();
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = EngineConfig::default();
        assert!(base.clone().with_voice_count(0).validate().is_err());
        assert!(base.clone().with_voice_count(65).validate().is_err());
        assert!(base.clone().with_fade_time(6.0).validate().is_err());
        assert!(base.clone().with_root(10.0).validate().is_err());
        assert!(base.clone().with_root(f64::NAN).validate().is_err());
        assert!(base.clone().with_queue_capacity(0).validate().is_err());
        assert!(base.clone().with_audition_spacing(-0.1).validate().is_err());
        assert!(base.with_voice_amplitude(1.5).validate().is_err());
    }
}
