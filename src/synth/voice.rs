use crate::{
    dsp::{Envelope, Ramp},
    tuning::{to_frequency, Ratio},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Available for assignment
    Active,    // Ratio assigned, gate open or waiting for its onset
    Releasing, // Gate fading out, returns to Idle when silent
}

/// One voice slot: a ratio above the root plus its smoothed controls.
///
/// Output amplitude is `amplitude * gate`. The fader amplitude is frozen while
/// releasing so the release is driven by the gate alone and never rises.
#[derive(Debug, Clone)]
pub struct Voice {
    ratio: Option<Ratio>,
    state: VoiceState,
    gate: Envelope,
    amplitude: Ramp,
    pan: Ramp,
    /// Fader amplitude frozen at the start of a release.
    held_amplitude: f64,
    /// Pool clock time at which the gate opens.
    onset_at: f64,
    started: bool,
    pending_mute: bool,
}

impl Voice {
    pub fn new(amplitude: f64, pan: f64) -> Self {
        Self {
            ratio: None,
            state: VoiceState::Idle,
            gate: Envelope::new(),
            amplitude: Ramp::new(amplitude.clamp(0.0, 1.0)),
            pan: Ramp::new(pan.clamp(-1.0, 1.0)),
            held_amplitude: 0.0,
            onset_at: 0.0,
            started: false,
            pending_mute: false,
        }
    }

    /// Assign `ratio`, sounding from `onset_at` on the pool clock.
    ///
    /// An active voice is retuned in place, and one still waiting for its
    /// onset takes the new onset instead. A releasing voice is pulled back
    /// up from its current level.
    pub fn assign(&mut self, ratio: Ratio, now: f64, onset_at: f64, fade_time: f64) {
        self.ratio = Some(ratio);

        match self.state {
            VoiceState::Idle => {
                self.state = VoiceState::Active;
                self.onset_at = onset_at;
                self.started = false;
                self.pending_mute = false;
                if now >= onset_at {
                    self.open(fade_time);
                }
            }
            VoiceState::Active if !self.started => {
                self.onset_at = onset_at;
                if now >= onset_at {
                    self.open(fade_time);
                }
            }
            VoiceState::Active => {}
            VoiceState::Releasing => {
                self.state = VoiceState::Active;
                let target = self.amplitude.target();
                self.amplitude.jump(self.held_amplitude);
                self.amplitude.set_target(target, fade_time);
                self.gate.note_on(fade_time);
            }
        }
    }

    pub fn release(&mut self, fade_time: f64) {
        if self.state != VoiceState::Active {
            return;
        }

        if self.started {
            self.state = VoiceState::Releasing;
            self.held_amplitude = self.amplitude.current();
            self.gate.note_off(fade_time);
        } else {
            // Never sounded, nothing to fade
            self.free();
        }
    }

    pub fn set_amplitude(&mut self, target: f64, fade_time: f64) {
        self.amplitude.set_target(target.clamp(0.0, 1.0), fade_time);
    }

    pub fn set_pan(&mut self, target: f64, fade_time: f64) {
        self.pan.set_target(target.clamp(-1.0, 1.0), fade_time);
    }

    /// Advance all smoothing by `dt` seconds; `now` is the pool clock after the step.
    pub fn advance(&mut self, now: f64, dt: f64, fade_time: f64) {
        self.pan.advance(dt);
        self.amplitude.advance(dt);

        match self.state {
            VoiceState::Idle => return,
            VoiceState::Active if !self.started => {
                if now < self.onset_at {
                    return;
                }
                // Only the part of the step after the onset counts
                self.open(fade_time);
                self.gate.advance((now - self.onset_at).clamp(0.0, dt));
            }
            VoiceState::Active | VoiceState::Releasing => self.gate.advance(dt),
        }

        if self.state == VoiceState::Releasing && !self.gate.is_active() {
            self.free();
            self.pending_mute = true;
        }
    }

    fn open(&mut self, fade_time: f64) {
        self.started = true;
        self.gate.note_on(fade_time);
    }

    fn free(&mut self) {
        self.state = VoiceState::Idle;
        self.ratio = None;
        self.started = false;
        self.gate.reset();
    }

    /// True exactly once after a release completes.
    pub(crate) fn take_pending_mute(&mut self) -> bool {
        std::mem::take(&mut self.pending_mute)
    }

    /// Frequency in Hz above `root`, if a ratio is assigned.
    pub fn frequency(&self, root: f64) -> Option<f64> {
        self.ratio.map(|ratio| to_frequency(root, ratio))
    }

    /// Gate open and not yet silent.
    pub fn is_sounding(&self) -> bool {
        self.started && self.state != VoiceState::Idle
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Idle
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn ratio(&self) -> Option<Ratio> {
        self.ratio
    }

    /// Amplitude after gating, what the renderer hears.
    pub fn output_amplitude(&self) -> f64 {
        let amplitude = match self.state {
            VoiceState::Releasing => self.held_amplitude,
            _ => self.amplitude.current(),
        };
        amplitude * self.gate.level()
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude.current()
    }

    pub fn target_amplitude(&self) -> f64 {
        self.amplitude.target()
    }

    pub fn pan(&self) -> f64 {
        self.pan.current()
    }

    pub fn target_pan(&self) -> f64 {
        self.pan.target()
    }

    pub fn gate_level(&self) -> f64 {
        self.gate.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.01;

    fn fifth() -> Ratio {
        Ratio::FIFTH
    }

    #[test]
    fn assign_opens_gate_immediately() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 0.0, 0.1);
        assert_eq!(voice.state(), VoiceState::Active);
        assert!(voice.is_sounding());
        assert_eq!(voice.frequency(220.0), Some(330.0));
    }

    #[test]
    fn delayed_onset_waits_for_clock() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 0.05, 0.0);
        assert!(!voice.is_sounding());

        let mut now = 0.0;
        for _ in 0..4 {
            now += DT;
            voice.advance(now, DT, 0.0);
        }
        assert!(!voice.is_sounding());

        now += 0.02;
        voice.advance(now, 0.02, 0.0);
        assert!(voice.is_sounding());
    }

    #[test]
    fn release_ends_idle_with_single_mute() {
        let mut voice = Voice::new(0.8, 0.0);
        voice.assign(fifth(), 0.0, 0.0, 0.0);
        voice.release(0.1);
        assert_eq!(voice.state(), VoiceState::Releasing);

        let mut now = 0.0;
        let mut previous = voice.output_amplitude();
        while voice.state() == VoiceState::Releasing {
            now += DT;
            voice.advance(now, DT, 0.1);
            assert!(voice.output_amplitude() <= previous);
            previous = voice.output_amplitude();
        }
        assert_eq!(voice.state(), VoiceState::Idle);
        assert_eq!(voice.ratio(), None);
        assert!(voice.take_pending_mute());
        assert!(!voice.take_pending_mute());
    }

    #[test]
    fn fader_moves_do_not_lift_a_release() {
        let mut voice = Voice::new(0.2, 0.0);
        voice.assign(fifth(), 0.0, 0.0, 0.0);
        voice.release(0.5);
        voice.set_amplitude(1.0, 0.0);

        let before = voice.output_amplitude();
        voice.advance(DT, DT, 0.5);
        assert!(voice.output_amplitude() <= before);
        assert_eq!(voice.target_amplitude(), 1.0);
    }

    #[test]
    fn release_of_unstarted_voice_frees_it() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 1.0, 0.1);
        voice.release(0.1);
        assert!(voice.is_free());
        assert!(!voice.take_pending_mute());
    }

    #[test]
    fn late_onset_gate_counts_from_the_onset() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 0.05, 0.1);

        voice.advance(0.04, 0.04, 0.1);
        assert!(!voice.is_sounding());

        // onset fell 0.01 s into this 0.02 s step
        voice.advance(0.06, 0.02, 0.1);
        assert!(voice.is_sounding());
        assert!((voice.gate_level() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn reassign_waiting_voice_takes_new_onset() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 1.0, 0.0);
        voice.assign(Ratio::OCTAVE, 0.0, 0.0, 0.0);
        assert_eq!(voice.ratio(), Some(Ratio::OCTAVE));
        assert!(voice.is_sounding());
        assert_eq!(voice.gate_level(), 1.0);

        let mut later = Voice::new(1.0, 0.0);
        later.assign(fifth(), 0.0, 1.0, 0.0);
        later.assign(fifth(), 0.0, 0.2, 0.0);
        later.advance(0.25, 0.25, 0.0);
        assert!(later.is_sounding());
    }

    #[test]
    fn reassign_releasing_voice_climbs_from_current_level() {
        let mut voice = Voice::new(0.8, 0.0);
        voice.assign(fifth(), 0.0, 0.0, 0.0);
        voice.release(0.5);

        let mut now = 0.0;
        for _ in 0..20 {
            now += DT;
            voice.advance(now, DT, 0.5);
        }
        let fading = voice.output_amplitude();
        assert!(fading > 0.0 && fading < 0.8);

        voice.assign(Ratio::FOURTH, now, now, 0.5);
        assert_eq!(voice.state(), VoiceState::Active);
        assert!((voice.output_amplitude() - fading).abs() < 1e-9);

        let mut previous = fading;
        for _ in 0..60 {
            now += DT;
            voice.advance(now, DT, 0.5);
            assert!(voice.output_amplitude() >= previous);
            previous = voice.output_amplitude();
        }
        assert!((previous - 0.8).abs() < 1e-9);
        assert!(!voice.take_pending_mute());
    }

    #[test]
    fn reassign_active_voice_retunes() {
        let mut voice = Voice::new(1.0, 0.0);
        voice.assign(fifth(), 0.0, 0.0, 0.0);
        voice.assign(Ratio::MAJOR_THIRD, 0.0, 0.0, 0.0);
        assert_eq!(voice.ratio(), Some(Ratio::MAJOR_THIRD));
        assert_eq!(voice.state(), VoiceState::Active);
        assert_eq!(voice.gate_level(), 1.0);
    }

    #[test]
    fn targets_are_clamped() {
        let mut voice = Voice::new(0.5, 0.0);
        voice.set_amplitude(5.0, 0.1);
        assert_eq!(voice.target_amplitude(), 1.0);
        voice.set_amplitude(-1.0, 0.1);
        assert_eq!(voice.target_amplitude(), 0.0);
        voice.set_pan(-3.0, 0.1);
        assert_eq!(voice.target_pan(), -1.0);
    }
}
