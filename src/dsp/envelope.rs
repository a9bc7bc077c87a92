use super::ramp::Ramp;

/*
Voice Gate Envelope
===================

Each voice multiplies its fader amplitude by a gate level between 0.0 and
1.0. The gate is what fades a voice in when a ratio is assigned and fades it
out when the voice is released, so that starting and stopping never clicks.

It is an attack/release envelope with both stage lengths equal to the fade
time in effect when the stage begins. There is no decay stage; a held voice
sits at full gate until it is released.


The State Machine
-----------------

    ┌──────┐  note_on   ┌────────┐  level=1   ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ─────────→ │ Sustain │
    └──────┘            └────────┘            └─────────┘
        ↑                    │  ↑                   │
        │                    │  │ note_on           │ note_off
        │          note_off  ↓  │                   ↓
        │  level=0      ┌─────────┐                 │
        └────────────── │ Release │ ←───────────────┘
                        └─────────┘

Both transitions out of a moving stage start from the CURRENT level:

  - note_off during Attack releases from wherever the attack got to.
  - note_on during Release climbs back up from wherever the release got to.

The level never jumps, so neither case clicks. Because the underlying ramp
is linear and never overshoots, the level is monotonically non-increasing
for the whole Release stage.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, level = 0
    Attack,  // Ramping toward 1.0
    Sustain, // Holding at 1.0
    Release, // Ramping toward 0.0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeState,
    level: Ramp,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            stage: EnvelopeState::Idle,
            level: Ramp::new(0.0),
        }
    }

    /// Gate high: ramp up to full level over `fade_time` seconds.
    pub fn note_on(&mut self, fade_time: f64) {
        self.level.set_target(1.0, fade_time);
        self.stage = if self.level.is_settled() {
            EnvelopeState::Sustain
        } else {
            EnvelopeState::Attack
        };
    }

    /// Gate low: ramp down to zero over `fade_time` seconds.
    pub fn note_off(&mut self, fade_time: f64) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }

        self.level.set_target(0.0, fade_time);
        self.stage = EnvelopeState::Release;
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.level.advance(dt);

        match self.stage {
            EnvelopeState::Attack if self.level.is_settled() => {
                self.stage = EnvelopeState::Sustain;
            }
            EnvelopeState::Release if self.level.is_settled() => {
                self.stage = EnvelopeState::Idle;
            }
            _ => {}
        }

        debug_assert!((0.0..=1.0).contains(&self.level.current()));
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level.jump(0.0);
    }

    pub fn level(&self) -> f64 {
        self.level.current()
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
