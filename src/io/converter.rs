//! Fader bank mapping: controller number and 7-bit value to [`ControlEvent`].
//!
//! ```text
//!  controller   event                      range
//!  0            MasterAmplitude            0.0 .. 1.0
//!  1            RootChange                 20 .. 2000 Hz
//!  2            FadeTimeChange             0 .. 5 s
//!  3..=10       VoiceAmplitude(cc - 3)     0.0 .. 1.0
//!  11..=15      VoicePan(cc - 11)          -1.0 .. 1.0
//! ```
//!
//! Controller numbers are taken relative to the configured offset, so a
//! surface sending 32..=47 works unchanged with an offset of 32. Anything
//! outside the window maps to nothing.

use crate::{
    io::midi::{ControlMessage, MidiEvent},
    synth::message::ControlEvent,
    FADE_TIME_MAX, ROOT_MAX_HZ, ROOT_MIN_HZ,
};

const CC_MASTER: u8 = 0;
const CC_ROOT: u8 = 1;
const CC_FADE: u8 = 2;
const CC_VOICE_AMP_FIRST: u8 = 3;
const CC_VOICE_AMP_LAST: u8 = 10;
const CC_VOICE_PAN_FIRST: u8 = 11;
const CC_VOICE_PAN_LAST: u8 = 15;

/// Controller offsets a surface can be configured with.
pub const CONTROLLER_OFFSETS: [u8; 2] = [0, 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlMapper {
    offset: u8,
}

impl ControlMapper {
    pub fn new(offset: u8) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn map(&self, message: ControlMessage) -> Option<ControlEvent> {
        let controller = message.controller.checked_sub(self.offset)?;
        let unit = unit(message.value);

        let event = match controller {
            CC_MASTER => ControlEvent::MasterAmplitude(unit),
            CC_ROOT => ControlEvent::RootChange(lerp(ROOT_MIN_HZ, ROOT_MAX_HZ, unit)),
            CC_FADE => ControlEvent::FadeTimeChange(lerp(0.0, FADE_TIME_MAX, unit)),
            CC_VOICE_AMP_FIRST..=CC_VOICE_AMP_LAST => ControlEvent::VoiceAmplitude {
                index: (controller - CC_VOICE_AMP_FIRST) as usize,
                value: unit,
            },
            CC_VOICE_PAN_FIRST..=CC_VOICE_PAN_LAST => ControlEvent::VoicePan {
                index: (controller - CC_VOICE_PAN_FIRST) as usize,
                value: lerp(-1.0, 1.0, unit),
            },
            _ => return None,
        };

        Some(event)
    }
}

/// Pull the control change out of a MIDI event; other messages are dropped.
pub fn midi_to_control(midi: MidiEvent, timestamp_us: u64) -> Option<ControlMessage> {
    match midi {
        MidiEvent::ControlChange {
            controller, value, ..
        } => Some(ControlMessage::new(controller, value, timestamp_us)),
        _ => None,
    }
}

/// 0..=127 to 0.0..=1.0; values above 127 clamp.
fn unit(value: u8) -> f32 {
    value.min(127) as f32 / 127.0
}

fn lerp(min: f64, max: f64, t: f32) -> f32 {
    (min + (max - min) * t as f64) as f32
}
