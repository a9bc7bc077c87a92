#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one channel voice message from raw bytes.
    ///
    /// Returns `None` for system messages, running status and truncated input.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }

        let channel = status & 0x0F;
        let byte = |i: usize| data.get(i).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x90 => {
                let (key, velocity) = (byte(0)?, byte(1)?);
                // Note-on with zero velocity is a note-off by convention
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: byte(0)?,
                value: byte(1)?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: byte(0)?,
            }),
            0xE0 => {
                let raw = ((byte(1)? as i16) << 7) | byte(0)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }
}

/// One fader movement: controller number, 7-bit value, arrival time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub controller: u8,
    pub value: u8,
    /// Microseconds on the input driver's monotonic clock.
    pub timestamp_us: u64,
}

impl ControlMessage {
    pub fn new(controller: u8, value: u8, timestamp_us: u64) -> Self {
        Self {
            controller,
            value,
            timestamp_us,
        }
    }
}
