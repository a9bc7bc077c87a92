#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical parameter change decoded from the control surface.
///
/// Values are already scaled to engine units (Hz, seconds, 0..1, -1..1).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlEvent {
    MasterAmplitude(f32),
    RootChange(f32),
    FadeTimeChange(f32),
    VoiceAmplitude { index: usize, value: f32 },
    VoicePan { index: usize, value: f32 },
}

/// Consumer side of the control queue, drained by the tick loop.
pub trait EventReceiver {
    fn pop(&mut self) -> Option<ControlEvent>;
}

#[cfg(feature = "rtrb")]
impl EventReceiver for Consumer<ControlEvent> {
    fn pop(&mut self) -> Option<ControlEvent> {
        Consumer::pop(self).ok()
    }
}

/// Receiver with nothing in it, for sessions driven only by commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl EventReceiver for NoEvents {
    fn pop(&mut self) -> Option<ControlEvent> {
        None
    }
}
