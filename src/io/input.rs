//! Producer side of the control queue.
//!
//! [`ControlInput`] lives on the MIDI driver's callback thread. It maps each
//! message and pushes the result into a fixed-size lock-free ring buffer; it
//! never blocks and never allocates. When the tick loop falls behind and the
//! buffer is full, the newest event is dropped and counted.

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

use crate::{
    io::{
        converter::{midi_to_control, ControlMapper},
        midi::{ControlMessage, MidiEvent},
    },
    synth::message::ControlEvent,
};

pub struct ControlInput {
    tx: Producer<ControlEvent>,
    mapper: ControlMapper,
    dropped: u64,
}

/// Create a bounded queue of `capacity` events between input and tick loop.
pub fn control_queue(capacity: usize, mapper: ControlMapper) -> (ControlInput, Consumer<ControlEvent>) {
    let (tx, rx) = RingBuffer::new(capacity.max(1));
    let input = ControlInput {
        tx,
        mapper,
        dropped: 0,
    };
    (input, rx)
}

impl ControlInput {
    /// Map and enqueue one controller message.
    ///
    /// Returns false if the message mapped to nothing or the queue was full.
    pub fn send(&mut self, message: ControlMessage) -> bool {
        match self.mapper.map(message) {
            Some(event) => self.push(event),
            None => false,
        }
    }

    /// Decode raw MIDI bytes and enqueue any control change they carry.
    pub fn send_midi(&mut self, bytes: &[u8], timestamp_us: u64) -> bool {
        MidiEvent::from_bytes(bytes)
            .and_then(|midi| midi_to_control(midi, timestamp_us))
            .is_some_and(|message| self.send(message))
    }

    /// Enqueue an already-decoded event.
    pub fn push(&mut self, event: ControlEvent) -> bool {
        match self.tx.push(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                if self.dropped.is_power_of_two() {
                    warn!(dropped = self.dropped, "control queue full, dropping events");
                }
                false
            }
        }
    }

    /// Events lost to a full queue since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn mapper(&self) -> ControlMapper {
        self.mapper
    }
}
