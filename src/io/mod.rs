// Purpose - external interfaces: controller input, render output

pub mod converter;
#[cfg(feature = "rtrb")]
pub mod input;
pub mod midi;
pub mod render;

pub use converter::ControlMapper;
#[cfg(feature = "rtrb")]
pub use input::{control_queue, ControlInput};
pub use midi::{ControlMessage, MidiEvent};
pub use render::{NullSink, RenderSink};
