// Purpose: Voice lifecycle, smoothing state, control events
// This layer sits above the smoothing primitives and owns every voice

pub mod message;
pub mod pool;
pub mod voice;

pub use message::{ControlEvent, EventReceiver};
pub use pool::{VoicePool, VoiceSnapshot};
pub use voice::{Voice, VoiceState};
