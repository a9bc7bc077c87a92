pub mod dsp; // Control-rate smoothing
pub mod engine; // Session, commands, tick loop
pub mod error;
pub mod io; // Controller input and render output
pub mod synth; // Voice lifecycle and the voice pool
pub mod tuning; // Ratios, scales, exploration

pub use engine::{Command, EngineConfig, Outcome, Session};
pub use error::{Error, Result};
pub use tuning::Ratio;

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Root frequency range in Hz.
pub const ROOT_MIN_HZ: f64 = 20.0;
pub const ROOT_MAX_HZ: f64 = 2000.0;

/// Longest fade time in seconds.
pub const FADE_TIME_MAX: f64 = 5.0;
