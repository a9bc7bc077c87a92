//! Control-rate smoothing primitives used by the voice pool.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They advance by elapsed seconds rather
//! than by samples, so the same code serves a per-block tick loop or a
//! per-sample one.

/// Attack/release gate that fades voices in and out.
pub mod envelope;
/// Linear ramp toward a target value.
pub mod ramp;

pub use envelope::{Envelope, EnvelopeState};
pub use ramp::Ramp;
