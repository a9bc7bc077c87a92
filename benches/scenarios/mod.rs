//! Session-level benchmarks.
//!
//! These model a performance in progress: every voice sounding, faders
//! moving, the root gliding.

mod session;

pub use session::bench_session;
