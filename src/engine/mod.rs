//! Session orchestration: configuration, commands, and the tick loop.

pub mod command;
pub mod config;
pub mod session;

pub use command::{Command, Outcome};
pub use config::EngineConfig;
pub use session::Session;
