//! Error types for justly

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid ratio {numerator}/{denominator}: terms must be positive")]
    InvalidRatio { numerator: i64, denominator: i64 },
    #[error("ratio overflow: {0} does not fit in 32-bit terms")]
    RatioOverflow(String),
    #[error("voice index {index} out of range (pool has {voices} voices)")]
    InvalidVoiceIndex { index: usize, voices: usize },
    #[error("unknown scale: {0}")]
    UnknownScale(String),
    #[error("not enough free voices: need {needed}, {free} free")]
    NoFreeVoices { needed: usize, free: usize },
    #[error("exploration too large: {combinations} combinations, {reason}")]
    ExplorationTooLarge { combinations: usize, reason: String },
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
