//! Exact interval arithmetic and the ratio catalogs built on it.
//!
//! Everything here is pure: no clocks, no voices, no allocation beyond the
//! exploration result itself.

/// Combination lattice generated from a seed interval.
pub mod explore;
/// Ratio type, frequency mapping, composition and octave reduction.
pub mod ratio;
/// Built-in just-intonation scales.
pub mod scale;

pub use explore::{explore, ExplorationSet, ExploreBounds};
pub use ratio::{compose, octave_reduce, to_frequency, Ratio};
pub use scale::{Scale, ScaleName};
