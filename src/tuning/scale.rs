use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ratio::Ratio;
use crate::error::{Error, Result};

/// Names of the built-in scales.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleName {
    JustMajor,
    JustMinor,
    Dorian7,
    Lydian7,
    Neutral11,
    Extended13,
    HarmonicSeries,
    UndertoneSeries,
}

impl ScaleName {
    pub const ALL: [ScaleName; 8] = [
        ScaleName::JustMajor,
        ScaleName::JustMinor,
        ScaleName::Dorian7,
        ScaleName::Lydian7,
        ScaleName::Neutral11,
        ScaleName::Extended13,
        ScaleName::HarmonicSeries,
        ScaleName::UndertoneSeries,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScaleName::JustMajor => "justMajor",
            ScaleName::JustMinor => "justMinor",
            ScaleName::Dorian7 => "dorian7",
            ScaleName::Lydian7 => "lydian7",
            ScaleName::Neutral11 => "neutral11",
            ScaleName::Extended13 => "extended13",
            ScaleName::HarmonicSeries => "harmonicSeries",
            ScaleName::UndertoneSeries => "undertoneSeries",
        }
    }
}

impl fmt::Display for ScaleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the camelCase names case-insensitively, with or without underscores.
impl FromStr for ScaleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .trim()
            .trim_start_matches('\\')
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        ScaleName::ALL
            .into_iter()
            .find(|name| name.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| Error::UnknownScale(s.to_string()))
    }
}

/// A named, ordered set of ratios above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub name: ScaleName,
    pub degrees: &'static [Ratio],
}

impl Scale {
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ratio> + '_ {
        self.degrees.iter().copied()
    }
}

const fn r(numerator: u32, denominator: u32) -> Ratio {
    Ratio::reduced(numerator, denominator)
}

// 5-limit diatonic
const JUST_MAJOR: [Ratio; 7] = [r(1, 1), r(9, 8), r(5, 4), r(4, 3), r(3, 2), r(5, 3), r(15, 8)];
const JUST_MINOR: [Ratio; 7] = [r(1, 1), r(9, 8), r(6, 5), r(4, 3), r(3, 2), r(8, 5), r(9, 5)];

// 7-limit modes: septimal minor third / harmonic seventh, septimal tritone
const DORIAN_7: [Ratio; 7] = [r(1, 1), r(9, 8), r(7, 6), r(4, 3), r(3, 2), r(5, 3), r(7, 4)];
const LYDIAN_7: [Ratio; 7] = [r(1, 1), r(9, 8), r(5, 4), r(7, 5), r(3, 2), r(5, 3), r(15, 8)];

// 11-limit neutral intervals sit between major and minor
const NEUTRAL_11: [Ratio; 7] = [r(1, 1), r(12, 11), r(11, 9), r(4, 3), r(3, 2), r(18, 11), r(11, 6)];

// Upper partials 8..14 folded into one octave
const EXTENDED_13: [Ratio; 7] = [r(1, 1), r(9, 8), r(5, 4), r(11, 8), r(3, 2), r(13, 8), r(7, 4)];

const HARMONIC_SERIES: [Ratio; 16] = harmonics();
const UNDERTONE_SERIES: [Ratio; 16] = undertones();

const fn harmonics() -> [Ratio; 16] {
    let mut out = [r(1, 1); 16];
    let mut n = 0;
    while n < 16 {
        out[n] = r(n as u32 + 1, 1);
        n += 1;
    }
    out
}

const fn undertones() -> [Ratio; 16] {
    let mut out = [r(1, 1); 16];
    let mut n = 0;
    while n < 16 {
        out[n] = r(1, n as u32 + 1);
        n += 1;
    }
    out
}

/// Look up a built-in scale.
pub fn scale(name: ScaleName) -> Scale {
    let degrees: &'static [Ratio] = match name {
        ScaleName::JustMajor => &JUST_MAJOR,
        ScaleName::JustMinor => &JUST_MINOR,
        ScaleName::Dorian7 => &DORIAN_7,
        ScaleName::Lydian7 => &LYDIAN_7,
        ScaleName::Neutral11 => &NEUTRAL_11,
        ScaleName::Extended13 => &EXTENDED_13,
        ScaleName::HarmonicSeries => &HARMONIC_SERIES,
        ScaleName::UndertoneSeries => &UNDERTONE_SERIES,
    };
    Scale { name, degrees }
}

/// Look up a built-in scale by its textual name.
pub fn lookup(name: &str) -> Result<Scale> {
    name.parse::<ScaleName>().map(scale)
}
