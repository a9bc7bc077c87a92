//! Text command surface for interactive front ends.
//!
//! ```text
//!  root 220            glide the root to 220 Hz
//!  play 3/2            sound 3/2 on the first free voice
//!  scale justMajor .2  lay a scale across free voices, 0.2 s apart
//!  stop                release every voice
//!  explore 3/2         audition the lattice around 3/2
//!  help                list commands
//! ```

use std::str::FromStr;

use crate::{
    error::{Error, Result},
    tuning::{ratio::parse_terms, ExplorationSet, Ratio},
};

pub const HELP: &str = "\
root <hz>                 glide the root frequency (20-2000 Hz)
play <num>/<den>          play a ratio on the first free voice
scale <name> [spacing]    play a scale, optionally arpeggiated (seconds)
stop                      release all voices
explore <num>/<den>       audition ratios generated from a seed
help                      show this list
scales: justMajor justMinor dorian7 lydian7 neutral11 extended13 harmonicSeries undertoneSeries";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetRoot(f64),
    /// Raw terms, validated on execution.
    PlayRatio { numerator: u32, denominator: u32 },
    PlayScale { name: String, spacing: Option<f64> },
    StopAll,
    FreeExplore(Ratio),
    Help,
}

/// What a successfully executed command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Clamped root target in Hz.
    Root(f64),
    Voice(usize),
    Voices(Vec<usize>),
    Stopped,
    Explored {
        set: ExplorationSet,
        auditioned: Vec<usize>,
    },
    Help(&'static str),
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| Error::InvalidCommand("empty command".to_string()))?;
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("root", [hz]) => Command::SetRoot(number(hz)?),
            // `play 3/2` or `play 3 2`
            ("play", [_] | [_, _]) => {
                let (numerator, denominator) = parse_terms(&args.join("/"))?;
                Command::PlayRatio {
                    numerator,
                    denominator,
                }
            }
            ("scale", [name]) => Command::PlayScale {
                name: name.to_string(),
                spacing: None,
            },
            ("scale", [name, spacing]) => Command::PlayScale {
                name: name.to_string(),
                spacing: Some(number(spacing)?),
            },
            ("stop", []) => Command::StopAll,
            ("explore", [seed]) => Command::FreeExplore(seed.parse()?),
            ("help", _) | ("?", _) => Command::Help,
            (other, _) => {
                return Err(Error::InvalidCommand(format!(
                    "'{other}' with {} argument(s); try 'help'",
                    args.len()
                )))
            }
        };

        Ok(command)
    }
}

fn number(word: &str) -> Result<f64> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidCommand(format!("expected a number, got '{word}'")))
}
