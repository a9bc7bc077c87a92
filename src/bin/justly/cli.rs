//! Command-line argument parsing.

use clap::Parser;

use justly::{tuning::ExploreBounds, EngineConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "justly")]
#[command(about = "Realtime just-intonation explorer for a MIDI fader bank", long_about = None)]
pub struct Args {
    /// Controller number offset of the fader bank (0 or 32)
    #[arg(long, value_name = "CC", default_value = "0")]
    pub offset: u8,

    /// Number of voices in the pool
    #[arg(long, value_name = "N", default_value = "8")]
    pub voices: usize,

    /// Initial fade time in seconds
    #[arg(long, value_name = "SECONDS", default_value = "0.5")]
    pub fade: f64,

    /// Initial root frequency
    #[arg(long, value_name = "HZ", default_value = "220")]
    pub root: f64,

    /// Per-voice amplitude before any fader moves
    #[arg(long, value_name = "0..1", default_value = "0.5")]
    pub amplitude: f64,

    /// Onset spacing when auditioning an exploration
    #[arg(long, value_name = "SECONDS", default_value = "0.25")]
    pub spacing: f64,

    /// Powers of the seed and of the base ratio explored
    #[arg(long, value_name = "N", default_value = "3")]
    pub depth: u32,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_controller_offset(self.offset)
            .with_voice_count(self.voices)
            .with_fade_time(self.fade)
            .with_root(self.root)
            .with_voice_amplitude(self.amplitude)
            .with_audition_spacing(self.spacing)
            .with_explore_bounds(ExploreBounds::new(self.depth, self.depth))
    }
}
