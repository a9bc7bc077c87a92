//! The session: one object holding all performance state.
//!
//! A [`Session`] owns the voice pool, the master gain and the consumer end of
//! the control queue. Commands and the tick loop both take `&mut self`, so
//! there is exactly one writer at any time; controller input reaches the
//! pool only by being drained inside [`Session::tick`].

#[cfg(feature = "rtrb")]
use rtrb::Consumer;
use tracing::debug;

use crate::{
    dsp::Ramp,
    engine::{
        command::{Command, Outcome, HELP},
        config::EngineConfig,
    },
    error::{Error, Result},
    io::render::RenderSink,
    synth::{
        message::{ControlEvent, EventReceiver},
        pool::{clamp_logged, VoicePool},
    },
    tuning::{explore, ExplorationSet, Ratio},
};

#[cfg(feature = "rtrb")]
use crate::io::{
    converter::ControlMapper,
    input::{control_queue, ControlInput},
};

pub struct Session<R: EventReceiver> {
    pool: VoicePool,
    master: Ramp,
    rx: R,
    config: EngineConfig,
}

#[cfg(feature = "rtrb")]
impl Session<Consumer<ControlEvent>> {
    /// Build a session and the controller input feeding it.
    pub fn with_input(config: EngineConfig) -> Result<(Self, ControlInput)> {
        config.validate()?;
        let mapper = ControlMapper::new(config.controller_offset);
        let (input, rx) = control_queue(config.queue_capacity, mapper);
        Ok((Self::new(config, rx)?, input))
    }
}

impl<R: EventReceiver> Session<R> {
    pub fn new(config: EngineConfig, rx: R) -> Result<Self> {
        config.validate()?;
        let pool = VoicePool::new(
            config.voice_count,
            config.root_default,
            config.fade_time_default,
            config.voice_amplitude_default,
        );

        Ok(Self {
            pool,
            master: Ramp::new(1.0),
            rx,
            config,
        })
    }

    /// Glide the root to `hz`. Returns the clamped target.
    pub fn set_root(&mut self, hz: f64) -> f64 {
        let root = self.pool.set_root(hz);
        debug!(root, "root set");
        root
    }

    /// Play `numerator/denominator` on the first free voice.
    pub fn play_ratio(&mut self, numerator: u32, denominator: u32) -> Result<usize> {
        let ratio = Ratio::new(numerator, denominator)?;
        let index = self.pool.first_free().ok_or(Error::NoFreeVoices {
            needed: 1,
            free: 0,
        })?;
        self.pool.assign(index, ratio)?;
        Ok(index)
    }

    /// Play a named scale; `spacing` seconds between onsets, none if omitted.
    pub fn play_scale(&mut self, name: &str, spacing: Option<f64>) -> Result<Vec<usize>> {
        let voices = self.pool.play_scale(name, spacing.unwrap_or(0.0))?;
        debug!(name, ?spacing, ?voices, "scale started");
        Ok(voices)
    }

    pub fn stop_all(&mut self) {
        self.pool.stop_all();
        debug!("all voices released");
    }

    /// Generate the lattice around `seed` and audition its lowest members on
    /// the free voices.
    pub fn free_explore(&mut self, seed: Ratio) -> Result<ExplorationSet> {
        self.explore_and_audition(seed).map(|(set, _)| set)
    }

    fn explore_and_audition(&mut self, seed: Ratio) -> Result<(ExplorationSet, Vec<usize>)> {
        let set = explore(seed, self.config.explore_bounds)?;
        let auditioned = self
            .pool
            .audition(set.ratios(), self.config.audition_spacing);
        debug!(%seed, generated = set.len(), auditioned = auditioned.len(), "exploring");
        Ok((set, auditioned))
    }

    /// Run one parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::SetRoot(hz) => Outcome::Root(self.set_root(hz)),
            Command::PlayRatio {
                numerator,
                denominator,
            } => Outcome::Voice(self.play_ratio(numerator, denominator)?),
            Command::PlayScale { name, spacing } => {
                Outcome::Voices(self.play_scale(&name, spacing)?)
            }
            Command::StopAll => {
                self.stop_all();
                Outcome::Stopped
            }
            Command::FreeExplore(seed) => {
                let (set, auditioned) = self.explore_and_audition(seed)?;
                Outcome::Explored { set, auditioned }
            }
            Command::Help => Outcome::Help(HELP),
        };
        Ok(outcome)
    }

    /// Apply one control event. Events naming a missing voice are dropped.
    pub fn apply(&mut self, event: ControlEvent) {
        let applied = match event {
            ControlEvent::RootChange(hz) => {
                self.pool.set_root(hz as f64);
                Ok(())
            }
            ControlEvent::FadeTimeChange(seconds) => {
                self.pool.set_fade_time(seconds as f64);
                Ok(())
            }
            ControlEvent::MasterAmplitude(gain) => {
                let gain = clamp_logged("master", gain as f64, 0.0, 1.0);
                self.master.set_target(gain, self.pool.fade_time());
                Ok(())
            }
            ControlEvent::VoiceAmplitude { index, value } => {
                self.pool.set_amplitude(index, value as f64)
            }
            ControlEvent::VoicePan { index, value } => self.pool.set_pan(index, value as f64),
        };

        if let Err(err) = applied {
            debug!(?event, %err, "control event dropped");
        }
    }

    /// Advance the session by `dt` seconds.
    ///
    /// Drains at most one queue's worth of pending control events, so a
    /// producer that never stops cannot stall the tick.
    pub fn tick<S: RenderSink + ?Sized>(&mut self, dt: f64, sink: &mut S) {
        for _ in 0..self.config.queue_capacity {
            match self.rx.pop() {
                Some(event) => self.apply(event),
                None => break,
            }
        }

        self.master.advance(dt.max(0.0));
        sink.master_gain(self.master.current() as f32);
        self.pool.tick(dt, sink);
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VoicePool {
        &mut self.pool
    }

    pub fn master_gain(&self) -> f64 {
        self.master.current()
    }

    pub fn root(&self) -> f64 {
        self.pool.root()
    }

    pub fn fade_time(&self) -> f64 {
        self.pool.fade_time()
    }

    /// Seconds of ticks processed so far.
    pub fn clock(&self) -> f64 {
        self.pool.clock()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
