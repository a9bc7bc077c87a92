use tracing::{debug, trace};

use crate::{
    dsp::Ramp,
    error::{Error, Result},
    io::render::RenderSink,
    synth::voice::{Voice, VoiceState},
    tuning::{scale, Ratio},
    FADE_TIME_MAX, ROOT_MAX_HZ, ROOT_MIN_HZ,
};

/// Read-only view of one voice, for displays and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub index: usize,
    pub state: VoiceState,
    pub ratio: Option<Ratio>,
    pub frequency: Option<f64>,
    pub amplitude: f64,
    pub pan: f64,
    pub target_amplitude: f64,
    pub target_pan: f64,
}

/// Fixed bank of voices sharing one root frequency and one fade time.
///
/// Voices are created once and recycled; nothing here allocates after
/// construction except the index lists returned by the multi-voice commands.
pub struct VoicePool {
    voices: Vec<Voice>,
    root: Ramp,
    fade_time: f64,
    /// Seconds since the pool was created, advanced by `tick`.
    clock: f64,
}

impl VoicePool {
    pub fn new(voice_count: usize, root: f64, fade_time: f64, amplitude: f64) -> Self {
        let voices = (0..voice_count).map(|_| Voice::new(amplitude, 0.0)).collect();

        Self {
            voices,
            root: Ramp::new(clamp_logged("root", root, ROOT_MIN_HZ, ROOT_MAX_HZ)),
            fade_time: clamp_logged("fade time", fade_time, 0.0, FADE_TIME_MAX),
            clock: 0.0,
        }
    }

    /// Assign `ratio` to voice `index`, sounding now at the current root.
    pub fn assign(&mut self, index: usize, ratio: Ratio) -> Result<()> {
        self.schedule(index, ratio, 0.0)
    }

    /// Assign `ratio` to voice `index`, opening its gate `delay` seconds from now.
    pub fn schedule(&mut self, index: usize, ratio: Ratio, delay: f64) -> Result<()> {
        self.check_index(index)?;
        let now = self.clock;
        let onset_at = now + delay.max(0.0);
        self.voices[index].assign(ratio, now, onset_at, self.fade_time);
        debug!(index, %ratio, delay, "voice assigned");
        Ok(())
    }

    /// Fade voice `index` out. No-op if it is not active.
    pub fn release(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.voices[index].release(self.fade_time);
        Ok(())
    }

    pub fn set_amplitude(&mut self, index: usize, target: f64) -> Result<()> {
        self.check_index(index)?;
        let target = clamp_logged("amplitude", target, 0.0, 1.0);
        self.voices[index].set_amplitude(target, self.fade_time);
        Ok(())
    }

    pub fn set_pan(&mut self, index: usize, target: f64) -> Result<()> {
        self.check_index(index)?;
        let target = clamp_logged("pan", target, -1.0, 1.0);
        self.voices[index].set_pan(target, self.fade_time);
        Ok(())
    }

    /// Glide the root to `hz` over the fade time. Returns the clamped target.
    pub fn set_root(&mut self, hz: f64) -> f64 {
        let hz = clamp_logged("root", hz, ROOT_MIN_HZ, ROOT_MAX_HZ);
        self.root.set_target(hz, self.fade_time);
        hz
    }

    /// Returns the clamped fade time. Ramps already in flight keep their length.
    pub fn set_fade_time(&mut self, seconds: f64) -> f64 {
        self.fade_time = clamp_logged("fade time", seconds, 0.0, FADE_TIME_MAX);
        self.fade_time
    }

    pub fn stop_all(&mut self) {
        let fade_time = self.fade_time;
        for voice in &mut self.voices {
            voice.release(fade_time);
        }
    }

    /// Lay a named scale across the free voices, degree k starting
    /// `k * spacing` seconds from now.
    ///
    /// Nothing is assigned unless every degree gets a voice.
    pub fn play_scale(&mut self, name: &str, spacing: f64) -> Result<Vec<usize>> {
        let scale = scale::lookup(name)?;
        let free: Vec<usize> = self.free_voices().collect();
        if scale.len() > free.len() {
            return Err(Error::NoFreeVoices {
                needed: scale.len(),
                free: free.len(),
            });
        }

        let spacing = spacing.max(0.0);
        for (k, (&index, ratio)) in free.iter().zip(scale.iter()).enumerate() {
            self.schedule(index, ratio, k as f64 * spacing)?;
        }

        Ok(free[..scale.len()].to_vec())
    }

    /// Play as many of `ratios` as there are free voices, in order.
    pub fn audition(&mut self, ratios: &[Ratio], spacing: f64) -> Vec<usize> {
        let free: Vec<usize> = self.free_voices().take(ratios.len()).collect();
        let spacing = spacing.max(0.0);
        for (k, (&index, &ratio)) in free.iter().zip(ratios).enumerate() {
            let onset_at = self.clock + k as f64 * spacing;
            self.voices[index].assign(ratio, self.clock, onset_at, self.fade_time);
        }
        free
    }

    /// Advance all smoothing by `dt` seconds and report every voice to `sink`.
    pub fn tick<S: RenderSink + ?Sized>(&mut self, dt: f64, sink: &mut S) {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.root.advance(dt);
        let root = self.root.current();

        for (index, voice) in self.voices.iter_mut().enumerate() {
            voice.advance(self.clock, dt, self.fade_time);

            if voice.take_pending_mute() {
                sink.mute_voice(index);
            } else if voice.is_sounding() {
                if let Some(frequency) = voice.frequency(root) {
                    sink.render_voice(
                        index,
                        frequency,
                        voice.output_amplitude() as f32,
                        voice.pan() as f32,
                    );
                }
            }
        }
    }

    pub fn first_free(&self) -> Option<usize> {
        self.free_voices().next()
    }

    pub fn free_voices(&self) -> impl Iterator<Item = usize> + '_ {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_free())
            .map(|(i, _)| i)
    }

    pub fn voice(&self, index: usize) -> Result<&Voice> {
        self.check_index(index)?;
        Ok(&self.voices[index])
    }

    /// Current frequency of voice `index`, following the gliding root.
    pub fn frequency(&self, index: usize) -> Result<Option<f64>> {
        Ok(self.voice(index)?.frequency(self.root.current()))
    }

    pub fn snapshot(&self, index: usize) -> Result<VoiceSnapshot> {
        let voice = self.voice(index)?;
        Ok(VoiceSnapshot {
            index,
            state: voice.state(),
            ratio: voice.ratio(),
            frequency: voice.frequency(self.root.current()),
            amplitude: voice.output_amplitude(),
            pan: voice.pan(),
            target_amplitude: voice.target_amplitude(),
            target_pan: voice.target_pan(),
        })
    }

    pub fn snapshots(&self) -> impl Iterator<Item = VoiceSnapshot> + '_ {
        (0..self.voices.len()).filter_map(|i| self.snapshot(i).ok())
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Instantaneous root, mid-glide if a root change is in progress.
    pub fn root(&self) -> f64 {
        self.root.current()
    }

    pub fn root_target(&self) -> f64 {
        self.root.target()
    }

    pub fn fade_time(&self) -> f64 {
        self.fade_time
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.voices.len() {
            Ok(())
        } else {
            Err(Error::InvalidVoiceIndex {
                index,
                voices: self.voices.len(),
            })
        }
    }
}

/// Out-of-range values are clamped, never rejected.
pub(crate) fn clamp_logged(what: &str, value: f64, min: f64, max: f64) -> f64 {
    // NaN from upstream arithmetic lands on the lower bound
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        trace!(what, value, clamped, "value clamped");
    }
    clamped
}
