/// Receiver of per-tick voice parameters, implemented by the audio side.
///
/// Every tick the pool calls `render_voice` once for each sounding voice and
/// `mute_voice` once for each voice whose release just finished. Voices that
/// are idle, or still waiting for a delayed onset, get no call at all.
pub trait RenderSink {
    fn render_voice(&mut self, index: usize, frequency: f64, amplitude: f32, pan: f32);

    fn mute_voice(&mut self, index: usize);

    /// Smoothed master gain, applied after the voices are mixed.
    ///
    /// Default implementation does nothing.
    fn master_gain(&mut self, _gain: f32) {
        // Default: do nothing
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render_voice(&mut self, _index: usize, _frequency: f64, _amplitude: f32, _pan: f32) {}

    fn mute_voice(&mut self, _index: usize) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn render_voice(&mut self, index: usize, frequency: f64, amplitude: f32, pan: f32) {
        (**self).render_voice(index, frequency, amplitude, pan)
    }

    fn mute_voice(&mut self, index: usize) {
        (**self).mute_voice(index)
    }

    fn master_gain(&mut self, gain: f32) {
        (**self).master_gain(gain)
    }
}
