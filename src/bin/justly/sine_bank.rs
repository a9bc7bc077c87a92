//! Sine bank - one pure partial per voice, rendered in stereo
//!
//! The session tells the bank what each voice should sound like once per
//! block; the bank ramps gains across the block so block-rate control
//! changes do not zipper.

use std::f32::consts::{FRAC_PI_4, TAU};

use justly::io::RenderSink;

#[derive(Debug, Clone, Copy, Default)]
struct Partial {
    phase: f32,
    frequency: f32,
    /// Gains reached at the end of the previous block
    left: f32,
    right: f32,
    /// Gains to reach by the end of this block
    target_left: f32,
    target_right: f32,
}

pub struct SineBank {
    sample_rate: f32,
    partials: Vec<Partial>,
    master: f32,
    /// Keeps every voice at full scale below clipping
    headroom: f32,
}

impl SineBank {
    pub fn new(sample_rate: f32, voices: usize) -> Self {
        Self {
            sample_rate,
            partials: vec![Partial::default(); voices],
            master: 1.0,
            headroom: 1.0 / voices.max(1) as f32,
        }
    }

    /// Render one block into an interleaved buffer of `channels` channels.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        let channels = channels.max(1);
        let frames = out.len() / channels;
        if frames == 0 {
            return;
        }

        let step = 1.0 / frames as f32;
        let master = self.master;
        let sample_rate = self.sample_rate;

        for partial in &mut self.partials {
            if partial.left == 0.0
                && partial.right == 0.0
                && partial.target_left == 0.0
                && partial.target_right == 0.0
            {
                continue;
            }

            let increment = partial.frequency / sample_rate;
            let delta_left = (partial.target_left - partial.left) * step;
            let delta_right = (partial.target_right - partial.right) * step;
            let (mut left, mut right) = (partial.left, partial.right);

            for frame in out.chunks_exact_mut(channels) {
                left += delta_left;
                right += delta_right;

                let sample = (partial.phase * TAU).sin() * master;
                partial.phase = (partial.phase + increment).fract();

                if channels == 1 {
                    frame[0] += sample * 0.5 * (left + right);
                } else {
                    frame[0] += sample * left;
                    frame[1] += sample * right;
                }
            }

            partial.left = partial.target_left;
            partial.right = partial.target_right;
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

impl RenderSink for SineBank {
    fn render_voice(&mut self, index: usize, frequency: f64, amplitude: f32, pan: f32) {
        let Some(partial) = self.partials.get_mut(index) else {
            return;
        };
        // Equal-power pan law
        let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
        let gain = amplitude * self.headroom;

        partial.frequency = frequency.min(self.sample_rate as f64 * 0.5) as f32;
        partial.target_left = gain * angle.cos();
        partial.target_right = gain * angle.sin();
    }

    fn mute_voice(&mut self, index: usize) {
        if let Some(partial) = self.partials.get_mut(index) {
            partial.target_left = 0.0;
            partial.target_right = 0.0;
        }
    }

    fn master_gain(&mut self, gain: f32) {
        self.master = gain;
    }
}
