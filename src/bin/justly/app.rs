//! Justly - audio stream and interactive command loop

use std::{
    io::{self, BufRead, Write},
    sync::{Arc, Mutex},
    time::Instant,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Consumer;
use tracing::{error, info};

use justly::{
    io::{ControlInput, ControlMessage},
    synth::ControlEvent,
    Command, EngineConfig, Outcome, Session, MAX_BLOCK_SIZE,
};

use super::sine_bank::SineBank;

/// Shared audio state
struct AudioState {
    session: Session<Consumer<ControlEvent>>,
    bank: SineBank,
}

pub struct Justly {
    config: EngineConfig,
}

impl Justly {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the application (takes over, plays audio until `quit` or EOF)
    pub fn run(self) -> EyreResult<()> {
        let (session, mut input) =
            Session::with_input(self.config.clone()).wrap_err("invalid engine configuration")?;

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        info!(sample_rate, channels, voices = self.config.voice_count, "audio ready");

        let state = Arc::new(Mutex::new(AudioState {
            session,
            bank: SineBank::new(sample_rate, self.config.voice_count),
        }));

        let state_clone = state.clone();
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let Ok(mut state) = state_clone.lock() else {
                    data.fill(0.0);
                    return;
                };
                let AudioState { session, bank } = &mut *state;

                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    // Control rate: one tick per block
                    session.tick(frames as f64 / sample_rate as f64, bank);

                    let start = frames_written * channels;
                    let end = start + frames * channels;
                    bank.render_interleaved(&mut data[start..end], channels);

                    frames_written += frames;
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        println!("=== justly ===");
        println!(
            "Root {} Hz, {} voices, fader offset {}",
            self.config.root_default, self.config.voice_count, self.config.controller_offset
        );
        println!("Type 'help' for commands, 'cc <controller> <value>' to move a fader, 'quit' to exit.");

        repl(&state, &mut input)
    }
}

fn repl(state: &Mutex<AudioState>, input: &mut ControlInput) -> EyreResult<()> {
    let started = Instant::now();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => return Ok(()),
            ["cc", controller, value] => {
                let (Ok(controller), Ok(value)) = (controller.parse::<u8>(), value.parse::<u8>())
                else {
                    println!("usage: cc <controller 0-127> <value 0-127>");
                    continue;
                };
                let timestamp_us = started.elapsed().as_micros() as u64;
                if !input.send(ControlMessage::new(controller, value, timestamp_us)) {
                    println!("controller {controller} is not mapped");
                }
            }
            ["voices"] => {
                let state = state.lock().map_err(|_| eyre!("audio state poisoned"))?;
                let pool = state.session.pool();
                println!("root {:.2} Hz, fade {:.2} s", pool.root(), pool.fade_time());
                for voice in pool.snapshots() {
                    match (voice.ratio, voice.frequency) {
                        (Some(ratio), Some(hz)) => println!(
                            "  {:>2} {:<9} {:>7} {:>9.3} Hz  amp {:.2} pan {:+.2}",
                            voice.index,
                            format!("{:?}", voice.state),
                            ratio.to_string(),
                            hz,
                            voice.amplitude,
                            voice.pan
                        ),
                        _ => println!("  {:>2} {:?}", voice.index, voice.state),
                    }
                }
            }
            _ => {
                let outcome = line.parse::<Command>().and_then(|command| {
                    let mut state = state.lock().map_err(|_| {
                        justly::Error::InvalidCommand("audio state poisoned".to_string())
                    })?;
                    state.session.execute(command)
                });
                match outcome {
                    Ok(outcome) => report(outcome),
                    Err(err) => println!("error: {err}"),
                }
            }
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Root(hz) => println!("root -> {hz:.2} Hz"),
        Outcome::Voice(index) => println!("voice {index}"),
        Outcome::Voices(voices) => println!("voices {voices:?}"),
        Outcome::Stopped => println!("releasing all voices"),
        Outcome::Explored { set, auditioned } => {
            let ratios: Vec<String> = set.iter().map(|r| r.to_string()).collect();
            println!("{} ratios from {}: {}", set.len(), set.seed(), ratios.join(" "));
            println!("auditioning on voices {auditioned:?}");
        }
        Outcome::Help(text) => {
            println!("{text}");
            println!("voices                    show voice states");
            println!("cc <controller> <value>   move a fader");
            println!("quit                      exit");
        }
    }
}
