use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use justly::{
    io::{ControlMessage, NullSink},
    EngineConfig, Session,
};

use crate::VOICE_COUNTS;

/// One 256-frame block at 48kHz.
const DT: f64 = 256.0 / 48_000.0;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &voices in VOICE_COUNTS {
        let config = EngineConfig::default()
            .with_voice_count(voices)
            .with_fade_time(0.25);

        // === STEADY CHORD ===
        // every voice sounding, nothing moving
        let Ok((mut session, _input)) = Session::with_input(config.clone()) else {
            continue;
        };
        for n in 1..=voices as u32 {
            let _ = session.play_ratio(n, 1);
        }

        group.bench_with_input(BenchmarkId::new("steady", voices), &voices, |b, _| {
            b.iter(|| session.tick(black_box(DT), &mut NullSink))
        });

        // === FADER SWEEP ===
        // a full bank of faders moving every block plus a root glide
        let Ok((mut session, mut input)) = Session::with_input(config) else {
            continue;
        };
        for n in 1..=voices as u32 {
            let _ = session.play_ratio(n, 1);
        }

        let mut value = 0u8;
        group.bench_with_input(BenchmarkId::new("sweep", voices), &voices, |b, _| {
            b.iter(|| {
                value = (value + 1) % 128;
                for controller in 1..=15 {
                    input.send(ControlMessage::new(controller, value, 0));
                }
                session.tick(black_box(DT), &mut NullSink)
            })
        });
    }

    group.finish();
}
