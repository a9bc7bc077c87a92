//! justly - just-intonation explorer driven by a fader bank
//!
//! Run with: cargo run -- --root 220 --fade 0.5

mod app;
mod cli;
mod sine_bank;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::Justly;
use cli::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("justly=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    Justly::new(args.engine_config()).run()
}
