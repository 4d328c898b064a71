use clap::Parser;
use herald_demo::{load_config, logging, scenario};
use herald_events::EventEmitter;
use std::path::PathBuf;
use tracing::info;

/// Runs the herald event emitter demonstration.
#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Demonstrates the herald event emitter")]
struct Cli {
    /// Configuration file (TOML, JSON, ...). Defaults to an optional `herald.*`
    /// in the working directory.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.log)?;

    info!(panic_policy = ?config.emitter.panic_policy, "Starting demo");
    let emitter = EventEmitter::with_config(config.emitter);
    let transcript = scenario::run(&emitter);
    info!(
        lines = transcript.lines().len(),
        remaining = emitter.total_listener_count(),
        "Demo finished"
    );

    Ok(())
}
