//! Spatial stripes demo client for Open Pixel Control.
//!
//! Creates moving stripes visualizing the x, y, and z coordinates of each
//! pixel mapped to r, g, and b, with a traveling wave of twinkles on top.
//!
//! ## Usage
//! Start an OPC server (for example the gl simulator with a wall layout), then:
//! ```sh
//! ./target/release/spatial-stripes --layout layouts/wall.json
//! ```

use clap::Parser;
use spatial_stripes::config::{Config, DEFAULT_FPS, DEFAULT_SERVER};
use spatial_stripes::pattern::Stripes;
use spatial_stripes::render::SendLoop;
use spatial_stripes::{Layout, Result, opc, setup_signal_handler};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Stream spatial stripes to an OPC server
#[derive(Parser)]
#[command(name = "spatial-stripes")]
#[command(about = "Send a moving spatial stripes pattern to an Open Pixel Control server")]
#[command(version)]
struct Args {
    /// Layout file (JSON array of {"point": [x, y, z]} records)
    #[arg(short, long)]
    layout: PathBuf,

    /// ip and port of server
    #[arg(short, long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Frames per second
    #[arg(short, long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Gamma exponent for physical LEDs (e.g. 2.2). Leave unset for simulators.
    #[arg(long)]
    gamma: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .compact()
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::new(args.layout, args.server, args.fps, args.gamma)?;

    tracing::info!("Spatial stripes v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Parsing layout file {}", config.layout.display());
    let layout = Layout::load(&config.layout)?;
    tracing::info!("Layout has {} pixels", layout.len());
    if layout.is_empty() {
        tracing::warn!("Layout has no points; sending empty frames");
    }

    tracing::info!("Connecting to server at {}", config.server);
    let client = opc::connect(&config.server)?;

    let running = setup_signal_handler()?;

    let pattern = Stripes::new().with_gamma(config.gamma);
    let mut send_loop = SendLoop::new(layout, pattern, client, config.frame_interval());

    tracing::info!("Sending pixels at {} fps (ctrl-c to exit)...", config.fps);
    send_loop.run(&running)?;

    tracing::info!("Shutting down cleanly.");
    Ok(())
}

/// Render an error with its sources, e.g. "could not connect ...: Connection refused".
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
