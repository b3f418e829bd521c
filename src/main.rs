//! # Endoscope Viewer
//!
//! Opens the camera and shows it in a window with the operator controls.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use endoscope_viewer::prelude::*;
use endoscope_viewer::{window, ViewerConfig};
use env_logger::Env;
use log::warn;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Live viewer for USB endoscope cameras")]
struct Args {
    /// Camera index, opens /dev/video<INDEX> [default: 0]
    #[arg(short, long, value_name = "INDEX")]
    camera: Option<usize>,

    /// Camera device path, overrides --camera
    #[arg(short, long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save snapshots and recordings here with generated names instead of asking for a path
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------------------------------
// MAIN
// -----------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(index) = args.camera {
        config.device.index = index;
        config.device.path = None;
    }
    if let Some(path) = args.device {
        config.device.path = Some(path);
    }
    if let Some(dir) = args.output_dir {
        config.recording.output_dir = Some(dir);
    }

    let video = VideoParams::from_config(&config.recording)?;

    #[cfg(not(feature = "mp4"))]
    warn!("Built without the mp4 feature, recording is disabled");

    // A camera that cannot be opened leaves the viewport blank rather than exiting
    let stream = match CamStreamBuilder::from_config(&config.device).and_then(|b| b.build()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(
                "Cannot open camera {}: {}",
                config.device.device_path().display(),
                e
            );
            V4lCamStream::unavailable()
        }
    };

    match config.recording.output_dir {
        Some(ref dir) => launch(stream, AutoNamePrompt::new(dir)?, video, config.tick_period()),
        None => launch(stream, TerminalPrompt::new(), video, config.tick_period()),
    }
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn launch<P: SavePrompt>(
    stream: V4lCamStream,
    prompt: P,
    video: VideoParams,
    tick: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut viewer = CameraViewer::new(stream, prompt, DefaultBackend::default(), video);

    window::run(&mut viewer, tick)?;
    viewer.close();

    Ok(())
}
