//! # Endoscope camera viewer
//!
//! This crate provides a live viewer for USB endoscopes and similar cameras, with digital zoom,
//! brightness adjustment, freeze frame, snapshot capture and video recording.
//! Under the hood this uses [`v4l`](https://github.com/raymanfx/libv4l-rs) to access cameras over
//! V4L2, therefore currently only Linux is supported.
//!
//! ## Dependencies
//!
//! Before installing make sure that the following dependencies are installed:
//!
//! - V4L2 - video for linux 2, including the dev headers
//! - OpenCV 4 with the `videoio` module, used for MP4 recording
//!
//! OpenCV comes in through the `mp4` feature, which is enabled by default. Building with
//! `--no-default-features` drops it, in which case the viewer still runs but every attempt to
//! record logs an error and recording stays off.
//!
//! ### Ubuntu
//!
//! ```shell
//! sudo apt install v4l-utils libv4l-dev libopencv-dev clang libclang-dev
//! ```
//!
//! ## Usage
//!
//! The `endoscope-viewer` binary opens `/dev/video0` in a window:
//!
//! ```shell
//! endoscope-viewer --camera 1 --output-dir ~/scope
//! ```
//!
//! The library exposes the pieces it is built from. A camera stream is created through a builder:
//!
//! ```no_run
//! use endoscope_viewer::prelude::*;
//!
//! let mut camera = CamStreamBuilder::new()
//!     // The path that the device can be found at, which returns a result
//!     .path("/dev/video1")?
//!     .resolution((640, 480))
//!     .fps(30)
//!     .format(b"MJPG")?
//!     .build()?;
//!
//! let frame = camera.capture()?;
//! # Ok::<(), endoscope_viewer::Error>(())
//! ```
//!
//! which returns a BGR [`Frame`]. See [`CameraViewer`] for the viewer state itself and
//! [`window::run`] for the window around it.

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use builder::CamStreamBuilder;
pub use camstream::{CamStream, PixelFormat, V4lCamStream};
pub use config::{DeviceConfig, RecordingConfig, ViewerConfig};
pub use controls::{Brightness, Control, Settings, SliderSpec, ZoomFactor};
pub use encoder::{DefaultBackend, UnavailableBackend};
#[cfg(feature = "mp4")]
pub use encoder::{OpenCvBackend, OpenCvWriter};
pub use error::{Error, Result};
pub use frame::{DisplayFrame, Frame};
pub use prompt::{AutoNamePrompt, SavePrompt, TerminalPrompt};
pub use recording::{ActiveRecording, Recording, VideoBackend, VideoParams, VideoWriter};
pub use viewer::CameraViewer;

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod builder;
pub mod camstream;
pub mod config;
pub mod controls;
pub mod encoder;
mod error;
pub mod frame;
pub mod prompt;
pub mod recording;
pub mod transform;
mod viewer;
pub mod window;

pub mod prelude {
    pub use crate::CamStreamBuilder;
    pub use crate::{CamStream, V4lCamStream};
    pub use crate::{CameraViewer, Control};
    pub use crate::{AutoNamePrompt, SavePrompt, TerminalPrompt};
    pub use crate::{DefaultBackend, VideoBackend, VideoParams, VideoWriter};
}
