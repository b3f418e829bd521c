//! # Camera Viewer
//!
//! [`CameraViewer`] owns the camera stream, the latest raw frame, the operator settings and the
//! recording. A frontend drives it by feeding it [`Control`]s and calling [`CameraViewer::tick`]
//! at a fixed period, painting whatever display frame comes back.
//!
//! ```no_run
//! use endoscope_viewer::prelude::*;
//!
//! let stream = CamStreamBuilder::new().index(0).build()?;
//! let mut viewer = CameraViewer::new(
//!     stream,
//!     TerminalPrompt::new(),
//!     DefaultBackend::default(),
//!     VideoParams::default(),
//! );
//!
//! viewer.handle(Control::SetZoom(2));
//! if let Some(display) = viewer.tick() {
//!     println!("{}x{}", display.width(), display.height());
//! }
//! viewer.close();
//! # Ok::<(), endoscope_viewer::Error>(())
//! ```

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::PathBuf;

use log::{debug, error, info, trace, warn};

use crate::camstream::CamStream;
use crate::controls::{Brightness, Control, Settings, ZoomFactor};
use crate::error::Result;
use crate::frame::{DisplayFrame, Frame};
use crate::prompt::{with_default_extension, SavePrompt};
use crate::recording::{Recording, VideoBackend, VideoParams};
use crate::transform;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// The endoscope viewer state.
pub struct CameraViewer<S, P, B>
where
    S: CamStream,
    P: SavePrompt,
    B: VideoBackend,
{
    /// `None` once closed
    stream: Option<S>,

    prompt: P,

    backend: B,

    video: VideoParams,

    settings: Settings,

    current: Option<Frame>,

    recording: Recording<B::Writer>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl<S, P, B> CameraViewer<S, P, B>
where
    S: CamStream,
    P: SavePrompt,
    B: VideoBackend,
{
    pub fn new(stream: S, prompt: P, backend: B, video: VideoParams) -> Self {
        Self {
            stream: Some(stream),
            prompt,
            backend,
            video,
            settings: Settings::default(),
            current: None,
            recording: Recording::Idle,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The most recently acquired raw frame.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    pub fn recording(&self) -> &Recording<B::Writer> {
        &self.recording
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    pub fn record_label(&self) -> &'static str {
        self.recording.label()
    }

    pub fn freeze_label(&self) -> &'static str {
        self.settings.freeze_label()
    }

    /// Apply an operator command.
    pub fn handle(&mut self, control: Control) {
        debug!("{:?}", control);

        match control {
            Control::CaptureImage => {
                if let Err(e) = self.capture_image() {
                    error!("Image not saved: {}", e);
                }
            }
            Control::ToggleRecording => self.recording.toggle(),
            Control::ToggleFreeze => self.settings.toggle_freeze(),
            Control::SetZoom(n) => self.settings.set_zoom(ZoomFactor::new(n)),
            Control::SetBrightness(n) => self.settings.set_brightness(Brightness::new(n)),
            Control::Close => self.close(),
        }
    }

    /// Run one iteration of the render loop.
    ///
    /// Returns the frame to paint, or `None` if nothing new should be painted because acquisition
    /// failed or the viewer is closed.
    pub fn tick(&mut self) -> Option<DisplayFrame> {
        let stream = self.stream.as_mut()?;

        if !(self.settings.frozen() && self.current.is_some()) {
            match stream.capture() {
                Ok(frame) => self.current = Some(frame),
                Err(e) => {
                    trace!("No frame this tick: {}", e);
                    return None;
                }
            }
        }

        let frame = self.current.as_ref()?;
        let display = transform::render(frame, &self.settings);

        self.recording
            .append(frame, &mut self.prompt, &self.backend, &self.video);

        Some(display)
    }

    /// Save the raw current frame to a destination chosen by the prompt.
    ///
    /// Returns the path written, or `None` if there was no frame yet or the prompt was cancelled.
    pub fn capture_image(&mut self) -> Result<Option<PathBuf>> {
        let frame = match self.current {
            Some(ref f) => f,
            None => {
                debug!("Nothing to capture, no frame acquired yet");
                return Ok(None);
            }
        };

        let path = match self.prompt.image_destination() {
            Some(p) => with_default_extension(p, "png"),
            None => return Ok(None),
        };

        frame.save(&path)?;
        info!("Saved image {}", path.display());

        Ok(Some(path))
    }

    /// Release the camera and any open video file. Later ticks render nothing.
    pub fn close(&mut self) {
        self.recording.stop();

        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.stop() {
                warn!("Error stopping the camera: {}", e);
            }
            info!("Viewer closed");
        }
    }
}

impl<S, P, B> Drop for CameraViewer<S, P, B>
where
    S: CamStream,
    P: SavePrompt,
    B: VideoBackend,
{
    fn drop(&mut self) {
        self.close();
    }
}
