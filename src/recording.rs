//! # Video Recording
//!
//! The recording state machine and the seams to the video encoder.
//!
//! Starting a recording only marks it as awaiting a destination. The destination is asked for and
//! the writer created on the next frame appended, so the writer always takes the size of the raw
//! frames it will receive. Once created a writer is never reconfigured, stopping releases it and
//! the next start asks for a new destination.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::config::RecordingConfig;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::prompt::{with_default_extension, SavePrompt};

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// An open video file accepting frames of one fixed size.
pub trait VideoWriter {
    /// Append a frame to the video.
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the file.
    fn release(&mut self) -> Result<()>;
}

/// Creates [`VideoWriter`]s.
pub trait VideoBackend {
    type Writer: VideoWriter;

    /// Open a writer for `size` frames at `path`.
    fn create(&self, path: &Path, size: (u32, u32), params: &VideoParams) -> Result<Self::Writer>;
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Codec and frame rate of recorded files.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoParams {
    fourcc: [char; 4],

    fps: f64,
}

/// A recording with an open writer.
#[derive(Debug)]
pub struct ActiveRecording<W> {
    writer: W,

    path: PathBuf,

    size: (u32, u32),

    frames: u64,
}

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// State of the record toggle.
#[derive(Debug)]
pub enum Recording<W> {
    /// Not recording
    Idle,

    /// Recording was started, the destination is asked for with the next frame
    AwaitingDestination,

    /// Frames are being appended to an open file
    Active(ActiveRecording<W>),
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl VideoParams {
    /// Create the parameters, the fourcc must be exactly four ASCII characters.
    pub fn new(fourcc: &str, fps: f64) -> Result<Self> {
        let chars: Vec<char> = fourcc.chars().collect();

        if chars.len() != 4 || !chars.iter().all(|c| c.is_ascii() && !c.is_ascii_control()) {
            return Err(Error::InvalidFourcc(fourcc.to_string()));
        }

        Ok(Self {
            fourcc: [chars[0], chars[1], chars[2], chars[3]],
            fps: if fps > 0.0 { fps } else { 30.0 },
        })
    }

    pub fn from_config(config: &RecordingConfig) -> Result<Self> {
        Self::new(&config.fourcc, config.fps)
    }

    pub fn fourcc(&self) -> [char; 4] {
        self.fourcc
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            fourcc: ['m', 'p', '4', 'v'],
            fps: 30.0,
        }
    }
}

impl<W: VideoWriter> ActiveRecording<W> {
    fn new(writer: W, path: PathBuf, size: (u32, u32)) -> Self {
        Self {
            writer,
            path,
            size,
            frames: 0,
        }
    }

    /// File the frames are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frame size fixed when the writer was created.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn append(&mut self, frame: &Frame) -> Result<()> {
        if frame.size() != self.size {
            return Err(Error::FrameSizeMismatch {
                expected: self.size,
                found: frame.size(),
            });
        }

        self.writer.write(frame)?;
        self.frames += 1;

        Ok(())
    }

    fn finish(mut self) {
        match self.writer.release() {
            Ok(()) => info!(
                "Stopped recording {} after {} frames",
                self.path.display(),
                self.frames
            ),
            Err(e) => error!("Error closing video {}: {}", self.path.display(), e),
        }
    }
}

impl<W: VideoWriter> Recording<W> {
    /// Whether the record toggle is on, with or without an open writer.
    pub fn is_recording(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Label of the record button for the current state.
    pub fn label(&self) -> &'static str {
        if self.is_recording() {
            "Stop Recording"
        } else {
            "Start Recording"
        }
    }

    /// The open recording, if any.
    pub fn active(&self) -> Option<&ActiveRecording<W>> {
        match self {
            Self::Active(a) => Some(a),
            _ => None,
        }
    }

    /// Flip the record toggle.
    pub fn toggle(&mut self) {
        if self.is_recording() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Arm a new recording, does nothing if already recording.
    pub fn start(&mut self) {
        if let Self::Idle = self {
            info!("Recording armed, waiting for a destination");
            *self = Self::AwaitingDestination;
        }
    }

    /// Stop recording, releasing any open writer.
    pub fn stop(&mut self) {
        if let Self::Active(active) = std::mem::replace(self, Self::Idle) {
            active.finish();
        }
    }

    /// Append the raw frame to the recording.
    ///
    /// When awaiting a destination the prompt is asked first. Cancelling, or failing to create
    /// the writer, returns to [`Recording::Idle`]. Does nothing when idle.
    pub fn append<P, B>(&mut self, frame: &Frame, prompt: &mut P, backend: &B, params: &VideoParams)
    where
        P: SavePrompt + ?Sized,
        B: VideoBackend<Writer = W>,
    {
        if let Self::AwaitingDestination = self {
            let path = match prompt.video_destination() {
                Some(p) => with_default_extension(p, "mp4"),
                None => {
                    info!("Recording cancelled");
                    *self = Self::Idle;
                    return;
                }
            };

            match backend.create(&path, frame.size(), params) {
                Ok(writer) => {
                    info!(
                        "Recording {}x{} frames to {}",
                        frame.width(),
                        frame.height(),
                        path.display()
                    );
                    *self = Self::Active(ActiveRecording::new(writer, path, frame.size()));
                }
                Err(e) => {
                    error!("Cannot record to {}: {}", path.display(), e);
                    *self = Self::Idle;
                    return;
                }
            }
        }

        if let Self::Active(active) = self {
            match active.append(frame) {
                Ok(()) => (),
                Err(e @ Error::FrameSizeMismatch { .. }) => warn!("Frame dropped: {}", e),
                Err(e) => error!("Error writing to {}: {}", active.path.display(), e),
            }
        }
    }
}

impl<W> Default for Recording<W> {
    fn default() -> Self {
        Self::Idle
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
