//! # Video encoder backends
//!
//! Recordings are encoded by OpenCV's `VideoWriter` through the `mp4` feature, which is on by
//! default. A `--no-default-features` build swaps [`DefaultBackend`] for [`UnavailableBackend`],
//! which refuses to open writers.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

#[cfg(feature = "mp4")]
use opencv::{core, prelude::*, videoio};

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::recording::{VideoBackend, VideoParams, VideoWriter};

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// The backend the binary records with.
#[cfg(feature = "mp4")]
pub type DefaultBackend = OpenCvBackend;

/// The backend the binary records with.
#[cfg(not(feature = "mp4"))]
pub type DefaultBackend = UnavailableBackend;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Encodes with `cv::VideoWriter`.
#[cfg(feature = "mp4")]
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvBackend;

#[cfg(feature = "mp4")]
pub struct OpenCvWriter {
    writer: videoio::VideoWriter,
}

/// A backend that cannot record.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

/// Writer type of [`UnavailableBackend`], never constructed.
#[derive(Debug)]
pub enum NoWriter {}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

#[cfg(feature = "mp4")]
impl VideoBackend for OpenCvBackend {
    type Writer = OpenCvWriter;

    fn create(&self, path: &Path, size: (u32, u32), params: &VideoParams) -> Result<OpenCvWriter> {
        let [a, b, c, d] = params.fourcc();
        let fourcc = videoio::VideoWriter::fourcc(a, b, c, d).map_err(Error::VideoEncoderError)?;

        let filename = path
            .to_str()
            .ok_or_else(|| Error::VideoOpenError(path.to_path_buf()))?;

        let writer = videoio::VideoWriter::new(
            filename,
            fourcc,
            params.fps(),
            core::Size::new(size.0 as i32, size.1 as i32),
            true,
        )
        .map_err(Error::VideoEncoderError)?;

        // OpenCV reports most failures by leaving the writer closed
        if !writer.is_opened().map_err(Error::VideoEncoderError)? {
            return Err(Error::VideoOpenError(path.to_path_buf()));
        }

        Ok(OpenCvWriter { writer })
    }
}

#[cfg(feature = "mp4")]
impl VideoWriter for OpenCvWriter {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        let (width, height) = frame.size();

        // Frames are already BGR, the Mat borrows the samples without copying
        let mat = core::Mat::new_rows_cols_with_bytes::<core::Vec3b>(
            height as i32,
            width as i32,
            frame.as_raw(),
        )
        .map_err(Error::VideoEncoderError)?;

        self.writer.write(&mat).map_err(Error::VideoEncoderError)
    }

    fn release(&mut self) -> Result<()> {
        self.writer.release().map_err(Error::VideoEncoderError)
    }
}

impl VideoBackend for UnavailableBackend {
    type Writer = NoWriter;

    fn create(&self, _path: &Path, _size: (u32, u32), _params: &VideoParams) -> Result<NoWriter> {
        Err(Error::VideoBackendUnavailable)
    }
}

impl VideoWriter for NoWriter {
    fn write(&mut self, _frame: &Frame) -> Result<()> {
        match *self {}
    }

    fn release(&mut self) -> Result<()> {
        match *self {}
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
