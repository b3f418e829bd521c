//! # `CamStreamBuilder` implementation
//!
//! This module implements the builder for camera stream objects.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use log::{info, warn};
use v4l::buffer::Type;
use v4l::prelude::*;
use v4l::video::capture::Parameters;
use v4l::video::Capture;
use v4l::FourCC;

use crate::camstream::{PixelFormat, V4lCamStream};
use crate::config::DeviceConfig;
use crate::error::{Error, Result};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Builds a [`V4lCamStream`], negotiating format, resolution and frame rate with the driver.
#[derive(Debug, Clone)]
pub struct CamStreamBuilder {
    index: usize,

    path: Option<PathBuf>,

    resolution: (u32, u32),

    fps: u32,

    format: PixelFormat,

    num_buffers: u32,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl CamStreamBuilder {
    pub fn new() -> Self {
        Self {
            index: 0,
            path: None,
            resolution: (640, 480),
            fps: 30,
            format: PixelFormat::Mjpg,
            num_buffers: 4,
        }
    }

    /// Start from the `[device]` section of the configuration.
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        let mut builder = Self::new()
            .index(config.index)
            .resolution(config.resolution)
            .fps(config.fps)
            .format(config.format.as_bytes())?;

        if let Some(ref path) = config.path {
            builder = builder.path(path)?;
        }

        Ok(builder)
    }

    /// Select the camera by index, i.e. `/dev/video<index>`. Default is `0`.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;

        self
    }

    /// Specify the path of the camera, i.e. the device path, such as `/dev/video1`
    ///
    /// Takes precedence over [`index`](Self::index).
    ///
    /// # Returns
    /// - `self` if the path exists, `Err` otherwise
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.path = Some(path.as_ref().to_path_buf());

            Ok(self)
        } else {
            Err(Error::FileNotFound(path.as_ref().to_path_buf()))
        }
    }

    /// Set the resolution of the camera.
    ///
    /// Default value is `(640, 480)`. The driver may pick the closest size it supports.
    pub fn resolution(mut self, resolution: (u32, u32)) -> Self {
        self.resolution = resolution;

        self
    }

    /// Set the requested frame rate, default is 30.
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);

        self
    }

    /// Set the format of the images.
    ///
    /// Uses the FourCC notation, `b"MJPG"` (default) or `b"YUYV"`.
    pub fn format(mut self, format: &[u8]) -> Result<Self> {
        self.format = PixelFormat::from_fourcc(format)
            .ok_or_else(|| Error::ImageFormatError(String::from_utf8_lossy(format).into_owned()))?;

        Ok(self)
    }

    /// Set the number of buffers in the queue for this camera.
    ///
    /// Default value is 4.
    pub fn num_buffers(mut self, num_buffers: u32) -> Self {
        self.num_buffers = num_buffers.max(1);

        self
    }

    /// Open the device and start streaming.
    pub fn build(self) -> Result<V4lCamStream> {
        let device = match self.path {
            Some(ref p) => Device::with_path(p),
            None => Device::new(self.index),
        }
        .map_err(Error::CamStartError)?;

        // Request the format, the driver answers with what it actually applied
        let mut fmt = device.format().map_err(Error::CamStartError)?;
        fmt.width = self.resolution.0;
        fmt.height = self.resolution.1;
        fmt.fourcc = FourCC::new(self.format.fourcc());

        let fmt = device.set_format(&fmt).map_err(Error::CamStartError)?;

        let format = PixelFormat::from_fourcc(&fmt.fourcc.repr)
            .ok_or_else(|| Error::ImageFormatError(fmt.fourcc.to_string()))?;

        if (fmt.width, fmt.height) != self.resolution {
            warn!(
                "Requested {}x{} but the camera delivers {}x{}",
                self.resolution.0, self.resolution.1, fmt.width, fmt.height
            );
        }

        if let Err(e) = device.set_params(&Parameters::with_fps(self.fps)) {
            warn!("Could not set the frame rate to {} fps: {}", self.fps, e);
        }

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, self.num_buffers)
            .map_err(Error::CamStartError)?;

        info!(
            "Camera {} streaming {}x{} {:?}",
            self.path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("/dev/video{}", self.index)),
            fmt.width,
            fmt.height,
            format
        );

        Ok(V4lCamStream::new(
            device,
            stream,
            format,
            (fmt.width, fmt.height),
            fmt.stride,
        ))
    }
}

impl Default for CamStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
