//! # Camera Stream Module
//!
//! This module provides the camera stream abstraction the viewer acquires frames through, and the
//! Video4Linux implementation of it used for real endoscopes.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::ImageFormat;
use log::{debug, info};
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;

use crate::error::{Error, Result};
use crate::frame::Frame;

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// A source of raw camera frames.
pub trait CamStream {
    /// Capture a frame from the camera stream.
    ///
    /// Blocks until the device delivers the next frame.
    fn capture(&mut self) -> Result<Frame>;

    /// Stop acquisition and release the device.
    ///
    /// Must be safe to call more than once.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTS
// -----------------------------------------------------------------------------------------------

/// A camera stream backed by a V4L2 capture device and memory mapped buffers.
pub struct V4lCamStream {
    // Declared before the device so the buffers are unmapped first on drop
    stream: Option<MmapStream<'static>>,

    device: Option<Device>,

    format: PixelFormat,

    resolution: (u32, u32),

    stride: u32,
}

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Pixel formats the stream can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Motion JPEG, each buffer is a complete JPEG image
    Mjpg,

    /// Packed YUV 4:2:2, `Y0 U Y1 V` for every pair of pixels
    Yuyv,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl PixelFormat {
    /// Look up a pixel format by its fourcc.
    pub fn from_fourcc(fourcc: &[u8]) -> Option<Self> {
        match fourcc {
            b"MJPG" => Some(Self::Mjpg),
            b"YUYV" => Some(Self::Yuyv),
            _ => None,
        }
    }

    /// The fourcc requested from the driver.
    pub fn fourcc(&self) -> &'static [u8; 4] {
        match self {
            Self::Mjpg => b"MJPG",
            Self::Yuyv => b"YUYV",
        }
    }
}

impl V4lCamStream {
    pub(crate) fn new(
        device: Device,
        stream: MmapStream<'static>,
        format: PixelFormat,
        resolution: (u32, u32),
        stride: u32,
    ) -> Self {
        Self {
            stream: Some(stream),
            device: Some(device),
            format,
            resolution,
            stride,
        }
    }

    /// A stream with no device behind it.
    ///
    /// Every capture fails with [`Error::DeviceUnavailable`], letting the viewer run with a blank
    /// viewport when the camera cannot be opened.
    pub fn unavailable() -> Self {
        Self {
            stream: None,
            device: None,
            format: PixelFormat::Mjpg,
            resolution: (0, 0),
            stride: 0,
        }
    }

    /// Whether a device is open.
    pub fn is_available(&self) -> bool {
        self.stream.is_some()
    }

    /// The pixel format negotiated with the driver.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The `(width, height)` negotiated with the driver.
    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}

impl CamStream for V4lCamStream {
    fn capture(&mut self) -> Result<Frame> {
        let stream = self.stream.as_mut().ok_or(Error::DeviceUnavailable)?;

        // Get the next filled buffer from the driver
        let (buf, meta) = stream.next().map_err(Error::CameraCaptureError)?;

        let used = meta.bytesused as usize;
        let data = if used > 0 && used <= buf.len() {
            &buf[..used]
        } else {
            buf
        };

        decode_frame(data, self.format, self.resolution, self.stride)
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("Capture buffers released");
        }

        if self.device.take().is_some() {
            info!("Camera released");
        }

        Ok(())
    }
}

impl Drop for V4lCamStream {
    fn drop(&mut self) {
        // stop never fails for this stream
        let _ = self.stop();
    }
}

// -----------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Decode one buffer delivered by the driver into a BGR frame.
///
/// `stride` is the number of bytes per row for packed formats, `0` meaning tightly packed.
pub fn decode_frame(
    data: &[u8],
    format: PixelFormat,
    resolution: (u32, u32),
    stride: u32,
) -> Result<Frame> {
    match format {
        PixelFormat::Mjpg => image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map(|img| Frame::from(img.to_bgr8()))
            .map_err(Error::ImageConversionError),
        PixelFormat::Yuyv => decode_yuyv(data, resolution, stride),
    }
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Convert packed YUYV into BGR using the BT.601 limited range coefficients.
fn decode_yuyv(data: &[u8], (width, height): (u32, u32), stride: u32) -> Result<Frame> {
    let row_bytes = ((width as usize + 1) / 2) * 4;
    let stride = (stride as usize).max(row_bytes);
    let expected = stride * height as usize;

    if data.len() < expected {
        return Err(Error::MalformedFrame {
            expected,
            found: data.len(),
        });
    }

    let mut samples = Vec::with_capacity(width as usize * height as usize * 3);

    for row in data.chunks(stride).take(height as usize) {
        for x in 0..width as usize {
            let pair = &row[(x / 2) * 4..(x / 2) * 4 + 4];
            let y = pair[(x % 2) * 2];
            let (u, v) = (pair[1], pair[3]);

            let (r, g, b) = yuv_to_rgb(y, u, v);
            samples.extend_from_slice(&[b, g, r]);
        }
    }

    Frame::from_bgr(width, height, samples).ok_or(Error::MalformedFrame {
        expected,
        found: data.len(),
    })
}

fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let c = i32::from(y) - 16;
    let d = i32::from(u) - 128;
    let e = i32::from(v) - 128;

    let clamp = |x: i32| (x >> 8).clamp(0, 255) as u8;

    (
        clamp(298 * c + 409 * e + 128),
        clamp(298 * c - 100 * d - 208 * e + 128),
        clamp(298 * c + 516 * d + 128),
    )
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
