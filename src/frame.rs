//! # Frame types
//!
//! Frames captured from the camera are kept in BGR sample order, the order every capture format
//! is decoded into and the order the video encoder consumes. Frames shown in the window are RGB.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use derive_more::{Deref, DerefMut, From};
use image::{Bgr, ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::error::{Error, Result};

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// An 8-bit image with BGR ordered samples.
pub type BgrImage = ImageBuffer<Bgr<u8>, Vec<u8>>;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A raw frame as acquired from the camera.
#[derive(Debug, Clone, PartialEq, Deref, DerefMut, From)]
pub struct Frame(BgrImage);

/// A frame ready to be painted into the viewport.
#[derive(Debug, Clone, PartialEq, Deref, DerefMut, From)]
pub struct DisplayFrame(RgbImage);

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Frame {
    /// Wrap a tightly packed BGR buffer, `None` if the buffer is too small for the dimensions.
    pub fn from_bgr(width: u32, height: u32, samples: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, samples).map(Self)
    }

    /// Build a frame from an RGB image, swapping the sample order.
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        Self(ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            Bgr([b, g, r])
        }))
    }

    /// `(width, height)` of the frame.
    pub fn size(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Convert into RGB order.
    pub fn to_rgb(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            let Bgr([b, g, r]) = *self.get_pixel(x, y);
            Rgb([r, g, b])
        })
    }

    /// Convert into a frame that can be painted.
    pub fn to_display(&self) -> DisplayFrame {
        DisplayFrame(self.to_rgb())
    }

    /// Encode the frame to the given path.
    ///
    /// The encoding is chosen from the extension, see [`image_format_for`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let format = image_format_for(path.as_ref())?;

        self.to_rgb()
            .save_with_format(path, format)
            .map_err(Error::ImageConversionError)
    }
}

impl DisplayFrame {
    /// `(width, height)` of the frame.
    pub fn size(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

// -----------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// The still-image encoding for a destination path: PNG for `.png`, JPEG for `.jpg`/`.jpeg`.
pub fn image_format_for(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => Ok(ImageFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(ImageFormat::Jpeg),
        _ => Err(Error::UnsupportedImageExtension(path.to_path_buf())),
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
