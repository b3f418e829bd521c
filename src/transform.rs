//! # Frame Transforms
//!
//! The zoom and brightness adjustments applied to the live preview. Saved images and recorded
//! video never pass through here.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::borrow::Cow;

use image::imageops::{self, FilterType};

use crate::controls::{Brightness, Settings, ZoomFactor};
use crate::frame::{DisplayFrame, Frame};

// -----------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Derive the display frame for the given settings: zoom, then brightness, then BGR to RGB.
pub fn render(frame: &Frame, settings: &Settings) -> DisplayFrame {
    let mut work = Cow::Borrowed(frame);

    if settings.zoom().is_magnified() {
        work = Cow::Owned(zoom(&work, settings.zoom()));
    }

    if settings.brightness().is_adjusted() {
        brighten(work.to_mut(), settings.brightness());
    }

    work.to_display()
}

/// The centered crop used for a zoom factor, as `(x, y, width, height)`.
///
/// Crop dimensions are the frame dimensions floor-divided by the factor.
pub fn zoom_region(width: u32, height: u32, factor: ZoomFactor) -> (u32, u32, u32, u32) {
    let crop_width = width / factor.get();
    let crop_height = height / factor.get();

    (
        (width - crop_width) / 2,
        (height - crop_height) / 2,
        crop_width,
        crop_height,
    )
}

/// Crop the center of the frame and scale it back up to the original size.
pub fn zoom(frame: &Frame, factor: ZoomFactor) -> Frame {
    let (width, height) = frame.size();
    let (x, y, crop_width, crop_height) = zoom_region(width, height, factor);

    // Frames smaller than the factor have nothing left to magnify
    if crop_width == 0 || crop_height == 0 {
        return frame.clone();
    }

    let crop = imageops::crop_imm(&**frame, x, y, crop_width, crop_height);

    Frame::from(imageops::resize(&crop, width, height, FilterType::Triangle))
}

/// Add the offset to every sample, saturating at 0 and 255.
pub fn brighten(frame: &mut Frame, offset: Brightness) {
    let offset = offset.get();

    for sample in frame.iter_mut() {
        *sample = (i32::from(*sample) + offset).clamp(0, 255) as u8;
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
