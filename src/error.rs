//! # `endoscope_viewer` Error module
//!
//! Provides abstractions over errors which can occur during this crate's use.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::PathBuf;

use thiserror;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Result type used by faillible functions inside the `endoscope_viewer` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors which can occur during use of the `endoscope_viewer` crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot find file at {0:?}")]
    FileNotFound(PathBuf),

    #[error("Error reading configuration file: {0}")]
    ConfigReadError(std::io::Error),

    #[error("Error deserialising configuration: {0}")]
    DeserialisationError(toml::de::Error),

    #[error("Error building camera stream: {0}")]
    CamStreamBuildError(String),

    #[error("Error configuring the camera: {0}")]
    CamStartError(std::io::Error),

    #[error("The camera device is not available")]
    DeviceUnavailable,

    #[error("Error capturing camera image: {0}")]
    CameraCaptureError(std::io::Error),

    #[error("Unsupported capture pixel format {0:?}")]
    ImageFormatError(String),

    #[error("Malformed frame: expected {expected} bytes but the device delivered {found}")]
    MalformedFrame { expected: usize, found: usize },

    #[error("Error occured while converting an image: {0}")]
    ImageConversionError(image::ImageError),

    #[error("Cannot save an image to {0:?}, only .png, .jpg and .jpeg are supported")]
    UnsupportedImageExtension(PathBuf),

    #[error("Cannot create output directory {0:?}: {1}")]
    OutputDirError(PathBuf, std::io::Error),

    #[error("Error reading a destination path from the terminal: {0}")]
    PromptError(dialoguer::Error),

    #[error("Invalid video codec identifier {0:?}, a fourcc must be exactly four characters")]
    InvalidFourcc(String),

    #[error("Video recording is unavailable, the crate was built without the `mp4` feature")]
    VideoBackendUnavailable,

    #[cfg(feature = "mp4")]
    #[error("Video encoder error: {0}")]
    VideoEncoderError(opencv::Error),

    #[error("The video encoder could not open {0:?}")]
    VideoOpenError(PathBuf),

    #[error(
        "Frame size {found:?} does not match the {expected:?} the recording was started with"
    )]
    FrameSizeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Window error: {0}")]
    WindowError(minifb::Error),
}
