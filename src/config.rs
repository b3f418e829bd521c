//! # Viewer Configuration
//!
//! Optional TOML configuration for the capture device, the render loop and recording. Every field
//! has a default, so an empty file (or no file at all) gives the stock viewer.
//!
//! ```toml
//! tick_ms = 30
//!
//! [device]
//! index = 0
//! resolution = [640, 480]
//! fps = 30
//! format = "MJPG"
//!
//! [recording]
//! fps = 30.0
//! fourcc = "mp4v"
//! ```

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Top level configuration of the viewer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Capture device settings.
    pub device: DeviceConfig,

    /// Period of the render loop in milliseconds.
    pub tick_ms: u64,

    /// Video recording settings.
    pub recording: RecordingConfig,
}

/// Which camera to open and the format to request from it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Camera index, opened as `/dev/video<index>`.
    pub index: usize,

    /// Explicit device path, takes precedence over `index`.
    pub path: Option<PathBuf>,

    /// Requested `(width, height)`.
    pub resolution: (u32, u32),

    /// Requested frame rate.
    pub fps: u32,

    /// Requested pixel format as a fourcc, `MJPG` or `YUYV`.
    pub format: String,
}

/// Parameters of recorded video files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordingConfig {
    /// Frame rate written into the container.
    pub fps: f64,

    /// Codec fourcc passed to the encoder.
    pub fourcc: String,

    /// When set, snapshots and recordings are named automatically inside this directory instead
    /// of asking for a path.
    pub output_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl ViewerConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Check the file exists
        if !path.as_ref().exists() {
            return Err(Error::FileNotFound(path.as_ref().to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(Error::ConfigReadError)?;

        Self::from_toml_str(&text)
    }

    /// Parse the configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(Error::DeserialisationError)
    }

    /// The render loop period, never shorter than a millisecond.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            tick_ms: 30,
            recording: RecordingConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// The device node to open.
    pub fn device_path(&self) -> PathBuf {
        match self.path {
            Some(ref p) => p.clone(),
            None => PathBuf::from(format!("/dev/video{}", self.index)),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            index: 0,
            path: None,
            resolution: (640, 480),
            fps: 30,
            format: String::from("MJPG"),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            fourcc: String::from("mp4v"),
            output_dir: None,
        }
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = ViewerConfig::from_toml_str("").unwrap();

        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.tick_period(), Duration::from_millis(30));
        assert_eq!(config.device.device_path(), PathBuf::from("/dev/video0"));
        assert_eq!(config.recording.fourcc, "mp4v");
    }

    #[test]
    fn test_partial_config() {
        let config = ViewerConfig::from_toml_str(
            r#"
            tick_ms = 40

            [device]
            index = 2
            resolution = [1280, 720]
            format = "YUYV"

            [recording]
            output_dir = "/tmp/scope"
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_ms, 40);
        assert_eq!(config.device.resolution, (1280, 720));
        assert_eq!(config.device.fps, 30);
        assert_eq!(config.device.format, "YUYV");
        assert_eq!(config.device.device_path(), PathBuf::from("/dev/video2"));
        assert_eq!(config.recording.fps, 30.0);
        assert_eq!(config.recording.output_dir, Some(PathBuf::from("/tmp/scope")));
    }

    #[test]
    fn test_path_overrides_index() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [device]
            index = 3
            path = "/dev/v4l/by-id/usb-scope"
            "#,
        )
        .unwrap();

        assert_eq!(config.device.device_path(), PathBuf::from("/dev/v4l/by-id/usb-scope"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            ViewerConfig::from_toml_str("zoom = 2"),
            Err(Error::DeserialisationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ViewerConfig::from_file("/definitely/not/here.toml"),
            Err(Error::FileNotFound(_))
        ));
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let config = ViewerConfig::from_toml_str("tick_ms = 0").unwrap();

        assert_eq!(config.tick_period(), Duration::from_millis(1));
    }
}
