//! # Operator Controls
//!
//! This module defines the interactive settings of the viewer and the commands the window emits
//! when the operator uses one of the five controls.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use derive_more::Display;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// The zoom slider, magnification levels 1x to 4x.
pub const ZOOM_SLIDER: SliderSpec = SliderSpec {
    min: 1,
    max: 4,
    step: 1,
    tick_interval: 1,
};

/// The brightness slider, an additive offset applied to every sample.
pub const BRIGHTNESS_SLIDER: SliderSpec = SliderSpec {
    min: -100,
    max: 100,
    step: 1,
    tick_interval: 10,
};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Range and granularity of a horizontal slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderSpec {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub tick_interval: i32,
}

/// Integer zoom factor, always within [`ZOOM_SLIDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}x", _0)]
pub struct ZoomFactor(u32);

/// Integer brightness offset, always within [`BRIGHTNESS_SLIDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:+}", _0)]
pub struct Brightness(i32);

/// The settings read by the render loop on every tick.
///
/// Only the viewer mutates these, in response to a [`Control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    zoom: ZoomFactor,
    brightness: Brightness,
    frozen: bool,
}

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Commands emitted by the window when the operator interacts with a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Save the raw current frame as an image
    CaptureImage,

    /// Start or stop recording
    ToggleRecording,

    /// Freeze or unfreeze acquisition
    ToggleFreeze,

    /// The zoom slider moved to a new value
    SetZoom(i32),

    /// The brightness slider moved to a new value
    SetBrightness(i32),

    /// The window is closing
    Close,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl SliderSpec {
    /// Clamp a value into the slider range and snap it to the step.
    pub fn clamp(&self, value: i32) -> i32 {
        let value = value.clamp(self.min, self.max);
        self.min + (value - self.min) / self.step * self.step
    }

    /// Values at which a tick mark is drawn.
    pub fn ticks(&self) -> impl Iterator<Item = i32> {
        let spec = *self;
        (0..)
            .map(move |i| spec.min + i * spec.tick_interval)
            .take_while(move |v| *v <= spec.max)
    }
}

impl ZoomFactor {
    /// Create a zoom factor, clamping the value into range.
    pub fn new(value: i32) -> Self {
        Self(ZOOM_SLIDER.clamp(value) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether this factor changes the image at all.
    pub fn is_magnified(self) -> bool {
        self.0 > 1
    }
}

impl Default for ZoomFactor {
    fn default() -> Self {
        Self(1)
    }
}

impl Brightness {
    /// Create a brightness offset, clamping the value into range.
    pub fn new(value: i32) -> Self {
        Self(BRIGHTNESS_SLIDER.clamp(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Whether this offset changes the image at all.
    pub fn is_adjusted(self) -> bool {
        self.0 != 0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(0)
    }
}

impl Settings {
    pub fn zoom(&self) -> ZoomFactor {
        self.zoom
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    /// Return a copy of these settings with the given zoom factor.
    pub fn with_zoom(mut self, zoom: ZoomFactor) -> Self {
        self.zoom = zoom;
        self
    }

    /// Return a copy of these settings with the given brightness offset.
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = brightness;
        self
    }

    /// Label of the freeze button for the current state.
    pub fn freeze_label(&self) -> &'static str {
        if self.frozen {
            "Unfreeze"
        } else {
            "Freeze Frame"
        }
    }

    pub(crate) fn set_zoom(&mut self, zoom: ZoomFactor) {
        self.zoom = zoom;
    }

    pub(crate) fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
    }

    pub(crate) fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
