//! # Viewer window
//!
//! A `minifb` frontend for [`CameraViewer`]: a fixed 640x480 viewport with a control strip under
//! it holding the capture, record and freeze buttons and the zoom and brightness sliders.
//!
//! `minifb` only blits pixels, so button labels and slider values are rendered into the buffer
//! with an `embedded-graphics` mono font. The window title stays fixed. Every control also has a
//! keyboard shortcut:
//!
//! | Key                 | Control                |
//! |---------------------|------------------------|
//! | `C`                 | Capture Image          |
//! | `R`                 | Start/Stop Recording   |
//! | `F`                 | Freeze Frame/Unfreeze  |
//! | `1` to `4`          | Zoom                   |
//! | `Up`/`Down`         | Brightness +1/-1       |
//! | `PageUp`/`PageDown` | Brightness +10/-10     |
//! | `Escape`            | Close                  |

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::convert::Infallible;
use std::time::Duration;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use log::info;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::camstream::CamStream;
use crate::controls::{Control, Settings, SliderSpec, BRIGHTNESS_SLIDER, ZOOM_SLIDER};
use crate::error::{Error, Result};
use crate::frame::DisplayFrame;
use crate::prompt::SavePrompt;
use crate::recording::{Recording, VideoBackend, VideoWriter};
use crate::viewer::CameraViewer;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

pub const TITLE: &str = "Endoscope Viewer";

pub const VIEWPORT_WIDTH: usize = 640;
pub const VIEWPORT_HEIGHT: usize = 480;

const STRIP_HEIGHT: usize = 72;

pub const WINDOW_WIDTH: usize = VIEWPORT_WIDTH;
pub const WINDOW_HEIGHT: usize = VIEWPORT_HEIGHT + STRIP_HEIGHT;

// Buttons on the first row, sliders with their value labels on the second
const CAPTURE_BUTTON: Rect = Rect::new(8, 486, 120, 28);
const RECORD_BUTTON: Rect = Rect::new(136, 486, 120, 28);
const FREEZE_BUTTON: Rect = Rect::new(264, 486, 120, 28);
const ZOOM_LABEL_X: i32 = 8;
const ZOOM_TRACK: Rect = Rect::new(72, 520, 152, 24);
const BRIGHTNESS_LABEL_X: i32 = 240;
const BRIGHTNESS_TRACK: Rect = Rect::new(340, 520, 292, 24);

const STRIP_BG: u32 = 0x1e1e1e;
const BUTTON_BG: u32 = 0x3c3c3c;
const TEXT: u32 = 0xe0e0e0;
const RECORD_RED: u32 = 0xd03030;
const FREEZE_BLUE: u32 = 0x2f80ed;
const TRACK: u32 = 0x5a5a5a;
const KNOB: u32 = 0xf0f0f0;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// An axis aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Mouse state sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub pos: Option<(f32, f32)>,
    pub down: bool,
}

/// Draw target over the window buffer.
struct Canvas<'a> {
    buffer: &'a mut [u32],
}

/// Turns mouse and keyboard input into [`Control`]s.
#[derive(Debug, Default)]
pub struct ControlStrip {
    was_down: bool,
    dragging: Option<Slider>,
}

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slider {
    Zoom,
    Brightness,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, (px, py): (f32, f32)) -> bool {
        px >= self.x as f32
            && px < (self.x + self.w) as f32
            && py >= self.y as f32
            && py < (self.y + self.h) as f32
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(WINDOW_WIDTH as u32, WINDOW_HEIGHT as u32)
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Rgb888>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x as usize >= WINDOW_WIDTH {
                continue;
            }

            let i = point.y as usize * WINDOW_WIDTH + point.x as usize;
            if let Some(px) = self.buffer.get_mut(i) {
                *px = (u32::from(color.r()) << 16)
                    | (u32::from(color.g()) << 8)
                    | u32::from(color.b());
            }
        }

        Ok(())
    }
}

impl Slider {
    fn spec(self) -> SliderSpec {
        match self {
            Self::Zoom => ZOOM_SLIDER,
            Self::Brightness => BRIGHTNESS_SLIDER,
        }
    }

    fn track(self) -> Rect {
        match self {
            Self::Zoom => ZOOM_TRACK,
            Self::Brightness => BRIGHTNESS_TRACK,
        }
    }

    fn current(self, settings: &Settings) -> i32 {
        match self {
            Self::Zoom => settings.zoom().get() as i32,
            Self::Brightness => settings.brightness().get(),
        }
    }

    fn control(self, value: i32) -> Control {
        match self {
            Self::Zoom => Control::SetZoom(value),
            Self::Brightness => Control::SetBrightness(value),
        }
    }

    fn label(self, settings: &Settings) -> String {
        match self {
            Self::Zoom => format!("Zoom {}", settings.zoom()),
            Self::Brightness => format!("Brightness {}", settings.brightness()),
        }
    }

    fn label_x(self) -> i32 {
        match self {
            Self::Zoom => ZOOM_LABEL_X,
            Self::Brightness => BRIGHTNESS_LABEL_X,
        }
    }
}

impl ControlStrip {
    /// Sample the window and return the controls the operator used since the last call.
    pub fn poll(&mut self, window: &Window, settings: &Settings) -> Vec<Control> {
        if !window.is_open() {
            return vec![Control::Close];
        }

        let mut controls = key_controls(
            &window.get_keys_pressed(KeyRepeat::No),
            &window.get_keys_pressed(KeyRepeat::Yes),
            settings,
        );

        controls.extend(self.pointer(
            Pointer {
                pos: window.get_mouse_pos(MouseMode::Discard),
                down: window.get_mouse_down(MouseButton::Left),
            },
            settings,
        ));

        controls
    }

    /// Controls produced by the mouse.
    ///
    /// Buttons fire on press. Pressing on a slider track jumps the slider and drags it until the
    /// button is released, even if the pointer leaves the track.
    pub fn pointer(&mut self, pointer: Pointer, settings: &Settings) -> Vec<Control> {
        let pressed = pointer.down && !self.was_down;
        self.was_down = pointer.down;

        if !pointer.down {
            self.dragging = None;
            return Vec::new();
        }

        let pos = match pointer.pos {
            Some(p) => p,
            None => return Vec::new(),
        };

        if pressed {
            if CAPTURE_BUTTON.contains(pos) {
                return vec![Control::CaptureImage];
            }
            if RECORD_BUTTON.contains(pos) {
                return vec![Control::ToggleRecording];
            }
            if FREEZE_BUTTON.contains(pos) {
                return vec![Control::ToggleFreeze];
            }

            self.dragging = [Slider::Zoom, Slider::Brightness]
                .iter()
                .copied()
                .find(|s| s.track().contains(pos));
        }

        match self.dragging {
            Some(slider) => {
                let value = slider_value(&slider.spec(), &slider.track(), pos.0);
                if value != slider.current(settings) {
                    vec![slider.control(value)]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }
}

/// Run the viewer in a window until it is closed.
pub fn run<S, P, B>(viewer: &mut CameraViewer<S, P, B>, tick: Duration) -> Result<()>
where
    S: CamStream,
    P: SavePrompt,
    B: VideoBackend,
{
    let mut window = Window::new(TITLE, WINDOW_WIDTH, WINDOW_HEIGHT, WindowOptions::default())
        .map_err(Error::WindowError)?;

    let fps = (1000 / tick.as_millis().max(1)) as usize;
    window.set_target_fps(fps.max(1));

    info!("Window open, rendering at up to {} fps", fps.max(1));

    let mut buffer = vec![0u32; WINDOW_WIDTH * WINDOW_HEIGHT];
    let mut strip = ControlStrip::default();

    while !viewer.is_closed() {
        for control in strip.poll(&window, viewer.settings()) {
            viewer.handle(control);
        }

        if viewer.is_closed() {
            break;
        }

        // The viewport keeps its last contents when no frame arrives
        if let Some(display) = viewer.tick() {
            paint_frame(&mut buffer, &display);
        }

        paint_controls(&mut buffer, viewer.settings(), viewer.recording());

        window
            .update_with_buffer(&buffer, WINDOW_WIDTH, WINDOW_HEIGHT)
            .map_err(Error::WindowError)?;
    }

    Ok(())
}

/// The slider value under the pointer's x coordinate.
pub fn slider_value(spec: &SliderSpec, track: &Rect, x: f32) -> i32 {
    let frac = ((x - track.x as f32) / (track.w - 1).max(1) as f32).clamp(0.0, 1.0);

    spec.clamp(spec.min + (frac * (spec.max - spec.min) as f32).round() as i32)
}

/// The x coordinate of the slider knob for a value.
pub fn knob_x(spec: &SliderSpec, track: &Rect, value: i32) -> i32 {
    let range = (spec.max - spec.min).max(1);

    let offset = (spec.clamp(value) - spec.min) * (track.w - 1);

    // Round to the nearest pixel
    track.x + (2 * offset + range) / (2 * range)
}

/// Paint the display frame into the viewport.
///
/// The frame is placed at the top-left without scaling, clipped to the viewport, and the
/// uncovered area is black.
pub fn paint_frame(buffer: &mut [u32], frame: &DisplayFrame) {
    let (width, height) = frame.size();
    let (width, height) = (width as usize, height as usize);
    let raw = frame.as_raw();

    for (y, row) in buffer
        .chunks_mut(WINDOW_WIDTH)
        .take(VIEWPORT_HEIGHT)
        .enumerate()
    {
        for (x, px) in row.iter_mut().take(VIEWPORT_WIDTH).enumerate() {
            *px = if x < width && y < height {
                let i = (y * width + x) * 3;
                (u32::from(raw[i]) << 16) | (u32::from(raw[i + 1]) << 8) | u32::from(raw[i + 2])
            } else {
                0
            };
        }
    }
}

/// Paint the control strip for the current state.
///
/// Buttons carry their current label, the record button turns red while recording and the freeze
/// button blue while frozen. Each slider is preceded by its value.
pub fn paint_controls<W: VideoWriter>(
    buffer: &mut [u32],
    settings: &Settings,
    recording: &Recording<W>,
) {
    fill_rect(
        buffer,
        Rect::new(0, VIEWPORT_HEIGHT as i32, WINDOW_WIDTH as i32, STRIP_HEIGHT as i32),
        STRIP_BG,
    );

    paint_button(buffer, CAPTURE_BUTTON, "Capture Image", BUTTON_BG);
    paint_button(
        buffer,
        RECORD_BUTTON,
        recording.label(),
        if recording.is_recording() { RECORD_RED } else { BUTTON_BG },
    );
    paint_button(
        buffer,
        FREEZE_BUTTON,
        settings.freeze_label(),
        if settings.frozen() { FREEZE_BLUE } else { BUTTON_BG },
    );

    paint_slider(buffer, Slider::Zoom, settings);
    paint_slider(buffer, Slider::Brightness, settings);
}

/// Width in pixels of `text` in the strip font.
pub fn text_width(text: &str) -> i32 {
    let glyph = (FONT_6X10.character_size.width + FONT_6X10.character_spacing) as i32;

    text.chars().count() as i32 * glyph - FONT_6X10.character_spacing as i32
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn key_controls(pressed: &[Key], repeated: &[Key], settings: &Settings) -> Vec<Control> {
    let mut controls = Vec::new();

    for key in pressed {
        let control = match key {
            Key::Escape => Control::Close,
            Key::C => Control::CaptureImage,
            Key::R => Control::ToggleRecording,
            Key::F => Control::ToggleFreeze,
            Key::Key1 => Control::SetZoom(1),
            Key::Key2 => Control::SetZoom(2),
            Key::Key3 => Control::SetZoom(3),
            Key::Key4 => Control::SetZoom(4),
            _ => continue,
        };
        controls.push(control);
    }

    let mut brightness = settings.brightness().get();
    for key in repeated {
        let step = match key {
            Key::Up => 1,
            Key::Down => -1,
            Key::PageUp => 10,
            Key::PageDown => -10,
            _ => continue,
        };
        brightness = BRIGHTNESS_SLIDER.clamp(brightness + step);
        controls.push(Control::SetBrightness(brightness));
    }

    controls
}

fn paint_button(buffer: &mut [u32], rect: Rect, label: &str, background: u32) {
    fill_rect(buffer, rect, background);

    let text_y = rect.y + (rect.h - FONT_6X10.character_size.height as i32) / 2;
    draw_text(buffer, label, rect.x + (rect.w - text_width(label)) / 2, text_y);
}

fn paint_slider(buffer: &mut [u32], slider: Slider, settings: &Settings) {
    let spec = slider.spec();
    let track = slider.track();
    let mid = track.y + track.h / 2;

    fill_rect(buffer, Rect::new(track.x, track.y, track.w, track.h), STRIP_BG);
    draw_text(
        buffer,
        &slider.label(settings),
        slider.label_x(),
        track.y + (track.h - FONT_6X10.character_size.height as i32) / 2,
    );
    fill_rect(buffer, Rect::new(track.x, mid - 1, track.w, 3), TRACK);

    for tick in spec.ticks() {
        let x = knob_x(&spec, &track, tick);
        fill_rect(buffer, Rect::new(x, mid + 5, 1, 5), TRACK);
    }

    let x = knob_x(&spec, &track, slider.current(settings));
    fill_rect(buffer, Rect::new(x - 3, track.y + 2, 7, track.h - 10), KNOB);
}

/// Draw `text` with its top-left corner at `(x, y)`, only the glyph pixels are touched.
fn draw_text(buffer: &mut [u32], text: &str, x: i32, y: i32) {
    let style = MonoTextStyle::new(
        &FONT_6X10,
        Rgb888::new((TEXT >> 16) as u8, (TEXT >> 8) as u8, TEXT as u8),
    );

    let text = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top);
    if let Err(never) = text.draw(&mut Canvas { buffer }) {
        match never {}
    }
}

fn fill_rect(buffer: &mut [u32], rect: Rect, color: u32) {
    let x0 = rect.x.max(0) as usize;
    let y0 = rect.y.max(0) as usize;
    let x1 = ((rect.x + rect.w).max(0) as usize).min(WINDOW_WIDTH);
    let y1 = ((rect.y + rect.h).max(0) as usize).min(WINDOW_HEIGHT);

    for y in y0..y1 {
        for x in x0..x1 {
            buffer[y * WINDOW_WIDTH + x] = color;
        }
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
