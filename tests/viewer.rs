//! # Viewer Test
//!
//! Drives `CameraViewer` through scripted cameras, prompts and video backends.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use endoscope_viewer::prelude::*;
use endoscope_viewer::{Error, Frame, Recording, Result};
use image::{Bgr, GenericImageView};

// -----------------------------------------------------------------------------------------------
// MOCKS
// -----------------------------------------------------------------------------------------------

/// Everything the mocks observed.
#[derive(Debug, Default)]
struct Log {
    captures: usize,
    stops: usize,
    image_prompts: usize,
    video_prompts: usize,
    writers: Vec<(PathBuf, (u32, u32))>,
    written: Vec<Frame>,
    released: usize,
}

type Shared = Rc<RefCell<Log>>;

struct ScriptedStream {
    frames: VecDeque<Result<Frame>>,
    log: Shared,
}

struct ScriptedPrompt {
    images: VecDeque<Option<PathBuf>>,
    videos: VecDeque<Option<PathBuf>>,
    log: Shared,
}

struct MemoryBackend {
    log: Shared,
}

struct MemoryWriter {
    log: Shared,
}

impl CamStream for ScriptedStream {
    fn capture(&mut self) -> Result<Frame> {
        self.log.borrow_mut().captures += 1;
        self.frames.pop_front().unwrap_or(Err(Error::DeviceUnavailable))
    }

    fn stop(&mut self) -> Result<()> {
        self.log.borrow_mut().stops += 1;
        Ok(())
    }
}

impl SavePrompt for ScriptedPrompt {
    fn image_destination(&mut self) -> Option<PathBuf> {
        self.log.borrow_mut().image_prompts += 1;
        self.images.pop_front().flatten()
    }

    fn video_destination(&mut self) -> Option<PathBuf> {
        self.log.borrow_mut().video_prompts += 1;
        self.videos.pop_front().flatten()
    }
}

impl VideoBackend for MemoryBackend {
    type Writer = MemoryWriter;

    fn create(&self, path: &Path, size: (u32, u32), _: &VideoParams) -> Result<MemoryWriter> {
        self.log
            .borrow_mut()
            .writers
            .push((path.to_path_buf(), size));

        Ok(MemoryWriter {
            log: self.log.clone(),
        })
    }
}

impl VideoWriter for MemoryWriter {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        self.log.borrow_mut().written.push(frame.clone());
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.log.borrow_mut().released += 1;
        Ok(())
    }
}

type Viewer = CameraViewer<ScriptedStream, ScriptedPrompt, MemoryBackend>;

// -----------------------------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------------------------

/// A 4x3 frame whose samples all derive from `seed`.
fn frame(seed: u8) -> Frame {
    sized_frame(seed, 4, 3)
}

fn sized_frame(seed: u8, width: u32, height: u32) -> Frame {
    Frame::from(image::ImageBuffer::from_fn(width, height, |x, y| {
        Bgr([
            seed.wrapping_add(x as u8),
            seed.wrapping_add(y as u8),
            seed.wrapping_mul(3),
        ])
    }))
}

fn viewer(
    frames: Vec<Result<Frame>>,
    images: Vec<Option<PathBuf>>,
    videos: Vec<Option<PathBuf>>,
) -> (Viewer, Shared) {
    let log = Shared::default();

    let viewer = CameraViewer::new(
        ScriptedStream {
            frames: frames.into(),
            log: log.clone(),
        },
        ScriptedPrompt {
            images: images.into(),
            videos: videos.into(),
            log: log.clone(),
        },
        MemoryBackend { log: log.clone() },
        VideoParams::default(),
    );

    (viewer, log)
}

fn live(seeds: &[u8]) -> Vec<Result<Frame>> {
    seeds.iter().map(|s| Ok(frame(*s))).collect()
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[test]
fn identity_settings_show_the_raw_frame() {
    let (mut viewer, _) = viewer(live(&[10]), vec![], vec![]);

    let display = viewer.tick().expect("A frame was available");

    assert_eq!(*display, frame(10).to_rgb());
    assert_eq!(viewer.current_frame(), Some(&frame(10)));
}

#[test]
fn failed_acquisition_keeps_state() {
    let (mut viewer, log) = viewer(
        vec![Ok(frame(1)), Err(Error::DeviceUnavailable), Ok(frame(2))],
        vec![],
        vec![],
    );

    assert!(viewer.tick().is_some());
    assert!(viewer.tick().is_none());
    assert_eq!(viewer.current_frame(), Some(&frame(1)));

    assert!(viewer.tick().is_some());
    assert_eq!(viewer.current_frame(), Some(&frame(2)));
    assert_eq!(log.borrow().captures, 3);
}

#[test]
fn unavailable_camera_renders_nothing() {
    let (mut viewer, _) = viewer(vec![], vec![], vec![]);

    for _ in 0..3 {
        assert!(viewer.tick().is_none());
    }
    assert!(viewer.current_frame().is_none());
}

#[test]
fn freeze_reuses_the_stored_frame() {
    let (mut viewer, log) = viewer(live(&[1, 2, 3]), vec![], vec![]);

    let first = viewer.tick().unwrap();
    viewer.handle(Control::ToggleFreeze);
    assert_eq!(viewer.freeze_label(), "Unfreeze");

    for _ in 0..5 {
        assert_eq!(viewer.tick().unwrap(), first);
    }
    assert_eq!(log.borrow().captures, 1);

    viewer.handle(Control::ToggleFreeze);
    assert_eq!(viewer.freeze_label(), "Freeze Frame");

    viewer.tick().unwrap();
    assert_eq!(viewer.current_frame(), Some(&frame(2)));
    assert_eq!(log.borrow().captures, 2);
}

#[test]
fn freeze_before_first_frame_still_acquires() {
    let (mut viewer, log) = viewer(live(&[5, 6]), vec![], vec![]);

    viewer.handle(Control::ToggleFreeze);
    viewer.tick().unwrap();
    viewer.tick().unwrap();

    assert_eq!(log.borrow().captures, 1);
    assert_eq!(viewer.current_frame(), Some(&frame(5)));
}

#[test]
fn frozen_display_follows_setting_changes() {
    let (mut viewer, _) = viewer(live(&[100]), vec![], vec![]);

    let before = viewer.tick().unwrap();
    viewer.handle(Control::ToggleFreeze);
    viewer.handle(Control::SetBrightness(50));
    let after = viewer.tick().unwrap();

    assert_ne!(before, after);
    assert_eq!(viewer.current_frame(), Some(&frame(100)));
}

#[test]
fn slider_values_are_clamped() {
    let (mut viewer, _) = viewer(vec![], vec![], vec![]);

    viewer.handle(Control::SetZoom(9));
    viewer.handle(Control::SetBrightness(-300));
    assert_eq!(viewer.settings().zoom().get(), 4);
    assert_eq!(viewer.settings().brightness().get(), -100);

    viewer.handle(Control::SetZoom(-1));
    viewer.handle(Control::SetBrightness(300));
    assert_eq!(viewer.settings().zoom().get(), 1);
    assert_eq!(viewer.settings().brightness().get(), 100);
}

#[test]
fn capture_without_frame_does_not_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let (mut viewer, log) = viewer(vec![], vec![Some(dir.path().join("a.png"))], vec![]);

    viewer.handle(Control::CaptureImage);

    assert_eq!(log.borrow().image_prompts, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn capture_saves_the_raw_frame() {
    let dir = tempfile::tempdir().unwrap();
    let (mut viewer, log) = viewer(live(&[40]), vec![Some(dir.path().join("shot"))], vec![]);

    viewer.handle(Control::SetZoom(2));
    viewer.handle(Control::SetBrightness(80));
    viewer.tick().unwrap();

    let path = viewer.capture_image().unwrap().expect("Destination given");

    assert_eq!(path, dir.path().join("shot.png"));
    assert_eq!(log.borrow().image_prompts, 1);

    let saved = image::open(&path).unwrap().to_rgb8();
    assert_eq!(saved, frame(40).to_rgb());
}

#[test]
fn capture_as_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.jpg");
    let (mut viewer, _) = viewer(live(&[40]), vec![Some(path.clone())], vec![]);

    viewer.tick().unwrap();
    viewer.handle(Control::CaptureImage);

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (4, 3));
}

#[test]
fn cancelled_capture_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut viewer, log) = viewer(live(&[1]), vec![None], vec![]);

    viewer.tick().unwrap();

    assert!(viewer.capture_image().unwrap().is_none());
    assert_eq!(log.borrow().image_prompts, 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unsupported_image_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.bmp");
    let (mut viewer, _) = viewer(live(&[1]), vec![Some(path.clone()), Some(path.clone())], vec![]);

    viewer.tick().unwrap();

    assert!(matches!(
        viewer.capture_image(),
        Err(Error::UnsupportedImageExtension(_))
    ));

    // Through the control the error is only logged
    viewer.handle(Control::CaptureImage);
    assert!(!path.exists());
}

#[test]
fn record_then_cancel_returns_to_idle() {
    let (mut viewer, log) = viewer(live(&[1, 2]), vec![], vec![None]);

    viewer.handle(Control::ToggleRecording);
    assert_eq!(viewer.record_label(), "Stop Recording");
    assert!(matches!(viewer.recording(), Recording::AwaitingDestination));

    viewer.tick().unwrap();

    assert!(matches!(viewer.recording(), Recording::Idle));
    assert_eq!(viewer.record_label(), "Start Recording");
    assert_eq!(log.borrow().video_prompts, 1);
    assert!(log.borrow().writers.is_empty());

    // Later ticks do not prompt again
    viewer.tick().unwrap();
    assert_eq!(log.borrow().video_prompts, 1);
}

#[test]
fn recording_uses_raw_frames_and_frame_size() {
    let (mut viewer, log) = viewer(
        live(&[1, 2, 3]),
        vec![],
        vec![Some(PathBuf::from("clip"))],
    );

    viewer.handle(Control::SetZoom(3));
    viewer.handle(Control::SetBrightness(-60));
    viewer.handle(Control::ToggleRecording);

    for _ in 0..3 {
        viewer.tick().unwrap();
    }

    let log = log.borrow();
    assert_eq!(log.writers, vec![(PathBuf::from("clip.mp4"), (4, 3))]);
    assert_eq!(log.written, vec![frame(1), frame(2), frame(3)]);
}

#[test]
fn stopping_releases_and_restarting_prompts_again() {
    let (mut viewer, log) = viewer(
        live(&[1, 2, 3, 4]),
        vec![],
        vec![Some(PathBuf::from("a.mp4")), Some(PathBuf::from("b.mp4"))],
    );

    viewer.handle(Control::ToggleRecording);
    viewer.tick().unwrap();
    viewer.tick().unwrap();
    assert_eq!(viewer.recording().active().map(|a| a.frames()), Some(2));

    viewer.handle(Control::ToggleRecording);
    assert!(matches!(viewer.recording(), Recording::Idle));
    assert_eq!(log.borrow().released, 1);

    viewer.tick().unwrap();
    assert_eq!(log.borrow().written.len(), 2);

    viewer.handle(Control::ToggleRecording);
    viewer.tick().unwrap();

    let log = log.borrow();
    assert_eq!(log.video_prompts, 2);
    assert_eq!(
        log.writers.iter().map(|w| w.0.clone()).collect::<Vec<_>>(),
        vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]
    );
    assert_eq!(log.written.last(), Some(&frame(4)));
}

#[test]
fn frozen_recording_repeats_the_frame() {
    let (mut viewer, log) = viewer(
        live(&[7, 8]),
        vec![],
        vec![Some(PathBuf::from("clip.mp4"))],
    );

    viewer.tick().unwrap();
    viewer.handle(Control::ToggleFreeze);
    viewer.handle(Control::ToggleRecording);

    for _ in 0..3 {
        viewer.tick().unwrap();
    }

    assert_eq!(log.borrow().written, vec![frame(7); 3]);
}

#[test]
fn mismatched_frames_are_not_recorded() {
    let (mut viewer, log) = viewer(
        vec![Ok(frame(1)), Ok(sized_frame(2, 8, 6)), Ok(frame(3))],
        vec![],
        vec![Some(PathBuf::from("clip.mp4"))],
    );

    viewer.handle(Control::ToggleRecording);
    for _ in 0..3 {
        viewer.tick().unwrap();
    }

    assert_eq!(log.borrow().written, vec![frame(1), frame(3)]);
    assert!(viewer.recording().is_recording());
}

#[test]
fn close_releases_everything_once() {
    let (mut viewer, log) = viewer(
        live(&[1, 2]),
        vec![],
        vec![Some(PathBuf::from("clip.mp4"))],
    );

    viewer.handle(Control::ToggleRecording);
    viewer.tick().unwrap();

    viewer.handle(Control::Close);
    assert!(viewer.is_closed());
    assert!(viewer.tick().is_none());

    viewer.close();
    drop(viewer);

    let log = log.borrow();
    assert_eq!(log.stops, 1);
    assert_eq!(log.released, 1);
    assert_eq!(log.captures, 1);
}

#[test]
fn dropping_the_viewer_closes_it() {
    let (mut viewer, log) = viewer(live(&[1]), vec![], vec![]);

    viewer.tick().unwrap();
    drop(viewer);

    assert_eq!(log.borrow().stops, 1);
}
