//! # Live Camera Test
//!
//! Designed to test the viewer against a real camera, run with `cargo test -- --ignored`.

use std::time::Duration;

use endoscope_viewer::prelude::*;
use endoscope_viewer::window;
use image::GenericImageView;

// -----------------------------------------------------------------------------------------------
// MAIN
// -----------------------------------------------------------------------------------------------

#[test]
#[ignore = "needs a camera at /dev/video0 and a display"]
fn live() -> Result<(), Box<dyn std::error::Error>> {
    let camstream = CamStreamBuilder::new()
        .path("/dev/video0")?
        .resolution((640, 480))
        .fps(30)
        .format(b"MJPG")?
        .build()?;

    let dir = tempfile::tempdir()?;

    let mut viewer = CameraViewer::new(
        camstream,
        AutoNamePrompt::new(dir.path())?,
        DefaultBackend::default(),
        VideoParams::default(),
    );

    // Close the window or press Escape to finish
    window::run(&mut viewer, Duration::from_millis(30))?;

    Ok(())
}

#[test]
#[ignore = "needs a camera at /dev/video0"]
fn snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let camstream = CamStreamBuilder::new().path("/dev/video0")?.build()?;
    let dir = tempfile::tempdir()?;

    let mut viewer = CameraViewer::new(
        camstream,
        AutoNamePrompt::new(dir.path())?,
        DefaultBackend::default(),
        VideoParams::default(),
    );

    let mut shown = None;
    for _ in 0..10 {
        shown = shown.or_else(|| viewer.tick());
    }
    let shown = shown.ok_or("The camera delivered no frames")?;

    let path = viewer.capture_image()?.ok_or("No snapshot was written")?;
    let saved = image::open(&path)?;

    assert_eq!((saved.width(), saved.height()), shown.size());

    Ok(())
}
