//! # Destination prompts
//!
//! Where snapshots and recordings are written is decided by a [`SavePrompt`]. Returning `None`
//! cancels the save.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Input};
use log::warn;

use crate::error::{Error, Result};

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// Asks where to save a file.
pub trait SavePrompt {
    /// Destination of a still image, `None` to cancel.
    fn image_destination(&mut self) -> Option<PathBuf>;

    /// Destination of a video, `None` to cancel.
    fn video_destination(&mut self) -> Option<PathBuf>;
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Reads destinations from the terminal the viewer was started from.
///
/// An empty answer cancels.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

/// Names every file after the current time inside a fixed directory, never blocks.
///
/// Names never repeat: names handed out within the same millisecond, or already on disk, get a
/// counter appended.
#[derive(Debug, Clone)]
pub struct AutoNamePrompt {
    dir: PathBuf,
    stamp: String,
    repeats: u32,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask(&self, title: &str, filter: &str) -> Result<Option<PathBuf>> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("{} [{}]", title, filter))
            .allow_empty(true)
            .interact_text()
            .map_err(Error::PromptError)?;

        let answer = answer.trim();

        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SavePrompt for TerminalPrompt {
    fn image_destination(&mut self) -> Option<PathBuf> {
        self.ask("Save Image", "*.png *.jpg *.jpeg").unwrap_or_else(|e| {
            warn!("{}", e);
            None
        })
    }

    fn video_destination(&mut self) -> Option<PathBuf> {
        self.ask("Save Video", "*.mp4").unwrap_or_else(|e| {
            warn!("{}", e);
            None
        })
    }
}

impl AutoNamePrompt {
    /// Use `dir` for every file, creating it if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&dir).map_err(|e| Error::OutputDirError(dir.clone(), e))?;

        Ok(Self {
            dir,
            stamp: String::new(),
            repeats: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn name(&mut self, prefix: &str, ext: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S-%3f").to_string();

        // Recordings are only created on the next tick, the disk does not hold every issued name
        if stamp == self.stamp {
            self.repeats += 1;
        } else {
            self.stamp = stamp;
            self.repeats = 0;
        }

        loop {
            let path = match self.repeats {
                0 => self.dir.join(format!("{}-{}.{}", prefix, self.stamp, ext)),
                n => self
                    .dir
                    .join(format!("{}-{}-{}.{}", prefix, self.stamp, n, ext)),
            };

            if !path.exists() {
                return path;
            }
            self.repeats += 1;
        }
    }
}

impl SavePrompt for AutoNamePrompt {
    fn image_destination(&mut self) -> Option<PathBuf> {
        Some(self.name("snapshot", "png"))
    }

    fn video_destination(&mut self) -> Option<PathBuf> {
        Some(self.name("recording", "mp4"))
    }
}

// -----------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Give `path` the extension `ext` if it has none.
pub fn with_default_extension(path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(ext)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
