//! Frame acquisition seam.

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::info;

/// Faults raised while acquiring a frame. Any of these ends the control
/// loop gracefully; the session never retries a failing source.
#[derive(Debug, thiserror::Error)]
pub enum FrameSourceError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode: {0}")]
    Decode(#[from] image::ImageError),
}

/// Supplies successive color frames. `Ok(None)` means the source is
/// exhausted; `Err` is a capture fault.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameSourceError>;
}

/// Reads frames from image files in filename order.
///
/// Stands in for a live camera: the capture-device integration point is
/// the [`FrameSource`] trait, not this type.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    const EXTENSIONS: [&'static str; 4] = ["png", "jpg", "jpeg", "bmp"];

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FrameSourceError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| Self::EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        info!("{} frames found in {}", paths.len(), dir.as_ref().display());
        Ok(Self { paths, next: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameSourceError> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let img = image::open(path)?;
        Ok(Some(img.to_rgb8()))
    }
}
