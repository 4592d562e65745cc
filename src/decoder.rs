//! Frame decoding sources.
//!
//! The pipeline consumes frames through the [`FrameSource`] trait, which
//! has a single operation: rasterise an extraction window into an ordered
//! list of frame handles. The production implementation,
//! [`FfmpegDecoder`], shells out to the `ffmpeg` binary and stages the
//! window as sequentially numbered PNG files; [`MemorySource`] serves
//! synthetic in-memory frames for tests and examples, with no decoder
//! involved.
//!
//! Loading a frame is deliberately fallible without being fatal: a handle
//! whose image is unreadable yields `None`, the pipeline logs and skips
//! it, and processing continues with the next frame.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;

use crate::error::SiftError;
use crate::segment::Segment;
use crate::utilities::{clear_dir, remove_dir_if_exists};

/// A handle to one decoded frame, ordered by its position in the window.
#[derive(Debug, Clone)]
pub struct SourcedFrame {
    position: u64,
    origin: FrameOrigin,
}

#[derive(Debug, Clone)]
enum FrameOrigin {
    /// A staged image file on disk, read lazily.
    Disk(PathBuf),
    /// An in-memory frame (test double). `None` models a corrupt frame.
    Memory(Option<DynamicImage>),
}

impl SourcedFrame {
    /// Handle backed by an image file on disk.
    pub fn from_path(position: u64, path: impl AsRef<Path>) -> Self {
        Self {
            position,
            origin: FrameOrigin::Disk(path.as_ref().to_path_buf()),
        }
    }

    /// Handle backed by an in-memory image.
    pub fn from_image(position: u64, image: DynamicImage) -> Self {
        Self {
            position,
            origin: FrameOrigin::Memory(Some(image)),
        }
    }

    /// Handle that always fails to load, modelling a corrupt frame.
    pub fn corrupt(position: u64) -> Self {
        Self {
            position,
            origin: FrameOrigin::Memory(None),
        }
    }

    /// 0-based position of the frame within the extracted window.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Load the frame's pixels.
    ///
    /// Returns `None` when the backing image is missing or corrupt. The
    /// failure is logged here; callers just skip the frame.
    pub fn load(&self) -> Option<DynamicImage> {
        match &self.origin {
            FrameOrigin::Disk(path) => match image::open(path) {
                Ok(image) => Some(image),
                Err(error) => {
                    log::warn!(
                        "Skipping unreadable frame at position {}: {} ({error})",
                        self.position,
                        path.display()
                    );
                    None
                }
            },
            FrameOrigin::Memory(image) => image.clone(),
        }
    }
}

/// A producer of ordered raster frames for an extraction window.
///
/// Implementations rasterise the window eagerly (one bounded decode
/// step) and hand back lazily loadable frame handles in emission order,
/// with positions normalised to 0-based.
pub trait FrameSource {
    /// Rasterise the window and return its frames in emission order.
    ///
    /// # Errors
    ///
    /// Fails when the underlying decoder cannot run or exits unsuccessfully.
    /// An individually unreadable frame is *not* an error here; it
    /// surfaces later as a `None` from [`SourcedFrame::load`].
    fn extract(&mut self, segment: &Segment) -> Result<Vec<SourcedFrame>, SiftError>;

    /// Release any intermediate state the extraction created.
    ///
    /// Called once after a successful run. The default does nothing.
    fn cleanup(&mut self) -> Result<(), SiftError> {
        Ok(())
    }
}

/// Production frame source: a single bounded `ffmpeg` subprocess.
///
/// The window is rasterised into `<staging>/%d.png` (1-based, re-sampled
/// at the native frame rate with `-frame_pts 1` so ordinals line up with
/// emitted frames), after which the staged files are collected, sorted by
/// ordinal, and handed back as 0-based positions. The staging directory
/// is cleared before the decode and removed again by
/// [`cleanup`](FrameSource::cleanup).
#[derive(Debug)]
pub struct FfmpegDecoder {
    input: PathBuf,
    staging_dir: PathBuf,
}

impl FfmpegDecoder {
    /// Create a decoder for `input` staging into `staging_dir`.
    pub fn new(input: impl AsRef<Path>, staging_dir: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            staging_dir: staging_dir.as_ref().to_path_buf(),
        }
    }

    /// The staging directory this decoder writes into.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }
}

impl FrameSource for FfmpegDecoder {
    fn extract(&mut self, segment: &Segment) -> Result<Vec<SourcedFrame>, SiftError> {
        clear_dir(&self.staging_dir)?;

        let filter = format!("fps={}", segment.frames_per_second);
        let mut command = Command::new("ffmpeg");
        command
            .arg("-y")
            .arg("-ss")
            .arg(segment.start_seconds.to_string())
            .arg("-t")
            .arg(segment.duration_seconds().to_string())
            .arg("-i")
            .arg(&self.input)
            .arg("-vf")
            .arg(&filter)
            .arg("-frame_pts")
            .arg("1")
            .arg("-q:v")
            .arg("2")
            .arg(self.staging_dir.join("%d.png"));

        log::debug!("Running decoder: {command:?}");
        let output = command
            .output()
            .map_err(|error| SiftError::Decode(format!("failed to run ffmpeg: {error}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr.lines().rev().take(4).collect::<Vec<_>>();
            return Err(SiftError::Decode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
            )));
        }

        let mut staged: Vec<(u64, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.staging_dir)? {
            let path = entry?.path();
            let Some(ordinal) = png_ordinal(&path) else {
                continue;
            };
            staged.push((ordinal, path));
        }
        if staged.is_empty() {
            return Err(SiftError::EmptyWindow);
        }
        staged.sort_by_key(|(ordinal, _)| *ordinal);

        // The image2 muxer numbers from 1; positions are 0-based. Using
        // the first emitted ordinal as the base also tolerates a 0-based
        // numbering scheme.
        let base = staged[0].0;
        Ok(staged
            .into_iter()
            .map(|(ordinal, path)| SourcedFrame::from_path(ordinal - base, path))
            .collect())
    }

    fn cleanup(&mut self) -> Result<(), SiftError> {
        remove_dir_if_exists(&self.staging_dir)?;
        Ok(())
    }
}

/// Parse the numeric ordinal out of a staged `<n>.png` file name.
fn png_ordinal(path: &Path) -> Option<u64> {
    if !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
    {
        return None;
    }
    path.file_stem()?.to_str()?.parse::<u64>().ok()
}

/// In-memory frame source for tests and examples.
///
/// Serves a fixed frame list regardless of the requested window, so a
/// test can exercise the pipeline with synthetic content and no `ffmpeg`
/// on the machine. Slots created with [`MemorySource::push_corrupt`]
/// model frames that fail to load.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: Vec<SourcedFrame>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source serving `frames` in order.
    pub fn from_frames(frames: impl IntoIterator<Item = DynamicImage>) -> Self {
        let mut source = Self::new();
        for frame in frames {
            source.push(frame);
        }
        source
    }

    /// Append a loadable frame.
    pub fn push(&mut self, image: DynamicImage) {
        let position = self.frames.len() as u64;
        self.frames.push(SourcedFrame::from_image(position, image));
    }

    /// Append a frame slot that fails to load.
    pub fn push_corrupt(&mut self) {
        let position = self.frames.len() as u64;
        self.frames.push(SourcedFrame::corrupt(position));
    }
}

impl FrameSource for MemorySource {
    fn extract(&mut self, _segment: &Segment) -> Result<Vec<SourcedFrame>, SiftError> {
        if self.frames.is_empty() {
            return Err(SiftError::EmptyWindow);
        }
        Ok(self.frames.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_parsing_accepts_numbered_pngs_only() {
        assert_eq!(png_ordinal(Path::new("/stage/17.png")), Some(17));
        assert_eq!(png_ordinal(Path::new("/stage/17.PNG")), Some(17));
        assert_eq!(png_ordinal(Path::new("/stage/frame.png")), None);
        assert_eq!(png_ordinal(Path::new("/stage/17.jpg")), None);
    }

    #[test]
    fn corrupt_memory_frame_loads_as_none() {
        let frame = SourcedFrame::corrupt(3);
        assert_eq!(frame.position(), 3);
        assert!(frame.load().is_none());
    }
}
