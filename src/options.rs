//! Run configuration.
//!
//! [`SiftOptions`] collects everything a sift run needs: the input video,
//! the output directory, the time window, and the similarity threshold.
//! All tuning fields have documented defaults matching the reference
//! behaviour of the tool.
//!
//! # Example
//!
//! ```no_run
//! use framesift::SiftOptions;
//!
//! let options = SiftOptions::new("input.mp4", "frames")
//!     .with_window(13.0, 28.0)
//!     .with_threshold(0.99);
//! let summary = framesift::sift(&options)?;
//! println!("kept {} of {} frames", summary.frames_kept, summary.frames_emitted);
//! # Ok::<(), framesift::SiftError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SiftError;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Default similarity threshold.
///
/// A candidate frame scoring at or above this value against the last kept
/// frame is dropped as a near-duplicate.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.99;

/// Options for a sift run.
///
/// Construct with [`SiftOptions::new`] and refine with the `with_*`
/// builder methods. Validation happens in [`crate::sift`] before any
/// side effect, so a misconfigured run never touches the filesystem.
#[derive(Clone)]
#[must_use]
pub struct SiftOptions {
    /// Path to the input video file.
    pub input: PathBuf,
    /// Directory kept frames are written to. Cleared and recreated at the
    /// start of each run.
    pub output_dir: PathBuf,
    /// Start of the extraction window, in seconds from the start of the
    /// video. Defaults to `0.0`.
    pub start_seconds: f64,
    /// End of the extraction window, in seconds. Clamped to the video
    /// duration at run time. `None` means "to the end of the video".
    pub end_seconds: Option<f64>,
    /// Similarity threshold in `[0, 1]`. Scores `>=` this value drop the
    /// candidate. Defaults to [`DEFAULT_SIMILARITY_THRESHOLD`].
    pub threshold: f64,
    /// Staging directory the decoder writes intermediate frames into.
    /// Defaults to `framesift_stage` under the system temp directory.
    /// Cleared before use.
    pub staging_dir: PathBuf,
    /// When `true` the staging directory is left in place after a
    /// successful run instead of being removed. Defaults to `false`.
    pub keep_staging: bool,
    /// Per-frame progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for SiftOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SiftOptions")
            .field("input", &self.input)
            .field("output_dir", &self.output_dir)
            .field("start_seconds", &self.start_seconds)
            .field("end_seconds", &self.end_seconds)
            .field("threshold", &self.threshold)
            .field("staging_dir", &self.staging_dir)
            .field("keep_staging", &self.keep_staging)
            .finish()
    }
}

impl SiftOptions {
    /// Create options for extracting from `input` into `output_dir` with
    /// default window (whole video) and threshold.
    pub fn new(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            start_seconds: 0.0,
            end_seconds: None,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            staging_dir: std::env::temp_dir().join("framesift_stage"),
            keep_staging: false,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the extraction window in seconds.
    pub fn with_window(mut self, start_seconds: f64, end_seconds: f64) -> Self {
        self.start_seconds = start_seconds;
        self.end_seconds = Some(end_seconds);
        self
    }

    /// Set only the window start, extracting to the end of the video.
    pub fn with_start(mut self, start_seconds: f64) -> Self {
        self.start_seconds = start_seconds;
        self
    }

    /// Set the similarity threshold.
    ///
    /// `1.0` keeps everything except byte-identical neighbours; `0.0`
    /// keeps only the first frame (any score satisfies `>= 0.0`).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Use a custom staging directory for decoded intermediate frames.
    pub fn with_staging_dir(mut self, staging_dir: impl AsRef<Path>) -> Self {
        self.staging_dir = staging_dir.as_ref().to_path_buf();
        self
    }

    /// Keep the staging directory after a successful run.
    pub fn with_keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    /// Attach a per-frame progress callback.
    ///
    /// The callback fires once per successfully loaded frame, after the
    /// keep/drop decision has been made.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Check the options for internal consistency.
    ///
    /// Existence of the input file is not checked here; probing the video
    /// reports that with full context.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidOptions`] when the window is empty or
    /// negative, the threshold falls outside `[0, 1]`, or the staging and
    /// output directories collide.
    pub fn validate(&self) -> Result<(), SiftError> {
        if self.start_seconds < 0.0 || !self.start_seconds.is_finite() {
            return Err(SiftError::InvalidOptions(format!(
                "start time must be a non-negative number of seconds, got {}",
                self.start_seconds
            )));
        }
        if let Some(end) = self.end_seconds
            && (!end.is_finite() || end <= self.start_seconds)
        {
            return Err(SiftError::InvalidOptions(format!(
                "end time ({end}) must be greater than start time ({})",
                self.start_seconds
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SiftError::InvalidOptions(format!(
                "similarity threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.staging_dir == self.output_dir {
            return Err(SiftError::InvalidOptions(
                "staging directory must differ from the output directory".to_string(),
            ));
        }
        Ok(())
    }
}
