//! # framesift
//!
//! Extract a time window of video frames and drop visually near-duplicate
//! neighbours.
//!
//! `framesift` rasterises a time-bounded window of a video (via the
//! `ffmpeg` command-line tool), scores each frame's structural similarity
//! (SSIM) against the last frame it kept, and writes the survivors to an
//! output directory named by their absolute frame index in the source
//! video. The result is a curated frame set without runs of near-identical
//! images, suitable for dataset creation or visual inspection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framesift::SiftOptions;
//!
//! let options = SiftOptions::new("input.mp4", "frames")
//!     .with_window(13.0, 28.0)
//!     .with_threshold(0.99);
//!
//! let summary = framesift::sift(&options)?;
//! println!(
//!     "kept {} of {} frames in {}",
//!     summary.frames_kept,
//!     summary.frames_emitted,
//!     summary.output_dir.display()
//! );
//! # Ok::<(), framesift::SiftError>(())
//! ```
//!
//! ## How frames are selected
//!
//! Frames are processed strictly in emission order. The first frame is
//! always kept. Every later frame is scored against the single most
//! recently *kept* frame; a score at or above the threshold (default
//! `0.99`) drops it, anything else keeps it and makes it the new
//! comparison baseline. Kept frames are written as
//! `<absolute_index>.png`, where `absolute_index` is
//! `floor(start_time * fps) + position`, the frame's true position in
//! the source video, so filenames survive re-runs with different windows.
//!
//! ## Requirements
//!
//! The `ffmpeg` and `ffprobe` binaries must be on the `PATH`. Decoding is
//! a single bounded subprocess invocation per run; no FFmpeg libraries
//! are linked.
//!
//! ## Testing without a decoder
//!
//! The pipeline is generic over a [`FrameSource`]. Supply a
//! [`MemorySource`] of synthetic frames to
//! [`sift_with_source`] and the whole keep/drop pipeline runs without
//! `ffmpeg` or any video file.

pub mod decoder;
pub mod dedup;
pub mod error;
pub mod options;
pub mod probe;
pub mod progress;
pub mod segment;
pub mod sift;
pub mod similarity;
mod utilities;

pub use decoder::{FfmpegDecoder, FrameSource, MemorySource, SourcedFrame};
pub use dedup::{Deduplicator, Verdict};
pub use error::SiftError;
pub use options::{DEFAULT_SIMILARITY_THRESHOLD, SiftOptions};
pub use probe::VideoInfo;
pub use progress::{FrameEvent, ProgressCallback};
pub use segment::Segment;
pub use sift::{SiftSummary, sift, sift_with_source};
