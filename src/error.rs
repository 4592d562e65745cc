//! Error types for the `framesift` crate.
//!
//! This module defines [`SiftError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem without additional logging at the call site: file paths,
//! subprocess exit details, and upstream error messages.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesift` operations.
///
/// Every public method that can fail returns `Result<T, SiftError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SiftError {
    /// The input video file does not exist or is not a regular file.
    #[error("Input video not found at {path}")]
    InputNotFound {
        /// Path that was passed in the options.
        path: PathBuf,
    },

    /// The options describe an impossible run (empty window, threshold out
    /// of range, output colliding with staging).
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// `ffprobe` could not be executed or produced unusable output.
    #[error("Failed to probe {path}: {reason}")]
    Probe {
        /// The file being probed.
        path: PathBuf,
        /// What went wrong (spawn failure, non-zero exit, missing field).
        reason: String,
    },

    /// The decoder subprocess failed: missing binary, crash, or non-zero
    /// exit status. Fatal: the run aborts.
    #[error("Frame decoding failed: {0}")]
    Decode(String),

    /// The decoder ran successfully but emitted no frames for the window.
    #[error("Decoder produced no frames for the requested window")]
    EmptyWindow,

    /// An I/O error occurred while managing directories or writing frames.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding a kept frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}
