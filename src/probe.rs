//! Video stream probing.
//!
//! [`VideoInfo`] describes the properties of the input video the pipeline
//! needs: frame rate, frame count, dimensions, and duration. It is obtained
//! once per run by invoking `ffprobe` and parsing its key/value output; no
//! decoder state is kept open afterwards.
//!
//! # Example
//!
//! ```no_run
//! use framesift::VideoInfo;
//!
//! let info = VideoInfo::probe("input.mp4")?;
//! println!("{}x{} @ {:.2} fps, {} frames", info.width, info.height,
//!     info.frames_per_second, info.frame_count);
//! # Ok::<(), framesift::SiftError>(())
//! ```

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::error::SiftError;

/// Properties of a video stream.
///
/// Probed from the first video stream of the input file. The frame count
/// is taken from the container when available and otherwise estimated
/// from duration and frame rate, so it may be approximate for
/// variable-frame-rate content.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frames_per_second: f64,
    /// Total number of frames in the stream.
    pub frame_count: u64,
    /// Total duration of the stream.
    pub duration: Duration,
}

impl VideoInfo {
    /// Probe a video file with `ffprobe` and return its stream properties.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InputNotFound`] when `path` is not an existing
    /// file, and [`SiftError::Probe`] when `ffprobe` cannot be spawned,
    /// exits non-zero, or omits a required field.
    pub fn probe(path: impl AsRef<Path>) -> Result<Self, SiftError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SiftError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,r_frame_rate,nb_frames",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=0",
            ])
            .arg(path)
            .output()
            .map_err(|error| SiftError::Probe {
                path: path.to_path_buf(),
                reason: format!("failed to run ffprobe: {error}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SiftError::Probe {
                path: path.to_path_buf(),
                reason: format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_ffprobe_output(&stdout).map_err(|reason| SiftError::Probe {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse the `key=value` lines ffprobe prints with
    /// `-of default=noprint_wrappers=1:nokey=0`.
    fn parse_ffprobe_output(stdout: &str) -> Result<Self, String> {
        let mut width = None;
        let mut height = None;
        let mut frames_per_second = None;
        let mut frame_count = None;
        let mut duration = None;

        for line in stdout.lines() {
            if let Some(value) = line.strip_prefix("width=") {
                width = value.parse::<u32>().ok();
            } else if let Some(value) = line.strip_prefix("height=") {
                height = value.parse::<u32>().ok();
            } else if let Some(value) = line.strip_prefix("r_frame_rate=") {
                frames_per_second = parse_rational(value);
            } else if let Some(value) = line.strip_prefix("nb_frames=") {
                // MKV and other containers report "N/A" here.
                frame_count = value.parse::<u64>().ok();
            } else if let Some(value) = line.strip_prefix("duration=") {
                duration = value.parse::<f64>().ok().filter(|secs| *secs >= 0.0);
            }
        }

        let width = width.ok_or("missing stream width")?;
        let height = height.ok_or("missing stream height")?;
        let frames_per_second = frames_per_second.ok_or("missing or zero frame rate")?;
        let duration_seconds = duration.ok_or("missing format duration")?;

        // Containers that do not store an exact frame count get an
        // estimate from duration and rate, like any metadata listing does.
        let frame_count = frame_count
            .unwrap_or_else(|| (duration_seconds * frames_per_second).round() as u64);

        log::debug!(
            "Probed video: {width}x{height}, {frames_per_second:.3} fps, {frame_count} frames, {duration_seconds:.3}s"
        );

        Ok(Self {
            width,
            height,
            frames_per_second,
            frame_count,
            duration: Duration::from_secs_f64(duration_seconds),
        })
    }
}

/// Parse ffprobe's rational frame rate (`30000/1001`) into frames per
/// second. Returns `None` for malformed or zero rates.
fn parse_rational(value: &str) -> Option<f64> {
    let (numerator, denominator) = match value.split_once('/') {
        Some((n, d)) => (n.parse::<f64>().ok()?, d.parse::<f64>().ok()?),
        None => (value.parse::<f64>().ok()?, 1.0),
    };
    if denominator == 0.0 || numerator <= 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_and_rational_rates() {
        assert_eq!(parse_rational("60/1"), Some(60.0));
        assert_eq!(parse_rational("25"), Some(25.0));
        let ntsc = parse_rational("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_rational("0/0"), None);
        assert_eq!(parse_rational("x/1"), None);
    }

    #[test]
    fn parses_full_ffprobe_output() {
        let stdout = "width=1920\nheight=1080\nr_frame_rate=30/1\nnb_frames=900\nduration=30.000000\n";
        let info = VideoInfo::parse_ffprobe_output(stdout).unwrap();
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.frame_count, 900);
        assert_eq!(info.frames_per_second, 30.0);
    }

    #[test]
    fn estimates_frame_count_when_not_stored() {
        let stdout = "width=1280\nheight=720\nr_frame_rate=24/1\nnb_frames=N/A\nduration=10.0\n";
        let info = VideoInfo::parse_ffprobe_output(stdout).unwrap();
        assert_eq!(info.frame_count, 240);
    }

    #[test]
    fn missing_field_is_an_error() {
        let stdout = "width=1280\nheight=720\nduration=10.0\n";
        assert!(VideoInfo::parse_ffprobe_output(stdout).is_err());
    }
}
