//! Segment arithmetic.
//!
//! A [`Segment`] is the contiguous time window of the source video being
//! processed. It owns the two pieces of arithmetic the pipeline depends
//! on: clamping the requested window to the real extent of the video, and
//! mapping a frame's position within the window back to its absolute
//! index in the source frame sequence.

use crate::probe::VideoInfo;

/// A resolved extraction window.
///
/// Built from the requested start/end times and the probed [`VideoInfo`].
/// The end time is clamped so the window never reaches past the last
/// frame of the source.
#[derive(Debug, Clone)]
#[must_use]
pub struct Segment {
    /// Window start in seconds.
    pub start_seconds: f64,
    /// Window end in seconds, after clamping.
    pub end_seconds: f64,
    /// Native frame rate the window is sampled at.
    pub frames_per_second: f64,
    /// Absolute index of the first frame in the window.
    pub start_frame: u64,
    /// Absolute index of the last frame in the window (inclusive).
    pub end_frame: u64,
}

impl Segment {
    /// Resolve a requested window against the probed video properties.
    ///
    /// `end_seconds` of `None` means "to the end of the video". Both the
    /// end time and the end frame are clamped to the last frame of the
    /// source, so a window reaching past the video is not an error.
    pub fn resolve(start_seconds: f64, end_seconds: Option<f64>, info: &VideoInfo) -> Self {
        let fps = info.frames_per_second;
        let duration = info.duration.as_secs_f64();
        let end_seconds = end_seconds.unwrap_or(duration).min(duration);

        let last_frame = info.frame_count.saturating_sub(1);
        let start_frame = ((start_seconds * fps) as u64).min(last_frame);
        let end_frame = ((end_seconds * fps) as u64).min(last_frame);

        Self {
            start_seconds,
            end_seconds,
            frames_per_second: fps,
            start_frame,
            end_frame,
        }
    }

    /// Length of the window in seconds.
    pub fn duration_seconds(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }

    /// Map a 0-based position within the window to the frame's absolute
    /// index in the source video.
    ///
    /// Dropped frames still consume a position, so indices of kept frames
    /// are strictly increasing and never collide.
    pub fn absolute_index(&self, position: u64) -> u64 {
        self.start_frame + position
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn info(fps: f64, frame_count: u64, duration_seconds: f64) -> VideoInfo {
        VideoInfo {
            width: 640,
            height: 480,
            frames_per_second: fps,
            frame_count,
            duration: Duration::from_secs_f64(duration_seconds),
        }
    }

    #[test]
    fn start_frame_floors_start_time() {
        let segment = Segment::resolve(13.0, Some(28.0), &info(29.97, 3000, 100.0));
        assert_eq!(segment.start_frame, (13.0 * 29.97) as u64);
    }

    #[test]
    fn absolute_index_adds_position() {
        let segment = Segment::resolve(13.0, Some(28.0), &info(30.0, 3000, 100.0));
        assert_eq!(segment.absolute_index(0), 390);
        assert_eq!(segment.absolute_index(7), 397);
    }

    #[test]
    fn end_clamped_to_video_duration() {
        let segment = Segment::resolve(5.0, Some(500.0), &info(30.0, 300, 10.0));
        assert_eq!(segment.end_seconds, 10.0);
        assert_eq!(segment.end_frame, 299);
    }

    #[test]
    fn open_end_runs_to_last_frame() {
        let segment = Segment::resolve(0.0, None, &info(30.0, 300, 10.0));
        assert_eq!(segment.end_seconds, 10.0);
        assert_eq!(segment.end_frame, 299);
        assert_eq!(segment.duration_seconds(), 10.0);
    }
}
