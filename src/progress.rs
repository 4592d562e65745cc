//! Progress reporting.
//!
//! [`ProgressCallback`] lets a caller observe each frame decision as the
//! pipeline makes it, without the library depending on any particular
//! progress UI. The CLI uses this to drive a progress bar; library users
//! can log, count, or ignore events.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesift::{FrameEvent, ProgressCallback, SiftOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_frame(&self, event: &FrameEvent) {
//!         println!("frame {} -> kept: {}", event.absolute_index, event.verdict.is_kept());
//!     }
//! }
//!
//! let options = SiftOptions::new("input.mp4", "frames")
//!     .with_window(13.0, 28.0)
//!     .with_progress(Arc::new(PrintProgress));
//! framesift::sift(&options)?;
//! # Ok::<(), framesift::SiftError>(())
//! ```

use crate::dedup::Verdict;

/// A snapshot of one frame decision.
///
/// Delivered to [`ProgressCallback::on_frame`] after the deduplicator has
/// assessed the frame and, for kept frames, after the image has been
/// written to the output directory.
#[derive(Debug, Clone, Copy)]
pub struct FrameEvent {
    /// 0-based position of the frame within the extracted window.
    pub position: u64,
    /// Absolute index of the frame in the source video.
    pub absolute_index: u64,
    /// The keep/drop decision and its similarity score.
    pub verdict: Verdict,
    /// Total frames the decoder emitted for this window.
    pub frames_emitted: u64,
}

/// Trait for receiving per-frame progress updates.
///
/// Implementations must be [`Send`] and [`Sync`] so callers can share one
/// callback handle with other threads of their own. Callbacks observe but
/// cannot halt the run.
pub trait ProgressCallback: Send + Sync {
    /// Called once per successfully loaded frame, in emission order.
    fn on_frame(&self, event: &FrameEvent);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_frame(&self, _event: &FrameEvent) {}
}
