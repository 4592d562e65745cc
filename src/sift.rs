//! Pipeline orchestration.
//!
//! Ties the pieces together: probe the input, resolve the window, decode
//! it, run every emitted frame through the deduplicator in order, write
//! the survivors named by absolute frame index, and report the counts.
//!
//! Processing is strictly sequential. The deduplicator's decision for a
//! frame depends on state updated by the previous decision, so there is
//! exactly one frame in flight at any time, and the decode step finishes
//! before the first comparison starts.

use std::path::PathBuf;

use crate::decoder::{FfmpegDecoder, FrameSource};
use crate::dedup::{Deduplicator, Verdict};
use crate::error::SiftError;
use crate::options::SiftOptions;
use crate::probe::VideoInfo;
use crate::progress::FrameEvent;
use crate::segment::Segment;
use crate::utilities::clear_dir;

/// Counts and context from a completed sift run.
#[derive(Debug, Clone)]
#[must_use]
pub struct SiftSummary {
    /// Native frame rate of the source video.
    pub frames_per_second: f64,
    /// Total frame count of the source video.
    pub source_frame_count: u64,
    /// Absolute index of the first frame in the window.
    pub start_frame: u64,
    /// Absolute index of the last frame in the window (inclusive).
    pub end_frame: u64,
    /// Frames the decoder emitted for the window.
    pub frames_emitted: u64,
    /// Frames written to the output directory.
    pub frames_kept: u64,
    /// Frames dropped as near-duplicates.
    pub frames_dropped: u64,
    /// Frames skipped because their image could not be read.
    pub frames_skipped: u64,
    /// Where the kept frames were written.
    pub output_dir: PathBuf,
}

/// Run the full pipeline against the configured input video.
///
/// Probes the input with `ffprobe`, decodes the window with `ffmpeg`
/// through a staging directory, deduplicates, and writes kept frames as
/// `<absolute_index>.png` under the output directory.
///
/// # Errors
///
/// Fails on invalid options, a missing input, probe or decoder failure,
/// or I/O problems in the output directory. Individual unreadable frames
/// are skipped, not errors.
///
/// # Example
///
/// ```no_run
/// use framesift::SiftOptions;
///
/// let options = SiftOptions::new("input.mp4", "frames").with_window(13.0, 28.0);
/// let summary = framesift::sift(&options)?;
/// println!(
///     "kept {} / dropped {} of {} frames",
///     summary.frames_kept, summary.frames_dropped, summary.frames_emitted
/// );
/// # Ok::<(), framesift::SiftError>(())
/// ```
pub fn sift(options: &SiftOptions) -> Result<SiftSummary, SiftError> {
    let info = VideoInfo::probe(&options.input)?;
    let mut decoder = FfmpegDecoder::new(&options.input, &options.staging_dir);
    sift_with_source(options, &mut decoder, &info)
}

/// Run the pipeline against an arbitrary [`FrameSource`].
///
/// This is the seam tests and embedders use: supply pre-probed
/// [`VideoInfo`] and any source of ordered frames (for example
/// [`MemorySource`](crate::MemorySource)) and no subprocess is spawned.
///
/// # Errors
///
/// As [`sift`], minus the probe step.
pub fn sift_with_source(
    options: &SiftOptions,
    source: &mut dyn FrameSource,
    info: &VideoInfo,
) -> Result<SiftSummary, SiftError> {
    options.validate()?;

    let segment = Segment::resolve(options.start_seconds, options.end_seconds, info);
    log::debug!(
        "Sifting frames {}..={} ({:.3}s..{:.3}s at {:.3} fps)",
        segment.start_frame,
        segment.end_frame,
        segment.start_seconds,
        segment.end_seconds,
        segment.frames_per_second,
    );

    clear_dir(&options.output_dir)?;

    let frames = source.extract(&segment)?;
    let frames_emitted = frames.len() as u64;

    let mut deduplicator = Deduplicator::new(options.threshold);
    let mut frames_kept = 0u64;
    let mut frames_dropped = 0u64;
    let mut frames_skipped = 0u64;

    for frame in &frames {
        let Some(image) = frame.load() else {
            frames_skipped += 1;
            continue;
        };

        let luminance = image.to_luma8();
        let verdict = deduplicator.assess(&luminance);
        let absolute_index = segment.absolute_index(frame.position());

        match verdict {
            Verdict::Kept { .. } => {
                let path = options.output_dir.join(format!("{absolute_index}.png"));
                image.save(&path)?;
                frames_kept += 1;
            }
            Verdict::Dropped { score } => {
                log::debug!("Dropped frame {absolute_index} (similarity {score:.4})");
                frames_dropped += 1;
            }
        }

        options.progress.on_frame(&FrameEvent {
            position: frame.position(),
            absolute_index,
            verdict,
            frames_emitted,
        });
    }

    if options.keep_staging {
        log::debug!("Keeping staging directory as requested");
    } else {
        source.cleanup()?;
    }

    log::info!(
        "Sift complete: kept {frames_kept}, dropped {frames_dropped}, skipped {frames_skipped} of {frames_emitted} frames"
    );

    Ok(SiftSummary {
        frames_per_second: info.frames_per_second,
        source_frame_count: info.frame_count,
        start_frame: segment.start_frame,
        end_frame: segment.end_frame,
        frames_emitted,
        frames_kept,
        frames_dropped,
        frames_skipped,
        output_dir: options.output_dir.clone(),
    })
}
