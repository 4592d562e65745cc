//! Sequential near-duplicate elimination.
//!
//! [`Deduplicator`] consumes frames in emission order and decides, for each
//! one, whether it survives. The comparison baseline is always the single
//! most recently *kept* frame: a candidate scoring at or above the
//! threshold against that baseline is dropped and the baseline stays put;
//! anything else is kept and becomes the new baseline.
//!
//! Only the immediately preceding kept frame is consulted. A slow drift
//! where every consecutive pair stays just under the threshold is
//! therefore never collapsed, even if distant frames resemble each other.
//! That single-baseline policy is deliberate.
//!
//! # Example
//!
//! ```
//! use framesift::Deduplicator;
//! use image::GrayImage;
//!
//! let mut dedup = Deduplicator::new(0.99);
//! let frame = GrayImage::from_pixel(16, 16, image::Luma([200]));
//!
//! assert!(dedup.assess(&frame).is_kept());     // first frame: always kept
//! assert!(!dedup.assess(&frame).is_kept());    // identical repeat: dropped
//! ```

use image::GrayImage;

use crate::similarity;

/// The outcome of assessing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// The frame survives and is now the comparison baseline.
    ///
    /// `score` is the similarity against the previous baseline, or `None`
    /// for the first frame of the run.
    Kept {
        /// Similarity against the previously kept frame.
        score: Option<f64>,
    },
    /// The frame is a near-duplicate of the last kept frame.
    Dropped {
        /// Similarity against the kept baseline; always `>=` the threshold.
        score: f64,
    },
}

impl Verdict {
    /// Whether the assessed frame should be written out.
    pub fn is_kept(&self) -> bool {
        matches!(self, Verdict::Kept { .. })
    }

    /// The similarity score behind the decision, when one was computed.
    pub fn score(&self) -> Option<f64> {
        match self {
            Verdict::Kept { score } => *score,
            Verdict::Dropped { score } => Some(*score),
        }
    }
}

/// Keep/drop state machine over an ordered frame sequence.
///
/// Holds at most one frame at a time (the last kept luminance image).
/// Frames that fail to load must not reach [`assess`](Self::assess); the
/// pipeline skips them so the baseline stays unchanged.
#[derive(Debug)]
pub struct Deduplicator {
    threshold: f64,
    last_kept: Option<GrayImage>,
}

impl Deduplicator {
    /// Create a deduplicator with the given similarity threshold.
    ///
    /// Scores `>= threshold` drop the candidate. A threshold of `0.0`
    /// therefore keeps only the first frame, and `1.0` drops only frames
    /// that are structurally identical to the baseline.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_kept: None,
        }
    }

    /// Decide whether `frame` survives, updating the baseline on keep.
    ///
    /// The first frame ever assessed is kept unconditionally. Afterwards
    /// the candidate is scored against the last kept frame; a score at or
    /// above the threshold drops it without touching the baseline.
    pub fn assess(&mut self, frame: &GrayImage) -> Verdict {
        let Some(baseline) = &self.last_kept else {
            self.last_kept = Some(frame.clone());
            return Verdict::Kept { score: None };
        };

        let score = similarity::score(frame, baseline);
        if score >= self.threshold {
            Verdict::Dropped { score }
        } else {
            self.last_kept = Some(frame.clone());
            Verdict::Kept { score: Some(score) }
        }
    }

    /// The configured similarity threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether any frame has been kept yet.
    pub fn has_baseline(&self) -> bool {
        self.last_kept.is_some()
    }
}
