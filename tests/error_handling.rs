//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for the failure
//! conditions a run can hit before and during processing.

use std::time::Duration;

use framesift::{MemorySource, SiftError, SiftOptions, VideoInfo, sift, sift_with_source};

fn info() -> VideoInfo {
    VideoInfo {
        width: 64,
        height: 48,
        frames_per_second: 30.0,
        frame_count: 300,
        duration: Duration::from_secs_f64(10.0),
    }
}

#[test]
fn probing_a_missing_file_fails() {
    let result = VideoInfo::probe("this_file_does_not_exist.mp4");
    assert!(result.is_err());

    let error = result.unwrap_err();
    assert!(matches!(error, SiftError::InputNotFound { .. }));
    assert!(
        error.to_string().contains("not found"),
        "Error message should mention the missing input: {error}",
    );
}

#[test]
fn sifting_a_missing_file_fails_before_any_decode() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SiftOptions::new(
        scratch.path().join("nope.mp4"),
        scratch.path().join("frames"),
    );

    let result = sift(&options);
    assert!(matches!(result, Err(SiftError::InputNotFound { .. })));
    // Nothing was created on the way to the failure.
    assert!(!options.output_dir.exists());
}

#[test]
fn invalid_options_fail_before_touching_the_filesystem() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SiftOptions::new("unused.mp4", scratch.path().join("frames"))
        .with_staging_dir(scratch.path().join("stage"))
        .with_window(10.0, 5.0);

    let mut source = MemorySource::new();
    let result = sift_with_source(&options, &mut source, &info());

    assert!(matches!(result, Err(SiftError::InvalidOptions(_))));
    assert!(!options.output_dir.exists());
}

#[test]
fn a_source_with_no_frames_is_an_error() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SiftOptions::new("unused.mp4", scratch.path().join("frames"))
        .with_staging_dir(scratch.path().join("stage"))
        .with_window(0.0, 1.0);

    let mut source = MemorySource::new();
    let result = sift_with_source(&options, &mut source, &info());

    assert!(matches!(result, Err(SiftError::EmptyWindow)));
    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("no frames"),
        "Error message should mention the empty window: {message}",
    );
}

#[test]
fn error_messages_carry_context() {
    let error = SiftError::Probe {
        path: "clip.mkv".into(),
        reason: "ffprobe exited with 1".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("clip.mkv"));
    assert!(message.contains("ffprobe"));

    let decode = SiftError::Decode("ffmpeg exited with exit status: 1".to_string());
    assert!(decode.to_string().contains("ffmpeg"));
}
