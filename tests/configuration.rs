//! SiftOptions builder and validation tests.

use framesift::{DEFAULT_SIMILARITY_THRESHOLD, SiftError, SiftOptions};

#[test]
fn defaults_match_the_documented_values() {
    let options = SiftOptions::new("input.mp4", "frames");

    assert_eq!(options.start_seconds, 0.0);
    assert!(options.end_seconds.is_none());
    assert_eq!(options.threshold, DEFAULT_SIMILARITY_THRESHOLD);
    assert_eq!(options.threshold, 0.99);
    assert!(!options.keep_staging);
    assert!(options.staging_dir.starts_with(std::env::temp_dir()));
}

#[test]
fn builders_set_their_fields() {
    let options = SiftOptions::new("input.mp4", "frames")
        .with_window(13.0, 28.0)
        .with_threshold(0.97)
        .with_staging_dir("scratch/stage")
        .with_keep_staging(true);

    assert_eq!(options.start_seconds, 13.0);
    assert_eq!(options.end_seconds, Some(28.0));
    assert_eq!(options.threshold, 0.97);
    assert_eq!(options.staging_dir, std::path::Path::new("scratch/stage"));
    assert!(options.keep_staging);
}

#[test]
fn with_start_leaves_the_end_open() {
    let options = SiftOptions::new("input.mp4", "frames").with_start(5.0);
    assert_eq!(options.start_seconds, 5.0);
    assert!(options.end_seconds.is_none());
}

#[test]
fn debug_output_names_the_interesting_fields() {
    let options = SiftOptions::new("input.mp4", "frames").with_window(1.0, 2.0);
    let debug = format!("{options:?}");
    assert!(debug.contains("SiftOptions"));
    assert!(debug.contains("threshold"));
    assert!(debug.contains("input.mp4"));
}

#[test]
fn valid_options_pass_validation() {
    let options = SiftOptions::new("input.mp4", "frames").with_window(13.0, 28.0);
    assert!(options.validate().is_ok());
}

#[test]
fn empty_window_is_rejected() {
    let options = SiftOptions::new("input.mp4", "frames").with_window(28.0, 13.0);
    let error = options.validate().unwrap_err();
    assert!(matches!(error, SiftError::InvalidOptions(_)));
    assert!(error.to_string().contains("end time"));

    let degenerate = SiftOptions::new("input.mp4", "frames").with_window(13.0, 13.0);
    assert!(degenerate.validate().is_err());
}

#[test]
fn negative_start_is_rejected() {
    let options = SiftOptions::new("input.mp4", "frames").with_start(-1.0);
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("start time"));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    for bad in [-0.1, 1.1, f64::NAN] {
        let options = SiftOptions::new("input.mp4", "frames").with_threshold(bad);
        assert!(
            options.validate().is_err(),
            "threshold {bad} should be rejected",
        );
    }
}

#[test]
fn boundary_thresholds_are_accepted() {
    for ok in [0.0, 0.5, 1.0] {
        let options = SiftOptions::new("input.mp4", "frames").with_threshold(ok);
        assert!(options.validate().is_ok(), "threshold {ok} should be valid");
    }
}

#[test]
fn staging_colliding_with_output_is_rejected() {
    let options = SiftOptions::new("input.mp4", "frames").with_staging_dir("frames");
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("staging"));
}
