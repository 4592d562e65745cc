//! Similarity scorer tests.
//!
//! All frames are synthetic; no video files or external tools involved.

use image::{GrayImage, Luma};

use framesift::similarity::score;

/// Diagonal gradient test pattern with a per-frame value offset.
fn gradient(width: u32, height: u32, offset: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([((x * 3 + y * 5 + offset) % 256) as u8])
    })
}

fn checkerboard(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if (x + y) % 2 == 0 { 255 } else { 0 }])
    })
}

fn inverted(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        Luma([255 - image.get_pixel(x, y)[0]])
    })
}

#[test]
fn identical_frames_score_one() {
    let frame = gradient(64, 48, 0);
    let similarity = score(&frame, &frame);
    assert!(
        (similarity - 1.0).abs() < 1e-9,
        "Identical frames should score 1.0, got {similarity}",
    );
}

#[test]
fn identical_uniform_frames_score_one() {
    let frame = GrayImage::from_pixel(32, 32, Luma([128]));
    let similarity = score(&frame, &frame);
    assert!((similarity - 1.0).abs() < 1e-9);
}

#[test]
fn mismatched_dimensions_score_zero() {
    let a = gradient(64, 48, 0);
    let b = gradient(48, 64, 0);
    assert_eq!(score(&a, &b), 0.0);

    let c = gradient(64, 47, 0);
    assert_eq!(score(&a, &c), 0.0);
}

#[test]
fn empty_frames_score_zero() {
    let a = GrayImage::new(0, 0);
    let b = GrayImage::new(0, 0);
    assert_eq!(score(&a, &b), 0.0);
}

#[test]
fn score_is_symmetric() {
    let a = gradient(64, 48, 0);
    let b = gradient(64, 48, 60);
    let forward = score(&a, &b);
    let backward = score(&b, &a);
    assert!(
        (forward - backward).abs() < 1e-9,
        "score should be symmetric: {forward} vs {backward}",
    );
}

#[test]
fn inverted_high_contrast_frame_scores_low() {
    let a = checkerboard(64, 64);
    let b = inverted(&a);
    let similarity = score(&a, &b);
    assert!(
        similarity < 0.5,
        "A pure invert of a high-contrast frame should score far below 1, got {similarity}",
    );
}

#[test]
fn single_pixel_change_still_scores_near_one() {
    let a = gradient(64, 48, 0);
    let mut b = a.clone();
    let pixel = b.get_pixel_mut(10, 10);
    pixel[0] = pixel[0].wrapping_add(1);

    let similarity = score(&a, &b);
    assert!(
        similarity > 0.999,
        "A one-pixel, one-level change should barely move the score, got {similarity}",
    );
}

#[test]
fn distinct_patterns_score_below_duplicate_threshold() {
    let a = gradient(64, 48, 0);
    let b = gradient(64, 48, 60);
    let similarity = score(&a, &b);
    assert!(
        similarity < framesift::DEFAULT_SIMILARITY_THRESHOLD,
        "Visibly different frames must stay below the default threshold, got {similarity}",
    );
}
