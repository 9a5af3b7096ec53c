#![cfg(feature = "image")]

use hatch_vision::{
    ColorProfile, Contour, FrameOutcome, HatchTargetPipeline, HatchVisionConfig, SharedTable,
};
use image::{DynamicImage, RgbImage};

fn no_contours<F: ?Sized>(_: &F, _: &ColorProfile) -> Vec<Contour> {
    Vec::new()
}

#[test]
fn camera_buffers_drive_the_pipeline() {
    let frame = RgbImage::new(640, 360);
    let pipeline = HatchTargetPipeline::from_config(
        &HatchVisionConfig::default(),
        no_contours::<RgbImage>,
        SharedTable::default(),
    )
    .expect("pipeline");

    let outcome = pipeline.process_frame(&frame);
    assert!(matches!(
        outcome,
        FrameOutcome::Miss {
            consecutive_misses: 1,
            ..
        }
    ));
    assert_eq!(pipeline.snapshot().offset, 640.0);
}

#[test]
fn dynamic_images_report_their_width() {
    let frame = DynamicImage::new_rgb8(320, 180);
    let pipeline = HatchTargetPipeline::from_config(
        &HatchVisionConfig::default(),
        no_contours::<DynamicImage>,
        SharedTable::default(),
    )
    .expect("pipeline");

    assert!(pipeline.process_frame(&frame).is_processed());
    assert_eq!(pipeline.snapshot().frame_count, 1);
}
