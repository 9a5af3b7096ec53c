//! Hatch target vision pipeline.
//!
//! This crate provides:
//! - re-exports of the geometry (`hatch-vision-core`) and per-frame detector
//!   (`hatch-vision-detector`) crates
//! - [`HatchTargetPipeline`]: the frame handler that throttles processing to a
//!   fixed cadence, tracks hit/miss streaks and keeps a [`DetectionSnapshot`]
//! - the [`TelemetrySink`] contract, with an in-process [`SharedTable`] and a
//!   [`JsonLinesSink`]
//!
//! ## Quickstart
//!
//! ```
//! use hatch_vision::{
//!     ColorProfile, Contour, Frame, HatchTargetPipeline, HatchVisionConfig, SharedTable,
//! };
//!
//! struct CameraFrame {
//!     width: u32,
//! }
//!
//! impl Frame for CameraFrame {
//!     fn width(&self) -> u32 {
//!         self.width
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The host supplies HSL thresholding + contour finding.
//! let extractor = |_: &CameraFrame, _: &ColorProfile| Vec::<Contour>::new();
//! let config = HatchVisionConfig::default();
//! let table = SharedTable::new(config.table_name.clone());
//! let pipeline = HatchTargetPipeline::from_config(&config, extractor, table)?;
//!
//! pipeline.process_frame(&CameraFrame { width: 640 });
//! let published = pipeline.publish()?;
//! assert_eq!(published.frame_count, 1);
//! assert_eq!(pipeline.sink().get("offset"), Some(640.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Published offset
//!
//! A hit publishes the selected target's signed offset from the frame center
//! immediately. Misses hold the previous value; after a streak of
//! `miss_threshold` misses the offset falls back to the neutral sentinel,
//! which equals the frame width.
//!
//! ## Features
//! - `image`: `image::ImageBuffer` and `image::DynamicImage` implement [`Frame`].
//! - `tracing`: spans around detection stages and `init_tracing`.

mod config;
mod error;
mod pipeline;
mod snapshot;
mod stabilizer;
pub mod telemetry;

pub use hatch_vision_core as core;
pub use hatch_vision_detector as detector;

pub use hatch_vision_core::{init_with_level, Contour, Frame, OrientedRect, TargetPair};
pub use hatch_vision_detector::{
    ColorProfile, ContourExtractor, HatchDetectorParams, HatchTargetDetection,
    HatchTargetDetector, ParamsError,
};

#[cfg(feature = "tracing")]
pub use hatch_vision_core::{init_tracing, TraceFormat};

pub use config::{ConfigIoError, HatchVisionConfig};
pub use error::PipelineError;
pub use pipeline::HatchTargetPipeline;
pub use snapshot::DetectionSnapshot;
pub use stabilizer::{FrameOutcome, StabilizerParams, TemporalStabilizer};
pub use telemetry::{JsonLinesSink, SharedTable, TelemetryError, TelemetryRecord, TelemetrySink};
