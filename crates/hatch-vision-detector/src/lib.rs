//! Per-frame hatch target detection built on top of `hatch-vision-core`.
//!
//! ## Quickstart
//!
//! ```
//! use hatch_vision_core::{Contour, Frame};
//! use hatch_vision_detector::{ColorProfile, HatchDetectorParams, HatchTargetDetector};
//!
//! struct Camera {
//!     width: u32,
//! }
//!
//! impl Frame for Camera {
//!     fn width(&self) -> u32 {
//!         self.width
//!     }
//! }
//!
//! // Stand-in for the host's HSL threshold + contour finder.
//! let extractor = |_: &Camera, _: &ColorProfile| Vec::<Contour>::new();
//!
//! let detector = HatchTargetDetector::new(HatchDetectorParams::default(), extractor)?;
//! let detection = detector.detect(&Camera { width: 640 });
//! println!("offset: {:?}", detection.selected(640.0).map(|t| t.offset(640.0)));
//! # Ok::<(), hatch_vision_detector::ParamsError>(())
//! ```
//!
//! Stages, in order:
//! 1. For every color profile, extract contours and keep those whose
//!    minimal-area rectangle has a marker-like size and aspect.
//! 2. Pair rectangles that sit on one row, at a plausible spacing, with
//!    similar size and a tilted (not axis-aligned) orientation.
//! 3. Merge pairs whose midpoints nearly coincide.
//! 4. Report the pair with the smallest signed offset.

pub mod dedup;
mod detector;
mod error;
mod extractor;
pub mod pairing;
mod params;
pub mod select;
pub mod shape_filter;

pub use dedup::{is_same_target, merge_duplicates};
pub use detector::{HatchTargetDetection, HatchTargetDetector};
pub use error::ParamsError;
pub use extractor::ContourExtractor;
pub use pairing::{find_pairs, is_pair};
pub use params::{
    ColorProfile, HatchDetectorParams, PairingParams, ShapeFilterParams, DEFAULT_COLOR_PROFILES,
};
pub use select::{compare_by_offset, select_target};
pub use shape_filter::filter_shapes;
