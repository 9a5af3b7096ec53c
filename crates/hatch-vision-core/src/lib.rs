//! Core types and utilities for hatch target detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete mask extractor or camera driver; frames are only
//! seen through the [`Frame`] trait.

mod frame;
mod logger;
mod pair;
mod rect;

pub use frame::Frame;
pub use pair::TargetPair;
pub use rect::{convex_hull, min_area_rect, Contour, OrientedRect};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, TraceFormat};

pub use logger::init_with_level;
