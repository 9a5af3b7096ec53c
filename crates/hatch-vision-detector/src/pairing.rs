//! Rectangle candidates → target pair candidates.

use hatch_vision_core::{OrientedRect, TargetPair};
use log::debug;

use crate::PairingParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Whether two rectangles can be the two markers of one hatch target.
///
/// Every test is on absolute differences, so the predicate is symmetric.
pub fn is_pair(a: &OrientedRect, b: &OrientedRect, params: &PairingParams) -> bool {
    let x_diff = (a.center.x - b.center.x).abs();
    let y_diff = (a.center.y - b.center.y).abs();

    let same_row = y_diff < params.max_y_diff;
    let spaced = x_diff > params.min_x_diff && x_diff < params.max_x_diff;
    let similar_size = (a.long_side() - b.long_side()).abs() < params.max_side_diff;
    let tilted = is_tilted(a, params) && is_tilted(b, params);

    same_row && spaced && similar_size && tilted
}

/// Rejects near axis-aligned rectangles (window frames, field edges, ...).
fn is_tilted(rr: &OrientedRect, params: &PairingParams) -> bool {
    let abs_angle = rr.angle.abs();
    abs_angle > params.min_angle && abs_angle < params.max_angle
}

/// Exhaustive pairwise scan; one [`TargetPair`] per compatible unordered pair.
///
/// Pairs are emitted in scan order (`i < j`, row-major), which the
/// deduplication step relies on.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(rects, params), fields(rects = rects.len()))
)]
pub fn find_pairs(rects: &[OrientedRect], params: &PairingParams) -> Vec<TargetPair> {
    let mut pairs = Vec::new();
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            if is_pair(a, b, params) {
                pairs.push(TargetPair::new(*a, *b));
            }
        }
    }
    debug!("{} candidate pairs from {} rectangles", pairs.len(), rects.len());
    pairs
}
