//! Pick the one target reported for a frame.

use std::cmp::Ordering;

use hatch_vision_core::TargetPair;

/// Total order on pairs by signed offset from the center of a frame of `frame_width`.
pub fn compare_by_offset(frame_width: f64) -> impl Fn(&TargetPair, &TargetPair) -> Ordering {
    move |a, b| a.offset(frame_width).total_cmp(&b.offset(frame_width))
}

/// Select the pair with the smallest *signed* offset.
///
/// This is the left-most candidate, not the one closest to the frame
/// center. Ties keep the earliest pair.
pub fn select_target(pairs: &[TargetPair], frame_width: f64) -> Option<&TargetPair> {
    match pairs {
        [] => None,
        [only] => Some(only),
        _ => {
            let cmp = compare_by_offset(frame_width);
            pairs.iter().min_by(|a, b| cmp(a, b))
        }
    }
}
