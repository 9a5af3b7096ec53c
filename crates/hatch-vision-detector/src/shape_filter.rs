//! Contour → oriented rectangle candidates.

use hatch_vision_core::{min_area_rect, Contour, OrientedRect};
use log::{debug, trace};

use crate::ShapeFilterParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Fit a minimal-area rectangle to every contour of one color profile and
/// keep those with a marker-like size and aspect.
///
/// `observer` sees each accepted rectangle together with `profile`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(contours, params, observer), fields(contours = contours.len()))
)]
pub fn filter_shapes<F>(
    contours: &[Contour],
    frame_width: f64,
    profile: usize,
    params: &ShapeFilterParams,
    mut observer: F,
) -> Vec<OrientedRect>
where
    F: FnMut(&OrientedRect, usize),
{
    let scale = frame_width / params.reference_width;
    let min_long_side = params.min_long_side * scale;
    let max_long_side = params.max_long_side * scale;

    let mut accepted = Vec::new();
    for contour in contours {
        let rr = min_area_rect(contour).with_profile(profile);
        if accepts_rect(&rr, min_long_side, max_long_side, params) {
            trace!(
                "profile {profile}: center=({:.1},{:.1}) size={:.1}x{:.1} angle={:.1}",
                rr.center.x,
                rr.center.y,
                rr.width,
                rr.height,
                rr.angle
            );
            observer(&rr, profile);
            accepted.push(rr);
        }
    }

    debug!(
        "profile {profile}: {} of {} contours kept",
        accepted.len(),
        contours.len()
    );
    accepted
}

fn accepts_rect(
    rr: &OrientedRect,
    min_long_side: f64,
    max_long_side: f64,
    params: &ShapeFilterParams,
) -> bool {
    let long_side = rr.long_side();
    let in_long_side_range = long_side > min_long_side && long_side < max_long_side;
    in_long_side_range && in_ratio_range(rr.ratio(), params.target_ratio, params.ratio_tolerance)
}

/// Orientation-free aspect test: ratios below 1 are flipped first.
fn in_ratio_range(ratio: f64, target: f64, tolerance: f64) -> bool {
    let ratio = if ratio < 1.0 { ratio.recip() } else { ratio };
    ratio > target - tolerance && ratio < target + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn contour(cx: f64, cy: f64, w: f64, h: f64, angle: f64) -> Contour {
        OrientedRect::new(Point2::new(cx, cy), w, h, angle)
            .corners()
            .to_vec()
    }

    #[test]
    fn keeps_marker_like_rectangles() {
        let params = ShapeFilterParams::default();
        let contours = vec![
            contour(900.0, 500.0, 30.0, 150.0, -30.0),
            // Too small at full resolution.
            contour(500.0, 500.0, 10.0, 50.0, -30.0),
            // Square blob.
            contour(300.0, 500.0, 150.0, 150.0, -30.0),
            // Too long.
            contour(1200.0, 500.0, 90.0, 450.0, -30.0),
        ];

        let kept = filter_shapes(&contours, 1920.0, 2, &params, |_, _| {});
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].center.x, 900.0, epsilon = 1e-6);
        assert_eq!(kept[0].profile, 2);
    }

    #[test]
    fn side_limits_scale_with_frame_width() {
        let params = ShapeFilterParams::default();
        // 40 px long: rejected at 1920 wide, accepted at 320 wide (limits 16.7..66.7).
        let contours = vec![contour(100.0, 100.0, 8.0, 40.0, -30.0)];

        assert!(filter_shapes(&contours, 1920.0, 0, &params, |_, _| {}).is_empty());
        assert_eq!(filter_shapes(&contours, 320.0, 0, &params, |_, _| {}).len(), 1);
    }

    #[test]
    fn ratio_is_orientation_free() {
        assert!(in_ratio_range(5.0, 5.0, 2.5));
        assert!(in_ratio_range(0.2, 5.0, 2.5));
        assert!(!in_ratio_range(2.5, 5.0, 2.5), "bounds are exclusive");
        assert!(!in_ratio_range(7.5, 5.0, 2.5), "bounds are exclusive");
        assert!(!in_ratio_range(1.0, 5.0, 2.5));
    }

    #[test]
    fn observer_sees_every_accepted_rect_with_profile() {
        let params = ShapeFilterParams::default();
        let contours = vec![
            contour(900.0, 500.0, 30.0, 150.0, -30.0),
            contour(1000.0, 500.0, 30.0, 150.0, -30.0),
            contour(300.0, 500.0, 150.0, 150.0, -30.0),
        ];

        let mut seen = Vec::new();
        let kept = filter_shapes(&contours, 1920.0, 1, &params, |rr, idx| {
            seen.push((rr.center.x.round() as i64, idx))
        });
        assert_eq!(kept.len(), 2);
        assert_eq!(seen, vec![(900, 1), (1000, 1)]);
    }

    #[test]
    fn degenerate_contours_are_rejected() {
        let params = ShapeFilterParams::default();
        let contours = vec![
            Vec::new(),
            vec![Point2::new(10.0, 10.0)],
            vec![Point2::new(0.0, 0.0), Point2::new(200.0, 0.0)],
        ];
        assert!(filter_shapes(&contours, 1920.0, 0, &params, |_, _| {}).is_empty());
    }
}
