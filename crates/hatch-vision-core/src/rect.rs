//! Oriented rectangles and minimal-area rectangle fitting.
//!
//! Angles follow the classic minimal-area-rectangle convention: the reported
//! angle lies in `[-90, 0)` degrees and `width` is measured along the
//! direction given by that angle. Axis-aligned rectangles report `-90`.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Raw point set returned by a mask/contour extractor.
pub type Contour = Vec<Point2<f64>>;

/// Rectangle with arbitrary rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Point2<f64>,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, `[-90, 0)` when produced by [`min_area_rect`].
    pub angle: f64,
    /// Index of the color profile whose contour produced this rectangle.
    ///
    /// Diagnostics only; never used by the geometry.
    #[serde(default)]
    pub profile: usize,
}

impl OrientedRect {
    pub fn new(center: Point2<f64>, width: f64, height: f64, angle: f64) -> Self {
        Self {
            center,
            width,
            height,
            angle,
            profile: 0,
        }
    }

    /// Tag the rectangle with the color profile it came from.
    pub fn with_profile(mut self, profile: usize) -> Self {
        self.profile = profile;
        self
    }

    #[inline]
    pub fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// `height / width`; infinite or NaN for degenerate rectangles.
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.height / self.width
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The four corners, starting at the bottom-left in the rectangle frame.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        let theta = self.angle.to_radians();
        let u = Vector2::new(theta.cos(), theta.sin()) * (self.width * 0.5);
        let v = Vector2::new(-theta.sin(), theta.cos()) * (self.height * 0.5);
        [
            self.center - u - v,
            self.center + u - v,
            self.center + u + v,
            self.center - u + v,
        ]
    }
}

/// Convex hull via Andrew's monotone chain, counter-clockwise, no collinear points.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts: Vec<Point2<f64>> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut hull: Vec<Point2<f64>> = Vec::with_capacity(pts.len() * 2);
    for p in &pts {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(*p);
    }
    let lower_len = hull.len() + 1;
    for p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();
    hull
}

/// Minimal-area oriented bounding rectangle of a point set.
///
/// Uses rotating calipers over the convex hull: the optimal rectangle has one
/// side collinear with a hull edge. Fewer than two distinct points yield a
/// zero-sized rectangle at the point (or the origin for an empty set).
pub fn min_area_rect(points: &[Point2<f64>]) -> OrientedRect {
    let hull = convex_hull(points);
    match hull.len() {
        0 => return OrientedRect::new(Point2::origin(), 0.0, 0.0, -90.0),
        1 => return OrientedRect::new(hull[0], 0.0, 0.0, -90.0),
        _ => {}
    }

    let mut best: Option<(f64, Vector2<f64>, Point2<f64>, f64, f64)> = None;
    let n = hull.len();
    for i in 0..n {
        let edge = hull[(i + 1) % n] - hull[i];
        let len = edge.norm();
        if len <= f64::EPSILON {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &hull {
            let d = p.coords;
            let pu = d.dot(&u);
            let pv = d.dot(&v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let extent_u = max_u - min_u;
        let extent_v = max_v - min_v;
        let area = extent_u * extent_v;
        if best.as_ref().is_none_or(|(best_area, ..)| area < *best_area) {
            let center = Point2::from(u * (min_u + max_u) * 0.5 + v * (min_v + max_v) * 0.5);
            best = Some((area, u, center, extent_u, extent_v));
        }
    }

    let Some((_, u, center, extent_u, extent_v)) = best else {
        return OrientedRect::new(hull[0], 0.0, 0.0, -90.0);
    };

    let mut edge_deg = u.y.atan2(u.x).to_degrees().rem_euclid(180.0);
    if edge_deg >= 180.0 {
        edge_deg -= 180.0;
    }
    if edge_deg >= 90.0 {
        OrientedRect::new(center, extent_u, extent_v, edge_deg - 180.0)
    } else {
        // The perpendicular side is the one pointing into [-90, 0).
        OrientedRect::new(center, extent_v, extent_u, edge_deg - 90.0)
    }
}
