use serde::{Deserialize, Serialize};

use crate::OrientedRect;

/// Two matched marker rectangles forming one hatch target.
///
/// The rectangles are always stored left to right by center x, whatever the
/// construction order. Deserialized pairs are reordered the same way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "UncheckedPair")]
pub struct TargetPair {
    left: OrientedRect,
    right: OrientedRect,
}

/// Wire form of [`TargetPair`]; field order is not trusted.
#[derive(Deserialize)]
struct UncheckedPair {
    left: OrientedRect,
    right: OrientedRect,
}

impl From<UncheckedPair> for TargetPair {
    fn from(raw: UncheckedPair) -> Self {
        Self::new(raw.left, raw.right)
    }
}

impl TargetPair {
    /// Build a pair; on equal x the first argument stays on the left.
    pub fn new(a: OrientedRect, b: OrientedRect) -> Self {
        if a.center.x <= b.center.x {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    #[inline]
    pub fn left(&self) -> &OrientedRect {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &OrientedRect {
        &self.right
    }

    /// Horizontal midpoint between the two rectangle centers.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.left.center.x + self.right.center.x) / 2.0
    }

    /// Signed distance of the midpoint from the frame center; negative is left.
    #[inline]
    pub fn offset(&self, frame_width: f64) -> f64 {
        self.midpoint() - frame_width / 2.0
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.left.area() + self.right.area()
    }
}
