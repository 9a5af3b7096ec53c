use serde::{Deserialize, Serialize};

use crate::ParamsError;

/// Lower HSL bounds handed unchanged to the contour extractor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    pub min_hue: f64,
    pub min_saturation: f64,
    pub min_luminance: f64,
}

impl ColorProfile {
    pub const fn new(min_hue: f64, min_saturation: f64, min_luminance: f64) -> Self {
        Self {
            min_hue,
            min_saturation,
            min_luminance,
        }
    }
}

/// Profiles tuned for the competition field lighting.
pub const DEFAULT_COLOR_PROFILES: [ColorProfile; 3] = [
    ColorProfile::new(49.0, 57.0, 126.0),
    ColorProfile::new(20.0, 23.0, 90.0),
    ColorProfile::new(66.0, 0.0, 90.0),
];

/// Size and aspect constraints for single marker rectangles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeFilterParams {
    /// Frame width the side limits are expressed in; limits scale with
    /// `frame_width / reference_width`.
    pub reference_width: f64,
    /// Exclusive lower bound on the long side at `reference_width`.
    pub min_long_side: f64,
    /// Exclusive upper bound on the long side at `reference_width`.
    pub max_long_side: f64,
    /// Expected long/short side ratio of a marker strip.
    pub target_ratio: f64,
    /// Half-width of the accepted (exclusive) ratio band.
    pub ratio_tolerance: f64,
}

impl Default for ShapeFilterParams {
    fn default() -> Self {
        Self {
            reference_width: 1920.0,
            min_long_side: 100.0,
            max_long_side: 400.0,
            target_ratio: 5.0,
            ratio_tolerance: 2.5,
        }
    }
}

/// Geometric compatibility rules for two marker rectangles.
///
/// All bounds are exclusive and in frame pixels (not normalized).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingParams {
    pub max_y_diff: f64,
    pub min_x_diff: f64,
    pub max_x_diff: f64,
    /// Maximum difference between the two long sides.
    pub max_side_diff: f64,
    /// Degrees; rectangles with `|angle|` outside `(min_angle, max_angle)`
    /// are treated as axis-aligned clutter.
    pub min_angle: f64,
    pub max_angle: f64,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            max_y_diff: 10.0,
            min_x_diff: 50.0,
            max_x_diff: 200.0,
            max_side_diff: 15.0,
            min_angle: 10.0,
            max_angle: 80.0,
        }
    }
}

/// Configuration for the per-frame hatch target detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HatchDetectorParams {
    /// Ordered color profiles; each runs the extractor once per frame.
    #[serde(default = "default_profiles")]
    pub profiles: Vec<ColorProfile>,
    #[serde(default)]
    pub shape: ShapeFilterParams,
    #[serde(default)]
    pub pairing: PairingParams,
    /// Pairs whose midpoints are closer than this are the same target.
    #[serde(default = "default_dedupe_threshold")]
    pub dedupe_threshold: f64,
}

fn default_profiles() -> Vec<ColorProfile> {
    DEFAULT_COLOR_PROFILES.to_vec()
}

fn default_dedupe_threshold() -> f64 {
    10.0
}

impl Default for HatchDetectorParams {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            shape: ShapeFilterParams::default(),
            pairing: PairingParams::default(),
            dedupe_threshold: default_dedupe_threshold(),
        }
    }
}

impl HatchDetectorParams {
    /// Reject configurations under which no target could ever be accepted
    /// or that would divide by zero.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.profiles.is_empty() {
            return Err(ParamsError::NoColorProfiles);
        }

        let shape = &self.shape;
        finite("shape.reference_width", shape.reference_width)?;
        if shape.reference_width <= 0.0 {
            return Err(ParamsError::NonPositive {
                name: "shape.reference_width",
                value: shape.reference_width,
            });
        }
        non_negative("shape.min_long_side", shape.min_long_side)?;
        range(
            "shape.long_side",
            shape.min_long_side,
            shape.max_long_side,
        )?;
        finite("shape.target_ratio", shape.target_ratio)?;
        if shape.target_ratio <= 0.0 {
            return Err(ParamsError::NonPositive {
                name: "shape.target_ratio",
                value: shape.target_ratio,
            });
        }
        non_negative("shape.ratio_tolerance", shape.ratio_tolerance)?;

        let pairing = &self.pairing;
        non_negative("pairing.max_y_diff", pairing.max_y_diff)?;
        non_negative("pairing.max_side_diff", pairing.max_side_diff)?;
        non_negative("pairing.min_x_diff", pairing.min_x_diff)?;
        range("pairing.x_diff", pairing.min_x_diff, pairing.max_x_diff)?;
        non_negative("pairing.min_angle", pairing.min_angle)?;
        range("pairing.angle", pairing.min_angle, pairing.max_angle)?;

        non_negative("dedupe_threshold", self.dedupe_threshold)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamsError::NonFinite { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParamsError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ParamsError::Negative { name, value });
    }
    Ok(())
}

fn range(name: &'static str, min: f64, max: f64) -> Result<(), ParamsError> {
    finite(name, min)?;
    finite(name, max)?;
    if min >= max {
        return Err(ParamsError::EmptyRange { name, min, max });
    }
    Ok(())
}
