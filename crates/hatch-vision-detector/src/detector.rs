use hatch_vision_core::{Frame, OrientedRect, TargetPair};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dedup::merge_duplicates;
use crate::pairing::find_pairs;
use crate::select::select_target;
use crate::shape_filter::filter_shapes;
use crate::{ContourExtractor, HatchDetectorParams, ParamsError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Everything found in one frame, before selection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HatchTargetDetection {
    /// Accepted rectangles of all profiles, in profile order.
    pub candidates: Vec<OrientedRect>,
    /// Number of pairs before duplicate merging.
    pub raw_pairs: usize,
    /// Distinct targets, in scan order.
    pub targets: Vec<TargetPair>,
}

impl HatchTargetDetection {
    /// The target reported for this frame, see [`select_target`].
    pub fn selected(&self, frame_width: f64) -> Option<&TargetPair> {
        select_target(&self.targets, frame_width)
    }
}

/// Per-frame hatch target detector.
///
/// Runs the injected extractor once per color profile, then filters,
/// pairs and deduplicates the candidates.
pub struct HatchTargetDetector<E> {
    params: HatchDetectorParams,
    extractor: E,
}

impl<E> HatchTargetDetector<E> {
    /// Create a detector after validating `params`.
    pub fn new(params: HatchDetectorParams, extractor: E) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params, extractor })
    }

    #[inline]
    pub fn params(&self) -> &HatchDetectorParams {
        &self.params
    }

    #[inline]
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Detect targets in `frame`.
    pub fn detect<F>(&self, frame: &F) -> HatchTargetDetection
    where
        F: Frame + ?Sized,
        E: ContourExtractor<F>,
    {
        self.detect_with_observer(frame, |_, _| {})
    }

    /// Like [`detect`](Self::detect), also reporting every accepted rectangle
    /// with the index of the profile that produced it.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, observer), fields(width = frame.width()))
    )]
    pub fn detect_with_observer<F, O>(&self, frame: &F, mut observer: O) -> HatchTargetDetection
    where
        F: Frame + ?Sized,
        E: ContourExtractor<F>,
        O: FnMut(&OrientedRect, usize),
    {
        let frame_width = f64::from(frame.width());

        let mut candidates = Vec::new();
        for (idx, profile) in self.params.profiles.iter().enumerate() {
            let contours = self.extractor.extract_contours(frame, profile);
            let rects = filter_shapes(
                &contours,
                frame_width,
                idx,
                &self.params.shape,
                &mut observer,
            );
            candidates.extend(rects);
        }

        let pairs = find_pairs(&candidates, &self.params.pairing);
        let raw_pairs = pairs.len();
        let targets = merge_duplicates(pairs, self.params.dedupe_threshold);
        debug!(
            "{} candidates, {} pairs, {} targets",
            candidates.len(),
            raw_pairs,
            targets.len()
        );

        HatchTargetDetection {
            candidates,
            raw_pairs,
            targets,
        }
    }
}
