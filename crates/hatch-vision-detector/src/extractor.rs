use hatch_vision_core::Contour;

use crate::ColorProfile;

/// Color-mask and contour extraction, supplied by the host.
///
/// Given a frame and one color profile, return the raw point-set contours of
/// the thresholded mask. The detector treats the result as opaque input and
/// never inspects pixels itself.
pub trait ContourExtractor<F: ?Sized> {
    fn extract_contours(&self, frame: &F, profile: &ColorProfile) -> Vec<Contour>;
}

impl<F, T> ContourExtractor<F> for T
where
    F: ?Sized,
    T: Fn(&F, &ColorProfile) -> Vec<Contour>,
{
    fn extract_contours(&self, frame: &F, profile: &ColorProfile) -> Vec<Contour> {
        self(frame, profile)
    }
}
