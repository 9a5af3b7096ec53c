/// A decoded camera frame as seen by the detection pipeline.
///
/// The pipeline never touches pixels itself; it only needs the width for
/// size normalization and for the signed offset. Pixel access is the business
/// of the injected contour extractor.
pub trait Frame {
    /// Frame width in pixels.
    fn width(&self) -> u32;
}

impl<T: Frame + ?Sized> Frame for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }
}

#[cfg(feature = "image")]
impl<P, C> Frame for image::ImageBuffer<P, C>
where
    P: image::Pixel,
    C: std::ops::Deref<Target = [P::Subpixel]>,
{
    fn width(&self) -> u32 {
        image::ImageBuffer::width(self)
    }
}

#[cfg(feature = "image")]
impl Frame for image::DynamicImage {
    fn width(&self) -> u32 {
        image::GenericImageView::width(self)
    }
}

#[cfg(all(test, feature = "image"))]
mod tests {
    use super::*;

    #[test]
    fn image_buffers_report_their_width() {
        let img = image::RgbImage::new(640, 360);
        assert_eq!(Frame::width(&img), 640);

        let dynamic = image::DynamicImage::ImageRgb8(img);
        assert_eq!(Frame::width(&dynamic), 640);
    }
}
