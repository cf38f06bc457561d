//! Trait for object detection inference backends.

use ndarray::ArrayView3;

use crate::tracker::Detection;

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the region counter.
///
/// # Example
///
/// ```ignore
/// use ndarray::ArrayView3;
/// use roi_counter::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, image: ArrayView3<'_, u8>) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections in image coordinates
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on an image and return detections.
    ///
    /// # Arguments
    /// * `image` - Pixels in (height, width, channel) layout. For region
    ///   counting this is the crop of one region, and the returned boxes are
    ///   expected in crop-local coordinates.
    ///
    /// # Returns
    /// A vector of `Detection` objects, or an error.
    fn detect(&mut self, image: ArrayView3<'_, u8>) -> Result<Vec<Detection>, Self::Error>;
}

impl<D: DetectionSource + ?Sized> DetectionSource for &mut D {
    type Error = D::Error;

    fn detect(&mut self, image: ArrayView3<'_, u8>) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(image)
    }
}
