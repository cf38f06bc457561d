//! Burn inference backend for object detection.
//!
//! This module provides a `BurnDetector` that implements `DetectionSource`
//! for running object detection models built with the Burn framework on
//! region crops.
//!
//! # Example
//!
//! ```ignore
//! use roi_counter::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default()).with_classes(vec![0]);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::ArrayView3;
use thiserror::Error;

use super::{DetectionBuilder, DetectionSource};
use crate::tracker::Detection;

/// Error type for Burn detection failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BurnDetectorError {
    /// Channel count of the crop or the model is not RGB.
    #[error("Invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),
}

/// Raw detection output from the model before filtering.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box in model input pixels: [x1, y1, x2, y2] or [cx, cy, w, h]
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID (optional, for multi-class detection)
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Vector of raw detections after NMS.
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640) // Default YOLO input size
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true // Most YOLO variants use XYWH
    }
}

/// Burn-based object detector implementing `DetectionSource`.
///
/// Crops of any size are resized to the model input, and the returned boxes
/// are mapped back to crop-local pixels.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    classes: Vec<usize>,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.25,
            classes: Vec::new(),
        }
    }

    /// Set the confidence threshold for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Keep only the given classes. Empty keeps all of them.
    pub fn with_classes(mut self, classes: Vec<usize>) -> Self {
        self.classes = classes;
        self
    }

    /// Resize an HWC RGB crop to the model input and convert it to a
    /// normalized NCHW tensor.
    pub fn preprocess(
        &self,
        image: ArrayView3<'_, u8>,
    ) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let (height, width, got_channels) = image.dim();

        if channels != 3 || got_channels != 3 {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (3, target_h, target_w),
                got: (got_channels as u32, height as u32, width as u32),
            });
        }

        let raw: Vec<u8> = image.iter().copied().collect();
        let rgb = RgbImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
            BurnDetectorError::PreprocessingError(format!(
                "crop of {width}x{height} does not fill an RGB buffer"
            ))
        })?;
        let resized = DynamicImage::ImageRgb8(rgb)
            .resize_exact(target_w, target_h, FilterType::Triangle)
            .to_rgb8();

        // HWC -> CHW, scaled to [0, 1]
        let plane = (target_w * target_h) as usize;
        let mut data = vec![0.0f32; 3 * plane];
        for (x, y, pixel) in resized.enumerate_pixels() {
            let offset = (y * target_w + x) as usize;
            for (c, &value) in pixel.0.iter().enumerate() {
                data[c * plane + offset] = value as f32 / 255.0;
            }
        }

        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            3,
            target_h as usize,
            target_w as usize,
        ]);

        Ok(tensor)
    }

    /// Convert raw model outputs to Detection objects, scaling boxes by
    /// (`sx`, `sy`) from model input pixels to crop pixels.
    fn postprocess(&self, raw_detections: Vec<RawDetection>, sx: f32, sy: f32) -> Vec<Detection> {
        raw_detections
            .into_iter()
            .filter(|d| d.score > self.conf_threshold)
            .filter(|d| {
                self.classes.is_empty()
                    || d.class_id.is_some_and(|c| self.classes.contains(&c))
            })
            .map(|d| {
                let builder = DetectionBuilder::new()
                    .score(d.score)
                    .class_id(d.class_id.unwrap_or(0) as u32);
                let mut detection = if self.model.bbox_is_xywh() {
                    builder
                        .xywh(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                } else {
                    builder
                        .tlbr(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                };
                detection.bbox = detection.bbox.scaled(sx, sy);
                detection
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> DetectionSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(&mut self, image: ArrayView3<'_, u8>) -> Result<Vec<Detection>, Self::Error> {
        let (height, width, _) = image.dim();
        if height == 0 || width == 0 {
            return Ok(Vec::new());
        }
        let (_, target_h, target_w) = self.model.input_size();
        let tensor = self.preprocess(image)?;
        let raw_detections = self.model.forward(tensor);
        let sx = width as f32 / target_w as f32;
        let sy = height as f32 / target_h as f32;
        Ok(self.postprocess(raw_detections, sx, sy))
    }
}
