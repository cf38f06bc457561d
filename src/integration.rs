//! Integration module for connecting detectors, regions and frame sources
//! with the centroid tracker.
//!
//! This module provides the detector and frame-source traits, region
//! definitions, and the `RegionCounter` that drives counting over a video.

mod builder;
mod detector;
mod frames;
mod pipeline;
mod region;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use frames::{FrameIter, FrameSource};
pub use pipeline::{
    CounterConfig, DetectorFailurePolicy, FrameReport, Observation, RegionCounter, RegionCounts,
};
pub use region::Region;

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
