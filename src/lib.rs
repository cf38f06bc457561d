//! Centroid tracking and per-region counting for object detections in video.
//!
//! Detections produced independently in every frame are matched to stable
//! track identities by proximity of their bounding-box centers. Each region of
//! interest counts how many new identities first appeared inside it.

mod error;
pub mod integration;
pub mod tracker;

pub use error::{ConfigError, CountError, Result};
pub use integration::{
    CounterConfig, DetectionBuilder, DetectionSource, DetectorFailurePolicy, FrameIter,
    FrameReport, FrameSource, Observation, Region, RegionCounter, RegionCounts,
};
pub use tracker::{
    CentroidTracker, Detection, Position, Rect, Track, TrackId, TrackStore, TrackUpdate,
    TrackerConfig,
};
