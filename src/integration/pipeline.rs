//! RegionCounter: detection, tracking and per-region counting per frame.

use std::fmt;

use log::{debug, info, warn};
use ndarray::ArrayView3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CountError, Result};
use crate::integration::frames::FrameSource;
use crate::integration::region::{Region, validate_regions};
use crate::integration::DetectionSource;
use crate::tracker::{CentroidTracker, Detection, Position, TrackId, TrackStore, TrackerConfig};

/// Frames between two progress log lines.
const PROGRESS_INTERVAL: u64 = 100;

/// What to do when the detector fails on a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectorFailurePolicy {
    /// Stop the run and return the error
    #[default]
    Abort,
    /// Log a warning and treat the region as having no detections this frame
    SkipRegion,
}

/// Configuration for the RegionCounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub tracker: TrackerConfig,
    /// Only detections scoring strictly above this are tracked
    pub min_confidence: f32,
    /// Class ids to track; empty means every class
    pub classes: Vec<u32>,
    pub on_detector_error: DetectorFailurePolicy,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            min_confidence: 0.25,
            classes: Vec::new(),
            on_detector_error: DetectorFailurePolicy::Abort,
        }
    }
}

impl CounterConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.tracker.validate()?;
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        Ok(())
    }

    fn accepts(&self, detection: &Detection) -> bool {
        detection.score > self.min_confidence
            && (self.classes.is_empty() || self.classes.contains(&detection.class_id))
    }
}

/// New-track counts per region, in region order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCounts {
    entries: Vec<RegionCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RegionCount {
    name: String,
    count: u64,
}

impl RegionCounts {
    fn zeroed(regions: &[Region]) -> Self {
        Self {
            entries: regions
                .iter()
                .map(|r| RegionCount {
                    name: r.name.clone(),
                    count: 0,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.count)
    }

    /// Iterate (name, count) pairs in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|e| (e.name.as_str(), e.count))
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn increment(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.count += 1;
        }
    }
}

impl fmt::Display for RegionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, count) in self.iter() {
            writeln!(f, "People in {name}: {count}")?;
        }
        Ok(())
    }
}

/// One detection as seen by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub region: String,
    pub track_id: TrackId,
    pub is_new: bool,
    /// Center in crop-local coordinates
    pub center: Position,
    pub detection: Detection,
}

/// Everything the tracker saw in one frame, for annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub observations: Vec<Observation>,
    /// Regions skipped after a detector failure
    pub skipped_regions: Vec<String>,
}

impl FrameReport {
    pub fn new_tracks(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.observations.iter().filter(|o| o.is_new)
    }
}

/// Counts objects entering each region of a video.
///
/// Every region is cropped and passed to the detector; detection centers, in
/// crop-local coordinates, go through one tracker and track store shared by
/// all regions. A region's count grows by one for every track created while
/// processing that region.
pub struct RegionCounter<D: DetectionSource> {
    detector: D,
    tracker: CentroidTracker,
    store: TrackStore,
    regions: Vec<Region>,
    counts: RegionCounts,
    config: CounterConfig,
    frame_index: u64,
}

impl<D: DetectionSource> RegionCounter<D> {
    /// Create a counter for `regions`, validating every parameter.
    pub fn new(
        detector: D,
        regions: Vec<Region>,
        config: CounterConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        validate_regions(&regions)?;
        let tracker = CentroidTracker::new(config.tracker.clone())?;
        Ok(Self {
            detector,
            tracker,
            store: TrackStore::new(),
            counts: RegionCounts::zeroed(&regions),
            regions,
            config,
            frame_index: 0,
        })
    }

    /// Create a counter with the default configuration.
    pub fn with_default_config(
        detector: D,
        regions: Vec<Region>,
    ) -> std::result::Result<Self, ConfigError> {
        Self::new(detector, regions, CounterConfig::default())
    }

    /// Process the next frame of the video.
    ///
    /// Frames are numbered from zero in the order they are passed in. Every
    /// region is run through the detector before the track store is touched,
    /// so a detector error leaves the counter exactly as it was and the same
    /// frame index is used on the next call. History is pruned once all
    /// regions of the frame have been processed.
    pub fn process_frame(&mut self, frame: ArrayView3<'_, u8>) -> Result<FrameReport> {
        let frame_index = self.frame_index;
        let mut report = FrameReport {
            frame_index,
            ..FrameReport::default()
        };

        let mut per_region = Vec::with_capacity(self.regions.len());
        for (index, region) in self.regions.iter().enumerate() {
            let crop = region.crop(frame.view());
            match self.detector.detect(crop) {
                Ok(detections) => per_region.push((index, detections)),
                Err(err) => match self.config.on_detector_error {
                    DetectorFailurePolicy::Abort => {
                        return Err(CountError::Detector {
                            region: region.name.clone(),
                            frame: frame_index,
                            source: Box::new(err),
                        });
                    }
                    DetectorFailurePolicy::SkipRegion => {
                        warn!(
                            "frame {frame_index}: detector failed on region `{}`, skipping: {err}",
                            region.name
                        );
                        report.skipped_regions.push(region.name.clone());
                    }
                },
            }
        }

        for (index, detections) in per_region {
            let region = &self.regions[index];
            for detection in detections {
                if !self.config.accepts(&detection) {
                    continue;
                }
                let center = detection.center();
                let update = self.tracker.update(&mut self.store, center, frame_index);
                if update.is_new {
                    self.counts.increment(index);
                }
                report.observations.push(Observation {
                    region: region.name.clone(),
                    track_id: update.id,
                    is_new: update.is_new,
                    center,
                    detection,
                });
            }
        }

        self.tracker.prune(&mut self.store);
        self.frame_index += 1;

        debug!(
            "frame {frame_index}: {} observations, {} new, {} tracks",
            report.observations.len(),
            report.new_tracks().count(),
            self.store.len()
        );
        Ok(report)
    }

    /// Process every frame of `source` and return the final counts.
    pub fn process_video<S: FrameSource>(&mut self, source: &mut S) -> Result<RegionCounts> {
        self.process_video_with(source, |_| {})
    }

    /// Like `process_video`, handing each frame's report to `on_frame`.
    pub fn process_video_with<S, F>(
        &mut self,
        source: &mut S,
        mut on_frame: F,
    ) -> Result<RegionCounts>
    where
        S: FrameSource,
        F: FnMut(&FrameReport),
    {
        let total = source.frame_count();
        info!(
            "counting {} regions over {} frames",
            self.regions.len(),
            total.map_or_else(|| "an unknown number of".to_string(), |n| n.to_string())
        );

        loop {
            let frame_index = self.frame_index;
            let frame = source
                .next_frame()
                .map_err(|err| CountError::FrameSource {
                    frame: frame_index,
                    source: Box::new(err),
                })?;
            let Some(frame) = frame else {
                break;
            };

            let report = self.process_frame(frame.view())?;
            on_frame(&report);

            let done = self.frame_index;
            if done % PROGRESS_INTERVAL == 0 {
                match total {
                    Some(total) => info!("processed {done}/{total} frames"),
                    None => info!("processed {done} frames"),
                }
            }
        }

        info!(
            "finished after {} frames: {} tracks, {} new in regions",
            self.frame_index,
            self.store.len(),
            self.counts.total()
        );
        Ok(self.counts.clone())
    }

    /// Counts so far.
    pub fn counts(&self) -> &RegionCounts {
        &self.counts
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Index the next processed frame will receive.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Consume the counter, returning the final counts.
    pub fn into_counts(self) -> RegionCounts {
        self.counts
    }
}
