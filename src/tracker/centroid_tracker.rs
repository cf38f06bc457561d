//! Centroid tracker: nearest-in-time, within-distance identity matching.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::matching;
use crate::tracker::rect::Position;
use crate::tracker::track::TrackId;
use crate::tracker::track_store::TrackStore;

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Centers closer than this many pixels to a track's last position match it
    pub distance_threshold: f64,
    /// Tracks unseen for more than this many frames are not matched
    pub max_frame_gap: u64,
    /// History entries kept per track after pruning
    pub history_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 30.0,
            max_frame_gap: 10,
            history_window: 100,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(ConfigError::InvalidDistanceThreshold(
                self.distance_threshold,
            ));
        }
        if self.history_window == 0 {
            return Err(ConfigError::ZeroHistoryWindow);
        }
        Ok(())
    }
}

/// Outcome of feeding one detection center to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackUpdate {
    pub id: TrackId,
    /// `true` when the center started a new track
    pub is_new: bool,
}

/// Matches detection centers against the tracks of a `TrackStore`.
///
/// The tracker only holds its parameters; all state lives in the store it is
/// handed, so one tracker can serve any number of stores.
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    config: TrackerConfig,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Assign `center`, observed at `current_frame`, to a track.
    ///
    /// The first track in creation order whose last sighting is within
    /// `max_frame_gap` frames and strictly closer than `distance_threshold`
    /// is extended. Otherwise a new track is created.
    pub fn update(
        &self,
        store: &mut TrackStore,
        center: Position,
        current_frame: u64,
    ) -> TrackUpdate {
        let matched = matching::first_match(
            store.iter(),
            &center,
            current_frame,
            self.config.max_frame_gap,
            self.config.distance_threshold,
        );

        if let Some(id) = matched {
            if store.record(id, current_frame, center) {
                trace!("frame {current_frame}: {center} matched {id}");
                return TrackUpdate { id, is_new: false };
            }
        }

        let id = store.create(current_frame, center);
        debug!("frame {current_frame}: {center} started {id}");
        TrackUpdate { id, is_new: true }
    }

    /// Truncate every track history to the configured window.
    pub fn prune(&self, store: &mut TrackStore) {
        store.prune(self.config.history_window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(
        distance_threshold: f64,
        max_frame_gap: u64,
        history_window: usize,
    ) -> CentroidTracker {
        CentroidTracker::new(TrackerConfig {
            distance_threshold,
            max_frame_gap,
            history_window,
        })
        .unwrap()
    }

    #[test]
    fn test_first_update_creates_id0() {
        let tracker = tracker(30.0, 10, 100);
        let mut store = TrackStore::new();
        let update = tracker.update(&mut store, Position::new(5, 5), 0);
        assert_eq!(update, TrackUpdate { id: TrackId(0), is_new: true });
        assert_eq!(update.id.to_string(), "ID0");
    }

    #[test]
    fn test_distance_boundary() {
        let tracker = tracker(30.0, 10, 100);
        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(100, 100), 0);

        let at_threshold = tracker.update(&mut store, Position::new(130, 100), 1);
        assert!(at_threshold.is_new);
        assert_eq!(at_threshold.id, TrackId(1));

        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(100, 100), 0);
        let inside = tracker.update(&mut store, Position::new(129, 100), 1);
        assert_eq!(inside, TrackUpdate { id: TrackId(0), is_new: false });
    }

    #[test]
    fn test_staleness_boundary() {
        let tracker = tracker(30.0, 10, 100);

        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(100, 100), 5);
        let update = tracker.update(&mut store, Position::new(100, 100), 15);
        assert!(!update.is_new);

        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(100, 100), 5);
        let update = tracker.update(&mut store, Position::new(100, 100), 16);
        assert!(update.is_new);
        assert_eq!(update.id, TrackId(1));
    }

    #[test]
    fn test_tie_break_prefers_older_track() {
        let tracker = tracker(30.0, 10, 100);
        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(100, 100), 0);
        tracker.update(&mut store, Position::new(140, 100), 0);

        // 15px from ID1, 25px from ID0: both eligible, ID0 was created first.
        let update = tracker.update(&mut store, Position::new(125, 100), 1);
        assert_eq!(update.id, TrackId(0));
        assert_eq!(
            store.get(TrackId(0)).and_then(|t| t.last_position()),
            Some(Position::new(125, 100))
        );
    }

    #[test]
    fn test_same_frame_detections_share_track() {
        let tracker = tracker(30.0, 10, 100);
        let mut store = TrackStore::new();
        let a = tracker.update(&mut store, Position::new(100, 100), 3);
        let b = tracker.update(&mut store, Position::new(110, 100), 3);
        assert_eq!(a.id, b.id);
        assert!(!b.is_new);
        let track = store.get(a.id).unwrap();
        assert_eq!(track.history_len(), 1);
        assert_eq!(track.last(), Some((3, Position::new(110, 100))));
    }

    #[test]
    fn test_prune_uses_history_window() {
        let tracker = tracker(30.0, 10, 3);
        let mut store = TrackStore::new();
        for frame in 0..10 {
            tracker.update(&mut store, Position::new(100, 100), frame);
        }
        tracker.prune(&mut store);
        let frames: Vec<u64> = store
            .get(TrackId(0))
            .unwrap()
            .history()
            .map(|(f, _)| f)
            .collect();
        assert_eq!(frames, vec![7, 8, 9]);
    }

    #[test]
    fn test_zero_threshold_never_matches() {
        let tracker = tracker(0.0, 10, 100);
        let mut store = TrackStore::new();
        tracker.update(&mut store, Position::new(1, 1), 0);
        assert!(tracker.update(&mut store, Position::new(1, 1), 0).is_new);
    }

    #[test]
    fn test_invalid_config() {
        let bad_distance = TrackerConfig {
            distance_threshold: -1.0,
            ..TrackerConfig::default()
        };
        assert_eq!(
            CentroidTracker::new(bad_distance).unwrap_err(),
            ConfigError::InvalidDistanceThreshold(-1.0)
        );

        let nan_distance = TrackerConfig {
            distance_threshold: f64::NAN,
            ..TrackerConfig::default()
        };
        assert!(nan_distance.validate().is_err());

        let zero_window = TrackerConfig {
            history_window: 0,
            ..TrackerConfig::default()
        };
        assert_eq!(
            CentroidTracker::new(zero_window).unwrap_err(),
            ConfigError::ZeroHistoryWindow
        );
    }
}
