//! Matching utilities for centroid tracking.

use serde::{Deserialize, Serialize};

use crate::tracker::rect::{Position, Rect};
use crate::tracker::track::{Track, TrackId};

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box, built from TLBR (xmin, ymin, xmax, ymax)
    pub bbox: Rect,
    /// Detection confidence score
    pub score: f32,
    /// Detector class index
    pub class_id: u32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            score,
            class_id: 0,
        }
    }

    pub fn from_rect(bbox: Rect, score: f32) -> Self {
        Self {
            bbox,
            score,
            class_id: 0,
        }
    }

    pub fn with_class(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Integer center fed to the tracker.
    pub fn center(&self) -> Position {
        self.bbox.center_point()
    }
}

/// Staleness filter: a track last seen at `last_frame` may still be matched.
#[inline]
pub fn within_frame_gap(last_frame: u64, current_frame: u64, max_frame_gap: u64) -> bool {
    last_frame.abs_diff(current_frame) <= max_frame_gap
}

/// Strict distance test between a track's last position and a new center.
#[inline]
pub fn within_distance(last: &Position, center: &Position, threshold: f64) -> bool {
    last.distance(center) < threshold
}

/// Return the first track, in iteration order, eligible for `center`.
///
/// Eligibility means the track's last entry passes both the staleness and
/// the distance filter. The first eligible track wins even when a later one
/// is closer.
pub fn first_match<'a, I>(
    tracks: I,
    center: &Position,
    current_frame: u64,
    max_frame_gap: u64,
    distance_threshold: f64,
) -> Option<TrackId>
where
    I: IntoIterator<Item = &'a Track>,
{
    tracks
        .into_iter()
        .filter_map(|track| track.last().map(|(frame, pos)| (track.id(), frame, pos)))
        .filter(|&(_, frame, _)| within_frame_gap(frame, current_frame, max_frame_gap))
        .find(|(_, _, pos)| within_distance(pos, center, distance_threshold))
        .map(|(id, _, _)| id)
}
