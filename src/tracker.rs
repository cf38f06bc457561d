mod centroid_tracker;
pub mod matching;
mod rect;
mod track;
mod track_store;

pub use centroid_tracker::{CentroidTracker, TrackUpdate, TrackerConfig};
pub use matching::Detection;
pub use rect::{Position, Rect};
pub use track::{Track, TrackId};
pub use track_store::TrackStore;
