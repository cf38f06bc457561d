//! Storage for every track created during one video.

use crate::tracker::rect::Position;
use crate::tracker::track::{Track, TrackId};

/// All tracks in creation order, plus the id of the most recent one.
///
/// Tracks are never removed. Only their histories shrink when pruned.
#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
    last_assigned: Option<TrackId>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the most recently created track, `None` before the first one.
    pub fn last_assigned_id(&self) -> Option<TrackId> {
        self.last_assigned
    }

    /// Id the next created track will receive.
    pub fn next_id(&self) -> TrackId {
        self.last_assigned.map_or(TrackId(0), TrackId::next)
    }

    /// Create a track for a first sighting and return its id.
    pub fn create(&mut self, frame: u64, position: Position) -> TrackId {
        let id = self.next_id();
        self.tracks.push(Track::new(id, frame, position));
        self.last_assigned = Some(id);
        id
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        let index = self.index_of(id)?;
        self.tracks.get(index)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        let index = self.index_of(id)?;
        self.tracks.get_mut(index)
    }

    /// Append a sighting to an existing track. Returns `false` for unknown ids.
    pub fn record(&mut self, id: TrackId, frame: u64, position: Position) -> bool {
        match self.get_mut(id) {
            Some(track) => {
                track.record(frame, position);
                true
            }
            None => false,
        }
    }

    /// Iterate tracks in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Truncate every history to its `window` most recent entries.
    pub fn prune(&mut self, window: usize) {
        for track in &mut self.tracks {
            track.retain_recent(window);
        }
    }

    // Ids are handed out sequentially from zero, so the id doubles as the
    // arena index. The id check guards against ids from another store.
    fn index_of(&self, id: TrackId) -> Option<usize> {
        let index = usize::try_from(id.0).ok()?;
        self.tracks
            .get(index)
            .filter(|track| track.id() == id)
            .map(|_| index)
    }
}

impl<'a> IntoIterator for &'a TrackStore {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
