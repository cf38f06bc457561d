//! Single object track and its positional history.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Position;

/// Track identifier.
///
/// Stored as a plain integer; rendered as `ID<n>` for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl TrackId {
    /// The id following this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID{}", self.0)
    }
}

/// Single object track.
///
/// The history maps frame index to position. Frame indices are strictly
/// increasing front to back and the history is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,
    history: VecDeque<(u64, Position)>,
}

impl Track {
    /// Create a track observed once at `frame`.
    pub fn new(id: TrackId, frame: u64, position: Position) -> Self {
        let mut history = VecDeque::with_capacity(1);
        history.push_back((frame, position));
        Self { id, history }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Most recent (frame, position) entry. Always `Some` for a live track.
    pub fn last(&self) -> Option<(u64, Position)> {
        self.history.back().copied()
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.history.back().map(|&(frame, _)| frame)
    }

    pub fn last_position(&self) -> Option<Position> {
        self.history.back().map(|&(_, pos)| pos)
    }

    /// Record a sighting.
    ///
    /// A second sighting in the frame of the last entry replaces that entry's
    /// position instead of adding a new one.
    pub fn record(&mut self, frame: u64, position: Position) {
        match self.history.back_mut() {
            Some(last) if last.0 == frame => last.1 = position,
            _ => self.history.push_back((frame, position)),
        }
    }

    /// Iterate the history oldest first.
    pub fn history(&self) -> impl Iterator<Item = (u64, Position)> + '_ {
        self.history.iter().copied()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether this track can no longer be matched at `current_frame`.
    pub fn is_stale(&self, current_frame: u64, max_frame_gap: u64) -> bool {
        self.last_frame()
            .is_none_or(|frame| frame.abs_diff(current_frame) > max_frame_gap)
    }

    /// Keep only the `window` most recent entries.
    pub fn retain_recent(&mut self, window: usize) {
        let excess = self.history.len().saturating_sub(window);
        self.history.drain(..excess);
    }
}
