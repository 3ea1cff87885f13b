//! Track lifecycle management: a pool of FREE tracks handed out to new
//! targets and released back when a target is dropped.

use crate::filter::CvFilter;
use crate::types::Detection;

/// Occupancy of a single slot in the track pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackState {
    Free,
    Occupied,
}

/// One track slot: a filter, its detection history, and occupancy.
#[derive(Clone, Debug)]
pub struct Track {
    pub id: usize,
    pub state: TrackState,
    pub filter: CvFilter,
    pub history: Vec<Detection>,
}

impl Track {
    fn new(id: usize, filter: CvFilter) -> Self {
        Self {
            id,
            state: TrackState::Free,
            filter,
            history: Vec::new(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == TrackState::Free
    }

    /// Hand this FREE slot to a new target, resetting its filter and
    /// history. Internal to track acquisition; not part of spec.md §4.5's
    /// `TrackManager` operations.
    fn occupy(&mut self, template: &CvFilter) {
        self.state = TrackState::Occupied;
        self.filter = template.clone();
        self.history.clear();
    }

    /// Set state OCCUPIED and append `detection` to history.
    pub fn assign(&mut self, detection: Detection) {
        self.state = TrackState::Occupied;
        self.history.push(detection);
    }

    /// Return this slot to the free pool.
    pub fn release(&mut self) {
        self.state = TrackState::Free;
        self.history.clear();
    }
}

/// A preallocated pool of tracks, grown on demand.
#[derive(Clone, Debug)]
pub struct TrackManager {
    tracks: Vec<Track>,
    template: CvFilter,
}

impl TrackManager {
    /// Preallocate `pool_size` FREE tracks, each seeded from `template`
    /// (only its configuration matters until a track is assigned).
    pub fn new(pool_size: usize, template: CvFilter) -> Self {
        let mut tracks = Vec::with_capacity(pool_size);
        for id in 1..=pool_size {
            tracks.push(Track::new(id, template.clone()));
        }
        Self { tracks, template }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a new FREE track to the pool and return its id.
    pub fn add_track(&mut self) -> usize {
        let id = self.tracks.len() + 1;
        self.tracks.push(Track::new(id, self.template.clone()));
        id
    }

    /// Return the id of a FREE track, creating one if the pool is exhausted.
    pub fn get_free_track(&mut self) -> usize {
        if let Some(t) = self.tracks.iter().find(|t| t.is_free()) {
            return t.id;
        }
        self.add_track()
    }

    pub fn track_mut(&mut self, id: usize) -> &mut Track {
        &mut self.tracks[id - 1]
    }

    pub fn track(&self, id: usize) -> &Track {
        &self.tracks[id - 1]
    }

    /// Transition a freshly acquired track to OCCUPIED with a fresh filter,
    /// discarding any prior history. Call once per `get_free_track()`/
    /// `add_track()` result before the first `assign`.
    pub fn occupy(&mut self, id: usize, template: &CvFilter) {
        self.track_mut(id).occupy(template);
    }

    pub fn release(&mut self, id: usize) {
        self.track_mut(id).release();
    }
}
