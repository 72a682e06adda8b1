use crate::state::Direction;
use tunepeek_core::Track;

/// Next/previous navigation over a result list, anchored on a track id.
///
/// When the anchor is unset or no longer listed every step yields `None`,
/// which callers treat as "do nothing".
#[derive(Debug, Clone, Copy)]
pub struct PlaybackCursor<'a> {
    tracks: &'a [Track],
    current_id: Option<i64>,
}

impl<'a> PlaybackCursor<'a> {
    pub fn new(tracks: &'a [Track], current_id: Option<i64>) -> Self {
        Self { tracks, current_id }
    }

    pub fn position(&self) -> Option<usize> {
        let id = self.current_id?;
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn next(&self) -> Option<&'a Track> {
        let idx = self.position()?;
        self.tracks.get((idx + 1) % self.tracks.len())
    }

    pub fn previous(&self) -> Option<&'a Track> {
        let idx = self.position()?;
        let len = self.tracks.len();
        self.tracks.get((idx + len - 1) % len)
    }

    pub fn step(&self, direction: Direction) -> Option<&'a Track> {
        match direction {
            Direction::Next => self.next(),
            Direction::Previous => self.previous(),
        }
    }
}
