use std::sync::Arc;
use tunepeek_core::{SearchError, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Where the search side of the controller currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerStatus {
    FirstLaunch,
    Loading,
    Empty,
    Loaded,
    Failed(SearchError),
}

/// What the user actually gets to see. Empty results and failed requests
/// both read as "no songs found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Welcome,
    Loading,
    NoSongsFound,
    Results,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn current_id(&self) -> Option<i64> {
        self.current_track.as_ref().map(|t| t.id)
    }
}

/// Immutable copy of controller state, published after every transition.
#[derive(Debug, Clone)]
pub struct ControllerSnapshot {
    pub revision: u64,
    pub query: String,
    pub status: ControllerStatus,
    pub tracks: Arc<Vec<Track>>,
    pub playback: PlaybackState,
}

impl ControllerSnapshot {
    pub fn initial() -> Self {
        Self {
            revision: 0,
            query: String::new(),
            status: ControllerStatus::FirstLaunch,
            tracks: Arc::new(Vec::new()),
            playback: PlaybackState::default(),
        }
    }

    pub fn is_first_launch(&self) -> bool {
        self.status == ControllerStatus::FirstLaunch
    }

    pub fn is_loading(&self) -> bool {
        self.status == ControllerStatus::Loading
    }

    pub fn no_songs_found(&self) -> bool {
        matches!(
            self.status,
            ControllerStatus::Empty | ControllerStatus::Failed(_)
        )
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        match &self.status {
            ControllerStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self.status {
            ControllerStatus::FirstLaunch => Presentation::Welcome,
            ControllerStatus::Loading => Presentation::Loading,
            ControllerStatus::Empty | ControllerStatus::Failed(_) => Presentation::NoSongsFound,
            ControllerStatus::Loaded => Presentation::Results,
        }
    }

    /// Index of the current track inside `tracks`, if it is listed.
    pub fn current_index(&self) -> Option<usize> {
        let id = self.playback.current_id()?;
        self.tracks.iter().position(|t| t.id == id)
    }
}

/// Everything a front end can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetQuery(String),
    SubmitSearch,
    Lookup(i64),
    ClearResults,
    SelectTrack(i64),
    PlayPause,
    Next,
    Previous,
}

#[cfg(test)]
mod tests {
    use super::{ControllerSnapshot, ControllerStatus, PlaybackState, Presentation};
    use std::sync::Arc;
    use tunepeek_core::{SearchError, Track};

    #[test]
    fn empty_and_failed_collapse_to_no_songs_found() {
        let mut snap = ControllerSnapshot::initial();
        assert_eq!(snap.presentation(), Presentation::Welcome);
        assert!(snap.is_first_launch());

        snap.status = ControllerStatus::Empty;
        assert_eq!(snap.presentation(), Presentation::NoSongsFound);
        assert!(snap.last_error().is_none());

        snap.status = ControllerStatus::Failed(SearchError::Network("down".to_string()));
        assert_eq!(snap.presentation(), Presentation::NoSongsFound);
        assert!(snap.no_songs_found());
        assert!(!snap.is_loading());
        assert!(snap.last_error().is_some());
    }

    #[test]
    fn current_index_follows_track_id() {
        let a = Track::new(1, "A", "One");
        let b = Track::new(2, "B", "Two");
        let mut snap = ControllerSnapshot::initial();
        snap.tracks = Arc::new(vec![a, b.clone()]);
        snap.playback = PlaybackState {
            current_track: Some(b),
            is_playing: true,
        };
        assert_eq!(snap.current_index(), Some(1));

        snap.playback.current_track = Some(Track::new(99, "X", "Gone"));
        assert_eq!(snap.current_index(), None);
    }
}
