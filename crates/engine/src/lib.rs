pub mod controller;
pub mod cursor;
pub mod player;
pub mod state;

pub use controller::{SearchCompletion, SearchPlaybackController, SearchRequest};
pub use cursor::PlaybackCursor;
pub use player::{AudioPlayer, NullPlayer, PlaybackError};
pub use state::{
    ControllerSnapshot, ControllerStatus, Direction, Intent, PlaybackState, Presentation,
};
