use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("failed to start audio: {0}")]
    Spawn(String),

    #[error("failed to stop audio: {0}")]
    Stop(String),

    #[error("audio device error: {0}")]
    Device(String),
}

/// Starts and stops preview playback.
///
/// Calls must return quickly; any real work (decoding, output) belongs to
/// whatever sits behind the implementation.
pub trait AudioPlayer: Send {
    fn name(&self) -> &'static str;
    fn play(&mut self, url: &Url) -> Result<(), PlaybackError>;
    fn pause(&mut self) -> Result<(), PlaybackError>;

    /// Whether audio started by the last `play` is still going. Players that
    /// cannot tell report `true`.
    fn is_active(&mut self) -> bool {
        true
    }
}

/// Player that accepts every request and produces no sound.
#[derive(Debug, Default)]
pub struct NullPlayer;

impl AudioPlayer for NullPlayer {
    fn name(&self) -> &'static str {
        "null"
    }

    fn play(&mut self, _url: &Url) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}
