use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, warn};
use tunepeek_core::PlayerConfig;
use tunepeek_engine::{AudioPlayer, PlaybackError};
use url::Url;

/// Plays previews by handing the URL to an external media player process
/// (`ffplay`, `mpv`, ...). Pausing kills the process; playing again restarts
/// the preview from the beginning.
///
/// Must be used from inside a tokio runtime.
pub struct ProcessPlayer {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl ProcessPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            child: None,
        }
    }

    pub fn from_config(cfg: &PlayerConfig) -> Self {
        Self::new(cfg.command.clone(), cfg.args.clone())
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn stop_child(&mut self) -> Result<(), PlaybackError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "player already exited");
                Ok(())
            }
            _ => child
                .start_kill()
                .map_err(|err| PlaybackError::Stop(err.to_string())),
        }
    }
}

impl AudioPlayer for ProcessPlayer {
    fn name(&self) -> &'static str {
        "process"
    }

    fn play(&mut self, url: &Url) -> Result<(), PlaybackError> {
        if let Err(err) = self.stop_child() {
            warn!(error = %err, "previous player did not stop cleanly");
        }

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| PlaybackError::Spawn(format!("{}: {err}", self.command)))?;

        debug!(command = %self.command, pid = ?child.id(), url = %url, "player spawned");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.stop_child()
    }

    fn is_active(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(%status, "player exited");
                self.child = None;
                false
            }
            Err(err) => {
                warn!(error = %err, "could not poll player process");
                false
            }
        }
    }
}
