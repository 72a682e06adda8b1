use crate::cursor::PlaybackCursor;
use crate::player::AudioPlayer;
use crate::state::{
    ControllerSnapshot, ControllerStatus, Direction, Intent, PlaybackState,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tunepeek_core::{Preview, SearchError, Track};
use tunepeek_gateway::SearchGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Term(String),
    Lookup(i64),
}

/// Outcome of one gateway request, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub struct SearchCompletion {
    pub seq: u64,
    pub request: SearchRequest,
    pub result: Result<Vec<Track>, SearchError>,
}

/// Owns search results, UI status and playback bookkeeping.
///
/// All mutation goes through `&mut self` on the owning task. Gateway calls run
/// on spawned tasks and come back as [`SearchCompletion`]s that the owner feeds
/// to [`apply_completion`](Self::apply_completion); only the completion for the
/// latest request is ever applied.
pub struct SearchPlaybackController {
    gateway: Arc<dyn SearchGateway>,
    player: Box<dyn AudioPlayer>,
    query: String,
    tracks: Arc<Vec<Track>>,
    status: ControllerStatus,
    playback: PlaybackState,
    request_seq: u64,
    in_flight: Option<JoinHandle<()>>,
    completion_tx: mpsc::UnboundedSender<SearchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<SearchCompletion>,
    published: watch::Sender<ControllerSnapshot>,
    revision: u64,
}

impl SearchPlaybackController {
    pub fn new(gateway: Arc<dyn SearchGateway>, player: Box<dyn AudioPlayer>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (published, _) = watch::channel(ControllerSnapshot::initial());
        info!(gateway = gateway.name(), player = player.name(), "controller ready");
        Self {
            gateway,
            player,
            query: String::new(),
            tracks: Arc::new(Vec::new()),
            status: ControllerStatus::FirstLaunch,
            playback: PlaybackState::default(),
            request_seq: 0,
            in_flight: None,
            completion_tx,
            completion_rx,
            published,
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.published.subscribe()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn handle(&mut self, intent: Intent) {
        self.sync_playback();
        match intent {
            Intent::SetQuery(text) => self.update_query(text),
            Intent::SubmitSearch => {
                self.submit_search();
            }
            Intent::Lookup(id) => {
                self.lookup_track(id);
            }
            Intent::ClearResults => self.clear_results(),
            Intent::SelectTrack(id) => {
                self.select_track(id);
            }
            Intent::PlayPause => self.toggle_playback(),
            Intent::Next => {
                self.advance(Direction::Next);
            }
            Intent::Previous => {
                self.advance(Direction::Previous);
            }
        }
    }

    pub fn update_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.publish();
    }

    /// Searches for the stored query. Returns the request sequence number, or
    /// `None` when the query was blank and the controller went back to first launch.
    pub fn submit_search(&mut self) -> Option<u64> {
        let term = self.query.trim().to_string();
        if term.is_empty() {
            debug!("blank query; back to first launch without a request");
            self.invalidate_in_flight();
            self.tracks = Arc::new(Vec::new());
            self.status = ControllerStatus::FirstLaunch;
            self.publish();
            return None;
        }
        Some(self.dispatch(SearchRequest::Term(term)))
    }

    pub fn lookup_track(&mut self, id: i64) -> u64 {
        self.dispatch(SearchRequest::Lookup(id))
    }

    /// Waits for the next gateway completion, stale or not.
    pub async fn next_completion(&mut self) -> Option<SearchCompletion> {
        self.completion_rx.recv().await
    }

    /// Applies a completion if it belongs to the latest request. Returns whether it did.
    pub fn apply_completion(&mut self, completion: SearchCompletion) -> bool {
        if completion.seq != self.request_seq {
            debug!(
                seq = completion.seq,
                latest = self.request_seq,
                "discarding stale search completion"
            );
            return false;
        }
        self.in_flight = None;

        match completion.result {
            Ok(tracks) if tracks.is_empty() => {
                info!(request = ?completion.request, "search returned no tracks");
                self.tracks = Arc::new(Vec::new());
                self.status = ControllerStatus::Empty;
            }
            Ok(tracks) => {
                info!(request = ?completion.request, count = tracks.len(), "search loaded");
                self.tracks = Arc::new(tracks);
                self.status = ControllerStatus::Loaded;
            }
            Err(err) => {
                warn!(request = ?completion.request, error = %err, "search failed");
                self.tracks = Arc::new(Vec::new());
                self.status = ControllerStatus::Failed(err);
            }
        }
        self.publish();
        true
    }

    /// Drives completions until the latest request has resolved.
    ///
    /// A search task that dies without reporting back settles as a network failure.
    pub async fn settle(&mut self) {
        while self.status == ControllerStatus::Loading {
            if let Some(handle) = self.in_flight.take() {
                if let Err(err) = handle.await {
                    warn!(seq = self.request_seq, error = %err, "search task ended without a result");
                    self.tracks = Arc::new(Vec::new());
                    self.status = ControllerStatus::Failed(SearchError::Network(format!(
                        "search task ended without a result: {err}"
                    )));
                    self.publish();
                    return;
                }
            }
            match self.completion_rx.try_recv() {
                Ok(completion) => {
                    self.apply_completion(completion);
                }
                Err(_) => break,
            }
        }
    }

    /// Clears `is_playing` when the player has stopped on its own (end of the
    /// preview, a dead stream). Returns whether anything changed.
    pub fn sync_playback(&mut self) -> bool {
        if !self.playback.is_playing || self.player.is_active() {
            return false;
        }
        info!(
            track_id = ?self.playback.current_id(),
            "audio player stopped on its own"
        );
        self.playback.is_playing = false;
        self.publish();
        true
    }

    /// Drops results and playback bookkeeping. The audio player keeps running.
    pub fn clear_results(&mut self) {
        self.invalidate_in_flight();
        self.tracks = Arc::new(Vec::new());
        self.status = ControllerStatus::FirstLaunch;
        self.playback = PlaybackState::default();
        self.publish();
    }

    pub fn play(&mut self, track: Track) {
        match track.preview() {
            Preview::Available(url) => match self.player.play(&url) {
                Ok(()) => {
                    info!(track_id = track.id, track = %track.track_name, "playing preview");
                    self.playback.is_playing = true;
                }
                Err(err) => {
                    warn!(track_id = track.id, error = %err, "audio player failed to start");
                    self.playback.is_playing = false;
                }
            },
            Preview::Missing | Preview::Invalid(_) => {
                warn!(track_id = track.id, preview = ?track.preview_url, "track has no playable preview");
                if self.playback.is_playing {
                    if let Err(err) = self.player.pause() {
                        warn!(error = %err, "audio player failed to stop");
                    }
                }
                self.playback.is_playing = false;
            }
        }
        self.playback.current_track = Some(track);
        self.publish();
    }

    pub fn pause(&mut self) {
        if !self.playback.is_playing {
            debug!("pause ignored; nothing is playing");
            return;
        }
        if let Err(err) = self.player.pause() {
            warn!(error = %err, "audio player failed to stop");
        }
        self.playback.is_playing = false;
        self.publish();
    }

    pub fn toggle_playback(&mut self) {
        self.sync_playback();
        if self.playback.is_playing {
            self.pause();
        } else if let Some(track) = self.playback.current_track.clone() {
            self.play(track);
        } else {
            debug!("play/pause ignored; no current track");
        }
    }

    /// Plays the listed track with `id`. Unknown ids are ignored.
    pub fn select_track(&mut self, id: i64) -> bool {
        match self.tracks.iter().find(|t| t.id == id).cloned() {
            Some(track) => {
                self.play(track);
                true
            }
            None => {
                warn!(track_id = id, "selected track is not in the current results");
                false
            }
        }
    }

    pub fn advance(&mut self, direction: Direction) -> bool {
        let target = PlaybackCursor::new(&self.tracks, self.playback.current_id())
            .step(direction)
            .cloned();
        match target {
            Some(track) => {
                self.play(track);
                true
            }
            None => {
                debug!(?direction, "advance ignored; current track not listed");
                false
            }
        }
    }

    fn dispatch(&mut self, request: SearchRequest) -> u64 {
        self.invalidate_in_flight();
        let seq = self.request_seq;
        self.status = ControllerStatus::Loading;
        self.publish();

        info!(seq, request = ?request, "search dispatched");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.completion_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = match &request {
                SearchRequest::Term(term) => gateway.search(term).await,
                SearchRequest::Lookup(id) => gateway.lookup(*id).await,
            };
            let _ = tx.send(SearchCompletion {
                seq,
                request,
                result,
            });
        }));
        seq
    }

    fn invalidate_in_flight(&mut self) {
        self.request_seq += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.published.send_replace(ControllerSnapshot {
            revision: self.revision,
            query: self.query.clone(),
            status: self.status.clone(),
            tracks: Arc::clone(&self.tracks),
            playback: self.playback.clone(),
        });
    }
}
