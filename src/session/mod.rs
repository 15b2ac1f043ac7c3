//! The playback session: one owner for the playlist, the engine and the lyrics state.
//!
//! Everything arrives as a [`SessionEvent`] and is handled to completion before the next
//! one. The engine is the only source of truth for which entry is playing; skips are sent
//! to it and the playlist position follows the `FilenameChanged` it reports back.

mod error;
mod events;
pub mod runner;
mod snapshot;

pub use error::SessionError;
pub use events::{Command, SessionEvent};
pub use snapshot::{Alert, LyricsView, NowPlaying, PlaybackState, RepeatMode, SessionView};

use crate::library::{self, Direction, PlaylistStore};
use crate::lyrics::{LyricsProvider, LyricsResolver, LyricsState};
use crate::player::{Engine, EngineError, EngineEvent, EngineResult, LoadMode};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use snapshot::Outputs;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Session {
    engine: Option<Box<dyn Engine>>,
    playlist: PlaylistStore,
    lyrics: LyricsResolver,
    repeat: RepeatMode,
    state: PlaybackState,
    rng: Box<dyn RngCore + Send>,
    outputs: Outputs,
}

impl Session {
    /// `events` must feed the loop that calls [`Session::handle`]; lyrics replies come back on it.
    pub fn new(
        engine: Option<Box<dyn Engine>>,
        provider: Arc<dyn LyricsProvider>,
        events: mpsc::Sender<SessionEvent>,
    ) -> (Self, SessionView) {
        let (outputs, view) = Outputs::new();
        let session = Self {
            engine,
            playlist: PlaylistStore::new(),
            lyrics: LyricsResolver::new(provider, events),
            repeat: RepeatMode::Off,
            state: PlaybackState::Idle,
            rng: Box::new(StdRng::from_entropy()),
            outputs,
        };
        (session, view)
    }

    /// Use a specific random source for shuffling.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn lyrics_state(&self) -> &LyricsState {
        self.lyrics.state()
    }

    /// Handle one event. `Break` means the session has shut down.
    ///
    /// Engine commands block until the engine replies or `reply_timeout_ms` passes, so callers
    /// on an async runtime should go through [`runner::run`].
    pub fn handle(&mut self, event: SessionEvent) -> ControlFlow<()> {
        match event {
            SessionEvent::Command(Command::Quit) => {
                self.shutdown();
                return ControlFlow::Break(());
            }
            SessionEvent::Command(command) => {
                tracing::debug!(?command, "command");
                if let Err(e) = self.run_command(command) {
                    tracing::warn!(error = %e, "command failed");
                    self.outputs.alert(e.to_string());
                }
            }
            SessionEvent::Engine(EngineEvent::FilenameChanged(name)) => {
                if let Err(e) = self.on_filename_changed(name) {
                    tracing::warn!(error = %e, "ignoring engine event");
                }
            }
            SessionEvent::Lyrics(reply) => {
                if self.lyrics.apply(reply) {
                    self.publish_lyrics();
                }
            }
            SessionEvent::Tick => {
                if self.state == PlaybackState::Active {
                    self.publish_now_playing();
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Stop the engine process. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(engine) = &self.engine {
            if let Err(e) = engine.terminate() {
                tracing::warn!(error = %e, "engine did not shut down cleanly");
            }
        }
        tracing::info!("session shut down");
    }

    fn run_command(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Select(path) => self.select(&path),
            Command::TogglePause => {
                self.require_active()?;
                let engine = engine_ref(&self.engine)?;
                let paused = engine.is_paused().unwrap_or(false);
                engine.set_paused(!paused)?;
                Ok(())
            }
            Command::Seek { seconds, mode } => {
                self.require_active()?;
                engine_ref(&self.engine)?.seek(seconds, mode)?;
                Ok(())
            }
            Command::Next => self.skip(Direction::Next),
            Command::Prev => self.skip(Direction::Prev),
            Command::ToggleShuffle => self.toggle_shuffle(),
            Command::ToggleRepeat => self.toggle_repeat(),
            Command::ManualLyrics(url) => {
                self.require_active()?;
                self.lyrics
                    .request_manual(&url)
                    .ok_or(SessionError::ManualLyricsNotExpected)?;
                self.publish_lyrics();
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    fn select(&mut self, path: &Path) -> Result<(), SessionError> {
        let engine = engine_ref(&self.engine)?;
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let tracks = library::scan_directory(dir)?;

        // the new listing only replaces the old one once the engine is playing it
        let mut playlist = PlaylistStore::new();
        let position = playlist.replace(tracks, path)?;
        if let Some(track) = playlist.current() {
            tracing::info!(track = %track.title(), position, "selected");
            engine.load(track, LoadMode::Replace)?;
        }
        self.playlist = playlist;
        self.state = PlaybackState::Active;
        self.publish_now_playing();
        self.publish_queue();

        enqueue_remaining(engine_ref(&self.engine)?, &self.playlist)?;
        Ok(())
    }

    fn skip(&mut self, direction: Direction) -> Result<(), SessionError> {
        self.require_active()?;
        let engine = engine_ref(&self.engine)?;
        let sent = match direction {
            Direction::Next => engine.skip_next(),
            Direction::Prev => engine.skip_prev(),
        };

        match sent {
            Ok(()) => Ok(()),
            Err(EngineError::Rejected(reason)) => {
                // engine ran off its own list; wrap around our playlist instead
                tracing::debug!(%reason, ?direction, "wrapping around the playlist");
                if let Some(track) = self.playlist.advance(direction) {
                    engine.load(track, LoadMode::Replace)?;
                }
                enqueue_remaining(engine, &self.playlist)?;
                self.publish_queue();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn toggle_shuffle(&mut self) -> Result<(), SessionError> {
        self.require_active()?;
        let engine = engine_ref(&self.engine)?;
        let enabled = self.playlist.toggle_shuffle(&mut *self.rng);
        tracing::info!(enabled, "shuffle");

        engine.queue_clear()?;
        enqueue_remaining(engine, &self.playlist)?;

        self.publish_now_playing();
        self.publish_queue();
        Ok(())
    }

    fn toggle_repeat(&mut self) -> Result<(), SessionError> {
        self.require_active()?;
        let next = self.repeat.toggled();
        engine_ref(&self.engine)?.set_loop_current_track(next == RepeatMode::RepeatCurrentTrack)?;
        self.repeat = next;
        tracing::info!(repeat = ?next, "repeat");
        self.publish_now_playing();
        Ok(())
    }

    fn on_filename_changed(&mut self, name: Option<String>) -> Result<(), SessionError> {
        if self.state == PlaybackState::Idle {
            tracing::debug!(?name, "engine event before any selection");
            return Ok(());
        }
        let Some(name) = name else {
            tracing::debug!("engine between entries");
            return Ok(());
        };
        let position = self
            .playlist
            .position_of_file_name(&name)
            .ok_or(SessionError::UnmatchedEngineTrack(name))?;

        let Some(track) = self.playlist.set_position(position).cloned() else {
            return Ok(());
        };
        tracing::info!(track = %track.title(), position, "now playing");
        self.publish_now_playing();
        self.publish_queue();

        if !self.lyrics.covers(&track) {
            self.lyrics.request(&track);
            self.publish_lyrics();
        }
        Ok(())
    }

    fn require_active(&self) -> Result<(), SessionError> {
        match self.state {
            PlaybackState::Active => Ok(()),
            PlaybackState::Idle => Err(SessionError::NotActive),
        }
    }

    fn publish_now_playing(&self) {
        let engine = self.engine.as_deref();
        self.outputs.now_playing(NowPlaying {
            track: self.playlist.current().cloned(),
            elapsed: engine.and_then(|e| e.elapsed_seconds()),
            duration: engine.and_then(|e| e.duration_seconds()),
            paused: engine.and_then(|e| e.is_paused()).unwrap_or(false),
            shuffle: self.playlist.is_shuffled(),
            repeat: self.repeat,
        });
    }

    fn publish_queue(&self) {
        self.outputs
            .queue(self.playlist.remaining_after_current().cloned().collect());
    }

    fn publish_lyrics(&self) {
        self.outputs.lyrics(LyricsView {
            track: self.lyrics.track().cloned(),
            state: self.lyrics.state().clone(),
        });
    }
}

fn engine_ref(engine: &Option<Box<dyn Engine>>) -> Result<&dyn Engine, SessionError> {
    engine.as_deref().ok_or(SessionError::EngineUnavailable)
}

/// Append every track after the current one to the engine's list, in order.
pub fn enqueue_remaining(engine: &dyn Engine, playlist: &PlaylistStore) -> EngineResult<()> {
    for track in playlist.remaining_after_current() {
        engine.enqueue_append(track)?;
    }
    Ok(())
}
