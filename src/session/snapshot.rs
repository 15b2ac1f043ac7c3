//! Immutable state published by the session for the UI.

use crate::library::Track;
use crate::lyrics::LyricsState;
use tokio::sync::{broadcast, watch};

const ALERT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    RepeatCurrentTrack,
}

impl RepeatMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::RepeatCurrentTrack,
            Self::RepeatCurrentTrack => Self::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub track: Option<Track>,
    pub elapsed: Option<f64>,
    pub duration: Option<f64>,
    pub paused: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

/// Lyrics together with the track they were looked up for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricsView {
    pub track: Option<Track>,
    pub state: LyricsState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

/// The UI's read side of a session.
pub struct SessionView {
    pub now_playing: watch::Receiver<NowPlaying>,
    pub lyrics: watch::Receiver<LyricsView>,
    /// Tracks queued after the current one.
    pub queue: watch::Receiver<Vec<Track>>,
    pub alerts: broadcast::Receiver<Alert>,
}

pub(crate) struct Outputs {
    now_playing: watch::Sender<NowPlaying>,
    lyrics: watch::Sender<LyricsView>,
    queue: watch::Sender<Vec<Track>>,
    alerts: broadcast::Sender<Alert>,
}

impl Outputs {
    pub(crate) fn new() -> (Self, SessionView) {
        let (now_playing, now_playing_rx) = watch::channel(NowPlaying::default());
        let (lyrics, lyrics_rx) = watch::channel(LyricsView::default());
        let (queue, queue_rx) = watch::channel(Vec::new());
        let (alerts, alerts_rx) = broadcast::channel(ALERT_CAPACITY);
        (
            Self { now_playing, lyrics, queue, alerts },
            SessionView {
                now_playing: now_playing_rx,
                lyrics: lyrics_rx,
                queue: queue_rx,
                alerts: alerts_rx,
            },
        )
    }

    pub(crate) fn now_playing(&self, snapshot: NowPlaying) {
        self.now_playing.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    pub(crate) fn lyrics(&self, view: LyricsView) {
        self.lyrics.send_replace(view);
    }

    pub(crate) fn queue(&self, tracks: Vec<Track>) {
        self.queue.send_replace(tracks);
    }

    pub(crate) fn alert(&self, message: impl Into<String>) {
        // no receivers just means no UI is attached
        let _ = self.alerts.send(Alert { message: message.into() });
    }
}
