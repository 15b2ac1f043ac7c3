//! Lyrics lookup for the playing track.
//!
//! Stage A asks a [`LyricsProvider`] by artist and title; when that fails the user can paste a
//! lyrics page URL and stage B scrapes it. Every lookup carries a token and only the newest one
//! is ever applied.

pub mod filename;
pub mod lrclib;
pub mod resolver;
pub mod scrape;
pub mod text;

pub use filename::{parse_track_name, TrackName};
pub use lrclib::{LrclibClient, LyricsConfig};
pub use resolver::LyricsResolver;

use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("no lyrics found")]
    NotFound,
    #[error("lyrics request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("page has no lyrics container")]
    NoLyricsContainer,
    #[error("invalid lyrics URL: {0}")]
    InvalidUrl(String),
}

/// Where the lyrics panel stands for the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LyricsState {
    #[default]
    NotFetched,
    /// Waiting on the lookup with this token.
    Fetching(u64),
    Available(String),
    /// Lookup failed; the message is shown next to the URL prompt hint.
    FailedAwaitingManualInput(String),
}

impl LyricsState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::FailedAwaitingManualInput(_))
    }
}

/// Source of lyric text. Implementations must be cheap to share across tasks.
pub trait LyricsProvider: Send + Sync {
    /// Look lyrics up by title and, when known, artist.
    fn search<'a>(
        &'a self,
        title: &'a str,
        artist: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, LyricsError>>;

    /// Fetch a lyrics page and pull the lyric text out of it.
    fn scrape<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, LyricsError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsStage {
    Lookup,
    Scrape,
}

/// Result of one background lookup, posted back to the session loop.
#[derive(Debug)]
pub struct LyricsReply {
    pub token: u64,
    pub stage: LyricsStage,
    pub outcome: Result<String, LyricsError>,
}
