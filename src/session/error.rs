use crate::library::PlaylistError;
use crate::player::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{} is not a playable file in its folder", .0.display())]
    SelectionNotFound(PathBuf),
    #[error("playback engine is not available")]
    EngineUnavailable,
    #[error("nothing is playing")]
    NotActive,
    #[error("engine is playing {0}, which is not in the playlist")]
    UnmatchedEngineTrack(String),
    #[error("could not read folder: {0}")]
    Scan(#[from] io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("lyrics are not waiting for a URL")]
    ManualLyricsNotExpected,
}

impl From<PlaylistError> for SessionError {
    fn from(err: PlaylistError) -> Self {
        match err {
            PlaylistError::SelectionNotFound(path) => Self::SelectionNotFound(path),
        }
    }
}
