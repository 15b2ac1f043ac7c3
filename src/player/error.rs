use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("mpv IPC socket did not appear at {}", .0.display())]
    SocketTimeout(PathBuf),
    #[error("mpv IPC error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed mpv message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mpv rejected the command: {0}")]
    Rejected(String),
    #[error("mpv did not answer in time")]
    NoReply,
    #[error("mpv is not running")]
    Terminated,
}

pub type EngineResult<T> = Result<T, EngineError>;
