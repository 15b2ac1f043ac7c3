use crate::lyrics::LyricsReply;
use crate::player::{EngineEvent, SeekMode};
use std::path::PathBuf;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play this file, queueing the rest of its folder after it.
    Select(PathBuf),
    TogglePause,
    Seek { seconds: f64, mode: SeekMode },
    Next,
    Prev,
    ToggleShuffle,
    ToggleRepeat,
    /// Lyrics page URL typed in after a failed lookup.
    ManualLyrics(String),
    Quit,
}

/// Everything the session loop reacts to, in arrival order.
#[derive(Debug)]
pub enum SessionEvent {
    Command(Command),
    Engine(EngineEvent),
    Lyrics(LyricsReply),
    Tick,
}

impl From<Command> for SessionEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}
