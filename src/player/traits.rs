use super::EngineResult;
use crate::library::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Drop the engine's list and start playing immediately.
    Replace,
    /// Add to the end of the engine's play-next list.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Absolute,
    Relative,
}

/// Notifications from the engine's own thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine moved to another entry (or to none), including on its own at end of file.
    FilenameChanged(Option<String>),
}

/// The external playback engine 🎵
///
/// Commands report whether the engine accepted them. The read accessors return the last
/// values the engine reported, `None` until it has reported anything.
pub trait Engine: Send + Sync {
    fn load(&self, track: &Track, mode: LoadMode) -> EngineResult<()>;

    fn enqueue_append(&self, track: &Track) -> EngineResult<()> {
        self.load(track, LoadMode::Append)
    }

    /// Remove every queued entry except the one playing, without stopping it.
    fn queue_clear(&self) -> EngineResult<()>;
    fn set_paused(&self, paused: bool) -> EngineResult<()>;
    fn seek(&self, seconds: f64, mode: SeekMode) -> EngineResult<()>;
    fn skip_next(&self) -> EngineResult<()>;
    fn skip_prev(&self) -> EngineResult<()>;
    fn set_loop_current_track(&self, enabled: bool) -> EngineResult<()>;

    fn current_filename(&self) -> Option<String>;
    fn elapsed_seconds(&self) -> Option<f64>;
    fn duration_seconds(&self) -> Option<f64>;
    fn is_paused(&self) -> Option<bool>;

    /// Stop the engine. Later commands fail with [`super::EngineError::Terminated`].
    fn terminate(&self) -> EngineResult<()>;
}
