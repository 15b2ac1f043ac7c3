pub mod error;
pub mod mpv;
pub mod traits;

pub use error::{EngineError, EngineResult};
pub use mpv::{MpvConfig, MpvEngine};
pub use traits::{Engine, EngineEvent, LoadMode, SeekMode};
