use crate::app::keys::KeyConfig;
use crate::lyrics::LyricsConfig;
use crate::player::MpvConfig;
use crate::ui::Theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User-editable configuration, stored in `config.toml`.
///
/// Every field has a default so partial files load fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub music_directory: String,
    /// How often the now-playing card refreshes position and duration.
    pub tick_interval_ms: u64,
    pub engine: MpvConfig,
    pub lyrics: LyricsConfig,
    pub keys: KeyConfig,
    pub theme: Theme,
}

fn default_music_dir() -> String {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/Music", home)
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            music_directory: default_music_dir(),
            tick_interval_ms: 500,
            engine: MpvConfig::default(),
            lyrics: LyricsConfig::default(),
            keys: KeyConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl UserConfig {
    /// `music_directory` with a leading `~` expanded.
    pub fn music_dir(&self) -> PathBuf {
        match self.music_directory.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|h| h.join(rest)).unwrap_or_else(|| PathBuf::from(rest)),
            None => PathBuf::from(&self.music_directory),
        }
    }
}
