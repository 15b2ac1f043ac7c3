use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

pub mod user;

pub use user::UserConfig;

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glyphix")
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_log_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("glyphix")
            .join("logs")
    }

    /// Default configuration as TOML, for `--generate-config`.
    pub fn default_toml() -> anyhow::Result<String> {
        toml::to_string_pretty(&UserConfig::default()).context("failed to serialize default config")
    }

    /// Load `path` (or the default location).
    ///
    /// A missing file is created with defaults. A file that does not parse is left alone and
    /// defaults are used, with a warning in the log.
    pub fn load(path: Option<&Path>) -> UserConfig {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::get_config_path);

        if !path.exists() {
            let config = UserConfig::default();
            if let Err(e) = Self::write_default(&path, &config) {
                tracing::warn!(path = %path.display(), error = %e, "could not write default config");
            }
            return config;
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                    UserConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                UserConfig::default()
            }
        }
    }

    fn write_default(path: &Path, config: &UserConfig) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig::load(Some(&path));
        assert_eq!(config, UserConfig::default());
        assert!(path.exists());
        assert_eq!(AppConfig::load(Some(&path)), UserConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "music_directory = \"/srv/music\"\n\n[engine]\nbinary = \"/usr/local/bin/mpv\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path));
        assert_eq!(config.music_directory, "/srv/music");
        assert_eq!(config.engine.binary, "/usr/local/bin/mpv");
        assert_eq!(config.engine.reply_timeout_ms, 1000);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.keys.quit, "q");
    }

    #[test]
    fn broken_file_falls_back_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_interval_ms = \"soon\"").unwrap();

        assert_eq!(AppConfig::load(Some(&path)), UserConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "tick_interval_ms = \"soon\"");
    }

    #[test]
    fn generated_config_parses_back() {
        let text = AppConfig::default_toml().unwrap();
        let parsed: UserConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, UserConfig::default());
    }

    #[test]
    fn tilde_expands_to_home() {
        let config = UserConfig {
            music_directory: "~/Tunes".into(),
            ..UserConfig::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.music_dir(), home.join("Tunes"));
        }
    }
}
