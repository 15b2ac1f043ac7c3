//! Local music files: tracks and directory scanning.

pub mod playlist;

pub use playlist::{Direction, PlaylistError, PlaylistStore};

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions (lowercase, without the dot) the player offers and queues.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "ogg", "m4a", "aac"];

/// A playable file plus the title shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    path: PathBuf,
    title: String,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, title }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename stem, e.g. `Artist - Song` for `/music/Artist - Song.mp3`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bare file name; this is what mpv reports in its `filename` property.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy())
    }
}

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Audio files directly inside `dir`, sorted by path.
pub fn scan_directory(dir: &Path) -> io::Result<Vec<Track>> {
    let mut tracks = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            tracks.push(Track::new(entry.into_path()));
        }
    }
    tracks.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(dir = %dir.display(), count = tracks.len(), "scanned directory");
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn title_is_the_file_stem() {
        let track = Track::new("/music/Artist - Song.flac");
        assert_eq!(track.title(), "Artist - Song");
        assert_eq!(track.file_name(), "Artist - Song.flac");
    }

    #[test]
    fn audio_extensions_match_case_insensitively() {
        assert!(is_audio_file(Path::new("a.MP3")));
        assert!(is_audio_file(Path::new("dir/b.m4a")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn scan_keeps_only_audio_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.ogg", "a.mp3", "notes.txt", "B.wav"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.mp3")).unwrap();

        let names: Vec<String> = scan_directory(dir.path())
            .unwrap()
            .iter()
            .map(|t| t.file_name().into_owned())
            .collect();
        assert_eq!(names, vec!["B.wav", "a.mp3", "c.ogg"]);
    }

    #[test]
    fn scan_of_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(&dir.path().join("missing")).is_err());
    }
}
