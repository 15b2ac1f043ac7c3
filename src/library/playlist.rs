use super::Track;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("{} is not part of the scanned folder", .0.display())]
    SelectionNotFound(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Ordered play queue with a cursor and the shuffle snapshot.
///
/// Shuffle is on exactly when `unshuffled` holds the pre-shuffle order.
#[derive(Debug, Clone, Default)]
pub struct PlaylistStore {
    tracks: Vec<Track>,
    position: Option<usize>,
    unshuffled: Option<Vec<Track>>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh listing and point at `selected`.
    ///
    /// The listing arrives sorted, so adjacent duplicates are the only ones possible.
    /// If `selected` is missing the store is left exactly as it was.
    pub fn replace(&mut self, mut tracks: Vec<Track>, selected: &Path) -> Result<usize, PlaylistError> {
        tracks.dedup_by(|a, b| a.path() == b.path());
        let index = tracks
            .iter()
            .position(|t| t.path() == selected)
            .ok_or_else(|| PlaylistError::SelectionNotFound(selected.to_path_buf()))?;

        self.tracks = tracks;
        self.position = Some(index);
        self.unshuffled = None;
        Ok(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn current(&self) -> Option<&Track> {
        self.position.and_then(|p| self.tracks.get(p))
    }

    pub fn is_shuffled(&self) -> bool {
        self.unshuffled.is_some()
    }

    pub fn set_position(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.position = Some(index);
        }
        self.current()
    }

    /// mpv reports bare file names, so that is the lookup key.
    pub fn position_of_file_name(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.file_name() == name)
    }

    /// Flip shuffle and return the new state. The current track keeps playing
    /// and is moved to the front of the shuffled order.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let current = self.current().cloned();

        match self.unshuffled.take() {
            Some(original) => {
                self.tracks = original;
                self.position = current.and_then(|t| self.index_of(&t));
                false
            }
            None => {
                self.unshuffled = Some(self.tracks.clone());
                match self.position {
                    Some(pos) => {
                        let current = self.tracks.remove(pos);
                        self.tracks.shuffle(rng);
                        self.tracks.insert(0, current);
                        self.position = Some(0);
                    }
                    None => self.tracks.shuffle(rng),
                }
                true
            }
        }
    }

    /// Move the cursor one step, wrapping at both ends.
    pub fn advance(&mut self, direction: Direction) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let next = match (self.position, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Prev) => len - 1,
            (Some(p), Direction::Next) => (p + 1) % len,
            (Some(p), Direction::Prev) => (p + len - 1) % len,
        };
        self.position = Some(next);
        self.tracks.get(next)
    }

    /// Everything after the cursor, in play order. Rebuilt on every call.
    pub fn remaining_after_current(&self) -> impl Iterator<Item = &Track> + '_ {
        let start = self
            .position
            .map_or(self.tracks.len(), |p| (p + 1).min(self.tracks.len()));
        self.tracks[start..].iter()
    }

    fn index_of(&self, track: &Track) -> Option<usize> {
        self.tracks.iter().position(|t| t.path() == track.path())
    }
}
