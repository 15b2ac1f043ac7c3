use super::config::UserConfig;
use super::keys::KeyConfig;
use crate::library::{is_audio_file, Track};
use crate::session::{LyricsView, NowPlaying, SessionView};
use crate::ui::Theme;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::TryRecvError;
use walkdir::WalkDir;

const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// What the right-hand panel shows 🎛️
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RightPanel {
    #[default]
    Queue,
    Lyrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Lyrics URL prompt 📝
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

/// Everything the terminal UI needs between frames.
pub struct App {
    pub keys: KeyConfig,
    pub theme: Theme,

    pub current_dir: PathBuf,
    pub entries: Vec<BrowserEntry>,
    pub selected: usize,

    pub panel: RightPanel,
    pub lyrics_scroll: u16,
    pub input_state: Option<InputState>,
    pub toast: Option<Toast>,

    pub now_playing: NowPlaying,
    pub lyrics: LyricsView,
    pub queue: Vec<Track>,

    pub is_running: bool,
}

impl App {
    pub fn new(config: &UserConfig, start_dir: PathBuf) -> Self {
        let mut app = Self {
            keys: config.keys.clone(),
            theme: config.theme.clone(),
            current_dir: start_dir.clone(),
            entries: Vec::new(),
            selected: 0,
            panel: RightPanel::default(),
            lyrics_scroll: 0,
            input_state: None,
            toast: None,
            now_playing: NowPlaying::default(),
            lyrics: LyricsView::default(),
            queue: Vec::new(),
            is_running: true,
        };
        if let Err(e) = app.open_dir(&start_dir) {
            app.show_toast(&format!("Cannot open {}: {}", start_dir.display(), e));
        }
        app
    }

    /// Browse `dir`. On error the current listing is kept.
    pub fn open_dir(&mut self, dir: &Path) -> io::Result<()> {
        let entries = list_dir(dir)?;
        self.current_dir = dir.to_path_buf();
        self.entries = entries;
        self.selected = 0;
        Ok(())
    }

    pub fn go_up(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let previous = self.current_dir.clone();
        match self.open_dir(&parent) {
            Ok(()) => {
                if let Some(idx) = self.entries.iter().position(|e| e.path == previous) {
                    self.selected = idx;
                }
            }
            Err(e) => self.show_toast(&format!("Cannot open {}: {}", parent.display(), e)),
        }
    }

    pub fn selected_entry(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.entries.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            RightPanel::Queue => RightPanel::Lyrics,
            RightPanel::Lyrics => RightPanel::Queue,
        };
    }

    pub fn show_toast(&mut self, message: &str) {
        let now = Instant::now();
        let deadline = now + TOAST_DURATION;
        match self.toast.as_mut() {
            // keep start_time so a replaced toast does not replay its entrance
            Some(current) => {
                current.message = message.to_string();
                current.deadline = deadline;
            }
            None => {
                self.toast = Some(Toast {
                    message: message.to_string(),
                    start_time: now,
                    deadline,
                });
            }
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(ref toast) = self.toast {
            if Instant::now() > toast.deadline {
                self.toast = None;
            }
        }
    }

    /// Pull the latest session snapshots. Returns how many alerts arrived.
    pub fn sync(&mut self, view: &mut SessionView) -> usize {
        self.now_playing = view.now_playing.borrow_and_update().clone();
        self.queue = view.queue.borrow_and_update().clone();

        let lyrics = view.lyrics.borrow_and_update().clone();
        if lyrics.track != self.lyrics.track {
            self.lyrics_scroll = 0;
        }
        if !lyrics.state.is_failed() {
            // prompt only makes sense while the lookup has failed
            self.input_state = None;
        }
        self.lyrics = lyrics;

        let mut alerts = 0;
        loop {
            match view.alerts.try_recv() {
                Ok(alert) => {
                    self.show_toast(&alert.message);
                    alerts += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => alerts += skipped as usize,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        alerts
    }
}

/// Folders first, then audio files, each sorted case-insensitively. Dotfiles are hidden.
pub fn list_dir(dir: &Path) -> io::Result<Vec<BrowserEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        if is_dir || is_audio_file(entry.path()) {
            entries.push(BrowserEntry {
                path: entry.into_path(),
                name,
                is_dir,
            });
        }
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}
