use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glyphix::app::config::UserConfig;
use glyphix::app::input_handler::handle_key;
use glyphix::app::{list_dir, App, RightPanel};
use glyphix::lyrics::LyricsState;
use glyphix::player::SeekMode;
use glyphix::session::{Command, LyricsView};
use std::fs;
use tempfile::TempDir;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// A music folder with one album inside and a few loose files.
fn music_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("Album")).unwrap();
    fs::create_dir(dir.path().join(".hidden")).unwrap();
    for name in ["b song.flac", "A song.mp3", "notes.txt", ".secret.mp3"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    fs::write(dir.path().join("Album").join("01 - Intro.ogg"), b"").unwrap();
    dir
}

fn create_test_app(dir: &TempDir) -> App {
    App::new(&UserConfig::default(), dir.path().to_path_buf())
}

#[test]
fn test_app_initialization() {
    let dir = music_dir();
    let app = create_test_app(&dir);
    assert!(app.is_running);
    assert_eq!(app.panel, RightPanel::Queue);
    assert!(app.queue.is_empty());
    assert!(app.toast.is_none());
    assert_eq!(app.entries.len(), 3);
}

#[test]
fn test_listing_puts_folders_first() {
    let dir = music_dir();
    let names: Vec<String> = list_dir(dir.path()).unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Album", "A song.mp3", "b song.flac"]);
}

#[test]
fn test_navigation_state() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);

    // into "Album"
    assert!(handle_key(key(KeyCode::Enter), &mut app).is_none());
    assert_eq!(app.current_dir, dir.path().join("Album"));
    assert_eq!(app.entries.len(), 1);

    // back out, cursor lands on the folder we left
    handle_key(key(KeyCode::Backspace), &mut app);
    assert_eq!(app.current_dir, dir.path());
    assert_eq!(app.selected_entry().map(|e| e.name.as_str()), Some("Album"));

    handle_key(char_key('j'), &mut app);
    handle_key(key(KeyCode::Down), &mut app);
    handle_key(key(KeyCode::Down), &mut app);
    assert_eq!(app.selected, 2);
    handle_key(char_key('k'), &mut app);
    assert_eq!(app.selected, 1);
}

#[test]
fn test_enter_on_file_selects_it() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);
    app.move_selection(1);

    let command = handle_key(key(KeyCode::Enter), &mut app);
    assert_eq!(command, Some(Command::Select(dir.path().join("A song.mp3"))));
}

#[test]
fn test_playback_keys() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);

    assert_eq!(handle_key(char_key(' '), &mut app), Some(Command::TogglePause));
    assert_eq!(handle_key(char_key('n'), &mut app), Some(Command::Next));
    assert_eq!(handle_key(char_key('p'), &mut app), Some(Command::Prev));
    assert_eq!(handle_key(char_key('z'), &mut app), Some(Command::ToggleShuffle));
    assert_eq!(handle_key(char_key('x'), &mut app), Some(Command::ToggleRepeat));
    assert_eq!(
        handle_key(key(KeyCode::Left), &mut app),
        Some(Command::Seek { seconds: -5.0, mode: SeekMode::Relative })
    );

    assert_eq!(handle_key(char_key('q'), &mut app), Some(Command::Quit));
    assert!(!app.is_running);
}

#[test]
fn test_lyrics_url_prompt_only_after_failure() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);

    handle_key(char_key('u'), &mut app);
    assert!(app.input_state.is_none());
    assert!(app.toast.is_some());

    app.lyrics = LyricsView {
        track: None,
        state: LyricsState::FailedAwaitingManualInput("No lyrics found for this track.".into()),
    };
    handle_key(char_key('u'), &mut app);
    assert!(app.input_state.is_some());
    assert_eq!(app.panel, RightPanel::Lyrics);

    // keys type into the prompt instead of controlling playback
    for c in "https://x.y/q".chars() {
        assert!(handle_key(char_key(c), &mut app).is_none());
    }
    handle_key(key(KeyCode::Backspace), &mut app);
    assert_eq!(
        handle_key(key(KeyCode::Enter), &mut app),
        Some(Command::ManualLyrics("https://x.y/".into()))
    );
    assert!(app.input_state.is_none());
    assert!(app.is_running);
}

#[test]
fn test_escape_cancels_prompt() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);
    app.lyrics.state = LyricsState::FailedAwaitingManualInput("nope".into());

    handle_key(char_key('u'), &mut app);
    handle_key(char_key('a'), &mut app);
    assert!(handle_key(key(KeyCode::Esc), &mut app).is_none());
    assert!(app.input_state.is_none());
}

#[test]
fn test_panel_toggle_and_scroll() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);

    handle_key(char_key('l'), &mut app);
    assert_eq!(app.panel, RightPanel::Lyrics);
    handle_key(key(KeyCode::PageDown), &mut app);
    handle_key(key(KeyCode::PageDown), &mut app);
    handle_key(key(KeyCode::PageUp), &mut app);
    assert_eq!(app.lyrics_scroll, 5);
    handle_key(char_key('l'), &mut app);
    assert_eq!(app.panel, RightPanel::Queue);
}

#[test]
fn test_toast_expires() {
    let dir = music_dir();
    let mut app = create_test_app(&dir);
    app.show_toast("hello");
    app.on_tick();
    assert!(app.toast.is_some());

    if let Some(toast) = app.toast.as_mut() {
        toast.deadline = std::time::Instant::now() - std::time::Duration::from_millis(1);
    }
    app.on_tick();
    assert!(app.toast.is_none());
}

#[test]
fn test_missing_start_dir_shows_toast() {
    let dir = music_dir();
    let app = App::new(&UserConfig::default(), dir.path().join("nope"));
    assert!(app.toast.is_some());
    assert!(app.entries.is_empty());
}
