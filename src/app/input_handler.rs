use crate::app::{App, InputState, RightPanel};
use crate::player::SeekMode;
use crate::session::Command;
use crossterm::event::{KeyCode, KeyEvent};

const SEEK_STEP_SECS: f64 = 5.0;

/// Map a key press to UI changes and, where it concerns playback, a session command.
pub fn handle_key(key: KeyEvent, app: &mut App) -> Option<Command> {
    if app.input_state.is_some() {
        return handle_input_popup(key, app);
    }

    let keys = &app.keys;

    // Quit ('q')
    if keys.matches(key, &keys.quit) {
        app.is_running = false;
        return Some(Command::Quit);
    }

    // Play/Pause ('Space')
    if keys.matches(key, &keys.play_pause) {
        return Some(Command::TogglePause);
    }

    // Next / Prev Track ('n' / 'p')
    if keys.matches(key, &keys.next_track) {
        return Some(Command::Next);
    }
    if keys.matches(key, &keys.prev_track) {
        return Some(Command::Prev);
    }

    // Seek ('Right' / 'Left')
    if keys.matches(key, &keys.seek_forward) {
        return Some(Command::Seek {
            seconds: SEEK_STEP_SECS,
            mode: SeekMode::Relative,
        });
    }
    if keys.matches(key, &keys.seek_backward) {
        return Some(Command::Seek {
            seconds: -SEEK_STEP_SECS,
            mode: SeekMode::Relative,
        });
    }

    // Shuffle / Repeat ('z' / 'x')
    if keys.matches(key, &keys.shuffle) {
        return Some(Command::ToggleShuffle);
    }
    if keys.matches(key, &keys.repeat) {
        return Some(Command::ToggleRepeat);
    }

    // Queue <-> Lyrics ('l')
    if keys.matches(key, &keys.toggle_lyrics) {
        app.toggle_panel();
        return None;
    }

    // Lyrics page URL ('u')
    if keys.matches(key, &keys.lyrics_url) {
        if app.lyrics.state.is_failed() {
            app.panel = RightPanel::Lyrics;
            app.input_state = Some(InputState::default());
        } else {
            app.show_toast("Lyrics URL can only be given after a failed lookup");
        }
        return None;
    }

    // Lyrics scroll ('PageUp' / 'PageDown')
    if keys.matches(key, &keys.scroll_up) {
        app.lyrics_scroll = app.lyrics_scroll.saturating_sub(5);
        return None;
    }
    if keys.matches(key, &keys.scroll_down) {
        app.lyrics_scroll = app.lyrics_scroll.saturating_add(5);
        return None;
    }

    // Browser navigation
    if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
        app.move_selection(-1);
        return None;
    }
    if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
        app.move_selection(1);
        return None;
    }
    if keys.matches(key, &keys.back_dir) {
        app.go_up();
        return None;
    }
    if keys.matches(key, &keys.enter_dir) {
        let entry = app.selected_entry().cloned()?;
        if !entry.is_dir {
            return Some(Command::Select(entry.path));
        }
        if let Err(e) = app.open_dir(&entry.path) {
            app.show_toast(&format!("Cannot open {}: {}", entry.name, e));
        }
        return None;
    }

    None
}

fn handle_input_popup(key: KeyEvent, app: &mut App) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            app.input_state = None;
            None
        }
        KeyCode::Enter => {
            let url = app.input_state.take()?.value.trim().to_string();
            if url.is_empty() {
                None
            } else {
                Some(Command::ManualLyrics(url))
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.input_state.as_mut() {
                input.value.pop();
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.input_state.as_mut() {
                input.value.push(c);
            }
            None
        }
        _ => None,
    }
}
