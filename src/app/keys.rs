use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    // Global
    pub quit: String,
    pub play_pause: String,
    pub next_track: String,
    pub prev_track: String,
    pub shuffle: String,
    pub repeat: String,

    // Seek
    pub seek_forward: String,
    pub seek_backward: String,

    // Browser
    pub nav_up: String,
    pub nav_up_alt: String,
    pub nav_down: String,
    pub nav_down_alt: String,
    pub enter_dir: String,
    pub back_dir: String,

    // Right panel
    pub toggle_lyrics: String,
    pub lyrics_url: String,
    pub scroll_up: String,
    pub scroll_down: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            play_pause: "Space".to_string(),
            next_track: "n".to_string(),
            prev_track: "p".to_string(),
            shuffle: "z".to_string(),
            repeat: "x".to_string(),

            seek_forward: "Right".to_string(),
            seek_backward: "Left".to_string(),

            nav_up: "k".to_string(),
            nav_up_alt: "Up".to_string(),
            nav_down: "j".to_string(),
            nav_down_alt: "Down".to_string(),
            enter_dir: "Enter".to_string(),
            back_dir: "Backspace".to_string(),

            toggle_lyrics: "l".to_string(),
            lyrics_url: "u".to_string(),
            scroll_up: "PageUp".to_string(),
            scroll_down: "PageDown".to_string(),
        }
    }
}

impl KeyConfig {
    pub fn matches(&self, event: KeyEvent, key_str: &str) -> bool {
        match key_str {
            "Space" => event.code == KeyCode::Char(' '),
            "Enter" => event.code == KeyCode::Enter,
            "Backspace" => event.code == KeyCode::Backspace,
            "Esc" => event.code == KeyCode::Esc,
            "Tab" => event.code == KeyCode::Tab,
            "Up" => event.code == KeyCode::Up,
            "Down" => event.code == KeyCode::Down,
            "Left" => event.code == KeyCode::Left,
            "Right" => event.code == KeyCode::Right,
            "PageUp" => event.code == KeyCode::PageUp,
            "PageDown" => event.code == KeyCode::PageDown,
            s if s.chars().count() == 1 => match s.chars().next() {
                // uppercase bindings also fire on shift + lowercase
                Some(ch) if ch.is_uppercase() => {
                    event.code == KeyCode::Char(ch)
                        || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                            && event.modifiers.contains(KeyModifiers::SHIFT))
                }
                Some(ch) => event.code == KeyCode::Char(ch),
                None => false,
            },
            _ => false,
        }
    }

    // Helper for UI display
    pub fn display(&self, key_str: &str) -> String {
        match key_str {
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "Backspace" => "Bksp".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            _ => key_str.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn named_and_char_keys() {
        let keys = KeyConfig::default();
        assert!(keys.matches(key(KeyCode::Char(' ')), &keys.play_pause));
        assert!(keys.matches(key(KeyCode::Right), &keys.seek_forward));
        assert!(keys.matches(key(KeyCode::Char('z')), &keys.shuffle));
        assert!(!keys.matches(key(KeyCode::Char('Z')), &keys.shuffle));
    }

    #[test]
    fn uppercase_binding_accepts_shift() {
        let keys = KeyConfig::default();
        let shifted = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::SHIFT);
        assert!(keys.matches(shifted, "Q"));
        assert!(keys.matches(key(KeyCode::Char('Q')), "Q"));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let keys: KeyConfig = toml::from_str("quit = \"Esc\"").unwrap();
        assert_eq!(keys.quit, "Esc");
        assert_eq!(keys.next_track, "n");
    }
}
