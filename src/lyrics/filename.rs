//! Best-effort "Artist - Title" guessing from file names.

use crate::library::is_audio_file;
use std::path::Path;

const SEPARATORS: [&str; 3] = [" - ", " – ", " — "];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackName {
    pub artist: Option<String>,
    pub title: String,
}

/// Guess artist and title from a file name or stem.
///
/// Underscores count as spaces and bracketed tags such as `(Live)` or `[Remastered]` are dropped.
/// A leading track number (`01 - ...`) is skipped. Names that do not fit the pattern come back
/// whole as the title with no artist.
pub fn parse_track_name(name: &str) -> TrackName {
    let stem = strip_audio_extension(name.trim());
    let normalized = stem.replace('_', " ");

    let mut rest = normalized.as_str();
    let mut artist = None;
    while let Some((left, right)) = split_outside_brackets(rest) {
        let left = clean(left);
        rest = right;
        if !left.is_empty() && left.chars().all(|c| c.is_ascii_digit()) {
            // track number, keep looking
            continue;
        }
        if !left.is_empty() {
            artist = Some(left);
        }
        break;
    }

    let title = clean(rest);
    if title.is_empty() {
        let fallback = stem.trim();
        return TrackName {
            artist: None,
            title: if fallback.is_empty() { name.to_string() } else { fallback.to_string() },
        };
    }

    TrackName { artist, title }
}

fn strip_audio_extension(name: &str) -> &str {
    let path = Path::new(name);
    if is_audio_file(path) {
        if let Some(idx) = name.rfind('.') {
            return &name[..idx];
        }
    }
    name
}

fn split_outside_brackets(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            if let Some(sep) = SEPARATORS.iter().find(|sep| s[idx..].starts_with(**sep)) {
                return Some((&s[..idx], &s[idx + sep.len()..]));
            }
        }
    }
    None
}

fn clean(s: &str) -> String {
    collapse_whitespace(&drop_bracketed(s))
}

fn drop_bracketed(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(artist: Option<&str>, title: &str) -> TrackName {
        TrackName {
            artist: artist.map(str::to_string),
            title: title.to_string(),
        }
    }

    #[test]
    fn artist_and_title_with_tags() {
        assert_eq!(
            parse_track_name("Artist_Name - Song (Live).mp3"),
            parsed(Some("Artist Name"), "Song")
        );
    }

    #[test]
    fn bare_title() {
        assert_eq!(parse_track_name("JustATitle.mp3"), parsed(None, "JustATitle"));
    }

    #[test]
    fn accepts_stems_and_dashes() {
        assert_eq!(
            parse_track_name("Nina Simone – Sinnerman [Remastered]"),
            parsed(Some("Nina Simone"), "Sinnerman")
        );
    }

    #[test]
    fn skips_leading_track_numbers() {
        assert_eq!(
            parse_track_name("03 - Daft Punk - Veridis Quo.flac"),
            parsed(Some("Daft Punk"), "Veridis Quo")
        );
        assert_eq!(parse_track_name("07 - Interlude.ogg"), parsed(None, "Interlude"));
    }

    #[test]
    fn hyphenated_words_stay_in_the_title() {
        assert_eq!(parse_track_name("Jay-Z.mp3"), parsed(None, "Jay-Z"));
    }

    #[test]
    fn malformed_names_fall_back_to_the_whole_stem() {
        assert_eq!(parse_track_name("Artist - (Live).mp3"), parsed(None, "Artist - (Live)"));
        assert_eq!(parse_track_name("(Intro).wav"), parsed(None, "(Intro)"));
    }

    #[test]
    fn separators_inside_brackets_do_not_split() {
        assert_eq!(parse_track_name("Song (Club - Mix).mp3"), parsed(None, "Song"));
    }

    #[test]
    fn unknown_extensions_are_kept() {
        assert_eq!(parse_track_name("notes.v2"), parsed(None, "notes.v2"));
    }
}
