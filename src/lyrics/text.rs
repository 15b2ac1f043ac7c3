//! Turning provider payloads into plain lyric text.

/// Remove LRC timestamps, `[Verse 1]`-style section headers and LRC metadata tags.
///
/// Runs of blank lines collapse to one; leading and trailing blanks are dropped.
pub fn strip_markup(raw: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let line = strip_timestamps(line.trim());
        if is_section_marker(line) {
            continue;
        }
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn strip_timestamps(mut line: &str) -> &str {
    while let Some(rest) = line.strip_prefix('[') {
        match rest.find(']') {
            Some(end) if parse_timestamp(&rest[..end]).is_some() => line = rest[end + 1..].trim_start(),
            _ => break,
        }
    }
    line
}

fn is_section_marker(line: &str) -> bool {
    line.len() > 2 && line.starts_with('[') && line.ends_with(']') && !line[1..].contains('[')
}

/// `mm:ss`, `mm:ss.xx` or `mm:ss.xxx` to milliseconds.
pub fn parse_timestamp(ts: &str) -> Option<u64> {
    let (min, sec) = ts.split_once(':')?;
    let min: u64 = min.parse().ok()?;
    let (sec, frac) = match sec.split_once('.') {
        Some((s, f)) => (s, Some(f)),
        None => (sec, None),
    };
    let sec: u64 = sec.parse().ok()?;
    let ms: u64 = match frac {
        Some(f) if f.len() == 2 => f.parse::<u64>().ok()? * 10,
        Some(f) => f.parse().ok()?,
        None => 0,
    };
    // absurd minute counts from the network are not timestamps
    min.checked_mul(60_000)?.checked_add(sec.checked_mul(1000)?)?.checked_add(ms)
}

/// Convert an HTML fragment to text: `<br>` becomes a newline, other tags vanish,
/// entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::new();
    let mut tag_buf = String::new();
    let mut entity_buf = String::new();
    let mut in_tag = false;
    let mut in_entity = false;

    for ch in html.chars() {
        if in_entity {
            if ch == ';' {
                entity_buf.push(ch);
                out.push_str(&decode_entity(&entity_buf));
                entity_buf.clear();
                in_entity = false;
                continue;
            }
            if (ch.is_ascii_alphanumeric() || ch == '#') && entity_buf.len() < 10 {
                entity_buf.push(ch);
                continue;
            }
            // bare `&`: emit it and handle `ch` as ordinary input
            out.push_str(&entity_buf);
            entity_buf.clear();
            in_entity = false;
        }

        if in_tag {
            tag_buf.push(ch);
            if ch == '>' {
                if tag_buf.to_ascii_lowercase().starts_with("<br") {
                    out.push('\n');
                }
                tag_buf.clear();
                in_tag = false;
            }
        } else if ch == '<' {
            in_tag = true;
            tag_buf.push(ch);
        } else if ch == '&' {
            in_entity = true;
            entity_buf.push(ch);
        } else {
            out.push(ch);
        }
    }
    out.push_str(&entity_buf);
    out
}

fn decode_entity(entity: &str) -> String {
    match entity {
        "&amp;" => "&".into(),
        "&lt;" => "<".into(),
        "&gt;" => ">".into(),
        "&quot;" => "\"".into(),
        "&apos;" | "&#x27;" | "&#39;" => "'".into(),
        "&nbsp;" => " ".into(),
        _ => {
            let inner = &entity[1..entity.len() - 1];
            let code = match inner.strip_prefix('#') {
                Some(num) => match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                },
                None => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| entity.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_sections_and_timestamps() {
        let raw = "[ar:Someone]\n[Verse 1]\n[00:12.30]First line\n[00:15.00][00:40.00] Second line\n\n\n\n[Chorus]\nHook\n\n";
        assert_eq!(strip_markup(raw), "First line\nSecond line\n\nHook");

        // minutes that overflow are left as text
        assert_eq!(
            strip_markup("[999999999999999:00.00]line"),
            "[999999999999999:00.00]line"
        );
    }

    #[test]
    fn keeps_inline_brackets() {
        assert_eq!(strip_markup("I said [quietly] no"), "I said [quietly] no");
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_timestamp("01:02.50"), Some(62_500));
        assert_eq!(parse_timestamp("00:03.125"), Some(3_125));
        assert_eq!(parse_timestamp("00:07"), Some(7_000));
        assert_eq!(parse_timestamp("Verse 1"), None);
        assert_eq!(parse_timestamp("999999999999999:00.00"), None);
        assert_eq!(parse_timestamp(&format!("{}:00", u64::MAX)), None);
    }

    #[test]
    fn html_fragments() {
        assert_eq!(
            html_to_text("Line &amp; one<br/>Line <i>two</i>&#39;s&#x21;<BR>end &unknown"),
            "Line & one\nLine two's!\nend &unknown"
        );
    }

    #[test]
    fn bare_ampersand_does_not_eat_tags() {
        assert_eq!(html_to_text("Rock & Roll<br>Next line"), "Rock & Roll\nNext line");
        assert_eq!(html_to_text("A&B<br>C"), "A&B\nC");
        assert_eq!(html_to_text("&&amp;"), "&&");
    }
}
