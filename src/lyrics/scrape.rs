//! Pulling lyrics out of a lyrics web page.

use super::text::html_to_text;
use super::LyricsError;

/// Attribute that marks lyric blocks on the page.
pub const LYRICS_CONTAINER_MARKER: &str = "data-lyrics-container=\"true\"";

/// Text of every lyrics container in `page`, joined with newlines.
///
/// Fails with [`LyricsError::NoLyricsContainer`] when the page has no such block
/// or all of them are empty.
pub fn extract_lyrics(page: &str) -> Result<String, LyricsError> {
    let blocks = lyrics_blocks(page);
    let text = blocks
        .iter()
        .map(|raw| html_to_text(raw).trim().to_string())
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        Err(LyricsError::NoLyricsContainer)
    } else {
        Ok(text)
    }
}

/// Inner HTML of each marked element, handling nested `<div>`s.
fn lyrics_blocks(page: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(found) = page[search_from..].find(LYRICS_CONTAINER_MARKER) {
        let marker_at = search_from + found;
        let content_start = match page[marker_at..].find('>') {
            Some(offset) => marker_at + offset + 1,
            None => break,
        };

        let mut depth = 1;
        let mut i = content_start;
        while i < page.len() {
            let rest = &page[i..];
            if rest.starts_with("</div>") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                i += "</div>".len();
            } else if rest.starts_with("<div") {
                depth += 1;
                i += "<div".len();
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }

        blocks.push(&page[content_start..i]);
        search_from = i;
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="header">Song Lyrics</div>
        <div data-lyrics-container="true" class="Lyrics__Container">Is this the real life?<br/>Is this just <a href="/x">fantasy</a>?<div class="ad">Ad</div></div>
        <p>Unrelated</p>
        <div data-lyrics-container="true">Caught in a landslide&#x2C;<br>no escape</div>
    </body></html>"#;

    #[test]
    fn joins_every_container() {
        assert_eq!(
            extract_lyrics(PAGE).unwrap(),
            "Is this the real life?\nIs this just fantasy?Ad\nCaught in a landslide,\nno escape"
        );
    }

    #[test]
    fn page_without_marker_fails() {
        let err = extract_lyrics("<html><div>No lyrics here</div></html>").unwrap_err();
        assert!(matches!(err, LyricsError::NoLyricsContainer));
    }

    #[test]
    fn empty_containers_fail() {
        let err = extract_lyrics(r#"<div data-lyrics-container="true"> <br/> </div>"#).unwrap_err();
        assert!(matches!(err, LyricsError::NoLyricsContainer));
    }
}
