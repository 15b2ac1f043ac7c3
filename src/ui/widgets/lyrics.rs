use crate::app::App;
use crate::lyrics::LyricsState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = super::panel(" Lyrics ", theme.magenta, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let muted = Style::default().fg(theme.overlay);
    let mut lines: Vec<Line> = Vec::new();

    if let Some(track) = &app.lyrics.track {
        lines.push(
            Line::from(Span::styled(
                track.title().to_string(),
                Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
        lines.push(Line::from(""));
    }

    match &app.lyrics.state {
        LyricsState::NotFetched => {
            lines.push(centered("Play something to see its lyrics", muted));
        }
        LyricsState::Fetching(_) => {
            lines.push(centered("Searching lyrics…", muted));
        }
        LyricsState::Available(text) => {
            let style = Style::default().fg(theme.text);
            lines.extend(text.lines().map(|l| centered(l, style)));
        }
        LyricsState::FailedAwaitingManualInput(reason) => {
            lines.push(centered(reason, Style::default().fg(theme.red)));
            lines.push(Line::from(""));
            lines.push(
                Line::from(vec![
                    Span::styled("Press ", muted),
                    Span::styled(
                        app.keys.display(&app.keys.lyrics_url),
                        Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" to paste a lyrics page URL", muted),
                ])
                .alignment(Alignment::Center),
            );
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.lyrics_scroll, 0));
    f.render_widget(paragraph, inner);
}

fn centered(text: &str, style: Style) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), style)).alignment(Alignment::Center)
}
