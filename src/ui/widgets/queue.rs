use crate::app::App;
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = super::panel(" Up Next ", theme.green, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let content_h = inner.height.saturating_sub(2) as usize;
    let muted = theme.overlay;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(
        Line::from(Span::styled(
            format!("QUEUE  ·  {} songs", app.queue.len()),
            Style::default().fg(theme.green),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(Line::from(""));

    if app.queue.is_empty() {
        lines.push(
            Line::from(Span::styled("Nothing queued", Style::default().fg(muted)))
                .alignment(Alignment::Center),
        );
    } else {
        for (idx, track) in app.queue.iter().enumerate().take(content_h) {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:>2}  ", idx + 1), Style::default().fg(muted)),
                Span::styled("♪ ", Style::default().fg(theme.green)),
                Span::styled(
                    truncate(track.title(), width.saturating_sub(8)),
                    Style::default().fg(theme.text),
                ),
            ]));
        }
        if content_h > 0 && app.queue.len() > content_h {
            lines.pop();
            lines.push(Line::from(Span::styled(
                format!("      … {} more", app.queue.len() - content_h + 1),
                Style::default().fg(muted),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::UserConfig;
    use crate::library::Track;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(height: u16, queued: usize) -> Vec<String> {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(&UserConfig::default(), dir.path().to_path_buf());
        app.queue = (0..queued).map(|i| Track::new(format!("/m/song{i}.mp3"))).collect();

        let mut terminal = Terminal::new(TestBackend::new(40, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, &app)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..40).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn overflow_line_counts_hidden_tracks() {
        // 8 rows: 2 borders, header, blank, 4 track rows
        let rows = rendered(8, 10);
        assert!(rows.iter().any(|r| r.contains("… 7 more")));
        assert!(rows.iter().any(|r| r.contains("song2")));
        assert!(!rows.iter().any(|r| r.contains("song3")));
    }

    #[test]
    fn tiny_panel_keeps_the_header() {
        // 4 rows: 2 borders, header, blank; no room for tracks
        let rows = rendered(4, 3);
        assert!(rows.iter().any(|r| r.contains("QUEUE")));
        assert!(!rows.iter().any(|r| r.contains("more")));
    }
}
