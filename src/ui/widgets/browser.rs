use crate::app::App;
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = format!(" {} ", app.current_dir.display());
    let block = super::panel(&title, theme.blue, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let content_h = inner.height as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(content_h);

    if app.entries.is_empty() {
        lines.push(
            Line::from(Span::styled("Empty folder", Style::default().fg(theme.overlay)))
                .alignment(Alignment::Center),
        );
    } else {
        // keep the selection roughly centred
        let start_idx = app
            .selected
            .saturating_sub(content_h / 2)
            .min(app.entries.len().saturating_sub(content_h));
        let playing = app.now_playing.track.as_ref().map(|t| t.path());

        for (idx, entry) in app.entries.iter().enumerate().skip(start_idx).take(content_h) {
            let is_sel = idx == app.selected;
            let is_playing = playing == Some(entry.path.as_path());

            let (marker, marker_style) = if is_sel {
                ("●", Style::default().fg(theme.yellow))
            } else {
                ("○", Style::default().fg(theme.surface))
            };
            let (icon, icon_style) = if entry.is_dir {
                ("📁", Style::default().fg(theme.blue))
            } else if is_playing {
                ("▶", Style::default().fg(theme.red))
            } else {
                ("♪", Style::default().fg(theme.green))
            };
            let name_style = match (is_sel, is_playing) {
                (true, _) => Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(theme.red),
                (false, false) => Style::default().fg(theme.text),
            };

            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", marker), marker_style),
                Span::styled(format!("{} ", icon), icon_style),
                Span::styled(truncate(&entry.name, width.saturating_sub(7)), name_style),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
