use crate::app::App;
use crate::session::RepeatMode;
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
    let np = &app.now_playing;
    let width = area.width as usize;

    let Some(track) = &np.track else {
        let idle = Paragraph::new(Line::from(Span::styled(
            "Pick a song and press Enter",
            Style::default().fg(theme.overlay),
        )))
        .alignment(Alignment::Center);
        f.render_widget(idle, area);
        return;
    };

    let title = Line::from(Span::styled(
        truncate(track.title(), width.saturating_sub(2)),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ));

    let on = Style::default().fg(theme.green).add_modifier(Modifier::BOLD);
    let off = Style::default().fg(theme.surface);
    let status = Line::from(vec![
        Span::styled(
            if np.paused { "⏸ Paused" } else { "▶ Playing" },
            Style::default().fg(theme.yellow),
        ),
        Span::raw("   "),
        Span::styled("🔀 Shuffle", if np.shuffle { on } else { off }),
        Span::raw("   "),
        Span::styled(
            "🔂 Repeat",
            if np.repeat == RepeatMode::RepeatCurrentTrack { on } else { off },
        ),
    ]);

    f.render_widget(Paragraph::new(vec![title, status]).alignment(Alignment::Center), area);
}
