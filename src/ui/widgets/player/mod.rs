use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub mod info;
pub mod progress;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    // --- MUSIC CARD ---
    let music_block = super::panel(" Now Playing ", theme.blue, theme);
    let inner = music_block.inner(area);
    f.render_widget(music_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title + status
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Time
            Constraint::Min(0),
        ])
        .split(inner);

    info::render(f, chunks[0], app);
    progress::render_progress(f, chunks[2], app);
    progress::render_time(f, chunks[3], app);
}
