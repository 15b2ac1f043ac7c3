pub mod layout;
pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;

use crate::app::{App, RightPanel};
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();

    // 1. Layout
    let main_layout = layout::get_main_layout(area);
    let content = layout::get_content_layout(main_layout.body_area);

    // 2. Left column
    widgets::browser::render(f, content.browser, app);
    widgets::player::render(f, content.player, app);

    // 3. Right panel (Queue / Lyrics)
    if let Some(right_area) = content.right {
        match app.panel {
            RightPanel::Queue => widgets::queue::render(f, right_area, app),
            RightPanel::Lyrics => widgets::lyrics::render(f, right_area, app),
        }
    }

    // 4. Footer hints
    render_footer(f, main_layout.footer_area, app);

    // 5. Popups (Overlays)
    widgets::popups::render(f, app);
}

fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let theme = &app.theme;
    let keys = &app.keys;
    let key_style = Style::default().fg(theme.overlay).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(theme.overlay);

    let hints = [
        (&keys.play_pause, "pause"),
        (&keys.next_track, "next"),
        (&keys.prev_track, "prev"),
        (&keys.shuffle, "shuffle"),
        (&keys.repeat, "repeat"),
        (&keys.toggle_lyrics, "lyrics"),
        (&keys.quit, "quit"),
    ];
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {} ", keys.display(key)), key_style),
                Span::styled(format!("{} ", label), label_style),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), area);
}
