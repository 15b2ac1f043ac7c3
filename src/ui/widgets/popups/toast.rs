use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, app: &App) {
    if let Some(ref toast) = app.toast {
        let theme = &app.theme;
        let now = std::time::Instant::now();

        // Auto-dismiss handled in App::on_tick()
        let message = &toast.message;
        let width = (message.width() as u16 + 6).min(f.area().width.saturating_sub(4));
        let height = 3;
        let mut x = f.area().width.saturating_sub(width + 1); // Top-right fixed

        let entrance_elapsed = now.duration_since(toast.start_time).as_millis();
        let time_remaining = toast.deadline.saturating_duration_since(now).as_millis();

        // Slide in from the right, slide back out before the deadline
        if entrance_elapsed < 300 {
            let t = entrance_elapsed as f32 / 300.0;
            let ease = 1.0 - (1.0 - t).powi(3);
            x += (width as f32 * (1.0 - ease)) as u16;
        } else if time_remaining < 300 {
            let t = (300 - time_remaining) as f32 / 300.0;
            x += (width as f32 * t.powi(3)) as u16;
        }

        if x < f.area().width {
            let full_area = Rect::new(x, 1, width, height);
            // Clip to screen bounds to avoid panic
            let visible_area = full_area.intersection(f.area());

            if !visible_area.is_empty() {
                f.render_widget(Clear, visible_area);

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.yellow))
                    .style(Style::default().bg(Color::Reset));

                let style = Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD);
                let text = Paragraph::new(Line::from(vec![Span::styled(message.as_str(), style)]))
                    .alignment(Alignment::Center)
                    .block(block);

                f.render_widget(text, visible_area);
            }
        }
    }
}
