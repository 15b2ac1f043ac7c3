use crate::app::App;
use crate::ui::utils::format_time;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Fraction of the track played, clamped to `0.0..=1.0`.
pub fn ratio(elapsed: Option<f64>, duration: Option<f64>) -> f64 {
    match (elapsed, duration) {
        (Some(e), Some(d)) if d > 0.0 => (e / d).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let np = &app.now_playing;
    if np.track.is_none() {
        return;
    }

    let gauge_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(area)[1];

    let width = gauge_area.width as usize;
    let occupied = (width as f64 * ratio(np.elapsed, np.duration)) as usize;
    let fill_style = Style::default().fg(theme.magenta);
    let empty_style = Style::default().fg(theme.surface);

    let bar: Vec<Span> = (0..width)
        .map(|i| {
            if i + 1 == occupied {
                // Playhead knob
                Span::styled("●", fill_style)
            } else if i < occupied {
                Span::styled("━", fill_style)
            } else {
                Span::styled("─", empty_style)
            }
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(bar)), gauge_area);
}

pub fn render_time(f: &mut Frame, area: Rect, app: &App) {
    let np = &app.now_playing;
    if np.track.is_none() {
        return;
    }
    let label = format!("{} / {}", format_time(np.elapsed), format_time(np.duration));
    let time = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.overlay));
    f.render_widget(time, area);
}

#[cfg(test)]
mod tests {
    use super::ratio;

    #[test]
    fn ratio_handles_unknowns() {
        assert_eq!(ratio(Some(30.0), Some(120.0)), 0.25);
        assert_eq!(ratio(Some(500.0), Some(120.0)), 1.0);
        assert_eq!(ratio(None, Some(120.0)), 0.0);
        assert_eq!(ratio(Some(3.0), Some(0.0)), 0.0);
    }
}
