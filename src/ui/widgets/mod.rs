pub mod browser;
pub mod lyrics;
pub mod player;
pub mod popups;
pub mod queue;

use crate::ui::Theme;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

/// Rounded panel frame shared by every widget.
pub fn panel<'a>(title: &'a str, accent: Color, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(vec![Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )]))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(Color::Reset).fg(theme.text))
}
