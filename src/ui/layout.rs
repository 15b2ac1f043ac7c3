use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the now-playing card, borders included.
const PLAYER_CARD_HEIGHT: u16 = 8;

pub struct MainLayout {
    pub body_area: Rect,
    pub footer_area: Rect,
}

pub fn get_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    MainLayout {
        body_area: chunks[0],
        footer_area: chunks[1],
    }
}

pub struct ContentLayout {
    pub browser: Rect,
    pub player: Rect,
    pub right: Option<Rect>,
}

/// Browser above the player card on the left; queue or lyrics on the right when wide enough.
pub fn get_content_layout(area: Rect) -> ContentLayout {
    let (left, right) = if area.width >= 80 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Min(20)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(PLAYER_CARD_HEIGHT)])
        .split(left);

    ContentLayout {
        browser: column[0],
        player: column[1],
        right,
    }
}
