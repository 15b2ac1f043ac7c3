use crate::app::App;
use ratatui::Frame;

pub mod input;
pub mod toast;

pub fn render(f: &mut Frame, app: &App) {
    // TOAST NOTIFICATION
    if app.toast.is_some() {
        toast::render(f, app);
    }

    // INPUT POPUP
    if app.input_state.is_some() {
        input::render(f, app);
    }
}
