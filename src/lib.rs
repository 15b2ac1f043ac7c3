pub mod app;
pub mod library;
pub mod logging;
pub mod lyrics;
pub mod player;
pub mod session;
pub mod ui;
