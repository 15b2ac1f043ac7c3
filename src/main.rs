use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use glyphix::app::{cli::Args, config::AppConfig, input_handler::handle_key, App};
use glyphix::library::is_audio_file;
use glyphix::lyrics::{LrclibClient, LyricsProvider};
use glyphix::player::{Engine, MpvEngine};
use glyphix::session::{runner, Command, Session, SessionEvent, SessionView};
use glyphix::{logging, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const EVENT_QUEUE: usize = 256;
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    human_panic::setup_panic!();
    install_terminal_restore_hook();

    let log_dir = args.log_dir.clone().unwrap_or_else(AppConfig::get_log_dir);
    let _log_guard = logging::init_logging(&log_dir)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting glyphix");

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(mpv) = &args.mpv {
        config.engine.binary = mpv.to_string_lossy().into_owned();
    }

    let (tx, rx) = mpsc::channel::<SessionEvent>(EVENT_QUEUE);

    // Playback is best effort: without mpv the browser and lyrics still work
    let mut startup_notice = None;
    let engine: Option<Box<dyn Engine>> = match MpvEngine::spawn(&config.engine, tx.clone()) {
        Ok(engine) => Some(Box::new(engine)),
        Err(e) => {
            tracing::error!(error = %e, "mpv unavailable");
            startup_notice = Some(format!("mpv unavailable: {}", e));
            None
        }
    };

    let provider: Arc<dyn LyricsProvider> = Arc::new(LrclibClient::new(&config.lyrics)?);
    let (session, mut view) = Session::new(engine, provider, tx.clone());
    let tick = Duration::from_millis(config.tick_interval_ms.max(50));
    let session_task = tokio::spawn(runner::run(session, rx, tick));

    let (start_dir, start_file) = resolve_start(args.path.as_deref(), &config.music_dir());
    let mut app = App::new(&config, start_dir);
    if let Some(notice) = startup_notice {
        app.show_toast(&notice);
    }
    if let Some(file) = start_file {
        tx.send(Command::Select(file).into()).await?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app, &mut view, &tx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // The UI may have left on an error; make sure the session still shuts mpv down
    let _ = tx.send(Command::Quit.into()).await;
    drop(tx);
    if let Err(e) = session_task.await {
        tracing::error!(error = %e, "session task failed");
    }
    tracing::info!("bye");

    result
}

async fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    view: &mut SessionView,
    tx: &mpsc::Sender<SessionEvent>,
) -> Result<()> {
    let mut reader = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);

    while app.is_running {
        if app.sync(view) > 0 {
            // audible cue on top of the toast
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
        app.on_tick();
        terminal.draw(|f| ui::ui(f, app))?;

        tokio::select! {
            maybe_event = reader.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = handle_key(key, app) {
                        if tx.send(command.into()).await.is_err() {
                            tracing::warn!("session is gone, leaving");
                            break;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "terminal input failed");
                    break;
                }
                None => break,
            },
            _ = frames.tick() => {}
        }
    }
    Ok(())
}

/// Directory to browse first, plus a file to start with when `path` names one.
fn resolve_start(path: Option<&Path>, music_dir: &Path) -> (PathBuf, Option<PathBuf>) {
    let target = path.unwrap_or(music_dir);
    let target = target.canonicalize().unwrap_or_else(|_| target.to_path_buf());

    if target.is_file() && is_audio_file(&target) {
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return (dir, Some(target));
    }
    if target.is_dir() {
        return (target, None);
    }
    (PathBuf::from("."), None)
}

fn install_terminal_restore_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}
