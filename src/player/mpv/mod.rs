//! [`Engine`] backed by an mpv child process, driven over its JSON IPC socket.

pub mod ipc;

use self::ipc::{lock, EventRouter, Mirror, Pending, OBSERVED_PROPERTIES};
use super::{Engine, EngineError, EngineResult, LoadMode, SeekMode};
use crate::library::Track;
use crate::session::SessionEvent;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use std::{fs, thread};
use tokio::sync::mpsc;

const CONNECT_POLL: Duration = Duration::from_millis(50);
const QUIT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MpvConfig {
    pub binary: String,
    pub extra_args: Vec<String>,
    pub socket_timeout_ms: u64,
    pub reply_timeout_ms: u64,
}

impl Default for MpvConfig {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            extra_args: Vec::new(),
            socket_timeout_ms: 3000,
            reply_timeout_ms: 1000,
        }
    }
}

pub struct MpvEngine {
    writer: Mutex<UnixStream>,
    child: Mutex<Option<Child>>,
    mirror: Arc<Mutex<Mirror>>,
    pending: Pending,
    next_request: AtomicU64,
    terminated: AtomicBool,
    socket_path: PathBuf,
    reply_timeout: Duration,
}

impl MpvEngine {
    /// Start mpv idle, connect to its socket and subscribe to the properties we mirror.
    ///
    /// Filename changes are posted to `events` from a dedicated reader thread.
    pub fn spawn(config: &MpvConfig, events: mpsc::Sender<SessionEvent>) -> EngineResult<Self> {
        let socket_path = std::env::temp_dir().join(format!("glyphix-mpv-{}.sock", std::process::id()));
        let _ = fs::remove_file(&socket_path);

        let mut child = Command::new(&config.binary)
            .args(["--idle=yes", "--no-video", "--no-terminal"])
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .args(&config.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                binary: config.binary.clone(),
                source,
            })?;
        tracing::info!(binary = %config.binary, pid = child.id(), "started mpv");

        let stream = match connect(&socket_path, &mut child, Duration::from_millis(config.socket_timeout_ms)) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = fs::remove_file(&socket_path);
                return Err(e);
            }
        };

        // from here on, dropping `engine` kills mpv and removes the socket
        let engine = Self::from_parts(stream, child, socket_path, config);

        let reader = lock(&engine.writer).try_clone()?;
        let router = EventRouter::new(Arc::clone(&engine.mirror), Arc::clone(&engine.pending), events);
        thread::Builder::new()
            .name("mpv-events".into())
            .spawn(move || router.run(reader))?;

        for (idx, property) in OBSERVED_PROPERTIES.iter().enumerate() {
            engine.command(json!(["observe_property", idx + 1, property]))?;
        }

        Ok(engine)
    }

    fn from_parts(stream: UnixStream, child: Child, socket_path: PathBuf, config: &MpvConfig) -> Self {
        Self {
            writer: Mutex::new(stream),
            child: Mutex::new(Some(child)),
            mirror: Arc::new(Mutex::new(Mirror::default())),
            pending: Pending::default(),
            next_request: AtomicU64::new(1),
            terminated: AtomicBool::new(false),
            socket_path,
            reply_timeout: Duration::from_millis(config.reply_timeout_ms),
        }
    }

    /// Send one command and wait for mpv's verdict.
    fn command(&self, args: Value) -> EngineResult<()> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(EngineError::Terminated);
        }

        let id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = std_mpsc::channel();
        lock(&self.pending).insert(id, tx);

        if let Err(e) = self.write(id, &args) {
            lock(&self.pending).remove(&id);
            return Err(e);
        }

        match rx.recv_timeout(self.reply_timeout) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => {
                tracing::debug!(command = %args, %message, "mpv rejected command");
                Err(EngineError::Rejected(message))
            }
            Err(RecvTimeoutError::Timeout) => {
                lock(&self.pending).remove(&id);
                tracing::warn!(command = %args, "mpv reply timed out");
                Err(EngineError::NoReply)
            }
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Terminated),
        }
    }

    fn write(&self, id: u64, args: &Value) -> EngineResult<()> {
        let mut line = serde_json::to_string(&json!({ "command": args, "request_id": id }))?;
        line.push('\n');
        let mut writer = lock(&self.writer);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Ask mpv to quit, give it a moment, then make sure the process and socket are gone.
    fn shutdown(&self) {
        let id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let _ = self.write(id, &json!(["quit"]));

        if let Some(mut child) = lock(&self.child).take() {
            let deadline = Instant::now() + QUIT_GRACE;
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        tracing::info!(%status, "mpv exited");
                        break;
                    }
                    Ok(None) if Instant::now() < deadline => thread::sleep(CONNECT_POLL),
                    _ => {
                        tracing::warn!("mpv did not quit, killing it");
                        let _ = child.kill();
                        let _ = child.wait();
                        break;
                    }
                }
            }
        }

        let _ = lock(&self.writer).shutdown(std::net::Shutdown::Both);
        let _ = fs::remove_file(&self.socket_path);
    }
}

fn connect(path: &Path, child: &mut Child, timeout: Duration) -> EngineResult<UnixStream> {
    let deadline = Instant::now() + timeout;
    loop {
        match UnixStream::connect(path) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                if let Some(status) = child.try_wait()? {
                    tracing::error!(%status, "mpv exited during startup");
                    return Err(EngineError::Terminated);
                }
                if Instant::now() >= deadline {
                    tracing::error!(path = %path.display(), error = %e, "mpv socket never came up");
                    return Err(EngineError::SocketTimeout(path.to_path_buf()));
                }
                thread::sleep(CONNECT_POLL);
            }
        }
    }
}

impl Engine for MpvEngine {
    fn load(&self, track: &Track, mode: LoadMode) -> EngineResult<()> {
        let flag = match mode {
            LoadMode::Replace => "replace",
            LoadMode::Append => "append",
        };
        self.command(json!(["loadfile", track.path().to_string_lossy(), flag]))
    }

    fn queue_clear(&self) -> EngineResult<()> {
        self.command(json!(["playlist-clear"]))
    }

    fn set_paused(&self, paused: bool) -> EngineResult<()> {
        self.command(json!(["set_property", "pause", paused]))
    }

    fn seek(&self, seconds: f64, mode: SeekMode) -> EngineResult<()> {
        let flag = match mode {
            SeekMode::Absolute => "absolute",
            SeekMode::Relative => "relative",
        };
        self.command(json!(["seek", seconds, flag]))
    }

    fn skip_next(&self) -> EngineResult<()> {
        self.command(json!(["playlist-next", "weak"]))
    }

    fn skip_prev(&self) -> EngineResult<()> {
        self.command(json!(["playlist-prev", "weak"]))
    }

    fn set_loop_current_track(&self, enabled: bool) -> EngineResult<()> {
        let value = if enabled { "inf" } else { "no" };
        self.command(json!(["set_property", "loop-file", value]))
    }

    fn current_filename(&self) -> Option<String> {
        lock(&self.mirror).filename.clone()
    }

    fn elapsed_seconds(&self) -> Option<f64> {
        lock(&self.mirror).time_pos
    }

    fn duration_seconds(&self) -> Option<f64> {
        lock(&self.mirror).duration
    }

    fn is_paused(&self) -> Option<bool> {
        lock(&self.mirror).pause
    }

    fn terminate(&self) -> EngineResult<()> {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            self.shutdown();
        }
        Ok(())
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg: MpvConfig = toml::from_str("binary = \"/opt/mpv\"").unwrap();
        assert_eq!(cfg.binary, "/opt/mpv");
        assert_eq!(cfg.socket_timeout_ms, 3000);
        assert_eq!(cfg.reply_timeout_ms, 1000);
        assert!(cfg.extra_args.is_empty());
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let (tx, _rx) = mpsc::channel(1);
        let cfg = MpvConfig {
            binary: "/nonexistent/glyphix-test-mpv".into(),
            ..MpvConfig::default()
        };
        assert!(matches!(MpvEngine::spawn(&cfg, tx), Err(EngineError::Spawn { .. })));
    }

    #[test]
    fn dropping_a_half_built_engine_reaps_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("mpv.sock");
        fs::write(&socket_path, b"").unwrap();

        let (ours, _theirs) = UnixStream::pair().unwrap();
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();

        let engine = MpvEngine::from_parts(ours, child, socket_path.clone(), &MpvConfig::default());
        drop(engine);

        assert!(!socket_path.exists());
        assert!(!Path::new(&format!("/proc/{pid}")).exists());
    }
}
