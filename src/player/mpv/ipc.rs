//! mpv JSON IPC messages and the reader side of the socket.

use crate::player::{EngineError, EngineEvent};
use crate::session::SessionEvent;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::sync::{mpsc as std_mpsc, Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Properties we `observe_property`, indexed by observer id minus one.
pub const OBSERVED_PROPERTIES: [&str; 4] = ["filename", "time-pos", "duration", "pause"];

/// Reply channel for one in-flight command: `Err` holds mpv's error string.
pub type ReplySender = std_mpsc::Sender<Result<(), String>>;
pub type Pending = Arc<Mutex<HashMap<u64, ReplySender>>>;

/// One line from mpv: either a command reply or an event.
#[derive(Debug, Deserialize)]
pub struct MpvMessage {
    pub event: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub data: Value,
    pub request_id: Option<u64>,
    pub error: Option<String>,
}

/// Last reported value of each observed property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mirror {
    pub filename: Option<String>,
    pub time_pos: Option<f64>,
    pub duration: Option<f64>,
    pub pause: Option<bool>,
}

/// Lock, shrugging off poisoning: the data behind these locks stays valid after a panic.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Dispatches incoming lines to the mirror, the session and waiting callers.
pub struct EventRouter {
    mirror: Arc<Mutex<Mirror>>,
    pending: Pending,
    events: mpsc::Sender<SessionEvent>,
}

impl EventRouter {
    pub fn new(mirror: Arc<Mutex<Mirror>>, pending: Pending, events: mpsc::Sender<SessionEvent>) -> Self {
        Self { mirror, pending, events }
    }

    pub fn route(&self, line: &str) -> Result<(), EngineError> {
        let msg: MpvMessage = serde_json::from_str(line)?;

        match msg.event.as_deref() {
            None => {
                if let Some(id) = msg.request_id {
                    self.reply(id, msg.error);
                }
            }
            Some("property-change") => {
                if let Some(name) = msg.name.as_deref() {
                    self.property_changed(name, msg.data);
                }
            }
            Some(other) => tracing::trace!(event = other, "mpv event"),
        }
        Ok(())
    }

    fn reply(&self, id: u64, error: Option<String>) {
        let Some(waiter) = lock(&self.pending).remove(&id) else {
            tracing::debug!(request_id = id, "reply for a command nobody waits on");
            return;
        };
        let result = match error.as_deref() {
            None | Some("success") => Ok(()),
            Some(e) => Err(e.to_string()),
        };
        // the caller may have timed out already
        let _ = waiter.send(result);
    }

    fn property_changed(&self, name: &str, data: Value) {
        let mut mirror = lock(&self.mirror);
        match name {
            "filename" => {
                let filename = data.as_str().map(str::to_string);
                mirror.filename = filename.clone();
                drop(mirror);
                tracing::debug!(?filename, "mpv filename changed");
                let event = SessionEvent::Engine(EngineEvent::FilenameChanged(filename));
                if self.events.blocking_send(event).is_err() {
                    tracing::debug!("session closed, dropping engine event");
                }
            }
            "time-pos" => mirror.time_pos = data.as_f64(),
            "duration" => mirror.duration = data.as_f64(),
            "pause" => mirror.pause = data.as_bool(),
            _ => {}
        }
    }

    /// Read until the socket closes, then fail every command still waiting.
    pub fn run<R: Read>(self, reader: R) {
        for line in BufReader::new(reader).lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => {
                    if let Err(e) = self.route(&line) {
                        tracing::warn!(error = %e, "ignoring mpv message");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "mpv socket read failed");
                    break;
                }
            }
        }
        tracing::debug!("mpv event reader finished");
        lock(&self.pending).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> (EventRouter, Arc<Mutex<Mirror>>, Pending, mpsc::Receiver<SessionEvent>) {
        let mirror = Arc::new(Mutex::new(Mirror::default()));
        let pending: Pending = Arc::default();
        let (tx, rx) = mpsc::channel(8);
        (EventRouter::new(mirror.clone(), pending.clone(), tx), mirror, pending, rx)
    }

    #[test]
    fn property_changes_update_the_mirror() {
        let (router, mirror, _, _rx) = router();
        router
            .route(r#"{"event":"property-change","id":2,"name":"time-pos","data":12.5}"#)
            .unwrap();
        router
            .route(r#"{"event":"property-change","id":3,"name":"duration","data":200}"#)
            .unwrap();
        router
            .route(r#"{"event":"property-change","id":4,"name":"pause","data":true}"#)
            .unwrap();

        let m = lock(&mirror).clone();
        assert_eq!(m.time_pos, Some(12.5));
        assert_eq!(m.duration, Some(200.0));
        assert_eq!(m.pause, Some(true));
    }

    #[test]
    fn filename_changes_reach_the_session() {
        let (router, mirror, _, mut rx) = router();
        router
            .route(r#"{"event":"property-change","id":1,"name":"filename","data":"b.mp3"}"#)
            .unwrap();
        router
            .route(r#"{"event":"property-change","id":1,"name":"filename"}"#)
            .unwrap();

        assert!(matches!(
            rx.try_recv(),
            Ok(SessionEvent::Engine(EngineEvent::FilenameChanged(Some(ref f)))) if f == "b.mp3"
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(SessionEvent::Engine(EngineEvent::FilenameChanged(None)))
        ));
        assert_eq!(lock(&mirror).filename, None);
    }

    #[test]
    fn replies_go_to_their_waiter() {
        let (router, _, pending, _rx) = router();
        let (ok_tx, ok_rx) = std_mpsc::channel();
        let (err_tx, err_rx) = std_mpsc::channel();
        lock(&pending).insert(7, ok_tx);
        lock(&pending).insert(8, err_tx);

        router.route(r#"{"request_id":8,"error":"error running command","data":null}"#).unwrap();
        router.route(r#"{"request_id":7,"error":"success"}"#).unwrap();

        assert_eq!(ok_rx.recv().unwrap(), Ok(()));
        assert_eq!(err_rx.recv().unwrap(), Err("error running command".to_string()));
        assert!(lock(&pending).is_empty());
    }

    #[test]
    fn garbage_is_an_error_not_a_panic() {
        let (router, _, _, _rx) = router();
        assert!(matches!(router.route("not json"), Err(EngineError::Json(_))));
    }

    #[test]
    fn closed_socket_fails_waiters() {
        let (router, mirror, pending, _rx) = router();
        let (tx, rx) = std_mpsc::channel();
        lock(&pending).insert(1, tx);

        let input = "{\"event\":\"property-change\",\"name\":\"time-pos\",\"data\":1.0}\n\n";
        router.run(input.as_bytes());

        assert!(rx.recv().is_err());
        assert_eq!(lock(&mirror).time_pos, Some(1.0));
    }
}
