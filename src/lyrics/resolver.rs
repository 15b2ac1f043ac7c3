use super::{
    parse_track_name, text, LyricsError, LyricsProvider, LyricsReply, LyricsStage, LyricsState, TrackName,
};
use crate::library::Track;
use crate::session::SessionEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs lookups in the background and keeps only the newest answer.
///
/// Each request takes the next token. Older lookups are never aborted; their replies
/// simply fail the token check in [`LyricsResolver::apply`].
pub struct LyricsResolver {
    provider: Arc<dyn LyricsProvider>,
    events: mpsc::Sender<SessionEvent>,
    expected: u64,
    state: LyricsState,
    track: Option<Track>,
}

impl LyricsResolver {
    pub fn new(provider: Arc<dyn LyricsProvider>, events: mpsc::Sender<SessionEvent>) -> Self {
        Self {
            provider,
            events,
            expected: 0,
            state: LyricsState::NotFetched,
            track: None,
        }
    }

    pub fn state(&self) -> &LyricsState {
        &self.state
    }

    /// Track the current lyrics state belongs to.
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn expected_token(&self) -> u64 {
        self.expected
    }

    pub fn awaiting_manual_input(&self) -> bool {
        self.state.is_failed()
    }

    /// True when `track` already has lyrics shown or on the way.
    pub fn covers(&self, track: &Track) -> bool {
        self.track.as_ref() == Some(track)
            && matches!(self.state, LyricsState::Fetching(_) | LyricsState::Available(_))
    }

    /// Start the structured lookup for `track`, superseding anything in flight.
    pub fn request(&mut self, track: &Track) -> u64 {
        let token = self.next_token();
        self.track = Some(track.clone());
        self.state = LyricsState::Fetching(token);

        let TrackName { artist, title } = parse_track_name(track.title());
        tracing::debug!(token, track = %track.title(), ?artist, %title, "lyrics lookup");

        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = provider.search(&title, artist.as_deref()).await;
            let reply = LyricsReply { token, stage: LyricsStage::Lookup, outcome };
            if events.send(SessionEvent::Lyrics(reply)).await.is_err() {
                tracing::debug!(token, "session closed before lyrics arrived");
            }
        });
        token
    }

    /// Scrape a user-supplied page. Only allowed after a failed lookup; returns `None` otherwise.
    pub fn request_manual(&mut self, url: &str) -> Option<u64> {
        if !self.awaiting_manual_input() {
            return None;
        }
        let token = self.next_token();
        self.state = LyricsState::Fetching(token);
        tracing::debug!(token, url, "lyrics scrape");

        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        let url = url.trim().to_string();
        tokio::spawn(async move {
            let outcome = provider.scrape(&url).await;
            let reply = LyricsReply { token, stage: LyricsStage::Scrape, outcome };
            if events.send(SessionEvent::Lyrics(reply)).await.is_err() {
                tracing::debug!(token, "session closed before lyrics arrived");
            }
        });
        Some(token)
    }

    /// Apply a finished lookup. Returns false if the reply was stale and dropped.
    pub fn apply(&mut self, reply: LyricsReply) -> bool {
        if reply.token != self.expected {
            tracing::debug!(token = reply.token, expected = self.expected, "discarding stale lyrics");
            return false;
        }

        self.state = match reply.outcome {
            Ok(raw) => {
                let cleaned = text::strip_markup(&raw);
                if cleaned.is_empty() {
                    LyricsState::FailedAwaitingManualInput(failure_message(reply.stage, &LyricsError::NotFound))
                } else {
                    LyricsState::Available(cleaned)
                }
            }
            Err(e) => {
                tracing::info!(token = reply.token, stage = ?reply.stage, error = %e, "lyrics unavailable");
                LyricsState::FailedAwaitingManualInput(failure_message(reply.stage, &e))
            }
        };
        true
    }

    fn next_token(&mut self) -> u64 {
        self.expected += 1;
        self.expected
    }
}

fn failure_message(stage: LyricsStage, error: &LyricsError) -> String {
    match (stage, error) {
        (LyricsStage::Lookup, LyricsError::NotFound) => "No lyrics found for this track.".to_string(),
        (LyricsStage::Lookup, e) => format!("Lyrics lookup failed: {e}"),
        (LyricsStage::Scrape, LyricsError::NoLyricsContainer) => "No lyrics on that page.".to_string(),
        (LyricsStage::Scrape, e) => format!("Could not load that page: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{self, BoxFuture};
    use futures::FutureExt;

    struct Silent;

    impl LyricsProvider for Silent {
        fn search<'a>(&'a self, _: &'a str, _: Option<&'a str>) -> BoxFuture<'a, Result<String, LyricsError>> {
            future::pending().boxed()
        }

        fn scrape<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<String, LyricsError>> {
            future::pending().boxed()
        }
    }

    fn resolver() -> LyricsResolver {
        let (tx, _rx) = mpsc::channel(8);
        LyricsResolver::new(Arc::new(Silent), tx)
    }

    fn reply(token: u64, outcome: Result<String, LyricsError>) -> LyricsReply {
        LyricsReply { token, stage: LyricsStage::Lookup, outcome }
    }

    #[tokio::test]
    async fn tokens_increase_per_request() {
        let mut r = resolver();
        let track = Track::new("/m/A - B.mp3");
        assert_eq!(r.request(&track), 1);
        assert_eq!(r.request(&track), 2);
        assert_eq!(r.state(), &LyricsState::Fetching(2));
    }

    #[tokio::test]
    async fn late_reply_is_discarded() {
        let mut r = resolver();
        r.request(&Track::new("/m/one.mp3"));
        r.request(&Track::new("/m/two.mp3"));

        assert!(!r.apply(reply(1, Ok("old words".into()))));
        assert_eq!(r.state(), &LyricsState::Fetching(2));

        assert!(r.apply(reply(2, Ok("[00:01.00]new words".into()))));
        assert_eq!(r.state(), &LyricsState::Available("new words".into()));
        assert_eq!(r.track().unwrap().title(), "two");
    }

    #[tokio::test]
    async fn failures_wait_for_a_url() {
        let mut r = resolver();
        assert_eq!(r.request_manual("https://x"), None);

        r.request(&Track::new("/m/song.mp3"));
        r.apply(reply(1, Err(LyricsError::NotFound)));
        assert!(r.awaiting_manual_input());

        let token = r.request_manual("https://lyrics.example/song").unwrap();
        assert_eq!(token, 2);
        assert_eq!(r.state(), &LyricsState::Fetching(2));
    }

    #[tokio::test]
    async fn markup_only_text_counts_as_missing() {
        let mut r = resolver();
        r.request(&Track::new("/m/song.mp3"));
        r.apply(reply(1, Ok("[Intro]\n[00:00.00]".into())));
        assert_eq!(
            r.state(),
            &LyricsState::FailedAwaitingManualInput("No lyrics found for this track.".into())
        );
    }

    #[tokio::test]
    async fn covers_only_live_states() {
        let mut r = resolver();
        let track = Track::new("/m/song.mp3");
        assert!(!r.covers(&track));
        r.request(&track);
        assert!(r.covers(&track));
        r.apply(reply(1, Err(LyricsError::NotFound)));
        assert!(!r.covers(&track));
    }
}
