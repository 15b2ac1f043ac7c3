use super::{Session, SessionEvent};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::{self, MissedTickBehavior};

/// Drive `session` until it handles `Quit` or every sender is gone.
///
/// Ticks are merged in here; a slow event delays the next tick instead of queueing a burst.
///
/// Engine commands wait synchronously for their reply. On a multi-thread runtime each event is
/// handled inside [`task::block_in_place`] so those waits do not stall other tasks on this worker.
pub async fn run(mut session: Session, mut events: mpsc::Receiver<SessionEvent>, tick: Duration) {
    let blocking_ok = Handle::current().runtime_flavor() == RuntimeFlavor::MultiThread;
    let mut ticker = time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            received = events.recv() => match received {
                Some(event) => event,
                None => {
                    session.shutdown();
                    break;
                }
            },
            _ = ticker.tick() => SessionEvent::Tick,
        };

        let flow = if blocking_ok {
            task::block_in_place(|| session.handle(event))
        } else {
            session.handle(event)
        };
        if flow.is_break() {
            break;
        }
    }
    tracing::debug!("session runner finished");
}
