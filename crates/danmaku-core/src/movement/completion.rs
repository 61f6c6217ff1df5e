//! L4 Atomic Layer: Cancelable move-completion signal
//!
//! `start()` hands the caller a `MoveCompletion` and keeps the matching
//! `MoveTimer`. Firing the timer resolves the completion with `Ended`;
//! clearing (or dropping) it resolves it with `Cancelled`, so a stale
//! timeline can never report an end against a recycled node.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// How a traversal finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The transition ran to completion
    Ended,
    /// The timeline was reset, destroyed or restarted first
    Cancelled,
}

/// Engine-side handle of a pending completion
#[derive(Debug)]
pub struct MoveTimer {
    tx: oneshot::Sender<()>,
}

impl MoveTimer {
    pub fn fire(self) {
        // The receiver may already be gone; nobody is waiting then.
        let _ = self.tx.send(());
    }

    pub fn clear(self) {
        drop(self.tx);
    }
}

/// Caller-side future returned by `start()`
#[derive(Debug)]
#[must_use = "a MoveCompletion does nothing unless awaited or polled"]
pub struct MoveCompletion {
    rx: oneshot::Receiver<()>,
}

impl MoveCompletion {
    /// Non-blocking check; `None` while the traversal is still pending
    pub fn try_outcome(&mut self) -> Option<MoveOutcome> {
        match self.rx.try_recv() {
            Ok(()) => Some(MoveOutcome::Ended),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(MoveOutcome::Cancelled),
        }
    }
}

impl Future for MoveCompletion {
    type Output = MoveOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|result| match result {
            Ok(()) => MoveOutcome::Ended,
            Err(_) => MoveOutcome::Cancelled,
        })
    }
}

/// Create a linked timer/completion pair
pub fn move_timer() -> (MoveTimer, MoveCompletion) {
    let (tx, rx) = oneshot::channel();
    (MoveTimer { tx }, MoveCompletion { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fire_resolves_ended() {
        let (timer, completion) = move_timer();
        timer.fire();
        assert_eq!(completion.await, MoveOutcome::Ended);
    }

    #[tokio::test]
    async fn test_clear_resolves_cancelled() {
        let (timer, completion) = move_timer();
        timer.clear();
        assert_eq!(completion.await, MoveOutcome::Cancelled);
    }

    #[test]
    fn test_try_outcome() {
        let (timer, mut completion) = move_timer();
        assert_eq!(completion.try_outcome(), None);
        timer.fire();
        assert_eq!(completion.try_outcome(), Some(MoveOutcome::Ended));
    }

    #[test]
    fn test_fire_without_receiver() {
        let (timer, completion) = move_timer();
        drop(completion);
        timer.fire();
    }
}
