//! Cancellable background tasks
//!
//! Both task kinds are owned by the view that started them and stop when that
//! owner drops them:
//! - `PeriodicTask` runs an action now and then on every interval tick
//! - `Debouncer` runs an action once the caller has been quiet for a delay

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A repeating task tied to its owner's lifetime
pub struct PeriodicTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn a task that runs `tick` immediately and then every `interval`
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = tick() => {}
                }
            }

            debug!(task = name, "Periodic task stopped");
        });

        Self { token, handle }
    }

    /// Stop the task; an in-flight tick is abandoned
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Collapses bursts of calls into a single action after a quiet period
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer for `action`, replacing any timer still waiting.
    ///
    /// Only the waiting period is cancellable: once `action` has started it
    /// runs to completion even if another call arrives.
    pub fn schedule<Fut>(&self, action: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.swap_pending(Some(token.clone())) {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            action.await;
        });
    }

    /// Drop the waiting timer, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.swap_pending(None) {
            previous.cancel();
        }
    }

    fn swap_pending(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *pending, next)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
