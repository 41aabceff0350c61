//! Unread counter polling for the navigation badge

use crate::api::ApiClient;
use crate::core::tasks::PeriodicTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Polls `GET /notifications/count` while the session is authenticated.
///
/// The count is published on a watch channel. A failed poll keeps the last
/// value; a signed-out session resets it to zero without calling out.
/// Dropping the poller stops it.
pub struct UnreadCountPoller {
    count: Arc<watch::Sender<u64>>,
    task: PeriodicTask,
}

impl UnreadCountPoller {
    pub fn spawn(api: ApiClient, interval: Duration) -> Self {
        let (sender, _) = watch::channel(0u64);
        let count = Arc::new(sender);
        let publisher = count.clone();

        let task = PeriodicTask::spawn("unread-count", interval, move || {
            let api = api.clone();
            let publisher = publisher.clone();
            async move {
                if !api.session().is_authenticated() {
                    publisher.send_replace(0);
                    return;
                }

                match api.unread_count().await {
                    Ok(unread) => {
                        debug!(unread, "Unread notification count");
                        publisher.send_replace(unread);
                    }
                    Err(e) => warn!(error = %e, "Failed to fetch notification count"),
                }
            }
        });

        Self { count, task }
    }

    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    pub fn stop(&self) {
        self.task.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}
