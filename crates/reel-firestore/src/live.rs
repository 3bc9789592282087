//! Polling live query.
//!
//! The REST API has no listen channel, so a live query is a background task
//! that re-runs a fetch at a fixed interval and forwards the complete result
//! set whenever it differs from the last one forwarded.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::error::FirestoreResult;

/// Buffered snapshots before the poller waits for the consumer.
const SNAPSHOT_BUFFER: usize = 4;

/// Owned handle to a live query.
///
/// Each item yielded by [`Subscription::next`] is a complete snapshot. Fetch
/// failures are logged and polling continues, so consumers simply keep their
/// last snapshot. Dropping the handle stops the poller.
pub struct Subscription<T> {
    updates: mpsc::Receiver<Vec<T>>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl<T> Subscription<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Start polling `fetch` every `interval`, first poll immediately.
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = FirestoreResult<Vec<T>>> + Send + 'static,
    {
        let (tx, updates) = mpsc::channel(SNAPSHOT_BUFFER);
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last: Option<Vec<T>> = None;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        // A slow read must not hold up cancellation
                        let result = tokio::select! {
                            result = fetch() => result,
                            _ = shutdown_rx.changed() => break,
                        };
                        match result {
                            Ok(items) => {
                                if last.as_ref() == Some(&items) {
                                    continue;
                                }
                                debug!(query = name, count = items.len(), "Live query changed");
                                if tx.send(items.clone()).await.is_err() {
                                    break;
                                }
                                last = Some(items);
                            }
                            Err(e) => {
                                warn!(query = name, "Live query fetch failed: {}", e);
                            }
                        }
                    }
                }
            }

            debug!(query = name, "Live query stopped");
        });

        Self {
            updates,
            shutdown,
            task: Some(task),
        }
    }

    /// Wait for the next snapshot; `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        self.updates.recv().await
    }

    /// Stop polling and wait for the background task to exit.
    pub async fn cancel(mut self) {
        let _ = self.shutdown.send(true);
        self.updates.close();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
