//! Latest-wins background task slot.
//!
//! Owns at most one spawned task at a time. Scheduling a new task aborts the
//! previous one and bumps a generation counter. Results are tagged with the
//! generation they were spawned under, and only results from the current
//! generation are ever handed back. Combined with a start delay this is the
//! cancellable debounce timer used by the query controller.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// A single-slot, latest-wins task runner.
#[derive(Debug)]
pub struct LatestTask<T> {
    /// Generation of the most recently scheduled (or cancelled) task.
    generation: u64,
    /// Handle of the in-flight task, if any.
    handle: Option<JoinHandle<()>>,
    /// Sender cloned into each spawned task.
    tx: UnboundedSender<(u64, T)>,
    /// Completed results, possibly stale.
    rx: UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Default for LatestTask<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> LatestTask<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            handle: None,
            tx,
            rx,
        }
    }

    /// Runs `fut` immediately, replacing any pending task.
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.spawn_after(Duration::ZERO, fut);
    }

    /// Runs `fut` after `delay`, replacing any pending task.
    pub fn spawn_after<F>(&mut self, delay: Duration, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let output = fut.await;
            // The receiver lives as long as the slot; a send error means it was dropped.
            let _ = tx.send((generation, output));
        }));
    }

    /// Aborts the pending task and invalidates any result it already produced.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns `true` while a task is scheduled or running.
    #[cfg(test)]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Returns the current result without blocking, discarding stale ones.
    pub fn try_take(&mut self) -> Option<T> {
        let mut latest = None;
        while let Ok((generation, output)) = self.rx.try_recv() {
            if generation == self.generation {
                latest = Some(output);
            } else {
                tracing::debug!(
                    stale = generation,
                    current = self.generation,
                    "Discarded stale task result"
                );
            }
        }
        if latest.is_some() {
            self.handle = None;
        }
        latest
    }

    /// Waits for the pending task to finish and returns its result.
    ///
    /// Returns `None` immediately if nothing is pending, or if the task
    /// was aborted or panicked.
    pub async fn take(&mut self) -> Option<T> {
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && e.is_panic()
        {
            tracing::error!(error = %e, "Background task panicked");
        }
        self.try_take()
    }
}

impl<T> Drop for LatestTask<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
