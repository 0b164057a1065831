//! Cancellable trailing-edge timer.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs a task after a quiet period; scheduling again cancels the previous
/// one. At most one task is pending at a time.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` elapses without another `schedule` or
    /// `cancel`. Must be called inside a Tokio runtime.
    ///
    /// Once the timer fires the task runs to completion; later calls do not
    /// abort it.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Fired: no longer pending.
                    token.cancel();
                    task.await;
                }
            }
        });
    }

    /// Drop the pending task, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}
