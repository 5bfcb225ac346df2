//! Live subscription handle.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::task::AbortHandle;
use tracing::debug;

/// Handle to a running message subscription.
///
/// Owns the cancellation flag and the delivery task. Status is either active
/// or canceled; [`is_finished`](Self::is_finished) additionally reports
/// whether delivery has stopped for any reason. Dropping the handle cancels
/// the subscription.
#[derive(Debug)]
pub struct Subscription {
    canceled: Arc<AtomicBool>,
    task: AbortHandle,
}

impl Subscription {
    pub(crate) fn new(canceled: Arc<AtomicBool>, task: AbortHandle) -> Self {
        Self { canceled, task }
    }

    /// Stop delivery. Idempotent.
    ///
    /// Best effort, not linearizable: the delivery task checks the flag after
    /// each receive and again before `on_update`, and is aborted at its next
    /// await point. A callback already running is allowed to finish.
    pub fn cancel(&self) {
        if !self.canceled.swap(true, Ordering::AcqRel) {
            debug!("subscription canceled");
        }
        self.task.abort();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    ///
    /// Reflects cancellation only, not transport health.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Whether the delivery task has ended, through cancellation, a transport
    /// failure, or the server completing the stream.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
