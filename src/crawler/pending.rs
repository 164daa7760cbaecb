//! Outstanding-task counter for the recursive crawl
//!
//! Tasks spawn their children instead of pushing to a queue, so "done" cannot
//! mean "queue empty". Each spawned task holds a [`PendingGuard`]; the crawl is
//! finished once every guard has been dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts tasks that have been spawned but not yet finished
#[derive(Debug, Default)]
pub struct PendingTasks {
    count: AtomicUsize,
    idle: Notify,
}

impl PendingTasks {
    /// Creates a counter with no outstanding tasks
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of pending work
    ///
    /// Must be called by the parent before spawning, so the count cannot reach
    /// zero while a child is still about to start.
    pub fn add(self: &Arc<Self>) -> PendingGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        PendingGuard {
            tasks: Arc::clone(self),
        }
    }

    /// Number of tasks still outstanding
    pub fn outstanding(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Waits until no tasks are outstanding
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a completion between the
            // check and the await is not missed
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }

    fn finish_one(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Marks one task as finished when dropped, on every exit path
#[derive(Debug)]
pub struct PendingGuard {
    tasks: Arc<PendingTasks>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.tasks.finish_one();
    }
}
