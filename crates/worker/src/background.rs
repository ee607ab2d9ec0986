//! Fire-and-forget work that outlives the request that started it.

use std::future::Future;

use tokio_util::task::TaskTracker;

/// Tracks spawned background tasks so a host can wait for them.
///
/// Tasks are detached: dropping the tracker does not cancel them.
#[derive(Debug, Default)]
pub struct Background {
    tasks: TaskTracker,
}

impl Background {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Wait for every task spawned so far.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}
