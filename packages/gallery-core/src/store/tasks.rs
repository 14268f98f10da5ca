//! Fire-and-forget background work owned by a store.

use std::future::Future;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Tracks spawned tasks so callers can wait for them to settle
#[derive(Default)]
pub(crate) struct BackgroundTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundTasks {
    /// Spawn `task` on the current runtime.
    ///
    /// Returns false, without running the task, when called outside a
    /// Tokio runtime.
    pub(crate) fn spawn<F>(&self, name: &'static str, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime; dropping background task {}", name);
                return false;
            }
        };

        tracing::trace!("Spawning background task {}", name);
        let handle = runtime.spawn(task);

        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
        true
    }

    /// Tasks not yet finished
    pub(crate) fn pending(&self) -> usize {
        self.handles
            .lock()
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait for every task, including ones spawned while draining
    pub(crate) async fn drain(&self) {
        loop {
            let batch = std::mem::take(&mut *self.handles.lock());
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    tracing::error!("Background task did not complete: {}", e);
                }
            }
        }
    }
}
