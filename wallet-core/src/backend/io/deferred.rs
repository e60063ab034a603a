use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::backend::domain::DraftId;

/// A callback that runs once after a delay unless cancelled first.
///
/// The action is keyed to the draft or session that scheduled it and is
/// aborted when this handle is dropped, so it can never outlive its owner.
#[derive(Debug)]
pub struct DeferredAction {
    key: DraftId,
    handle: JoinHandle<()>,
}

impl DeferredAction {
    /// Spawn the action on the current tokio runtime
    pub fn schedule<F>(key: DraftId, delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("Scheduling deferred action for {} in {:?}", key, delay);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self { key, handle }
    }

    pub fn key(&self) -> DraftId {
        self.key
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for DeferredAction {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling deferred action for {}", self.key);
            self.handle.abort();
        }
    }
}
