//! Cancellation signal threaded through batch lookups

use std::future::Future;
use tokio::sync::watch;

use sprout_core::error::SproutError;
use crate::RegistryResult;

/// Fires a `CancelSignal`
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

/// Observes cancellation requested through a `CancelHandle`
#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: watch::Receiver<bool>,
}

/// Create a connected handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (CancelHandle { sender }, CancelSignal { receiver })
}

impl CancelHandle {
    /// Request cancellation of every operation guarded by the paired signal
    pub fn cancel(&self) {
        // No receivers left means nothing is running
        let _ = self.sender.send(true);
    }
}

impl CancelSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        cancel_pair().1
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once cancellation is requested
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                // Handle dropped without cancelling
                std::future::pending::<()>().await;
            }
        }
    }

    /// Run `operation` unless cancellation wins the race
    pub async fn guard<F, T>(&self, operation: F) -> RegistryResult<T>
    where
        F: Future<Output = RegistryResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(SproutError::Cancelled),
            result = operation => result,
        }
    }
}
