//! Bounded-concurrency admission gate.
//!
//! Each probe class holds its own governor so a slow external service for
//! one class cannot starve the others. No fairness guarantee beyond
//! eventual admission.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A counting gate with fixed capacity.
#[derive(Debug, Clone)]
pub struct Governor {
    permits: Arc<Semaphore>,
}

/// An admitted slot; dropping it frees the slot.
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Governor {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Suspends until a slot frees up.
    pub async fn admit(&self) -> Slot {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("governor semaphore is never closed");
        Slot { _permit: permit }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn never_admits_more_than_capacity() {
        let governor = Governor::new(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..24).map(|_| {
            let governor = governor.clone();
            let active = active.clone();
            let peak = peak.clone();
            async move {
                let _slot = governor.admit().await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }
        });
        join_all(tasks).await;

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn every_caller_is_eventually_admitted() {
        let governor = Governor::new(1);
        let admitted = Arc::new(AtomicUsize::new(0));

        let tasks = (0..10).map(|_| {
            let governor = governor.clone();
            let admitted = admitted.clone();
            async move {
                let _slot = governor.admit().await;
                admitted.fetch_add(1, Ordering::SeqCst);
            }
        });
        join_all(tasks).await;

        assert_eq!(admitted.load(Ordering::SeqCst), 10);
    }
}
