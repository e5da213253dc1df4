//! Rate-limited batching.
//!
//! External lookup services impose fixed requests-per-minute ceilings.
//! The batcher releases work in fixed-size groups, fully drains each
//! group, then sleeps before releasing the next — except after the last.
//! It never retries within a batch; failed items carry their
//! failure-variant results forward.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone)]
pub struct Batcher {
    size: usize,
    delay: Duration,
}

impl Batcher {
    pub fn new(size: usize, delay: Duration) -> Self {
        Self {
            size: size.max(1),
            delay,
        }
    }

    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.size)
    }

    /// Runs `items` through `dispatch` one group at a time.
    ///
    /// `dispatch` receives the zero-based batch index and the group, and is
    /// responsible for the group's own (governor-bounded) parallelism; the
    /// batcher only sequences groups and inserts the inter-batch delay.
    /// Results concatenate in input order.
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, mut dispatch: F) -> Vec<R>
    where
        F: FnMut(usize, Vec<T>) -> Fut,
        Fut: Future<Output = Vec<R>>,
    {
        let total = self.batch_count(items.len());
        let mut results: Vec<R> = Vec::with_capacity(items.len());
        let mut remaining = items.into_iter();

        for index in 0..total {
            let batch: Vec<T> = remaining.by_ref().take(self.size).collect();
            results.extend(dispatch(index, batch).await);

            if index + 1 < total {
                debug!(
                    "batch {}/{} drained, sleeping {:?} before the next",
                    index + 1,
                    total,
                    self.delay
                );
                tokio::time::sleep(self.delay).await;
            }
        }

        results
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
